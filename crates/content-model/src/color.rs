const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("red", (255, 0, 0)),
    ("green", (0, 128, 0)),
    ("lime", (0, 255, 0)),
    ("blue", (0, 0, 255)),
    ("yellow", (255, 255, 0)),
    ("cyan", (0, 255, 255)),
    ("aqua", (0, 255, 255)),
    ("magenta", (255, 0, 255)),
    ("fuchsia", (255, 0, 255)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("silver", (192, 192, 192)),
    ("maroon", (128, 0, 0)),
    ("olive", (128, 128, 0)),
    ("purple", (128, 0, 128)),
    ("teal", (0, 128, 128)),
    ("navy", (0, 0, 128)),
    ("orange", (255, 165, 0)),
    ("pink", (255, 192, 203)),
    ("brown", (165, 42, 42)),
];

pub const LIGHT_TEXT_COLOR: &str = "#ffffff";
pub const DARK_TEXT_COLOR: &str = "#000000";

/// Parses `#rgb`, `#rrggbb`, `rgb(..)`, `rgba(..)` and a handful of named
/// colours. Alpha is ignored.
pub fn parse_color(color: &str) -> Option<(u8, u8, u8)> {
    let color = color.trim().to_ascii_lowercase();

    if let Some(hex) = color.strip_prefix('#') {
        return parse_hex(hex);
    }

    if let Some(args) = color
        .strip_prefix("rgba(")
        .or_else(|| color.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let mut channels = args.split(',').map(|part| part.trim().parse::<f64>());
        let r = channels.next()?.ok()?;
        let g = channels.next()?.ok()?;
        let b = channels.next()?.ok()?;
        let clamp = |v: f64| v.clamp(0.0, 255.0).round() as u8;
        return Some((clamp(r), clamp(g), clamp(b)));
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == color)
        .map(|(_, rgb)| *rgb)
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some((digits.next()??, digits.next()??, digits.next()??))
        }
        6 | 8 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

/// HSL lightness in percent, 0 to 100. Unknown colours count as white.
pub fn color_lightness(color: &str) -> f64 {
    let Some((r, g, b)) = parse_color(color) else {
        return 100.0;
    };
    let max = r.max(g).max(b) as f64;
    let min = r.min(g).min(b) as f64;
    (max + min) / 2.0 / 255.0 * 100.0
}

/// Text colour that stays readable on the given background.
pub fn readable_text_color(background: &str) -> &'static str {
    if color_lightness(background) < 50.0 {
        LIGHT_TEXT_COLOR
    } else {
        DARK_TEXT_COLOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_functional_forms() {
        assert_eq!(parse_color("#fff"), Some((255, 255, 255)));
        assert_eq!(parse_color("#102030"), Some((16, 32, 48)));
        assert_eq!(parse_color("rgba(1, 2, 3, 0.5)"), Some((1, 2, 3)));
        assert_eq!(parse_color("Navy"), Some((0, 0, 128)));
        assert_eq!(parse_color("#12"), None);
    }

    #[test]
    fn picks_contrasting_text() {
        assert_eq!(readable_text_color("red"), DARK_TEXT_COLOR);
        assert_eq!(readable_text_color("#000080"), LIGHT_TEXT_COLOR);
        assert_eq!(readable_text_color("#ffff00"), DARK_TEXT_COLOR);
        assert_eq!(readable_text_color("not a color"), DARK_TEXT_COLOR);
    }
}
