use gpui_content_model::{
    Block, DEFAULT_INDENT_STEP_PX, Document, Format, Indentation, ListItem, ListLevel, ListType,
    Paragraph, keys, parse_value_with_unit, set_model_indentation,
};

fn selected_with_format(format: Format) -> Document {
    Document::new(vec![
        Paragraph::from_text("a")
            .select_all()
            .with_format(format)
            .into_block(),
    ])
}

fn margin(doc: &Document, key: &str) -> Option<String> {
    doc.blocks[0].format().get(key).map(str::to_string)
}

#[test]
fn indent_then_outdent_is_monotonic() {
    let mut doc = selected_with_format(Format::new().with(keys::MARGIN_LEFT, "40px"));

    assert!(set_model_indentation(&mut doc, Indentation::Indent, DEFAULT_INDENT_STEP_PX));
    let indented = parse_value_with_unit(&margin(&doc, keys::MARGIN_LEFT).expect("margin"));
    assert!(indented >= 80.0);

    assert!(set_model_indentation(&mut doc, Indentation::Outdent, DEFAULT_INDENT_STEP_PX));
    let outdented = parse_value_with_unit(&margin(&doc, keys::MARGIN_LEFT).expect("margin"));
    assert!(outdented <= indented);
    assert!(outdented >= 0.0);
    assert_eq!(outdented, 40.0);
}

#[test]
fn margins_snap_to_the_step_grid() {
    let mut doc = selected_with_format(Format::new().with(keys::MARGIN_LEFT, "10px"));
    assert!(set_model_indentation(&mut doc, Indentation::Indent, 40.0));
    assert_eq!(margin(&doc, keys::MARGIN_LEFT).as_deref(), Some("40px"));

    let mut doc = selected_with_format(Format::new().with(keys::MARGIN_LEFT, "50px"));
    assert!(set_model_indentation(&mut doc, Indentation::Outdent, 40.0));
    assert_eq!(margin(&doc, keys::MARGIN_LEFT).as_deref(), Some("40px"));
}

#[test]
fn outdent_never_goes_below_zero() {
    let mut doc = selected_with_format(Format::new());

    assert!(!set_model_indentation(&mut doc, Indentation::Outdent, 40.0));
    assert_eq!(margin(&doc, keys::MARGIN_LEFT), None);

    let mut doc = selected_with_format(Format::new().with(keys::MARGIN_LEFT, "20px"));
    assert!(set_model_indentation(&mut doc, Indentation::Outdent, 40.0));
    assert_eq!(margin(&doc, keys::MARGIN_LEFT).as_deref(), Some("0px"));
    assert!(!set_model_indentation(&mut doc, Indentation::Outdent, 40.0));
}

#[test]
fn right_to_left_blocks_indent_from_the_right() {
    let mut doc = selected_with_format(Format::new().with(keys::DIRECTION, "rtl"));

    assert!(set_model_indentation(&mut doc, Indentation::Indent, 40.0));
    assert_eq!(margin(&doc, keys::MARGIN_RIGHT).as_deref(), Some("40px"));
    assert_eq!(margin(&doc, keys::MARGIN_LEFT), None);
}

#[test]
fn list_items_gain_and_lose_levels() {
    let mut level = ListLevel::new(ListType::Ordered);
    level.start_number_override = Some(1);
    level.format.set(keys::FONT_SIZE, "12pt");
    let mut doc = Document::new(vec![
        ListItem::new(vec![level], Format::new())
            .with_blocks(vec![Paragraph::from_text("a").select_all().into_block()])
            .into_block(),
    ]);

    assert!(set_model_indentation(&mut doc, Indentation::Indent, 40.0));
    let Block::ListItem(item) = &doc.blocks[0] else {
        panic!("expected list item");
    };
    assert_eq!(item.levels.len(), 2);
    assert_eq!(item.levels[1].list_type, ListType::Ordered);
    assert_eq!(item.levels[1].format.get(keys::FONT_SIZE), Some("12pt"));
    assert_eq!(item.levels[1].start_number_override, None);

    assert!(set_model_indentation(&mut doc, Indentation::Outdent, 40.0));
    assert!(set_model_indentation(&mut doc, Indentation::Outdent, 40.0));
    let Block::Paragraph(paragraph) = &doc.blocks[0] else {
        panic!("expected the list item to collapse into its paragraph");
    };
    assert_eq!(paragraph.text(), "a");
}

#[test]
fn non_positive_step_is_rejected() {
    let mut doc = selected_with_format(Format::new());
    assert!(!set_model_indentation(&mut doc, Indentation::Indent, 0.0));
    assert_eq!(margin(&doc, keys::MARGIN_LEFT), None);
}
