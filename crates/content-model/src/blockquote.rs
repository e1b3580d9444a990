use tracing::{debug, instrument};

use crate::format::{Direction, Format, keys};
use crate::model::{Block, BlockGroupKind, Document, FormatContainer, QUOTE_TAG};
use crate::operational::{AncestorSearch, get_operational_blocks};
use crate::wrap::{ContainerWrap, WrapOutcome, toggle_wrap};

/// Built-in quote look: grey text behind a bar on the leading side.
pub fn default_quote_format() -> Format {
    Format::new()
        .with(keys::BORDER_LEFT, "3px solid rgb(200, 200, 200)")
        .with(keys::TEXT_COLOR, "rgb(102, 102, 102)")
        .with(keys::PADDING_LEFT, "10px")
        .with(keys::MARGIN_TOP, "1em")
        .with(keys::MARGIN_BOTTOM, "1em")
        .with(keys::MARGIN_LEFT, "40px")
        .with(keys::MARGIN_RIGHT, "40px")
}

/// The same quote format for right-to-left text: every left/right key trades
/// places with its counterpart.
pub fn mirror_quote_format(format: &Format) -> Format {
    let mut mirrored = format.clone();
    mirrored.swap(keys::BORDER_LEFT, keys::BORDER_RIGHT);
    mirrored.swap(keys::PADDING_LEFT, keys::PADDING_RIGHT);
    mirrored.swap(keys::MARGIN_LEFT, keys::MARGIN_RIGHT);
    mirrored.set(keys::DIRECTION, Direction::Rtl.as_str());
    mirrored
}

struct QuoteWrap {
    ltr: Format,
    rtl: Format,
}

impl ContainerWrap for QuoteWrap {
    fn is_satisfied(&self, block: &Block) -> bool {
        matches!(block, Block::FormatContainer(container) if container.is_quote())
    }

    fn can_merge(&self, existing: &Block) -> bool {
        matches!(
            existing,
            Block::FormatContainer(container)
                if container.is_quote()
                    && (container.format == self.ltr || container.format == self.rtl)
        )
    }

    fn create(&self, block: &Block) -> Block {
        let format = match block.format().direction() {
            Direction::Ltr => self.ltr.clone(),
            Direction::Rtl => self.rtl.clone(),
        };
        FormatContainer::new(QUOTE_TAG, format).into_block()
    }
}

/// Wraps the selected blocks into quotes, or takes them out again when all
/// of them already sit in quotes.
///
/// A list item is quoted as a whole; a quote wins over a list item it
/// contains. Quotes never reach across a table cell.
#[instrument(level = "debug", skip_all)]
pub fn toggle_model_block_quote(doc: &mut Document, quote_format: &Format) -> bool {
    let blocks = get_operational_blocks(
        doc,
        &[BlockGroupKind::FormatContainer, BlockGroupKind::ListItem],
        &[BlockGroupKind::TableCell],
        AncestorSearch::ByPriority,
    );
    debug!(count = blocks.len(), "resolved quote targets");

    let wrap = QuoteWrap {
        ltr: quote_format.clone(),
        rtl: mirror_quote_format(quote_format),
    };
    toggle_wrap(doc, &blocks, &wrap) != WrapOutcome::Unchanged
}
