use tracing::{debug, instrument};

use crate::format::{Direction, Format, keys};
use crate::list_thread::find_list_items_in_same_thread;
use crate::location::BlockLocation;
use crate::model::{Block, BlockGroupKind, Document, ListItem};
use crate::operational::{AncestorSearch, get_operational_blocks};

/// Sets the text direction of the selected blocks. A selected list item
/// changes together with every item of its numbering thread.
#[instrument(level = "debug", skip(doc))]
pub fn set_model_direction(doc: &mut Document, direction: Direction) -> bool {
    let blocks = get_operational_blocks(
        doc,
        &[BlockGroupKind::ListItem],
        &[BlockGroupKind::TableCell],
        AncestorSearch::NearestOfAny,
    );

    let mut list_items: Vec<BlockLocation> = Vec::new();
    let mut others: Vec<BlockLocation> = Vec::new();
    for location in blocks {
        match doc.block(&location) {
            Some(Block::ListItem(_)) => {
                for item in find_list_items_in_same_thread(doc, &location) {
                    if !list_items.contains(&item) {
                        list_items.push(item);
                    }
                }
            }
            Some(_) => others.push(location),
            None => {}
        }
    }
    debug!(list_items = list_items.len(), others = others.len(), "resolved direction targets");

    let mut changed = false;
    for location in &list_items {
        if let Some(item) = doc.block_mut(location).and_then(Block::as_list_item_mut) {
            changed |= set_list_item_direction(item, direction);
        }
    }
    for location in &others {
        if let Some(block) = doc.block_mut(location) {
            changed |= set_block_direction(block, direction);
        }
    }
    changed
}

fn set_list_item_direction(item: &mut ListItem, direction: Direction) -> bool {
    let mut changed = false;
    for level in &mut item.levels {
        changed |= set_format_direction(&mut level.format, direction);
    }
    changed |= set_format_direction(&mut item.format, direction);
    for block in &mut item.blocks {
        changed |= set_subtree_direction(block, direction);
    }
    changed
}

fn set_subtree_direction(block: &mut Block, direction: Direction) -> bool {
    let mut changed = set_block_direction(block, direction);
    match block {
        Block::ListItem(item) => changed |= set_list_item_direction(item, direction),
        Block::FormatContainer(container) => {
            for child in &mut container.blocks {
                changed |= set_subtree_direction(child, direction);
            }
        }
        Block::Paragraph(_) | Block::Table(_) | Block::Divider(_) | Block::Entity(_) => {}
    }
    changed
}

/// A table that turns around also mirrors its cells' side borders.
fn set_block_direction(block: &mut Block, direction: Direction) -> bool {
    if !set_format_direction(block.format_mut(), direction) {
        return false;
    }
    if let Block::Table(table) = block {
        for cell in table.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
            cell.format.swap(keys::BORDER_LEFT, keys::BORDER_RIGHT);
            cell.cached_element = None;
        }
    }
    true
}

/// Margins and paddings trade sides so the indentation stays on the
/// leading edge.
fn set_format_direction(format: &mut Format, direction: Direction) -> bool {
    if format.direction() == direction {
        return false;
    }
    format.set(keys::DIRECTION, direction.as_str());
    format.swap(keys::MARGIN_LEFT, keys::MARGIN_RIGHT);
    format.swap(keys::PADDING_LEFT, keys::PADDING_RIGHT);
    true
}
