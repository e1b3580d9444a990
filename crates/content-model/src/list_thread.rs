use crate::location::{BlockLocation, GroupPath, GroupStep};
use crate::model::{Block, Document, ListItem, ListType};

/// A list item in document order, or `None` where non-list content sits
/// between list items.
type ThreadEntry<'a> = Option<(BlockLocation, &'a ListItem)>;

/// All list items numbered together with the item at `location`, in
/// document order, the item itself included.
///
/// An ordered thread runs across paragraphs and other non-list content and
/// takes in deeper items of compatible type. It ends at a shallower item, at
/// an incompatible item of the same depth, or where a start number override
/// restarts numbering. An unordered thread is a contiguous run of items.
pub fn find_list_items_in_same_thread(doc: &Document, location: &BlockLocation) -> Vec<BlockLocation> {
    let mut entries: Vec<ThreadEntry<'_>> = Vec::new();
    collect_list_items(&doc.blocks, &GroupPath::root(), &mut entries);

    let Some(current_ix) = entries
        .iter()
        .position(|entry| entry.as_ref().is_some_and(|(loc, _)| loc == location))
    else {
        return Vec::new();
    };
    let Some(current) = entries[current_ix].as_ref().map(|(_, item)| *item) else {
        return Vec::new();
    };
    let depth = current.levels.len();
    let Some(last_level) = current.last_level() else {
        return Vec::new();
    };
    let is_ordered = last_level.list_type == ListType::Ordered;

    let mut before: Vec<BlockLocation> = Vec::new();
    for entry in entries[..=current_ix].iter().rev() {
        let Some((loc, item)) = entry else {
            if is_ordered {
                continue;
            }
            break;
        };
        if is_compatible(current, item) {
            before.push(loc.clone());
            if is_ordered && has_start_number_override(item, depth) {
                break;
            }
        } else if ends_thread(is_ordered, item, depth) {
            break;
        }
    }
    before.reverse();

    let mut after: Vec<BlockLocation> = Vec::new();
    for entry in &entries[current_ix + 1..] {
        let Some((loc, item)) = entry else {
            if is_ordered {
                continue;
            }
            break;
        };
        if is_compatible(current, item) && !has_start_number_override(item, depth) {
            after.push(loc.clone());
        } else if ends_thread(is_ordered, item, depth) {
            break;
        }
    }

    before.extend(after);
    before
}

/// Number shown in front of an ordered list item, `None` for bullets.
pub fn get_list_number(doc: &Document, location: &BlockLocation) -> Option<u32> {
    let item = doc.block(location)?.as_list_item()?;
    let depth = item.levels.len();
    if item.last_level()?.list_type != ListType::Ordered {
        return None;
    }

    let mut number: Option<u32> = None;
    for loc in find_list_items_in_same_thread(doc, location) {
        let Some(other) = doc.block(&loc).and_then(Block::as_list_item) else {
            continue;
        };
        if other.levels.len() != depth {
            continue;
        }
        let start = other.levels[depth - 1].start_number_override;
        number = Some(match (start, number) {
            (Some(start), _) => start,
            (None, Some(previous)) => previous + 1,
            (None, None) => 1,
        });
        if loc == *location {
            return number;
        }
    }
    number
}

fn is_compatible(current: &ListItem, other: &ListItem) -> bool {
    current.levels.len() <= other.levels.len()
        && current
            .levels
            .iter()
            .zip(&other.levels)
            .all(|(a, b)| a.list_type == b.list_type)
}

fn ends_thread(is_ordered: bool, item: &ListItem, depth: usize) -> bool {
    !is_ordered || item.levels.len() <= depth
}

fn has_start_number_override(item: &ListItem, depth: usize) -> bool {
    item.levels
        .iter()
        .take(depth)
        .any(|level| level.start_number_override.is_some())
}

fn collect_list_items<'a>(blocks: &'a [Block], path: &GroupPath, entries: &mut Vec<ThreadEntry<'a>>) {
    for (ix, block) in blocks.iter().enumerate() {
        match block {
            Block::ListItem(item) => {
                entries.push(Some((BlockLocation::new(path.clone(), ix), item)));
            }
            Block::FormatContainer(container) => {
                push_break(entries);
                collect_list_items(
                    &container.blocks,
                    &path.child(GroupStep::FormatContainer(ix)),
                    entries,
                );
                push_break(entries);
            }
            Block::Table(table) => {
                push_break(entries);
                for (row_ix, row) in table.rows.iter().enumerate() {
                    for (col_ix, cell) in row.cells.iter().enumerate() {
                        let cell_path = path.child(GroupStep::TableCell {
                            table: ix,
                            row: row_ix,
                            col: col_ix,
                        });
                        collect_list_items(&cell.blocks, &cell_path, entries);
                    }
                }
                push_break(entries);
            }
            Block::Paragraph(_) | Block::Divider(_) | Block::Entity(_) => push_break(entries),
        }
    }
}

fn push_break(entries: &mut Vec<ThreadEntry<'_>>) {
    if entries.last().is_some_and(Option::is_some) {
        entries.push(None);
    }
}
