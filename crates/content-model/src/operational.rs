use std::collections::BTreeSet;

use tracing::trace;

use crate::location::{BlockLocation, GroupPath};
use crate::model::{Block, BlockGroupKind, Document, ListItem, Paragraph, Segment, Table};
use crate::selection::{
    IterateSelectionsOption, ListFormatHolderMode, SegmentRef, collect_selections,
};

/// How the ancestor search in [`get_operational_blocks`] treats several
/// group kinds.
///
/// With `NearestOfAny` the innermost ancestor of any listed kind wins. With
/// `ByPriority` each kind is searched for on its own, in the given order,
/// across the whole ancestor chain; a later kind is only tried when no
/// ancestor of an earlier kind exists. So for a paragraph inside a list item
/// inside a quote, `[FormatContainer, ListItem]` yields the quote under
/// `ByPriority` and the list item under `NearestOfAny`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AncestorSearch {
    NearestOfAny,
    ByPriority,
}

/// Resolves the current selection into the blocks an editing command
/// should act on, deduplicated, in first-encountered (document) order.
///
/// For every selection record the ancestor chain is searched upward for a
/// group of one of `group_types`; the search gives up at any ancestor of a
/// `stop_types` kind. Only ListItems and FormatContainers can be returned as
/// groups, since only they live in a parent's block list. Records without a
/// matching ancestor contribute their directly selected block.
pub fn get_operational_blocks(
    doc: &Document,
    group_types: &[BlockGroupKind],
    stop_types: &[BlockGroupKind],
    search: AncestorSearch,
) -> Vec<BlockLocation> {
    let option = IterateSelectionsOption {
        include_list_format_holder: ListFormatHolderMode::Never,
        ..Default::default()
    };
    let find_sequence: Vec<&[BlockGroupKind]> = match search {
        AncestorSearch::NearestOfAny => vec![group_types],
        AncestorSearch::ByPriority => group_types.chunks(1).collect(),
    };

    let mut result: Vec<BlockLocation> = Vec::new();
    for record in collect_selections(doc, &option) {
        let matched = find_sequence
            .iter()
            .find_map(|kinds| closest_ancestor_group(&record.path, kinds, stop_types));

        let location = match matched {
            Some(location) => Some(location),
            None => record.block_location(),
        };
        let Some(location) = location else {
            continue;
        };
        if !result.contains(&location) {
            trace!(?location, "operational block");
            result.push(location);
        }
    }
    result
}

/// Depth-descending search for a block-valued group of one of `kinds`,
/// stopping (exclusive) at the first ancestor of a `stop_types` kind.
pub fn closest_ancestor_group(
    path: &GroupPath,
    kinds: &[BlockGroupKind],
    stop_types: &[BlockGroupKind],
) -> Option<BlockLocation> {
    for depth in (0..=path.depth()).rev() {
        let kind = path.kind_at(depth);
        if kinds.contains(&kind) && kind.is_block() {
            return path.group_block_location(depth);
        }
        if stop_types.contains(&kind) {
            return None;
        }
    }
    None
}

/// Indices of the children of `group` that hold part of the selection.
pub fn selected_child_indices(doc: &Document, group: &GroupPath) -> BTreeSet<usize> {
    let option = IterateSelectionsOption {
        include_list_format_holder: ListFormatHolderMode::Never,
        ..Default::default()
    };
    collect_selections(doc, &option)
        .iter()
        .filter_map(|record| {
            if record.path == *group {
                record.block
            } else if record.path.starts_with(group) {
                record
                    .path
                    .steps()
                    .get(group.depth())
                    .map(|step| step.block_index())
            } else {
                None
            }
        })
        .collect()
}

/// The first table the selection reaches, either as a selected block or as
/// the table enclosing selected content.
pub fn get_first_selected_table(doc: &Document) -> Option<(BlockLocation, &Table)> {
    let option = IterateSelectionsOption {
        include_list_format_holder: ListFormatHolderMode::Never,
        ..Default::default()
    };
    collect_selections(doc, &option)
        .into_iter()
        .find_map(|record| {
            let location = match record.block_location() {
                Some(location) if matches!(doc.block(&location), Some(Block::Table(_))) => {
                    location
                }
                _ => record.table_context?.table,
            };
            let table = doc.block(&location)?.as_table()?;
            Some((location, table))
        })
}

pub fn get_first_selected_list_item(doc: &Document) -> Option<(BlockLocation, &ListItem)> {
    get_operational_blocks(
        doc,
        &[BlockGroupKind::ListItem],
        &[BlockGroupKind::TableCell],
        AncestorSearch::NearestOfAny,
    )
    .into_iter()
    .find_map(|location| {
        let item = doc.block(&location)?.as_list_item()?;
        Some((location, item))
    })
}

#[derive(Debug, Clone)]
pub struct SelectedSegment<'a> {
    pub segment: &'a Segment,
    /// The paragraph holding the segment; `None` for list marker holders.
    pub paragraph: Option<&'a Paragraph>,
    pub path: GroupPath,
}

/// Every selected segment in document order. Read-only entities are left
/// out unless `include_entity` is set.
pub fn get_selected_segments_and_paragraphs(
    doc: &Document,
    include_format_holder: bool,
    include_entity: bool,
) -> Vec<SelectedSegment<'_>> {
    let option = IterateSelectionsOption {
        include_list_format_holder: if include_format_holder {
            ListFormatHolderMode::AllSegments
        } else {
            ListFormatHolderMode::Never
        },
        ..Default::default()
    };

    let mut result = Vec::new();
    for record in collect_selections(doc, &option) {
        let paragraph = record
            .block_location()
            .and_then(|location| doc.block(&location))
            .and_then(Block::as_paragraph);
        let is_holder = record.segments.contains(&SegmentRef::FormatHolder);
        if paragraph.is_none() && !(include_format_holder && is_holder) {
            continue;
        }

        for segment in record.resolve_segments(doc) {
            if include_entity || !segment.is_readonly_entity() {
                result.push(SelectedSegment {
                    segment,
                    paragraph,
                    path: record.path.clone(),
                });
            }
        }
    }
    result
}

pub fn get_selected_segments(doc: &Document, include_format_holder: bool) -> Vec<&Segment> {
    get_selected_segments_and_paragraphs(doc, include_format_holder, false)
        .into_iter()
        .map(|selected| selected.segment)
        .collect()
}

pub fn get_selected_paragraphs(doc: &Document) -> Vec<&Paragraph> {
    let mut result: Vec<&Paragraph> = Vec::new();
    for selected in get_selected_segments_and_paragraphs(doc, false, true) {
        if let Some(paragraph) = selected.paragraph
            && !result.iter().any(|p| std::ptr::eq(*p, paragraph))
        {
            result.push(paragraph);
        }
    }
    result
}
