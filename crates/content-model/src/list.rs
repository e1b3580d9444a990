use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};

use crate::format::{Direction, Format, keys, parse_value_with_unit};
use crate::location::BlockLocation;
use crate::model::{
    Block, BlockGroupKind, Document, ListItem, ListLevel, ListType, MARKER_FORMAT_KEYS,
    set_paragraph_not_implicit,
};
use crate::normalize::normalize_content_model;
use crate::operational::{AncestorSearch, get_operational_blocks};

pub const DEFAULT_INDENT_STEP_PX: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Indentation {
    Indent,
    Outdent,
}

/// List blocks are searched across table cells, so a list spanning cells is
/// treated as one.
fn list_operational_blocks(doc: &Document) -> Vec<BlockLocation> {
    get_operational_blocks(
        doc,
        &[BlockGroupKind::ListItem],
        &[],
        AncestorSearch::NearestOfAny,
    )
}

enum ListAction {
    Demote,
    Retype,
    SkipFiller,
    Promote,
    Keep,
}

/// Tracks a run of promoted blocks and the spacing around fillers skipped
/// inside it.
#[derive(Default)]
struct ListGap {
    last_promoted: Option<BlockLocation>,
    gap_before_next: bool,
    promoted_any: bool,
}

/// Toggles the selected blocks into a list of `list_type`, or out of it when
/// every selected block already is such a list item.
#[instrument(level = "debug", skip(doc))]
pub fn set_list_type(doc: &mut Document, list_type: ListType) -> bool {
    let blocks = list_operational_blocks(doc);
    if blocks.is_empty() {
        return false;
    }

    let is_sole = blocks.len() == 1;
    let already_in_type = blocks.iter().all(|location| match doc.block(location) {
        Some(Block::ListItem(item)) => item
            .last_level()
            .is_some_and(|level| level.list_type == list_type),
        Some(block) => !is_sole && block.is_filler(),
        None => false,
    });
    debug!(count = blocks.len(), already_in_type, "resolved list targets");

    let mut changed = false;
    let mut gap = ListGap::default();
    for location in &blocks {
        let action = match doc.block(location) {
            Some(Block::ListItem(_)) if already_in_type => ListAction::Demote,
            Some(Block::ListItem(item)) => match item.last_level() {
                Some(level) if level.list_type != list_type => ListAction::Retype,
                _ => ListAction::Keep,
            },
            Some(_) if already_in_type => ListAction::Keep,
            Some(block) if !is_sole && block.is_filler() => ListAction::SkipFiller,
            Some(_) => ListAction::Promote,
            None => ListAction::Keep,
        };

        // Gap margins only bridge fillers.
        if matches!(action, ListAction::Demote | ListAction::Retype | ListAction::Keep) {
            gap.last_promoted = None;
            gap.gap_before_next = false;
        }

        match action {
            ListAction::Demote => {
                if let Some(item) = doc.block_mut(location).and_then(Block::as_list_item_mut) {
                    item.levels.pop();
                    if let [only] = item.blocks.as_mut_slice() {
                        set_paragraph_not_implicit(only);
                    }
                    changed = true;
                }
            }
            ListAction::Retype => {
                if let Some(level) = doc
                    .block_mut(location)
                    .and_then(Block::as_list_item_mut)
                    .and_then(|item| item.levels.last_mut())
                {
                    level.list_type = list_type;
                    changed = true;
                }
            }
            ListAction::SkipFiller => {
                trace!(?location, "skipping filler");
                if let Some(previous) = gap.last_promoted.take()
                    && let Some(block) = doc.block_mut(&previous)
                {
                    block.format_mut().set(keys::MARGIN_BOTTOM, "0px");
                }
                gap.gap_before_next = true;
            }
            ListAction::Promote => {
                let after_gap = std::mem::take(&mut gap.gap_before_next);
                let continues_ordered = previous_sibling(doc, location)
                    .and_then(Block::as_list_item)
                    .and_then(ListItem::last_level)
                    .is_some_and(|level| level.list_type == ListType::Ordered);
                let start_number = (list_type == ListType::Ordered
                    && !gap.promoted_any
                    && !continues_ordered)
                    .then_some(1);

                if promote_block(doc, location, list_type, start_number, after_gap) {
                    trace!(?location, ?start_number, "promoted block");
                    gap.last_promoted = Some(location.clone());
                    gap.promoted_any = true;
                    changed = true;
                }
            }
            ListAction::Keep => {}
        }
    }

    if changed {
        normalize_content_model(doc);
    }
    changed
}

fn previous_sibling<'a>(doc: &'a Document, location: &BlockLocation) -> Option<&'a Block> {
    let index = location.index.checked_sub(1)?;
    doc.blocks_at(&location.parent)?.get(index)
}

fn promote_block(
    doc: &mut Document,
    location: &BlockLocation,
    list_type: ListType,
    start_number_override: Option<u32>,
    after_gap: bool,
) -> bool {
    let Some(blocks) = doc.blocks_at_mut(&location.parent) else {
        return false;
    };
    if location.index >= blocks.len() {
        return false;
    }
    let mut block = blocks.remove(location.index);

    let segment_format = match &block {
        Block::Paragraph(p) => p.segments.first().map(|s| s.format.clone()),
        _ => None,
    }
    .unwrap_or_default();

    let mut level = ListLevel::new(list_type);
    level.start_number_override = start_number_override;
    let mut holder_format = Format::new();
    for key in MARKER_FORMAT_KEYS {
        if let Some(value) = segment_format.get(key) {
            level.format.set(key, value);
            holder_format.set(key, value);
        }
    }
    for key in [keys::DIRECTION, keys::TEXT_ALIGN] {
        if let Some(value) = block.format().get(key) {
            level.format.set(key, value);
        }
    }

    // The list item supplies the line box, the paragraph no longer needs one.
    if let Block::Paragraph(p) = &mut block {
        p.is_implicit = true;
    }

    let mut item = ListItem::new(vec![level], holder_format).with_blocks(vec![block]);
    if after_gap {
        item.format.set(keys::MARGIN_TOP, "0px");
    }
    blocks.insert(location.index, item.into_block());
    true
}

/// Indents or outdents the selected blocks. List items gain or lose a level;
/// other blocks move their leading margin to the next multiple of `step_px`.
#[instrument(level = "debug", skip(doc))]
pub fn set_model_indentation(doc: &mut Document, indentation: Indentation, step_px: f64) -> bool {
    if step_px.is_nan() || step_px <= 0.0 {
        warn!(step_px, "indent step must be positive");
        return false;
    }

    let blocks = list_operational_blocks(doc);
    debug!(count = blocks.len(), "resolved indentation targets");

    let mut changed = false;
    for location in &blocks {
        let Some(block) = doc.block_mut(location) else {
            continue;
        };
        match block {
            Block::ListItem(item) => match indentation {
                Indentation::Indent => {
                    let level = match item.last_level() {
                        Some(last) => ListLevel {
                            list_type: last.list_type,
                            format: last.format.clone(),
                            start_number_override: None,
                        },
                        None => ListLevel::new(ListType::Unordered),
                    };
                    item.levels.push(level);
                    changed = true;
                }
                Indentation::Outdent => changed |= item.levels.pop().is_some(),
            },
            block => changed |= shift_leading_margin(block.format_mut(), indentation, step_px),
        }
    }

    if changed {
        normalize_content_model(doc);
    }
    changed
}

fn shift_leading_margin(format: &mut Format, indentation: Indentation, step_px: f64) -> bool {
    let key = match format.direction() {
        Direction::Ltr => keys::MARGIN_LEFT,
        Direction::Rtl => keys::MARGIN_RIGHT,
    };
    let original = format.get(key).map(parse_value_with_unit).unwrap_or(0.0);

    let snapped = match indentation {
        Indentation::Indent => (original / step_px).ceil() * step_px,
        Indentation::Outdent => (original / step_px).floor() * step_px,
    };
    let shifted = if snapped != original {
        snapped
    } else {
        match indentation {
            Indentation::Indent => original + step_px,
            Indentation::Outdent => original - step_px,
        }
    };

    let shifted = shifted.max(0.0);
    if shifted == original {
        return false;
    }
    format.set(key, format!("{shifted}px"));
    true
}
