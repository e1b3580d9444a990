use tracing::{debug, trace, warn};

use crate::location::BlockLocation;
use crate::model::{Block, Document, set_paragraph_not_implicit};
use crate::operational::selected_child_indices;

/// A container kind that blocks can be wrapped into and unwrapped from.
pub trait ContainerWrap {
    /// Whether `block` already is the container this wrap produces.
    fn is_satisfied(&self, block: &Block) -> bool;

    /// Whether `existing`, a neighbour of a block being wrapped, can take the
    /// block in instead of a new container being created.
    fn can_merge(&self, existing: &Block) -> bool;

    /// A new, empty container for `block`. Must be a ListItem or a
    /// FormatContainer.
    fn create(&self, block: &Block) -> Block;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapOutcome {
    Wrapped,
    Unwrapped,
    Unchanged,
}

/// Toggles `wrap` over `blocks` as one batch.
///
/// When every block already satisfies the wrap, each container releases the
/// children that hold selection into its parent; unselected runs of children
/// stay behind in copies of the container. Otherwise every unsatisfied block
/// is wrapped: first all pending blocks are collected without mutating
/// anything, then each is spliced into a neighbouring mergeable container or
/// into a freshly created one.
/// Wrap and unwrap never mix within one call.
pub fn toggle_wrap(doc: &mut Document, blocks: &[BlockLocation], wrap: &impl ContainerWrap) -> WrapOutcome {
    if blocks.is_empty() {
        return WrapOutcome::Unchanged;
    }

    let all_satisfied = blocks
        .iter()
        .all(|location| doc.block(location).is_some_and(|block| wrap.is_satisfied(block)));

    if all_satisfied {
        debug!(count = blocks.len(), "unwrapping containers");
        for location in reverse_document_order(blocks.to_vec()) {
            unwrap_selected_children(doc, &location);
        }
        return WrapOutcome::Unwrapped;
    }

    let pending: Vec<BlockLocation> = blocks
        .iter()
        .filter(|location| doc.block(location).is_some_and(|block| !wrap.is_satisfied(block)))
        .cloned()
        .collect();
    debug!(pending = pending.len(), "wrapping blocks");

    // Later blocks first: a splice only moves positions after it, and a
    // container only gains children at its ends, so every remaining entry
    // still addresses its block.
    for location in reverse_document_order(pending) {
        wrap_block(doc, &location, wrap);
    }
    WrapOutcome::Wrapped
}

fn reverse_document_order(mut locations: Vec<BlockLocation>) -> Vec<BlockLocation> {
    locations.sort_by_key(|location| std::cmp::Reverse(location.order_key()));
    locations
}

fn wrap_block(doc: &mut Document, location: &BlockLocation, wrap: &impl ContainerWrap) {
    let Some(blocks) = doc.blocks_at_mut(&location.parent) else {
        warn!(?location, "wrap target vanished");
        return;
    };
    let ix = location.index;
    if ix >= blocks.len() {
        warn!(?location, "wrap target out of range");
        return;
    }

    let merge_prev = ix > 0 && wrap.can_merge(&blocks[ix - 1]);
    let merge_next = blocks.get(ix + 1).is_some_and(|next| wrap.can_merge(next));

    let mut block = blocks.remove(ix);
    match (merge_prev, merge_next) {
        (true, true) => {
            trace!(ix, "merging into both neighbours");
            set_paragraph_not_implicit(&mut block);
            let next = blocks.remove(ix);
            let next_children = next.into_group_blocks().unwrap_or_default();
            if let Some(children) = blocks[ix - 1].group_blocks_mut() {
                children.push(block);
                children.extend(next_children);
            }
        }
        (true, false) => {
            trace!(ix, "merging into previous container");
            set_paragraph_not_implicit(&mut block);
            if let Some(children) = blocks[ix - 1].group_blocks_mut() {
                children.push(block);
            }
        }
        (false, true) => {
            trace!(ix, "merging into next container");
            set_paragraph_not_implicit(&mut block);
            if let Some(children) = blocks[ix].group_blocks_mut() {
                children.insert(0, block);
            }
        }
        (false, false) => {
            trace!(ix, "creating container");
            let mut container = wrap.create(&block);
            match container.group_blocks_mut() {
                Some(children) => {
                    children.push(block);
                    blocks.insert(ix, container);
                }
                None => {
                    warn!("wrap creator did not return a block group");
                    blocks.insert(ix, block);
                }
            }
        }
    }
}

/// Moves the selected children of the group at `location` out into its
/// parent. A group without selected children is unwrapped entirely.
pub fn unwrap_selected_children(doc: &mut Document, location: &BlockLocation) {
    let Some(group_path) = doc
        .block(location)
        .and_then(|block| location.as_group_path(block))
    else {
        return;
    };
    let selected = selected_child_indices(doc, &group_path);
    let Some(blocks) = doc.blocks_at_mut(&location.parent) else {
        return;
    };
    if selected.is_empty() {
        splice_group_children(blocks, location.index);
        return;
    }

    let mut shell = blocks.remove(location.index);
    let children = shell.group_blocks_mut().map(std::mem::take).unwrap_or_default();
    trace!(selected = selected.len(), total = children.len(), "splitting container");

    let mut replacement = Vec::with_capacity(children.len());
    let mut kept: Vec<Block> = Vec::new();
    for (ix, mut child) in children.into_iter().enumerate() {
        if selected.contains(&ix) {
            flush_kept(&shell, &mut kept, &mut replacement);
            set_paragraph_not_implicit(&mut child);
            replacement.push(child);
        } else {
            kept.push(child);
        }
    }
    flush_kept(&shell, &mut kept, &mut replacement);

    blocks.splice(location.index..location.index, replacement);
}

fn flush_kept(shell: &Block, kept: &mut Vec<Block>, out: &mut Vec<Block>) {
    if kept.is_empty() {
        return;
    }
    let mut container = shell.clone();
    if let Some(children) = container.group_blocks_mut() {
        *children = std::mem::take(kept);
    }
    out.push(container);
}

/// Replaces `blocks[index]`, if it is a block group, by its children and
/// returns how many children took its place.
pub(crate) fn splice_group_children(blocks: &mut Vec<Block>, index: usize) -> usize {
    if blocks.get(index).and_then(Block::group_blocks).is_none() {
        return 0;
    }

    let group = blocks.remove(index);
    let mut children = group.into_group_blocks().unwrap_or_default();
    children.iter_mut().for_each(set_paragraph_not_implicit);
    let count = children.len();
    blocks.splice(index..index, children);
    count
}
