use tracing::{debug, warn};

use crate::error::ContentModelError;
use crate::model::{Block, Document, Paragraph, Segment, SegmentKind};
use crate::wrap::splice_group_children;

pub const DEFAULT_MAX_NORMALIZE_ITERATIONS: usize = 100;

/// One cleanup rule over a single block list. Passes see every block list
/// of the document, innermost lists first.
pub trait NormalizePass: Send + Sync {
    fn id(&self) -> &'static str;

    /// Returns whether `blocks` changed.
    fn run(&self, blocks: &mut Vec<Block>) -> bool;
}

pub struct NormalizePipeline {
    passes: Vec<Box<dyn NormalizePass>>,
}

impl Default for NormalizePipeline {
    fn default() -> Self {
        Self::new(vec![
            Box::new(CollapseLevellessListItems),
            Box::new(DropEmptyTextSegments),
            Box::new(MergeAdjacentTextSegments),
            Box::new(EnsureMarkerOnlyParagraphHasBr),
            Box::new(RemoveEmptyBlocks),
        ])
    }
}

impl NormalizePipeline {
    pub fn new(passes: Vec<Box<dyn NormalizePass>>) -> Self {
        Self { passes }
    }

    pub fn passes(&self) -> &[Box<dyn NormalizePass>] {
        &self.passes
    }

    /// Runs every pass once over the whole document.
    pub fn run_once(&self, doc: &mut Document) -> bool {
        self.run_on_blocks(&mut doc.blocks)
    }

    /// Repeats [`Self::run_once`] until nothing changes. Returns whether the
    /// document changed at all.
    pub fn run_to_fixpoint(
        &self,
        doc: &mut Document,
        max_iterations: usize,
    ) -> Result<bool, ContentModelError> {
        let mut changed = false;
        for iteration in 0..max_iterations {
            if !self.run_once(doc) {
                debug!(iteration, changed, "normalized");
                return Ok(changed);
            }
            changed = true;
        }
        Err(ContentModelError::NormalizeDidNotConverge {
            iterations: max_iterations,
        })
    }

    fn run_on_blocks(&self, blocks: &mut Vec<Block>) -> bool {
        let mut changed = false;
        for block in blocks.iter_mut() {
            match block {
                Block::ListItem(item) => changed |= self.run_on_blocks(&mut item.blocks),
                Block::FormatContainer(container) => {
                    changed |= self.run_on_blocks(&mut container.blocks)
                }
                Block::Table(table) => {
                    for cell in table.rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
                        changed |= self.run_on_blocks(&mut cell.blocks);
                    }
                }
                Block::Paragraph(_) | Block::Divider(_) | Block::Entity(_) => {}
            }
        }

        for pass in &self.passes {
            changed |= pass.run(blocks);
        }
        changed
    }
}

/// Post-edit cleanup with the default pipeline. A pipeline that fails to
/// settle is logged and the partially normalized document is kept.
pub fn normalize_content_model(doc: &mut Document) -> bool {
    match NormalizePipeline::default().run_to_fixpoint(doc, DEFAULT_MAX_NORMALIZE_ITERATIONS) {
        Ok(changed) => changed,
        Err(err) => {
            warn!(%err, "normalization gave up");
            true
        }
    }
}

/// A list item whose last level was popped turns back into its blocks.
struct CollapseLevellessListItems;

impl NormalizePass for CollapseLevellessListItems {
    fn id(&self) -> &'static str {
        "list.collapse_levelless_items"
    }

    fn run(&self, blocks: &mut Vec<Block>) -> bool {
        let mut changed = false;
        let mut ix = 0;
        while ix < blocks.len() {
            if matches!(&blocks[ix], Block::ListItem(item) if item.levels.is_empty()) {
                ix += splice_group_children(blocks, ix);
                changed = true;
            } else {
                ix += 1;
            }
        }
        changed
    }
}

struct DropEmptyTextSegments;

impl NormalizePass for DropEmptyTextSegments {
    fn id(&self) -> &'static str {
        "paragraph.drop_empty_text"
    }

    fn run(&self, blocks: &mut Vec<Block>) -> bool {
        let mut changed = false;
        for paragraph in paragraphs_mut(blocks) {
            let before = paragraph.segments.len();
            paragraph
                .segments
                .retain(|segment| !matches!(&segment.kind, SegmentKind::Text(text) if text.is_empty()));
            changed |= paragraph.segments.len() != before;
        }
        changed
    }
}

struct MergeAdjacentTextSegments;

impl NormalizePass for MergeAdjacentTextSegments {
    fn id(&self) -> &'static str {
        "paragraph.merge_adjacent_text"
    }

    fn run(&self, blocks: &mut Vec<Block>) -> bool {
        let mut changed = false;
        for paragraph in paragraphs_mut(blocks) {
            let mut merged: Vec<Segment> = Vec::with_capacity(paragraph.segments.len());
            for segment in paragraph.segments.drain(..) {
                if let Some(last) = merged.last_mut()
                    && last.is_selected == segment.is_selected
                    && last.format == segment.format
                    && let (SegmentKind::Text(left), SegmentKind::Text(right)) =
                        (&mut last.kind, &segment.kind)
                {
                    left.push_str(right);
                    changed = true;
                    continue;
                }
                merged.push(segment);
            }
            paragraph.segments = merged;
        }
        changed
    }
}

/// A paragraph holding only the caret still needs a line box.
struct EnsureMarkerOnlyParagraphHasBr;

impl NormalizePass for EnsureMarkerOnlyParagraphHasBr {
    fn id(&self) -> &'static str {
        "paragraph.ensure_br_after_marker"
    }

    fn run(&self, blocks: &mut Vec<Block>) -> bool {
        let mut changed = false;
        for paragraph in paragraphs_mut(blocks) {
            if !paragraph.segments.is_empty()
                && paragraph.segments.iter().all(Segment::is_selection_marker)
            {
                paragraph.segments.push(Segment::br());
                changed = true;
            }
        }
        changed
    }
}

struct RemoveEmptyBlocks;

impl NormalizePass for RemoveEmptyBlocks {
    fn id(&self) -> &'static str {
        "core.remove_empty_blocks"
    }

    fn run(&self, blocks: &mut Vec<Block>) -> bool {
        let before = blocks.len();
        blocks.retain(|block| match block {
            Block::Paragraph(p) => !p.segments.is_empty(),
            Block::ListItem(item) => !item.blocks.is_empty(),
            Block::FormatContainer(container) => !container.blocks.is_empty(),
            Block::Table(_) | Block::Divider(_) | Block::Entity(_) => true,
        });
        blocks.len() != before
    }
}

fn paragraphs_mut(blocks: &mut [Block]) -> impl Iterator<Item = &mut Paragraph> {
    blocks.iter_mut().filter_map(|block| match block {
        Block::Paragraph(p) => Some(p),
        _ => None,
    })
}
