use serde::{Deserialize, Serialize};

use crate::location::{BlockGroupRef, BlockLocation, GroupPath, GroupStep};
use crate::model::{Block, Document, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListFormatHolderMode {
    /// Never report a list item's marker holder.
    Never,
    /// Report it when every direct paragraph segment of the item is selected.
    #[default]
    AllSegments,
    /// Report it when any direct paragraph segment of the item is selected.
    AnySegment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableCellContentMode {
    #[default]
    Include,
    /// A selected cell is reported once as a unit; its content is skipped.
    IgnoreForTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterateSelectionsOption {
    pub include_list_format_holder: ListFormatHolderMode,
    pub content_under_selected_table_cell: TableCellContentMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableContext {
    pub table: BlockLocation,
    pub row: usize,
    pub col: usize,
    pub is_whole_table_selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRef {
    /// Index into the record's paragraph segments.
    Paragraph(usize),
    /// The marker holder of the list item the record's path ends in.
    FormatHolder,
}

/// One contiguous piece of selection, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRecord {
    /// Root-to-innermost path of the block group holding the selection.
    pub path: GroupPath,
    /// Index of the directly selected block inside the innermost group.
    pub block: Option<usize>,
    pub segments: Vec<SegmentRef>,
    pub table_context: Option<TableContext>,
}

impl SelectionRecord {
    pub fn block_location(&self) -> Option<BlockLocation> {
        self.block
            .map(|index| BlockLocation::new(self.path.clone(), index))
    }

    pub fn resolve_segments<'a>(&self, doc: &'a Document) -> Vec<&'a Segment> {
        let block = self
            .block_location()
            .and_then(|location| doc.block(&location));
        let holder = match doc.group(&self.path) {
            Some(BlockGroupRef::ListItem(item)) => Some(&item.format_holder),
            _ => None,
        };

        self.segments
            .iter()
            .filter_map(|segment| match (segment, block) {
                (SegmentRef::Paragraph(ix), Some(Block::Paragraph(p))) => p.segments.get(*ix),
                (SegmentRef::FormatHolder, _) => holder,
                _ => None,
            })
            .collect()
    }
}

pub fn iterate_selections(
    doc: &Document,
    option: &IterateSelectionsOption,
) -> Vec<SelectionRecord> {
    let mut collector = Collector {
        option,
        records: Vec::new(),
    };
    collector.visit_group(&doc.blocks, &GroupPath::root(), false, None, false);
    collector.records
}

/// Collects selection records and trims caret-only records at the edges.
pub fn collect_selections(
    doc: &Document,
    option: &IterateSelectionsOption,
) -> Vec<SelectionRecord> {
    let mut records = iterate_selections(doc, option);
    remove_unmeaningful_selections(doc, &mut records);
    records
}

struct Collector<'o> {
    option: &'o IterateSelectionsOption,
    records: Vec<SelectionRecord>,
}

impl Collector<'_> {
    fn visit_group(
        &mut self,
        blocks: &[Block],
        path: &GroupPath,
        is_list_item: bool,
        table: Option<&TableContext>,
        treat_all_as_selected: bool,
    ) {
        let mut has_selected_segment = false;
        let mut has_unselected_segment = false;

        for (ix, block) in blocks.iter().enumerate() {
            match block {
                Block::ListItem(item) => {
                    let child = path.child(GroupStep::ListItem(ix));
                    self.visit_group(&item.blocks, &child, true, table, treat_all_as_selected);
                }
                Block::FormatContainer(container) => {
                    let child = path.child(GroupStep::FormatContainer(ix));
                    self.visit_group(&container.blocks, &child, false, table, treat_all_as_selected);
                }
                Block::Table(t) => {
                    let is_whole_table_selected = t.cells().all(|cell| cell.is_selected);
                    for (row_ix, row) in t.rows.iter().enumerate() {
                        for (col_ix, cell) in row.cells.iter().enumerate() {
                            let context = TableContext {
                                table: BlockLocation::new(path.clone(), ix),
                                row: row_ix,
                                col: col_ix,
                                is_whole_table_selected,
                            };
                            let cell_path = path.child(GroupStep::TableCell {
                                table: ix,
                                row: row_ix,
                                col: col_ix,
                            });

                            if cell.is_selected {
                                self.records.push(SelectionRecord {
                                    path: cell_path.clone(),
                                    block: None,
                                    segments: Vec::new(),
                                    table_context: Some(context.clone()),
                                });
                            }

                            if !cell.is_selected
                                || self.option.content_under_selected_table_cell
                                    != TableCellContentMode::IgnoreForTable
                            {
                                self.visit_group(
                                    &cell.blocks,
                                    &cell_path,
                                    false,
                                    Some(&context),
                                    treat_all_as_selected || cell.is_selected,
                                );
                            }
                        }
                    }
                }
                Block::Paragraph(paragraph) => {
                    let mut segments = Vec::new();
                    for (segment_ix, segment) in paragraph.segments.iter().enumerate() {
                        if treat_all_as_selected || segment.is_selected {
                            segments.push(SegmentRef::Paragraph(segment_ix));
                            has_selected_segment = true;
                        } else {
                            has_unselected_segment = true;
                        }
                    }

                    if !segments.is_empty() {
                        self.records.push(SelectionRecord {
                            path: path.clone(),
                            block: Some(ix),
                            segments,
                            table_context: table.cloned(),
                        });
                    }
                }
                Block::Divider(divider) => {
                    if treat_all_as_selected || divider.is_selected {
                        self.push_block(path, ix, table);
                    }
                }
                Block::Entity(entity) => {
                    if treat_all_as_selected || entity.is_selected {
                        self.push_block(path, ix, table);
                    }
                }
            }
        }

        let include_holder = match self.option.include_list_format_holder {
            ListFormatHolderMode::Never => false,
            ListFormatHolderMode::AllSegments => has_selected_segment && !has_unselected_segment,
            ListFormatHolderMode::AnySegment => has_selected_segment,
        };
        if is_list_item && include_holder {
            self.records.push(SelectionRecord {
                path: path.clone(),
                block: None,
                segments: vec![SegmentRef::FormatHolder],
                table_context: table.cloned(),
            });
        }
    }

    fn push_block(&mut self, path: &GroupPath, ix: usize, table: Option<&TableContext>) {
        self.records.push(SelectionRecord {
            path: path.clone(),
            block: Some(ix),
            segments: Vec::new(),
            table_context: table.cloned(),
        });
    }
}

#[derive(Clone, Copy)]
enum Edge {
    First,
    Last,
}

/// A range ending right at the start of a paragraph must not pull that
/// paragraph in, and a range starting right at the end of one must not
/// either.
fn remove_unmeaningful_selections(doc: &Document, records: &mut Vec<SelectionRecord>) {
    if records.len() > 1 && is_only_boundary_marker_selected(doc, records, Edge::Last) {
        records.pop();
    }
    if records.len() > 1 && is_only_boundary_marker_selected(doc, records, Edge::First) {
        records.remove(0);
    }
}

fn is_only_boundary_marker_selected(
    doc: &Document,
    records: &[SelectionRecord],
    edge: Edge,
) -> bool {
    let record = match edge {
        Edge::First => records.first(),
        Edge::Last => records.last(),
    };
    let Some(record) = record else {
        return false;
    };
    let [SegmentRef::Paragraph(segment_ix)] = record.segments.as_slice() else {
        return false;
    };
    let Some(Block::Paragraph(paragraph)) = record
        .block_location()
        .and_then(|location| doc.block(&location))
    else {
        return false;
    };
    let Some(segment) = paragraph.segments.get(*segment_ix) else {
        return false;
    };

    let boundary_ix = match edge {
        Edge::First => paragraph.segments.len() - 1,
        Edge::Last => 0,
    };
    segment.is_selection_marker() && *segment_ix == boundary_ix
}
