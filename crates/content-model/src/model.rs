use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::format::{Format, keys};

pub type Dataset = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub format: Format,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            format: Format::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockGroupKind {
    Document,
    ListItem,
    FormatContainer,
    TableCell,
}

impl BlockGroupKind {
    /// ListItems and FormatContainers are groups that also sit in a parent's
    /// block list; Document and TableCell are not blocks.
    pub fn is_block(self) -> bool {
        matches!(self, BlockGroupKind::ListItem | BlockGroupKind::FormatContainer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "blockType", rename_all = "camelCase")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    Divider(Divider),
    Entity(EntityBlock),
    ListItem(ListItem),
    FormatContainer(FormatContainer),
}

impl Block {
    pub fn format(&self) -> &Format {
        match self {
            Block::Paragraph(p) => &p.format,
            Block::Table(t) => &t.format,
            Block::Divider(d) => &d.format,
            Block::Entity(e) => &e.format,
            Block::ListItem(item) => &item.format,
            Block::FormatContainer(c) => &c.format,
        }
    }

    pub fn format_mut(&mut self) -> &mut Format {
        match self {
            Block::Paragraph(p) => &mut p.format,
            Block::Table(t) => &mut t.format,
            Block::Divider(d) => &mut d.format,
            Block::Entity(e) => &mut e.format,
            Block::ListItem(item) => &mut item.format,
            Block::FormatContainer(c) => &mut c.format,
        }
    }

    pub fn group_kind(&self) -> Option<BlockGroupKind> {
        match self {
            Block::ListItem(_) => Some(BlockGroupKind::ListItem),
            Block::FormatContainer(_) => Some(BlockGroupKind::FormatContainer),
            Block::Paragraph(_) | Block::Table(_) | Block::Divider(_) | Block::Entity(_) => None,
        }
    }

    pub fn group_blocks(&self) -> Option<&Vec<Block>> {
        match self {
            Block::ListItem(item) => Some(&item.blocks),
            Block::FormatContainer(c) => Some(&c.blocks),
            Block::Paragraph(_) | Block::Table(_) | Block::Divider(_) | Block::Entity(_) => None,
        }
    }

    pub fn group_blocks_mut(&mut self) -> Option<&mut Vec<Block>> {
        match self {
            Block::ListItem(item) => Some(&mut item.blocks),
            Block::FormatContainer(c) => Some(&mut c.blocks),
            Block::Paragraph(_) | Block::Table(_) | Block::Divider(_) | Block::Entity(_) => None,
        }
    }

    pub fn into_group_blocks(self) -> Option<Vec<Block>> {
        match self {
            Block::ListItem(item) => Some(item.blocks),
            Block::FormatContainer(c) => Some(c.blocks),
            Block::Paragraph(_) | Block::Table(_) | Block::Divider(_) | Block::Entity(_) => None,
        }
    }

    /// A block that only occupies space: a table, or a paragraph holding
    /// nothing but line breaks and selection markers.
    pub fn is_filler(&self) -> bool {
        match self {
            Block::Table(_) => true,
            Block::Paragraph(p) => p.segments.iter().all(|s| {
                matches!(s.kind, SegmentKind::Br | SegmentKind::SelectionMarker)
            }),
            Block::Divider(_) | Block::Entity(_) | Block::ListItem(_) | Block::FormatContainer(_) => {
                false
            }
        }
    }

    pub fn as_list_item(&self) -> Option<&ListItem> {
        match self {
            Block::ListItem(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_list_item_mut(&mut self) -> Option<&mut ListItem> {
        match self {
            Block::ListItem(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Block::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_format_container(&self) -> Option<&FormatContainer> {
        match self {
            Block::FormatContainer(c) => Some(c),
            _ => None,
        }
    }
}

pub(crate) fn set_paragraph_not_implicit(block: &mut Block) {
    if let Block::Paragraph(p) = block {
        p.is_implicit = false;
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub format: Format,
    #[serde(default)]
    pub is_implicit: bool,
}

impl Paragraph {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            format: Format::default(),
            is_implicit: false,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![Segment::text(text)])
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|s| match &s.kind {
                SegmentKind::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn select_all(mut self) -> Self {
        for segment in &mut self.segments {
            segment.is_selected = true;
        }
        self
    }

    pub fn into_block(self) -> Block {
        Block::Paragraph(self)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Divider {
    pub tag_name: String,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    pub format: Format,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityFormat {
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub is_readonly: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityBlock {
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    pub format: Format,
    #[serde(default)]
    pub entity_format: EntityFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListType {
    #[serde(rename = "OL")]
    Ordered,
    #[serde(rename = "UL")]
    Unordered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLevel {
    pub list_type: ListType,
    #[serde(default)]
    pub format: Format,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_number_override: Option<u32>,
}

impl ListLevel {
    pub fn new(list_type: ListType) -> Self {
        Self {
            list_type,
            format: Format::default(),
            start_number_override: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    #[serde(default)]
    pub blocks: Vec<Block>,
    pub levels: Vec<ListLevel>,
    pub format_holder: Segment,
    #[serde(default)]
    pub format: Format,
}

impl ListItem {
    pub fn new(levels: Vec<ListLevel>, holder_format: Format) -> Self {
        let format_holder = Segment {
            format: holder_format,
            ..Segment::of(SegmentKind::SelectionMarker)
        };
        Self {
            blocks: Vec::new(),
            levels,
            format_holder,
            format: Format::default(),
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn last_level(&self) -> Option<&ListLevel> {
        self.levels.last()
    }

    pub fn into_block(self) -> Block {
        Block::ListItem(self)
    }
}

pub const QUOTE_TAG: &str = "blockquote";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatContainer {
    pub tag_name: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub format: Format,
}

impl FormatContainer {
    pub fn new(tag_name: impl Into<String>, format: Format) -> Self {
        Self {
            tag_name: tag_name.into(),
            blocks: Vec::new(),
            format,
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn is_quote(&self) -> bool {
        self.tag_name == QUOTE_TAG
    }

    pub fn into_block(self) -> Block {
        Block::FormatContainer(self)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub rows: Vec<TableRow>,
    #[serde(default)]
    pub widths: Vec<f64>,
    #[serde(default)]
    pub format: Format,
}

impl Table {
    /// A `rows` × `cols` table whose cells each hold one empty paragraph.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: (0..rows)
                .map(|_| TableRow {
                    cells: (0..cols)
                        .map(|_| {
                            TableCell::new(vec![
                                Paragraph::new(vec![Segment::br()]).into_block(),
                            ])
                        })
                        .collect(),
                    ..Default::default()
                })
                .collect(),
            widths: vec![120.0; cols],
            format: Format::default(),
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row)?.cells.get(col)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row)?.cells.get_mut(col)
    }

    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }

    pub fn into_block(self) -> Block {
        Block::Table(self)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub cells: Vec<TableCell>,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub format: Format,
}

/// Opaque handle to whatever the renderer cached for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedElement(pub u64);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    pub is_header: bool,
    #[serde(default)]
    pub span_above: bool,
    #[serde(default)]
    pub span_left: bool,
    #[serde(default)]
    pub format: Format,
    #[serde(default)]
    pub dataset: Dataset,
    #[serde(skip)]
    pub cached_element: Option<CachedElement>,
}

impl TableCell {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "segmentType", content = "value", rename_all = "camelCase")]
pub enum SegmentKind {
    Text(String),
    Image { src: String },
    Br,
    SelectionMarker,
    Entity(EntityFormat),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub kind: SegmentKind,
    #[serde(default)]
    pub is_selected: bool,
    #[serde(default)]
    pub format: Format,
}

impl Segment {
    fn of(kind: SegmentKind) -> Self {
        Self {
            kind,
            is_selected: false,
            format: Format::default(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::of(SegmentKind::Text(text.into()))
    }

    pub fn br() -> Self {
        Self::of(SegmentKind::Br)
    }

    pub fn image(src: impl Into<String>) -> Self {
        Self::of(SegmentKind::Image { src: src.into() })
    }

    pub fn entity(entity_type: impl Into<String>, is_readonly: bool) -> Self {
        Self::of(SegmentKind::Entity(EntityFormat {
            entity_type: entity_type.into(),
            id: None,
            is_readonly,
        }))
    }

    /// Caret markers are always selected; their position is the caret.
    pub fn selection_marker() -> Self {
        Self {
            is_selected: true,
            ..Self::of(SegmentKind::SelectionMarker)
        }
    }

    pub fn selected(mut self) -> Self {
        self.is_selected = true;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn is_selection_marker(&self) -> bool {
        matches!(self.kind, SegmentKind::SelectionMarker)
    }

    pub fn is_readonly_entity(&self) -> bool {
        matches!(&self.kind, SegmentKind::Entity(format) if format.is_readonly)
    }
}

/// Font-related formats the list marker inherits from the text it numbers.
pub(crate) const MARKER_FORMAT_KEYS: [&str; 3] = [keys::FONT_FAMILY, keys::FONT_SIZE, keys::TEXT_COLOR];
