use crate::model::{
    Block, BlockGroupKind, Document, FormatContainer, ListItem, TableCell,
};

/// One hop from a block group into a child block group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupStep {
    ListItem(usize),
    FormatContainer(usize),
    TableCell { table: usize, row: usize, col: usize },
}

impl GroupStep {
    pub fn kind(self) -> BlockGroupKind {
        match self {
            GroupStep::ListItem(_) => BlockGroupKind::ListItem,
            GroupStep::FormatContainer(_) => BlockGroupKind::FormatContainer,
            GroupStep::TableCell { .. } => BlockGroupKind::TableCell,
        }
    }

    /// Index of the block in the parent's block list that this step enters.
    pub fn block_index(self) -> usize {
        match self {
            GroupStep::ListItem(ix) | GroupStep::FormatContainer(ix) => ix,
            GroupStep::TableCell { table, .. } => table,
        }
    }

    fn push_order_key(self, key: &mut Vec<usize>) {
        match self {
            GroupStep::ListItem(ix) | GroupStep::FormatContainer(ix) => key.push(ix),
            GroupStep::TableCell { table, row, col } => key.extend([table, row, col]),
        }
    }
}

/// Path from the document root to a block group. The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GroupPath(Vec<GroupStep>);

impl GroupPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[GroupStep] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn child(&self, step: GroupStep) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }

    pub fn prefix(&self, depth: usize) -> Self {
        Self(self.0[..depth.min(self.0.len())].to_vec())
    }

    /// Kind of the group reached after `depth` steps.
    pub fn kind_at(&self, depth: usize) -> BlockGroupKind {
        match depth.checked_sub(1) {
            None => BlockGroupKind::Document,
            Some(ix) => self.0[ix].kind(),
        }
    }

    pub fn innermost_kind(&self) -> BlockGroupKind {
        self.kind_at(self.depth())
    }

    /// Location of the group at `depth` inside its parent's block list, when
    /// that group is itself a block.
    pub fn group_block_location(&self, depth: usize) -> Option<BlockLocation> {
        let step = *self.0.get(depth.checked_sub(1)?)?;
        match step {
            GroupStep::ListItem(index) | GroupStep::FormatContainer(index) => Some(BlockLocation {
                parent: self.prefix(depth - 1),
                index,
            }),
            GroupStep::TableCell { .. } => None,
        }
    }

    /// Location of the innermost table enclosing this path, if any.
    pub fn enclosing_table(&self) -> Option<BlockLocation> {
        self.0.iter().enumerate().rev().find_map(|(depth, step)| match step {
            GroupStep::TableCell { table, .. } => Some(BlockLocation {
                parent: self.prefix(depth),
                index: *table,
            }),
            _ => None,
        })
    }

    pub fn starts_with(&self, other: &GroupPath) -> bool {
        self.0.starts_with(&other.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockLocation {
    pub parent: GroupPath,
    pub index: usize,
}

impl BlockLocation {
    pub fn new(parent: GroupPath, index: usize) -> Self {
        Self { parent, index }
    }

    /// Flattened index sequence; sorting by it yields document (pre-)order.
    pub fn order_key(&self) -> Vec<usize> {
        let mut key = Vec::with_capacity(self.parent.depth() + 1);
        for step in self.parent.steps() {
            step.push_order_key(&mut key);
        }
        key.push(self.index);
        key
    }

    /// Path of the group this block opens, if it is a ListItem or a
    /// FormatContainer.
    pub fn as_group_path(&self, block: &Block) -> Option<GroupPath> {
        match block {
            Block::ListItem(_) => Some(self.parent.child(GroupStep::ListItem(self.index))),
            Block::FormatContainer(_) => {
                Some(self.parent.child(GroupStep::FormatContainer(self.index)))
            }
            Block::Paragraph(_) | Block::Table(_) | Block::Divider(_) | Block::Entity(_) => None,
        }
    }
}

pub enum BlockGroupRef<'a> {
    Document(&'a Document),
    ListItem(&'a ListItem),
    FormatContainer(&'a FormatContainer),
    TableCell(&'a TableCell),
}

impl<'a> BlockGroupRef<'a> {
    pub fn kind(&self) -> BlockGroupKind {
        match self {
            BlockGroupRef::Document(_) => BlockGroupKind::Document,
            BlockGroupRef::ListItem(_) => BlockGroupKind::ListItem,
            BlockGroupRef::FormatContainer(_) => BlockGroupKind::FormatContainer,
            BlockGroupRef::TableCell(_) => BlockGroupKind::TableCell,
        }
    }

    pub fn blocks(&self) -> &'a [Block] {
        match *self {
            BlockGroupRef::Document(doc) => &doc.blocks,
            BlockGroupRef::ListItem(item) => &item.blocks,
            BlockGroupRef::FormatContainer(c) => &c.blocks,
            BlockGroupRef::TableCell(cell) => &cell.blocks,
        }
    }
}

pub enum BlockGroupMut<'a> {
    Document(&'a mut Document),
    ListItem(&'a mut ListItem),
    FormatContainer(&'a mut FormatContainer),
    TableCell(&'a mut TableCell),
}

impl<'a> BlockGroupMut<'a> {
    pub fn kind(&self) -> BlockGroupKind {
        match self {
            BlockGroupMut::Document(_) => BlockGroupKind::Document,
            BlockGroupMut::ListItem(_) => BlockGroupKind::ListItem,
            BlockGroupMut::FormatContainer(_) => BlockGroupKind::FormatContainer,
            BlockGroupMut::TableCell(_) => BlockGroupKind::TableCell,
        }
    }

    pub fn into_blocks(self) -> &'a mut Vec<Block> {
        match self {
            BlockGroupMut::Document(doc) => &mut doc.blocks,
            BlockGroupMut::ListItem(item) => &mut item.blocks,
            BlockGroupMut::FormatContainer(c) => &mut c.blocks,
            BlockGroupMut::TableCell(cell) => &mut cell.blocks,
        }
    }
}

impl Document {
    pub fn group(&self, path: &GroupPath) -> Option<BlockGroupRef<'_>> {
        let mut group = BlockGroupRef::Document(self);
        for step in path.steps() {
            let blocks = group.blocks();
            group = match (*step, blocks.get(step.block_index())?) {
                (GroupStep::ListItem(_), Block::ListItem(item)) => BlockGroupRef::ListItem(item),
                (GroupStep::FormatContainer(_), Block::FormatContainer(c)) => {
                    BlockGroupRef::FormatContainer(c)
                }
                (GroupStep::TableCell { row, col, .. }, Block::Table(table)) => {
                    BlockGroupRef::TableCell(table.cell(row, col)?)
                }
                _ => return None,
            };
        }
        Some(group)
    }

    pub fn group_mut(&mut self, path: &GroupPath) -> Option<BlockGroupMut<'_>> {
        let mut group = BlockGroupMut::Document(self);
        for step in path.steps() {
            let blocks = group.into_blocks();
            group = match (*step, blocks.get_mut(step.block_index())?) {
                (GroupStep::ListItem(_), Block::ListItem(item)) => BlockGroupMut::ListItem(item),
                (GroupStep::FormatContainer(_), Block::FormatContainer(c)) => {
                    BlockGroupMut::FormatContainer(c)
                }
                (GroupStep::TableCell { row, col, .. }, Block::Table(table)) => {
                    BlockGroupMut::TableCell(table.cell_mut(row, col)?)
                }
                _ => return None,
            };
        }
        Some(group)
    }

    pub fn blocks_at(&self, path: &GroupPath) -> Option<&[Block]> {
        self.group(path).map(|group| group.blocks())
    }

    pub fn blocks_at_mut(&mut self, path: &GroupPath) -> Option<&mut Vec<Block>> {
        self.group_mut(path).map(BlockGroupMut::into_blocks)
    }

    pub fn block(&self, location: &BlockLocation) -> Option<&Block> {
        self.blocks_at(&location.parent)?.get(location.index)
    }

    pub fn block_mut(&mut self, location: &BlockLocation) -> Option<&mut Block> {
        self.blocks_at_mut(&location.parent)?
            .get_mut(location.index)
    }

    pub fn table_cell_mut(&mut self, path: &GroupPath) -> Option<&mut TableCell> {
        match self.group_mut(path)? {
            BlockGroupMut::TableCell(cell) => Some(cell),
            _ => None,
        }
    }
}
