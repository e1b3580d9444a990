use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::color::readable_text_color;
use crate::format::{BorderValues, combine_border_value, extract_border_values, keys};
use crate::location::BlockLocation;
use crate::metadata::update_table_cell_metadata;
use crate::model::{Block, Document, Table, TableCell};
use crate::operational::get_first_selected_table;
use crate::selection::{IterateSelectionsOption, ListFormatHolderMode, collect_selections};

const DEFAULT_BORDER_WIDTH: &str = "1px";
const DEFAULT_BORDER_STYLE: &str = "solid";

/// Inclusive rectangle of table cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSelectionCoordinates {
    pub first_row: usize,
    pub first_col: usize,
    pub last_row: usize,
    pub last_col: usize,
}

impl TableSelectionCoordinates {
    pub fn single(row: usize, col: usize) -> Self {
        Self {
            first_row: row,
            first_col: col,
            last_row: row,
            last_col: col,
        }
    }

    fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (self.first_row..=self.last_row)
            .flat_map(move |row| (self.first_col..=self.last_col).map(move |col| (row, col)))
    }

    /// The rectangle one cell smaller on every side, if anything is left.
    fn inner(self) -> Option<Self> {
        if self.last_row < self.first_row + 2 || self.last_col < self.first_col + 2 {
            return None;
        }
        Some(Self {
            first_row: self.first_row + 1,
            first_col: self.first_col + 1,
            last_row: self.last_row - 1,
            last_col: self.last_col - 1,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderOperation {
    AllBorders,
    NoBorders,
    LeftBorders,
    RightBorders,
    TopBorders,
    BottomBorders,
    InsideBorders,
    OutsideBorders,
}

impl BorderOperation {
    fn edge_side(self) -> Option<Side> {
        match self {
            BorderOperation::TopBorders => Some(Side::Top),
            BorderOperation::RightBorders => Some(Side::Right),
            BorderOperation::BottomBorders => Some(Side::Bottom),
            BorderOperation::LeftBorders => Some(Side::Left),
            BorderOperation::AllBorders
            | BorderOperation::NoBorders
            | BorderOperation::InsideBorders
            | BorderOperation::OutsideBorders => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    fn key(self) -> &'static str {
        match self {
            Side::Top => keys::BORDER_TOP,
            Side::Right => keys::BORDER_RIGHT,
            Side::Bottom => keys::BORDER_BOTTOM,
            Side::Left => keys::BORDER_LEFT,
        }
    }

    fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }
}

/// Which edges of the selected rectangle got painted, so the neighbouring
/// cells outside can be painted to match.
#[derive(Debug, Default)]
struct Perimeter {
    top: bool,
    right: bool,
    bottom: bool,
    left: bool,
}

impl Perimeter {
    fn mark(&mut self, side: Side) {
        match side {
            Side::Top => self.top = true,
            Side::Right => self.right = true,
            Side::Bottom => self.bottom = true,
            Side::Left => self.left = true,
        }
    }

    fn is_marked(&self, side: Side) -> bool {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }
}

/// Bounding rectangle of the selected cells.
pub fn get_selected_cells(table: &Table) -> Option<TableSelectionCoordinates> {
    let mut result: Option<TableSelectionCoordinates> = None;
    for (row_ix, row) in table.rows.iter().enumerate() {
        for (col_ix, cell) in row.cells.iter().enumerate() {
            if !cell.is_selected {
                continue;
            }
            result = Some(match result {
                None => TableSelectionCoordinates::single(row_ix, col_ix),
                Some(rect) => TableSelectionCoordinates {
                    first_row: rect.first_row.min(row_ix),
                    first_col: rect.first_col.min(col_ix),
                    last_row: rect.last_row.max(row_ix),
                    last_col: rect.last_col.max(col_ix),
                },
            });
        }
    }
    result
}

/// Completes a partial border from the table's own top border, then from
/// `1px solid`.
pub fn resolve_border_format(table: &Table, border: &BorderValues) -> String {
    let table_border = extract_border_values(table.format.get(keys::BORDER_TOP));
    combine_border_value(&BorderValues {
        width: border
            .width
            .clone()
            .or(table_border.width)
            .or_else(|| Some(DEFAULT_BORDER_WIDTH.to_string())),
        style: border
            .style
            .clone()
            .or(table_border.style)
            .or_else(|| Some(DEFAULT_BORDER_STYLE.to_string())),
        color: border.color.clone().or(table_border.color),
    })
}

/// Paints borders on `rect` of `table`. Composite operations expand into
/// primitive ones, and the cells right outside every painted edge of the
/// rectangle get the matching side painted as well.
///
/// Panics when `rect` lies outside the table.
#[instrument(level = "debug", skip(table, border))]
pub fn apply_table_border_format(
    table: &mut Table,
    rect: &TableSelectionCoordinates,
    border: &BorderValues,
    operation: BorderOperation,
) {
    let mut format = resolve_border_format(table, border);
    let mut perimeter = Perimeter::default();
    let mut touched: Vec<(usize, usize)> = Vec::new();

    let mut stack = vec![(operation, *rect)];
    while let Some((operation, area)) = stack.pop() {
        trace!(?operation, ?area, "border step");
        match operation {
            BorderOperation::NoBorders => {
                format.clear();
                stack.push((BorderOperation::AllBorders, area));
            }
            BorderOperation::OutsideBorders => stack.extend([
                (BorderOperation::TopBorders, area),
                (BorderOperation::RightBorders, area),
                (BorderOperation::BottomBorders, area),
                (BorderOperation::LeftBorders, area),
            ]),
            BorderOperation::InsideBorders => {
                paint_inside_edges(table, area, &format, &mut touched);
                if let Some(inner) = area.inner() {
                    stack.push((BorderOperation::AllBorders, inner));
                }
            }
            BorderOperation::AllBorders => {
                for (row, col) in area.cells() {
                    for side in Side::ALL {
                        paint(table, row, col, side, &format, &mut touched);
                    }
                }
                for side in Side::ALL {
                    mark_if_on_perimeter(&mut perimeter, rect, &area, side);
                }
            }
            edge => {
                if let Some(side) = edge.edge_side() {
                    paint_edge(table, rect, area, side, &format, &mut perimeter, &mut touched);
                }
            }
        }
    }

    paint_perimeter(table, rect, &perimeter, &format, &mut touched);

    debug!(cells = touched.len(), "border applied");
    for (row, col) in touched {
        let cell = &mut table.rows[row].cells[col];
        cell.cached_element = None;
        update_table_cell_metadata(cell, |metadata| metadata.border_override = true);
    }
}

fn paint(
    table: &mut Table,
    row: usize,
    col: usize,
    side: Side,
    format: &str,
    touched: &mut Vec<(usize, usize)>,
) {
    let cell = &mut table.rows[row].cells[col];
    cell.format.set_or_remove(side.key(), Some(format.to_string()));
    if !touched.contains(&(row, col)) {
        touched.push((row, col));
    }
}

fn paint_edge(
    table: &mut Table,
    rect: &TableSelectionCoordinates,
    area: TableSelectionCoordinates,
    side: Side,
    format: &str,
    perimeter: &mut Perimeter,
    touched: &mut Vec<(usize, usize)>,
) {
    for (row, col) in area.cells() {
        let on_edge = match side {
            Side::Top => row == area.first_row,
            Side::Right => col == area.last_col,
            Side::Bottom => row == area.last_row,
            Side::Left => col == area.first_col,
        };
        if on_edge {
            paint(table, row, col, side, format, touched);
        }
    }
    mark_if_on_perimeter(perimeter, rect, &area, side);
}

/// Every boundary shared by two cells on the rim of `area`. Boundaries
/// between interior cells are left to the `AllBorders` pass on the inner
/// rectangle.
fn paint_inside_edges(
    table: &mut Table,
    area: TableSelectionCoordinates,
    format: &str,
    touched: &mut Vec<(usize, usize)>,
) {
    if area.first_row == area.last_row && area.first_col == area.last_col {
        return;
    }
    for (row, col) in area.cells() {
        let on_rim = row == area.first_row
            || row == area.last_row
            || col == area.first_col
            || col == area.last_col;
        if !on_rim {
            continue;
        }
        if row > area.first_row {
            paint(table, row, col, Side::Top, format, touched);
        }
        if row < area.last_row {
            paint(table, row, col, Side::Bottom, format, touched);
        }
        if col > area.first_col {
            paint(table, row, col, Side::Left, format, touched);
        }
        if col < area.last_col {
            paint(table, row, col, Side::Right, format, touched);
        }
    }
}

fn mark_if_on_perimeter(
    perimeter: &mut Perimeter,
    rect: &TableSelectionCoordinates,
    area: &TableSelectionCoordinates,
    side: Side,
) {
    let on_perimeter = match side {
        Side::Top => area.first_row == rect.first_row,
        Side::Right => area.last_col == rect.last_col,
        Side::Bottom => area.last_row == rect.last_row,
        Side::Left => area.first_col == rect.first_col,
    };
    if on_perimeter {
        perimeter.mark(side);
    }
}

fn paint_perimeter(
    table: &mut Table,
    rect: &TableSelectionCoordinates,
    perimeter: &Perimeter,
    format: &str,
    touched: &mut Vec<(usize, usize)>,
) {
    let row_count = table.rows.len();
    let col_counts: Vec<usize> = table.rows.iter().map(|row| row.cells.len()).collect();

    for side in Side::ALL {
        if !perimeter.is_marked(side) {
            continue;
        }
        let outside: Vec<(usize, usize)> = match side {
            Side::Top if rect.first_row > 0 => (rect.first_col..=rect.last_col)
                .map(|col| (rect.first_row - 1, col))
                .collect(),
            Side::Bottom if rect.last_row + 1 < row_count => (rect.first_col..=rect.last_col)
                .map(|col| (rect.last_row + 1, col))
                .collect(),
            Side::Left if rect.first_col > 0 => (rect.first_row..=rect.last_row)
                .map(|row| (row, rect.first_col - 1))
                .collect(),
            Side::Right => (rect.first_row..=rect.last_row)
                .filter(|row| rect.last_col + 1 < col_counts[*row])
                .map(|row| (row, rect.last_col + 1))
                .collect(),
            _ => Vec::new(),
        };
        for (row, col) in outside {
            paint(table, row, col, side.opposite(), format, touched);
        }
    }
}

/// Shades every selected cell; `None` takes the shade off again.
#[instrument(level = "debug", skip(table))]
pub fn set_table_cell_shade(table: &mut Table, color: Option<&str>) -> bool {
    let mut changed = false;
    for cell in table
        .rows
        .iter_mut()
        .flat_map(|row| row.cells.iter_mut())
        .filter(|cell| cell.is_selected)
    {
        shade_cell(cell, color);
        changed = true;
    }
    changed
}

/// Background plus a text colour readable on it, or neither.
pub fn shade_cell(cell: &mut TableCell, color: Option<&str>) {
    match color {
        Some(color) => {
            cell.format.set(keys::BACKGROUND_COLOR, color);
            cell.format.set(keys::TEXT_COLOR, readable_text_color(color));
        }
        None => {
            cell.format.remove(keys::BACKGROUND_COLOR);
            cell.format.remove(keys::TEXT_COLOR);
        }
    }
    cell.cached_element = None;
    update_table_cell_metadata(cell, |metadata| metadata.bg_color_override = true);
}

/// The first selected table and the cells the selection covers in it. When
/// no cell is selected as a whole, the cell holding the selected content is
/// used.
fn locate_table_selection(doc: &Document) -> Option<(BlockLocation, TableSelectionCoordinates)> {
    let (location, table) = get_first_selected_table(doc)?;
    if let Some(rect) = get_selected_cells(table) {
        return Some((location, rect));
    }

    let option = IterateSelectionsOption {
        include_list_format_holder: ListFormatHolderMode::Never,
        ..Default::default()
    };
    let context = collect_selections(doc, &option)
        .into_iter()
        .filter_map(|record| record.table_context)
        .find(|context| context.table == location)?;
    Some((location, TableSelectionCoordinates::single(context.row, context.col)))
}

/// Applies `operation` to the selected cells of the first selected table.
#[instrument(level = "debug", skip(doc, border))]
pub fn format_table_border(doc: &mut Document, border: &BorderValues, operation: BorderOperation) -> bool {
    let Some((location, rect)) = locate_table_selection(doc) else {
        return false;
    };
    let Some(table) = doc.block_mut(&location).and_then(Block::as_table_mut) else {
        return false;
    };
    apply_table_border_format(table, &rect, border, operation);
    true
}

/// Shades the selected cells of the first selected table, or the cell the
/// caret is in.
#[instrument(level = "debug", skip(doc))]
pub fn shade_selected_table_cells(doc: &mut Document, color: Option<&str>) -> bool {
    let Some((location, rect)) = locate_table_selection(doc) else {
        return false;
    };
    let Some(table) = doc.block_mut(&location).and_then(Block::as_table_mut) else {
        return false;
    };
    if set_table_cell_shade(table, color) {
        return true;
    }

    let Some(cell) = table.cell_mut(rect.first_row, rect.first_col) else {
        return false;
    };
    shade_cell(cell, color);
    true
}
