use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ContentModelError;
use crate::model::TableCell;

pub const EDITING_INFO_KEY: &str = "editingInfo";

/// Editing state persisted on a table cell. The override markers tell later
/// table-wide restyling (table presets, banding) to leave the cell alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellMetadata {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub border_override: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bg_color_override: bool,
}

pub fn read_table_cell_metadata(
    cell: &TableCell,
) -> Result<Option<TableCellMetadata>, ContentModelError> {
    cell.dataset
        .get(EDITING_INFO_KEY)
        .map(|raw| serde_json::from_str(raw))
        .transpose()
        .map_err(ContentModelError::InvalidMetadata)
}

/// Reads the cell's metadata, lets `update` change it and writes it back.
/// Unreadable metadata is dropped and replaced.
pub fn update_table_cell_metadata(cell: &mut TableCell, update: impl FnOnce(&mut TableCellMetadata)) {
    let mut metadata = match read_table_cell_metadata(cell) {
        Ok(metadata) => metadata.unwrap_or_default(),
        Err(err) => {
            warn!(%err, "replacing unreadable cell metadata");
            TableCellMetadata::default()
        }
    };
    update(&mut metadata);

    match serde_json::to_string(&metadata) {
        Ok(raw) => {
            cell.dataset.insert(EDITING_INFO_KEY.to_string(), raw);
        }
        Err(err) => warn!(%err, "could not serialize cell metadata"),
    }
}
