use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::blockquote::{default_quote_format, toggle_model_block_quote};
use crate::direction::set_model_direction;
use crate::error::ContentModelError;
use crate::format::{BorderValues, Direction, Format};
use crate::list::{DEFAULT_INDENT_STEP_PX, Indentation, set_list_type, set_model_indentation};
use crate::model::{Document, ListType};
use crate::normalize::{DEFAULT_MAX_NORMALIZE_ITERATIONS, NormalizePipeline};
use crate::table::{BorderOperation, format_table_border, shade_selected_table_cells};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub max_undo: usize,
    pub max_normalize_iterations: usize,
    pub indent_step_px: f64,
    pub quote_format: Format,
}

impl EditorConfig {
    /// Parses a JSON config; missing or zero fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ContentModelError> {
        let config: EditorConfig =
            serde_json::from_str(json).map_err(ContentModelError::InvalidConfig)?;
        Ok(config.with_defaults())
    }

    pub fn with_defaults(mut self) -> Self {
        if self.max_undo == 0 {
            self.max_undo = 200;
        }
        if self.max_normalize_iterations == 0 {
            self.max_normalize_iterations = DEFAULT_MAX_NORMALIZE_ITERATIONS;
        }
        if self.indent_step_px.is_nan() || self.indent_step_px <= 0.0 {
            self.indent_step_px = DEFAULT_INDENT_STEP_PX;
        }
        if self.quote_format.is_empty() {
            self.quote_format = default_quote_format();
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct UndoRecord {
    pub source: String,
    pub before: Document,
    pub after: Document,
}

/// Owns a document and runs edits on it as undoable transactions.
pub struct Editor {
    doc: Document,
    config: EditorConfig,
    pipeline: NormalizePipeline,
    undo_stack: Vec<UndoRecord>,
    redo_stack: Vec<UndoRecord>,
}

impl Editor {
    pub fn new(doc: Document) -> Self {
        Self::with_config(doc, EditorConfig::default())
    }

    pub fn with_config(doc: Document, config: EditorConfig) -> Self {
        Self {
            doc,
            config: config.with_defaults(),
            pipeline: NormalizePipeline::default(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    /// Direct access for setting selection flags. Changes made here are not
    /// recorded for undo.
    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        let Some(record) = self.undo_stack.pop() else {
            return false;
        };
        debug!(source = %record.source, "undo");
        self.doc = record.before.clone();
        self.redo_stack.push(record);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(record) = self.redo_stack.pop() else {
            return false;
        };
        debug!(source = %record.source, "redo");
        self.doc = record.after.clone();
        self.undo_stack.push(record);
        true
    }

    /// Runs `callback` on the document as one transaction.
    ///
    /// When the callback reports a change the document is normalized and an
    /// undo record is pushed. When it reports none, any edits it made are
    /// rolled back and nothing is recorded.
    #[instrument(level = "debug", skip(self, callback))]
    pub fn format_content_model(
        &mut self,
        source: &str,
        callback: impl FnOnce(&mut Document) -> bool,
    ) -> Result<bool, ContentModelError> {
        let before = self.doc.clone();
        if !callback(&mut self.doc) {
            self.doc = before;
            return Ok(false);
        }

        if let Err(err) = self
            .pipeline
            .run_to_fixpoint(&mut self.doc, self.config.max_normalize_iterations)
        {
            self.doc = before;
            return Err(err);
        }

        info!(source, "content model changed");
        self.undo_stack.push(UndoRecord {
            source: source.to_string(),
            before,
            after: self.doc.clone(),
        });
        self.redo_stack.clear();
        if self.undo_stack.len() > self.config.max_undo {
            self.undo_stack.remove(0);
        }
        Ok(true)
    }

    pub fn toggle_list(&mut self, list_type: ListType) -> Result<bool, ContentModelError> {
        let source = match list_type {
            ListType::Ordered => "toggleNumbering",
            ListType::Unordered => "toggleBullet",
        };
        self.format_content_model(source, |doc| set_list_type(doc, list_type))
    }

    pub fn set_indentation(&mut self, indentation: Indentation) -> Result<bool, ContentModelError> {
        let step = self.config.indent_step_px;
        self.format_content_model("setIndentation", |doc| {
            set_model_indentation(doc, indentation, step)
        })
    }

    pub fn set_direction(&mut self, direction: Direction) -> Result<bool, ContentModelError> {
        self.format_content_model("setDirection", |doc| set_model_direction(doc, direction))
    }

    pub fn toggle_block_quote(&mut self) -> Result<bool, ContentModelError> {
        let quote_format = self.config.quote_format.clone();
        self.format_content_model("toggleBlockQuote", |doc| {
            toggle_model_block_quote(doc, &quote_format)
        })
    }

    pub fn set_table_border(
        &mut self,
        border: &BorderValues,
        operation: BorderOperation,
    ) -> Result<bool, ContentModelError> {
        self.format_content_model("tableBorder", |doc| {
            format_table_border(doc, border, operation)
        })
    }

    pub fn shade_table_cells(&mut self, color: Option<&str>) -> Result<bool, ContentModelError> {
        self.format_content_model("setTableCellShade", |doc| {
            shade_selected_table_cells(doc, color)
        })
    }
}
