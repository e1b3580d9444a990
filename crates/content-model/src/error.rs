use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentModelError {
    #[error("normalization did not converge after {iterations} iterations")]
    NormalizeDidNotConverge { iterations: usize },

    #[error("invalid editor config: {0}")]
    InvalidConfig(#[source] serde_json::Error),

    #[error("invalid table cell metadata: {0}")]
    InvalidMetadata(#[source] serde_json::Error),
}
