use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentexError {
    /// The document could not be read as a block-node sequence.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The document bytes are not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The sentence-boundary model is missing or unreadable. Fatal for a run.
    #[error("Segmentation model error: {0}")]
    SegmentationModel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

impl SentexError {
    /// Whether this error should abort the whole batch rather than one document.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SentexError::SegmentationModel(_))
    }
}

pub type Result<T> = std::result::Result<T, SentexError>;
