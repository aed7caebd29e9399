use thiserror::Error;

/// Result type for segmentation operations
pub type Result<T> = std::result::Result<T, SegmenterError>;

/// Errors that can occur during document segmentation
#[derive(Error, Debug)]
pub enum SegmenterError {
    /// The authority yielded no usable paragraphs; the document must be
    /// marked failed by the caller
    #[error("Authority {authority_id} has no usable paragraphs")]
    EmptyDocument { authority_id: String },

    /// Segmentation produced no chunks; pipeline-terminating
    #[error("Authority {authority_id} produced no chunks")]
    NoChunks { authority_id: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Subword tokenizer could not be loaded
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
}
