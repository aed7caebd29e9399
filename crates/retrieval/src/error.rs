use thiserror::Error;

pub type Result<T> = std::result::Result<T, RetrievalError>;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Empty query")]
    EmptyQuery,

    /// A retrieval source failed. Absorbed inside the fan-out; only surfaced
    /// by sources themselves.
    #[error("Source error: {0}")]
    Source(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Authority resolution error: {0}")]
    Resolver(String),
}
