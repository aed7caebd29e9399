//! # Matter Retrieval
//!
//! Hybrid multi-source retrieval over indexed authority chunks.
//!
//! A query fans out concurrently to a vector index, a lexical index, and
//! (for citation-shaped queries) a citation-similarity index, each behind
//! the [`CandidateSource`] trait. Sources are isolated bulkheads: one
//! failing contributes an empty batch, never a failed request. Scores are
//! normalized onto one [0,1] scale, candidates are deduplicated per
//! authority keeping the strongest signal, reranked by a finer-grained
//! pass, and packed with resolved authority metadata.

mod citation_source;
mod embed;
mod error;
mod memory;
mod orchestrator;
mod rerank;
mod resolver;
mod source;
mod types;

pub use citation_source::CitationMatchSource;
pub use embed::{CachedEmbedder, Embedder};
pub use error::{Result, RetrievalError};
pub use memory::{IndexedChunk, VectorMemorySource};
pub use orchestrator::RetrievalOrchestrator;
pub use rerank::{LexicalOverlapReranker, Reranker};
pub use resolver::{AuthorityResolver, StaticAuthorityResolver};
pub use source::CandidateSource;
pub use types::{RetrievalCandidate, RetrievalConfig};
