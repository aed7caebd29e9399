//! # Matter Protocol
//!
//! Shared data model and query-scoping contracts for the matter pipeline:
//! paragraphs and chunk identity, authority metadata, retrieval packs, agent
//! votes, statute tag normalization, citation shape detection, and the
//! filter normalizer.
//!
//! Everything here is plain data plus pure functions; the crates that do the
//! work (segmenter, retrieval, aggregator) all speak these types.

pub mod citations;
pub mod filters;
pub mod tags;
mod types;

pub use filters::{
    normalize_filters, CaseFilters, FieldCondition, FilterPredicate, FilterTarget, MIN_FILTER_YEAR,
};
pub use types::{
    AgentVote, AuthorityMeta, ChunkKind, DecisionLabel, Pack, ParaRef, Paragraph, SourceKind,
    SourceRef,
};
