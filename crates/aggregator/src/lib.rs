//! # Matter Aggregator
//!
//! Confidence-weighted multi-agent aggregation.
//!
//! N reasoning agents answer the same query independently; the
//! [`AgentCouncil`] fans them out concurrently and converts failures into
//! placeholder votes at the call boundary, so aggregation always sees
//! exactly one vote per agent. The [`Aggregator`] clusters votes, merges the
//! majority cluster into one answer, and moves trust weight toward agents
//! that keep landing in the majority via multiplicative updates: aligned
//! weights scale up, the rest scale down, and the total mass is conserved.
//!
//! Weights live in an injected, lock-guarded [`WeightState`] that the caller
//! snapshots for persistence; the lock covers only the in-memory update.

mod council;
mod types;
mod voting;
mod weights;

pub use council::{AgentCouncil, ReasoningAgent};
pub use types::{AggregationResult, AggregatorConfig};
pub use voting::Aggregator;
pub use weights::WeightState;
