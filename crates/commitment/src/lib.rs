//! # Matter Commitment
//!
//! Tamper-evident audit commitments over the evidence behind an answer.
//!
//! Each evidence text is canonicalized (whitespace collapsed, trimmed,
//! lowercased) so the commitment is invariant to incidental formatting,
//! hashed with SHA-256 into a leaf, and folded bottom-up into a binary
//! Merkle tree. The root is handed to an external notarization publisher;
//! nothing here talks to a chain.

mod merkle;

pub use merkle::{build_commitment, canonicalize, Commitment, ZERO_ROOT};
