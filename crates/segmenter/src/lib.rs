//! # Matter Segmenter
//!
//! Token-budgeted segmentation of extracted judgment paragraphs into
//! retrieval chunks.
//!
//! ## Pipeline
//!
//! ```text
//! Paragraph sequence
//!     │
//!     ├──> Headnote isolation (markers, early long paragraphs)
//!     │
//!     ├──> Sliding-window content chunking
//!     │    ├─> 550 token floor / 800 token ceiling
//!     │    ├─> floor-forced inclusion (one paragraph past the ceiling)
//!     │    └─> 15% backward-walk overlap, guaranteed forward progress
//!     │
//!     └──> Citation-context windows (±2 paragraphs, additive)
//!          └─> Emit Chunk[] with statute tags and citation flags
//! ```
//!
//! Token counting uses a subword tokenizer when configured and a
//! deterministic chars/4 heuristic otherwise.

mod config;
mod error;
mod segmenter;
mod tokens;
mod types;

pub use config::SegmenterConfig;
pub use error::{Result, SegmenterError};
pub use segmenter::Segmenter;
pub use tokens::{heuristic_count, TokenCounter};
pub use types::{Chunk, SegmentationStats};
