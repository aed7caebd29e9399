use matter_protocol::ChunkKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A contiguous, token-bounded span of paragraphs from one authority: the
/// retrieval unit. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Authority the span belongs to
    pub authority_id: String,

    /// First paragraph id in the span (inclusive)
    pub para_from: u32,

    /// Last paragraph id in the span (inclusive)
    pub para_to: u32,

    /// Concatenated paragraph texts, boundaries preserved as blank lines
    pub text: String,

    /// Token count of the span (sum of per-paragraph counts)
    pub token_count: usize,

    /// Normalized statute tags found across the span's paragraphs
    #[serde(default)]
    pub statute_tags: BTreeSet<String>,

    /// Whether any paragraph in the span carries a legal citation
    pub has_citation: bool,

    /// What kind of span this is
    pub kind: ChunkKind,

    /// Number of paragraphs in the span
    pub paragraph_count: usize,
}

impl Chunk {
    /// Stable identity used by downstream indexes and retrieval candidates
    #[must_use]
    pub fn chunk_id(&self) -> String {
        format!(
            "{}:{}-{}:{}",
            self.authority_id,
            self.para_from,
            self.para_to,
            self.kind.as_str()
        )
    }

    /// Check whether the span covers a paragraph id
    #[must_use]
    pub const fn contains_para(&self, para_id: u32) -> bool {
        para_id >= self.para_from && para_id <= self.para_to
    }
}

/// Statistics about one segmentation run
#[derive(Debug, Clone, Default)]
pub struct SegmentationStats {
    pub total_chunks: usize,
    pub headnote_chunks: usize,
    pub content_chunks: usize,
    pub citation_chunks: usize,
    pub total_tokens: usize,
    pub min_tokens: usize,
    pub max_tokens: usize,
}

impl SegmentationStats {
    #[must_use]
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        Self {
            total_chunks: chunks.len(),
            headnote_chunks: count_kind(chunks, ChunkKind::Headnote),
            content_chunks: count_kind(chunks, ChunkKind::Content),
            citation_chunks: count_kind(chunks, ChunkKind::CitationContext),
            total_tokens: chunks.iter().map(|c| c.token_count).sum(),
            min_tokens: chunks.iter().map(|c| c.token_count).min().unwrap_or(0),
            max_tokens: chunks.iter().map(|c| c.token_count).max().unwrap_or(0),
        }
    }
}

fn count_kind(chunks: &[Chunk], kind: ChunkKind) -> usize {
    chunks.iter().filter(|c| c.kind == kind).count()
}

impl std::fmt::Display for SegmentationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} (headnote {}, content {}, citation {}) | Tokens: {} | Range: {}-{}",
            self.total_chunks,
            self.headnote_chunks,
            self.content_chunks,
            self.citation_chunks,
            self.total_tokens,
            self.min_tokens,
            self.max_tokens
        )
    }
}
