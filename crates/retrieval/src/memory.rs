use crate::embed::Embedder;
use crate::error::Result;
use crate::source::CandidateSource;
use crate::types::RetrievalCandidate;
use async_trait::async_trait;
use matter_protocol::{AuthorityMeta, FilterPredicate, FilterTarget, SourceKind};
use matter_segmenter::Chunk;
use ndarray::ArrayView1;
use serde_json::json;
use std::cmp::Ordering;
use std::sync::Arc;

/// One indexed chunk with its authority context and embedding
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub chunk: Chunk,
    pub authority: AuthorityMeta,
    pub embedding: Vec<f32>,
}

impl IndexedChunk {
    fn filter_target(&self) -> FilterTarget<'_> {
        FilterTarget {
            court: self.authority.court.as_deref(),
            year: self.authority.year,
            judges: &self.authority.bench,
            statute_tags: Some(&self.chunk.statute_tags),
            has_citation: Some(self.chunk.has_citation),
            chunk_kind: Some(self.chunk.kind),
        }
    }
}

/// Brute-force cosine vector source over in-memory chunk embeddings.
/// Serves as the reference [`CandidateSource`] implementation and as the
/// test double for a remote vector index.
pub struct VectorMemorySource {
    entries: Vec<IndexedChunk>,
    embedder: Arc<dyn Embedder>,
}

impl VectorMemorySource {
    #[must_use]
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            entries: Vec::new(),
            embedder,
        }
    }

    /// Index a chunk, embedding its text
    pub async fn index_chunk(&mut self, chunk: Chunk, authority: AuthorityMeta) -> Result<()> {
        let embedding = self.embedder.embed(&chunk.text).await?;
        self.entries.push(IndexedChunk {
            chunk,
            authority,
            embedding,
        });
        Ok(())
    }

    /// Index a chunk with a precomputed embedding
    pub fn add_embedded(&mut self, chunk: Chunk, authority: AuthorityMeta, embedding: Vec<f32>) {
        self.entries.push(IndexedChunk {
            chunk,
            authority,
            embedding,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CandidateSource for VectorMemorySource {
    fn kind(&self) -> SourceKind {
        SourceKind::Vector
    }

    async fn search(
        &self,
        query: &str,
        filter: Option<&FilterPredicate>,
        limit: usize,
    ) -> Result<Vec<RetrievalCandidate>> {
        let query_vector = self.embedder.embed(query).await?;

        let mut scored: Vec<(&IndexedChunk, f32)> = self
            .entries
            .iter()
            .filter(|entry| {
                filter.map_or(true, |predicate| predicate.matches(&entry.filter_target()))
            })
            .map(|entry| (entry, cosine(&query_vector, &entry.embedding)))
            .collect();

        // Deterministic order: score descending, chunk id as tie-break.
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.chunk.chunk_id().cmp(&b.0.chunk.chunk_id()))
        });
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(entry, score)| {
                RetrievalCandidate::chunk_level(
                    entry.chunk.authority_id.clone(),
                    entry.chunk.chunk_id(),
                    (entry.chunk.para_from, entry.chunk.para_to),
                    entry.chunk.text.clone(),
                    score,
                    SourceKind::Vector,
                )
                .payload(json!({ "chunk_kind": entry.chunk.kind.as_str() }))
            })
            .collect())
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let a = ArrayView1::from(a);
    let b = ArrayView1::from(b);
    let denom = a.dot(&a).sqrt() * b.dot(&b).sqrt();
    if denom <= f32::EPSILON {
        0.0
    } else {
        a.dot(&b) / denom
    }
}
