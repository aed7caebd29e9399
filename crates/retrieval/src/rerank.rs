use crate::types::RetrievalCandidate;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Finer-grained second-pass scoring over the deduplicated candidate set.
/// Implementations may drop candidates below a relevance floor. A
/// cross-encoder service plugs in here; the default is a lexical-overlap
/// pass that needs no model.
#[async_trait]
pub trait Reranker: Send + Sync {
    async fn rerank(
        &self,
        query: &str,
        candidates: Vec<RetrievalCandidate>,
    ) -> Vec<RetrievalCandidate>;
}

/// Query-term overlap reranker. Blends the fan-out score with the fraction
/// of query terms found in the candidate's text; candidates that end up
/// below the floor are dropped.
pub struct LexicalOverlapReranker {
    /// Weight of the term-overlap bonus relative to the fan-out score
    pub overlap_weight: f32,

    /// Candidates scoring below this after blending are dropped
    pub floor: f32,
}

impl Default for LexicalOverlapReranker {
    fn default() -> Self {
        Self {
            overlap_weight: 0.25,
            floor: 0.05,
        }
    }
}

impl LexicalOverlapReranker {
    fn overlap_fraction(query_terms: &BTreeSet<String>, text: &str) -> f32 {
        if query_terms.is_empty() {
            return 0.0;
        }
        let lower = text.to_lowercase();
        let hits = query_terms.iter().filter(|t| lower.contains(t.as_str())).count();
        hits as f32 / query_terms.len() as f32
    }
}

#[async_trait]
impl Reranker for LexicalOverlapReranker {
    async fn rerank(
        &self,
        query: &str,
        candidates: Vec<RetrievalCandidate>,
    ) -> Vec<RetrievalCandidate> {
        let query_terms = query_terms(query);

        let mut reranked: Vec<RetrievalCandidate> = candidates
            .into_iter()
            .map(|mut candidate| {
                let overlap = candidate
                    .text
                    .as_deref()
                    .map_or(0.0, |text| Self::overlap_fraction(&query_terms, text));
                candidate.normalized_score =
                    (candidate.normalized_score + self.overlap_weight * overlap).min(1.0);
                candidate
            })
            .filter(|candidate| candidate.normalized_score >= self.floor)
            .collect();

        reranked.sort_by(|a, b| {
            b.normalized_score
                .partial_cmp(&a.normalized_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.authority_id.cmp(&b.authority_id))
        });

        reranked
    }
}

/// Lowercased alphanumeric query terms of length >= 3
fn query_terms(query: &str) -> BTreeSet<String> {
    query
        .split(|c: char| !c.is_ascii_alphanumeric())
        .map(str::to_lowercase)
        .filter(|t| t.len() >= 3)
        .collect()
}
