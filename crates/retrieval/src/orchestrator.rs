use crate::error::{Result, RetrievalError};
use crate::rerank::Reranker;
use crate::resolver::AuthorityResolver;
use crate::source::CandidateSource;
use crate::types::{RetrievalCandidate, RetrievalConfig};
use futures::future::join_all;
use matter_protocol::citations::query_is_citation_shaped;
use matter_protocol::{normalize_filters, FilterPredicate, Pack, ParaRef, SourceKind};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// Fans a query out to the configured candidate sources, normalizes their
/// scores onto one scale, deduplicates by authority, reranks, and packs the
/// survivors with resolved authority metadata.
pub struct RetrievalOrchestrator {
    sources: Vec<Arc<dyn CandidateSource>>,
    reranker: Arc<dyn Reranker>,
    resolver: Arc<dyn AuthorityResolver>,
    config: RetrievalConfig,
}

impl RetrievalOrchestrator {
    /// Create an orchestrator over a source set
    #[must_use]
    pub fn new(
        sources: Vec<Arc<dyn CandidateSource>>,
        reranker: Arc<dyn Reranker>,
        resolver: Arc<dyn AuthorityResolver>,
        config: RetrievalConfig,
    ) -> Self {
        config
            .validate()
            .expect("Invalid retrieval configuration provided");
        Self {
            sources,
            reranker,
            resolver,
            config,
        }
    }

    /// Retrieve up to `limit` packs for a query under optional scoping
    /// filters. Given identical index contents, filters, and query, the
    /// returned authority order is stable.
    pub async fn retrieve(
        &self,
        query: &str,
        limit: usize,
        filters: Option<&Map<String, Value>>,
    ) -> Result<Vec<Pack>> {
        if query.trim().is_empty() {
            return Err(RetrievalError::EmptyQuery);
        }

        let case_filters = filters.map(normalize_filters).unwrap_or_default();
        let predicate = case_filters.predicate();

        let candidates = self.fan_out(query, limit, predicate.as_ref()).await;
        log::debug!("fan-out produced {} candidates", candidates.len());

        let deduped = dedup_by_authority(candidates);
        log::debug!("{} candidates after authority dedup", deduped.len());

        let mut reranked = self.reranker.rerank(query, deduped).await;
        reranked.truncate(limit);

        let mut packs = Vec::with_capacity(reranked.len());
        for candidate in reranked {
            if let Some(pack) = self.pack(candidate).await? {
                packs.push(pack);
            }
        }

        log::info!("retrieve: {} packs for query", packs.len());
        Ok(packs)
    }

    /// Concurrent fan-out with bulkhead isolation: a failing source
    /// contributes an empty batch and a warning, never a request failure.
    /// The citation source only runs for citation-shaped queries.
    async fn fan_out(
        &self,
        query: &str,
        limit: usize,
        predicate: Option<&FilterPredicate>,
    ) -> Vec<RetrievalCandidate> {
        let citation_query = query_is_citation_shaped(query);
        if citation_query {
            log::debug!("query is citation-shaped; citation source active");
        }

        let searches = self
            .sources
            .iter()
            .filter(|source| source.kind() != SourceKind::Citation || citation_query)
            .map(|source| {
                let source = Arc::clone(source);
                let per_source_limit = match source.kind() {
                    SourceKind::Citation => limit,
                    SourceKind::Vector | SourceKind::Lexical => {
                        limit * self.config.overfetch_factor
                    }
                };
                let query = query.to_string();
                let predicate = predicate.cloned();
                async move {
                    let outcome = source
                        .search(&query, predicate.as_ref(), per_source_limit)
                        .await;
                    (source.kind(), outcome)
                }
            });

        let mut batches: Vec<(SourceKind, Vec<RetrievalCandidate>)> = join_all(searches)
            .await
            .into_iter()
            .map(|(kind, outcome)| match outcome {
                Ok(batch) => (kind, batch),
                Err(e) => {
                    log::warn!("{} source failed, continuing without it: {e}", kind.as_str());
                    (kind, Vec::new())
                }
            })
            .collect();

        // Fan-out order is the dedup tie-break order; make it explicit.
        batches.sort_by_key(|(kind, _)| kind.fanout_rank());

        let mut candidates = Vec::new();
        for (kind, mut batch) in batches {
            self.normalize_scores(kind, &mut batch);
            candidates.extend(batch);
        }
        candidates
    }

    /// Put heterogeneous source scores onto one [0,1] scale. Vector scores
    /// are scaled by the batch maximum, lexical scores arrive rank-normalized
    /// and are clamped, citation matches get a fixed near-certain score.
    fn normalize_scores(&self, kind: SourceKind, batch: &mut [RetrievalCandidate]) {
        match kind {
            SourceKind::Vector => {
                let max = batch.iter().map(|c| c.raw_score).fold(0.0_f32, f32::max);
                for candidate in batch {
                    candidate.normalized_score = if max > 0.0 {
                        (candidate.raw_score / max).clamp(0.0, 1.0)
                    } else {
                        0.0
                    };
                }
            }
            SourceKind::Lexical => {
                for candidate in batch {
                    candidate.normalized_score = candidate.raw_score.clamp(0.0, 1.0);
                }
            }
            SourceKind::Citation => {
                for candidate in batch {
                    candidate.normalized_score = self.config.citation_score;
                }
            }
        }
    }

    /// Resolve authority metadata and assemble the pack. Paragraph detail is
    /// included when the winning candidate carried a chunk span.
    async fn pack(&self, candidate: RetrievalCandidate) -> Result<Option<Pack>> {
        let Some(meta) = self.resolver.resolve(&candidate.authority_id).await? else {
            log::warn!(
                "dropping candidate for unresolvable authority {}",
                candidate.authority_id
            );
            return Ok(None);
        };

        let paragraphs = match (candidate.para_from, candidate.para_to) {
            (Some(from), Some(to)) if from <= to => (from..=to)
                .map(|para_id| ParaRef {
                    para_id,
                    score: candidate.normalized_score,
                })
                .collect(),
            _ => Vec::new(),
        };

        Ok(Some(Pack {
            authority_id: meta.id,
            title: meta.title,
            court: meta.court,
            neutral_citation: meta.neutral_citation,
            reporter_citations: meta.reporter_citations,
            date: meta.date,
            bench: meta.bench,
            url: meta.url,
            paragraphs,
            aggregate_score: candidate.normalized_score,
            source: candidate.source,
            metadata: candidate.payload,
        }))
    }
}

/// Keep one candidate per authority: the highest normalized score wins,
/// first-seen in fan-out order on exact ties.
fn dedup_by_authority(candidates: Vec<RetrievalCandidate>) -> Vec<RetrievalCandidate> {
    let mut order: Vec<RetrievalCandidate> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        match index.get(&candidate.authority_id) {
            Some(&i) => {
                if candidate.normalized_score > order[i].normalized_score {
                    order[i] = candidate;
                }
            }
            None => {
                index.insert(candidate.authority_id.clone(), order.len());
                order.push(candidate);
            }
        }
    }

    order.sort_by(|a, b| {
        b.normalized_score
            .partial_cmp(&a.normalized_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.authority_id.cmp(&b.authority_id))
    });
    order
}
