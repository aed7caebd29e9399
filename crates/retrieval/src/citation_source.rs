use crate::error::Result;
use crate::source::CandidateSource;
use crate::types::RetrievalCandidate;
use async_trait::async_trait;
use matter_protocol::{AuthorityMeta, FilterPredicate, FilterTarget, SourceKind};
use nucleo_matcher::{pattern::Pattern, Matcher, Utf32String};
use serde_json::json;
use std::cmp::Ordering;
use std::sync::Mutex;

/// Ranks authorities by string similarity of their citation fields against a
/// citation-shaped query. Only invoked by the orchestrator when the query
/// looks like a citation lookup.
pub struct CitationMatchSource {
    authorities: Vec<AuthorityMeta>,
    matcher: Mutex<Matcher>,
}

impl CitationMatchSource {
    #[must_use]
    pub fn new(authorities: Vec<AuthorityMeta>) -> Self {
        Self {
            authorities,
            matcher: Mutex::new(Matcher::new(nucleo_matcher::Config::DEFAULT)),
        }
    }

    /// Best fuzzy score of the pattern over the authority's citation strings
    /// and title
    fn best_score(matcher: &mut Matcher, pattern: &Pattern, authority: &AuthorityMeta) -> Option<u32> {
        let mut targets: Vec<&str> = authority.citation_strings();
        targets.push(&authority.title);

        targets
            .into_iter()
            .filter_map(|target| {
                let haystack = Utf32String::from(target);
                pattern.score(haystack.slice(..), matcher)
            })
            .max()
    }
}

#[async_trait]
impl CandidateSource for CitationMatchSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Citation
    }

    async fn search(
        &self,
        query: &str,
        filter: Option<&FilterPredicate>,
        limit: usize,
    ) -> Result<Vec<RetrievalCandidate>> {
        let pattern = Pattern::parse(
            query,
            nucleo_matcher::pattern::CaseMatching::Smart,
            nucleo_matcher::pattern::Normalization::Smart,
        );

        let mut matcher = self
            .matcher
            .lock()
            .map_err(|_| crate::error::RetrievalError::Source("matcher lock poisoned".to_string()))?;

        let mut scored: Vec<(&AuthorityMeta, u32)> = self
            .authorities
            .iter()
            .filter(|authority| {
                filter.map_or(true, |predicate| {
                    predicate.matches_authority(&FilterTarget {
                        court: authority.court.as_deref(),
                        year: authority.year,
                        judges: &authority.bench,
                        ..Default::default()
                    })
                })
            })
            .filter_map(|authority| {
                Self::best_score(&mut matcher, &pattern, authority).map(|score| (authority, score))
            })
            .collect();

        scored.sort_by(|a, b| match b.1.cmp(&a.1) {
            Ordering::Equal => a.0.id.cmp(&b.0.id),
            other => other,
        });
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(authority, score)| {
                RetrievalCandidate::authority_level(
                    authority.id.clone(),
                    score as f32,
                    SourceKind::Citation,
                )
                .text(authority.title.clone())
                .payload(json!({
                    "matched_citation": authority.citation_strings().first().copied(),
                }))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matter_protocol::normalize_filters;

    fn authority(id: &str, title: &str, citation: &str, court: &str) -> AuthorityMeta {
        AuthorityMeta {
            id: id.to_string(),
            title: title.to_string(),
            court: Some(court.to_string()),
            reporter_citations: vec![citation.to_string()],
            year: Some(2020),
            ..Default::default()
        }
    }

    fn source() -> CitationMatchSource {
        CitationMatchSource::new(vec![
            authority("auth-1", "Sharma v. State", "AIR 2020 SC 123", "SC"),
            authority("auth-2", "Verma v. Union", "AIR 2018 SC 940", "SC"),
            authority("auth-3", "Patil v. Patil", "2021 SCC OnLine Bom 99", "BOM-HC"),
        ])
    }

    #[tokio::test]
    async fn exact_citation_ranks_first() {
        let results = source().search("AIR 2020 SC 123", None, 3).await.unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].authority_id, "auth-1");
        assert!(results[0].para_from.is_none());
    }

    #[tokio::test]
    async fn party_name_queries_match_titles() {
        let results = source().search("Patil", None, 3).await.unwrap();
        assert_eq!(results[0].authority_id, "auth-3");
    }

    #[tokio::test]
    async fn bound_is_respected() {
        let results = source().search("AIR SC", None, 1).await.unwrap();
        assert!(results.len() <= 1);
    }

    #[tokio::test]
    async fn authority_level_filters_apply() {
        let raw = serde_json::json!({"court": "BOM-HC"});
        let filters = normalize_filters(raw.as_object().unwrap());
        let predicate = filters.predicate().unwrap();

        let results = source().search("Patil", Some(&predicate), 3).await.unwrap();
        assert!(results.iter().all(|c| c.authority_id == "auth-3"));
    }
}
