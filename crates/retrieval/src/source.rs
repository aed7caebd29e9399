use crate::error::Result;
use crate::types::RetrievalCandidate;
use async_trait::async_trait;
use matter_protocol::{FilterPredicate, SourceKind};

/// One retrieval backend behind the fan-out. New sources are added by
/// implementing this trait, not by branching in the orchestrator. A source's
/// failure is absorbed by the fan-out: it contributes an empty result set and
/// a warn log, never a request failure.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Which ranking signal this source provides
    fn kind(&self) -> SourceKind;

    /// Return up to `limit` candidates for the query, honoring the filter
    /// predicate where the backend can express it.
    async fn search(
        &self,
        query: &str,
        filter: Option<&FilterPredicate>,
        limit: usize,
    ) -> Result<Vec<RetrievalCandidate>>;
}
