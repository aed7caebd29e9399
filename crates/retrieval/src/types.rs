use matter_protocol::SourceKind;
use serde::{Deserialize, Serialize};

/// One scored match from one retrieval source. Transient: created per query,
/// discarded after packing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalCandidate {
    /// Authority the match belongs to
    pub authority_id: String,

    /// Chunk identity, present for chunk-level sources
    pub chunk_id: Option<String>,

    /// Paragraph span, present when the source knows it
    pub para_from: Option<u32>,
    pub para_to: Option<u32>,

    /// Matched text, used by the rerank pass when available
    pub text: Option<String>,

    /// Source-native score, uncomparable across sources
    pub raw_score: f32,

    /// Score on the common [0,1] scale, assigned during normalization
    pub normalized_score: f32,

    /// Which source produced this candidate
    pub source: SourceKind,

    /// Opaque source metadata, carried through to the Pack
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl RetrievalCandidate {
    /// Candidate carrying chunk-level detail
    #[must_use]
    pub fn chunk_level(
        authority_id: impl Into<String>,
        chunk_id: impl Into<String>,
        span: (u32, u32),
        text: impl Into<String>,
        raw_score: f32,
        source: SourceKind,
    ) -> Self {
        Self {
            authority_id: authority_id.into(),
            chunk_id: Some(chunk_id.into()),
            para_from: Some(span.0),
            para_to: Some(span.1),
            text: Some(text.into()),
            raw_score,
            normalized_score: 0.0,
            source,
            payload: serde_json::Value::Null,
        }
    }

    /// Candidate at authority granularity (no paragraph detail)
    #[must_use]
    pub fn authority_level(
        authority_id: impl Into<String>,
        raw_score: f32,
        source: SourceKind,
    ) -> Self {
        Self {
            authority_id: authority_id.into(),
            chunk_id: None,
            para_from: None,
            para_to: None,
            text: None,
            raw_score,
            normalized_score: 0.0,
            source,
            payload: serde_json::Value::Null,
        }
    }

    /// Builder: attach matched text (for the rerank pass)
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: attach opaque payload metadata
    #[must_use]
    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Orchestrator tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Chunk/authority sources are asked for `overfetch_factor * limit`
    /// matches to give dedup and rerank something to work with
    pub overfetch_factor: usize,

    /// Fixed normalized score for citation-source matches; an explicit
    /// citation match is near-certain relevance
    pub citation_score: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            overfetch_factor: 2,
            citation_score: 0.9,
        }
    }
}

impl RetrievalConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.overfetch_factor == 0 {
            return Err("overfetch_factor must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.citation_score) {
            return Err(format!(
                "citation_score ({}) must be in [0, 1]",
                self.citation_score
            ));
        }
        Ok(())
    }
}
