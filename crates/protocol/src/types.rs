use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use unicode_segmentation::UnicodeSegmentation;

/// A single extracted paragraph of an authority, as produced by the upstream
/// extraction pipeline. Paragraph ids are ordinals unique within a document
/// and define the authoritative sequence for windowing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paragraph {
    /// Ordinal id, unique within the document
    pub id: u32,

    /// Paragraph text as extracted
    pub text: String,

    /// Page the paragraph appears on, when known
    pub page: Option<u32>,

    /// Whether the paragraph carried an explicit number in the source
    pub is_numbered: bool,

    /// The explicit paragraph number, when present
    pub number: Option<u32>,

    /// Unicode word count of `text`
    pub word_count: usize,

    /// Character count of `text`
    pub char_count: usize,
}

impl Paragraph {
    /// Create a paragraph, computing word and character counts from the text.
    #[must_use]
    pub fn new(id: u32, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id,
            word_count: text.unicode_words().count(),
            char_count: text.chars().count(),
            page: None,
            is_numbered: false,
            number: None,
            text,
        }
    }

    /// Builder: set the source page
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Builder: set the explicit paragraph number
    #[must_use]
    pub const fn numbered(mut self, number: u32) -> Self {
        self.is_numbered = true;
        self.number = Some(number);
        self
    }
}

/// Type of chunk a segmented span represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    /// Token-bounded sliding-window span of body paragraphs
    Content,
    /// Isolated headnote/summary paragraph
    Headnote,
    /// Window around a paragraph carrying a legal citation
    CitationContext,
}

impl ChunkKind {
    /// Human-readable name, also used in chunk identities
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Headnote => "headnote",
            Self::CitationContext => "citation_context",
        }
    }

    /// Parse from a loosely formatted string (filter input)
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "content" => Some(Self::Content),
            "headnote" => Some(Self::Headnote),
            "citation_context" | "citation-context" => Some(Self::CitationContext),
            _ => None,
        }
    }
}

/// Which retrieval source produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Vector,
    Lexical,
    Citation,
}

impl SourceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vector => "vector",
            Self::Lexical => "lexical",
            Self::Citation => "citation",
        }
    }

    /// Stable fan-out order, used for first-seen tie-breaking during dedup
    #[must_use]
    pub const fn fanout_rank(self) -> u8 {
        match self {
            Self::Vector => 0,
            Self::Lexical => 1,
            Self::Citation => 2,
        }
    }
}

/// Resolved metadata for a single authority (case record)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthorityMeta {
    /// Stable authority identifier
    pub id: String,

    /// Case title, e.g. "State of Maharashtra v. Prakash"
    pub title: String,

    /// Court code, e.g. "SC", "BOM-HC"
    pub court: Option<String>,

    /// Neutral citation, when assigned
    pub neutral_citation: Option<String>,

    /// Reporter citations (AIR, SCC, ...)
    #[serde(default)]
    pub reporter_citations: Vec<String>,

    /// Decision date, ISO-8601
    pub date: Option<String>,

    /// Decision year, when known
    pub year: Option<i32>,

    /// Judges on the bench
    #[serde(default)]
    pub bench: Vec<String>,

    /// Source URL
    pub url: Option<String>,
}

impl AuthorityMeta {
    /// All citation strings of this authority, neutral first
    #[must_use]
    pub fn citation_strings(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        if let Some(neutral) = self.neutral_citation.as_deref() {
            out.push(neutral);
        }
        out.extend(self.reporter_citations.iter().map(String::as_str));
        out
    }
}

/// A scored paragraph reference inside a [`Pack`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParaRef {
    pub para_id: u32,
    pub score: f32,
}

/// Retrieval result bundle for one authority: resolved metadata plus the
/// matched evidence. The unit reasoning agents and the aggregator consume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pack {
    pub authority_id: String,
    pub title: String,
    pub court: Option<String>,
    pub neutral_citation: Option<String>,
    #[serde(default)]
    pub reporter_citations: Vec<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub bench: Vec<String>,
    pub url: Option<String>,

    /// Matched paragraphs with per-paragraph scores; empty when the winning
    /// candidate carried no chunk span (authority-level match)
    #[serde(default)]
    pub paragraphs: Vec<ParaRef>,

    /// Normalized relevance score of the winning candidate
    pub aggregate_score: f32,

    /// Source whose candidate won dedup for this authority
    pub source: SourceKind,

    /// Opaque source metadata, passed through for audit
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// A discrete decision label an agent may attach to its vote. Labels are
/// compared case-insensitively after trimming.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecisionLabel(String);

impl DecisionLabel {
    #[must_use]
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Evidence reference inside an [`AgentVote`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceRef {
    pub authority_id: String,
    #[serde(default)]
    pub para_ids: Vec<u32>,
}

/// One reasoning agent's answer for a query. An agent that failed is
/// represented by a placeholder vote, never omitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentVote {
    pub agent_name: String,

    /// The agent's reasoned answer text
    pub reasoning: String,

    /// Authorities and paragraphs the agent relied on
    #[serde(default)]
    pub sources: Vec<SourceRef>,

    /// Self-reported confidence in [0,1]
    pub confidence: f32,

    /// Optional discrete decision label, used for alignment clustering
    #[serde(default)]
    pub decision: Option<DecisionLabel>,

    /// True when this vote stands in for a failed agent
    #[serde(default)]
    pub placeholder: bool,
}

impl AgentVote {
    #[must_use]
    pub fn new(agent_name: impl Into<String>, reasoning: impl Into<String>, confidence: f32) -> Self {
        Self {
            agent_name: agent_name.into(),
            reasoning: reasoning.into(),
            sources: Vec::new(),
            confidence: confidence.clamp(0.0, 1.0),
            decision: None,
            placeholder: false,
        }
    }

    /// Builder: attach a decision label
    #[must_use]
    pub fn decision(mut self, label: impl AsRef<str>) -> Self {
        self.decision = Some(DecisionLabel::new(label));
        self
    }

    /// Builder: attach an evidence reference
    #[must_use]
    pub fn source(mut self, authority_id: impl Into<String>, para_ids: Vec<u32>) -> Self {
        self.sources.push(SourceRef {
            authority_id: authority_id.into(),
            para_ids,
        });
        self
    }

    /// Distinct authority ids referenced by this vote
    #[must_use]
    pub fn cited_authorities(&self) -> BTreeSet<&str> {
        self.sources
            .iter()
            .map(|s| s.authority_id.as_str())
            .collect()
    }
}
