//! Legal citation shape detection.
//!
//! One set of patterns serves both sides of the pipeline: the segmenter uses
//! [`paragraph_has_citation`] to decide which paragraphs get citation-context
//! windows, and the retrieval orchestrator uses [`query_is_citation_shaped`]
//! to gate the citation-similarity fan-out.

use once_cell::sync::Lazy;
use regex::Regex;

// Reporter citations: "AIR 2020 SC 123"
static AIR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bAIR\s+(?:19|20)\d{2}\s+[A-Z]{2,6}\s+\d+").expect("air regex"));

// Reporter citations: "(2019) 3 SCC 123"
static SCC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(\d{4}\)\s+\d+\s+SCC\s+\d+").expect("scc regex"));

// Online reporters: "2021 SCC OnLine Bom 99"
static ONLINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{4}\s+SCC\s+OnLine\s+[A-Za-z]+\s+\d+").expect("online regex")
});

// Neutral citations: "2023 INSC 456"
static NEUTRAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b\d{4}\s+INSC\s+\d+\b").expect("neutral regex"));

// Party-versus-party constructions: "Kesavananda Bharati v. State of Kerala (1973)"
static VERSUS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][\w.&'-]*(?:\s+(?:of|and|the|[A-Z][\w.&'-]*)){0,7}\s+[Vv][Ss]?\.?\s+[A-Z]")
        .expect("versus regex")
});

// In-text statute references: "Section 300", "Article 226"
static STATUTE_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:section|article)\s+\d+").expect("statute ref regex"));

fn has_reporter_citation(text: &str) -> bool {
    AIR_RE.is_match(text)
        || SCC_RE.is_match(text)
        || ONLINE_RE.is_match(text)
        || NEUTRAL_RE.is_match(text)
}

/// Whether a paragraph carries a legal citation: a reporter or neutral
/// citation, a party-versus-party reference, or a statute reference.
#[must_use]
pub fn paragraph_has_citation(text: &str) -> bool {
    has_reporter_citation(text) || VERSUS_RE.is_match(text) || STATUTE_REF_RE.is_match(text)
}

/// Whether a query text looks like a citation lookup rather than a natural
/// language question. Statute references alone do not qualify; those are
/// served by tag filters, not citation similarity.
#[must_use]
pub fn query_is_citation_shaped(query: &str) -> bool {
    has_reporter_citation(query) || VERSUS_RE.is_match(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporter_citations_are_detected() {
        assert!(paragraph_has_citation("As held in AIR 2020 SC 123, the rule..."));
        assert!(paragraph_has_citation("See (2019) 3 SCC 123."));
        assert!(paragraph_has_citation("Reported as 2021 SCC OnLine Bom 99."));
        assert!(paragraph_has_citation("2023 INSC 456 settles the point."));
    }

    #[test]
    fn versus_forms_are_detected() {
        assert!(paragraph_has_citation(
            "In Kesavananda Bharati v. State of Kerala (1973) the court held..."
        ));
        assert!(paragraph_has_citation("Maneka Gandhi vs Union of India"));
    }

    #[test]
    fn statute_references_count_for_paragraphs() {
        assert!(paragraph_has_citation("The offence under Section 300 is made out."));
        assert!(paragraph_has_citation("A writ under article 226 lies."));
    }

    #[test]
    fn plain_prose_is_not_a_citation() {
        assert!(!paragraph_has_citation("The evidence on record is consistent."));
    }

    #[test]
    fn citation_shaped_queries_gate_fanout() {
        assert!(query_is_citation_shaped("AIR 2020 SC 123"));
        assert!(query_is_citation_shaped("Maneka Gandhi v. Union of India"));
        assert!(!query_is_citation_shaped("what is adverse possession"));
        // Statute references are filter territory, not citation lookups
        assert!(!query_is_citation_shaped("limitation under section 65"));
    }
}
