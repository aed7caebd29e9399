//! Statute tag extraction and normalization.
//!
//! The same normalization runs at index time (segmenter) and query time
//! (filter normalizer) so tags stay comparable across the two.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bSECTION\s+(\d+[A-Z]{0,2})\b").expect("section regex"));

static ARTICLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bARTICLE\s+(\d+[A-Z]{0,2})\b").expect("article regex"));

// Loose query-side forms: "sec 302", "s. 302", "art 14"
static SECTION_SHORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:SECTION|SEC|S)\.?\s*-?\s*(\d+[A-Z]{0,2})$").expect("sec regex"));

static ARTICLE_SHORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:ARTICLE|ART|A)\.?\s*-?\s*(\d+[A-Z]{0,2})$").expect("art regex"));

static CANONICAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:SEC|ART)-\d+[A-Z]{0,2}$|^ACT-[A-Z]+$").expect("canonical regex"));

/// Well-known acts mapped to stable tags. Matched by substring against
/// uppercased paragraph text.
const NAMED_ACTS: &[(&str, &str)] = &[
    ("INDIAN PENAL CODE", "ACT-IPC"),
    ("CODE OF CRIMINAL PROCEDURE", "ACT-CRPC"),
    ("CODE OF CIVIL PROCEDURE", "ACT-CPC"),
    ("CONSTITUTION OF INDIA", "ACT-COI"),
    ("INDIAN EVIDENCE ACT", "ACT-IEA"),
    ("INDIAN CONTRACT ACT", "ACT-ICA"),
    ("TRANSFER OF PROPERTY ACT", "ACT-TPA"),
];

/// Scan a paragraph's text for statute references and return the normalized
/// tag set. Matching is done on the uppercased text.
#[must_use]
pub fn extract_statute_tags(text: &str) -> BTreeSet<String> {
    let upper = text.to_uppercase();
    let mut tags = BTreeSet::new();

    for caps in SECTION_RE.captures_iter(&upper) {
        tags.insert(format!("SEC-{}", &caps[1]));
    }
    for caps in ARTICLE_RE.captures_iter(&upper) {
        tags.insert(format!("ART-{}", &caps[1]));
    }
    for (needle, tag) in NAMED_ACTS {
        if upper.contains(needle) {
            tags.insert((*tag).to_string());
        }
    }

    tags
}

/// Normalize a single free-form tag value from a query filter. Returns
/// `None` when the value does not resolve to a known tag form.
#[must_use]
pub fn normalize_tag(raw: &str) -> Option<String> {
    let upper = raw.trim().to_uppercase();
    if upper.is_empty() {
        return None;
    }

    if CANONICAL_RE.is_match(&upper) {
        return Some(upper);
    }

    if let Some(caps) = SECTION_SHORT_RE.captures(&upper) {
        return Some(format!("SEC-{}", &caps[1]));
    }
    if let Some(caps) = ARTICLE_SHORT_RE.captures(&upper) {
        return Some(format!("ART-{}", &caps[1]));
    }

    for (needle, tag) in NAMED_ACTS {
        if upper.contains(needle) {
            return Some((*tag).to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_sections_and_articles() {
        let tags = extract_statute_tags(
            "The charge under Section 302 read with section 34 violates Article 21.",
        );
        let expected: BTreeSet<String> = ["SEC-302", "SEC-34", "ART-21"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        assert_eq!(tags, expected);
    }

    #[test]
    fn extracts_named_acts() {
        let tags = extract_statute_tags("An offence under the Indian Penal Code.");
        assert!(tags.contains("ACT-IPC"));
    }

    #[test]
    fn section_suffix_letters_are_kept() {
        let tags = extract_statute_tags("Section 498A of the Indian Penal Code");
        assert!(tags.contains("SEC-498A"));
    }

    #[test]
    fn normalizes_loose_query_tags() {
        assert_eq!(normalize_tag("sec 302"), Some("SEC-302".to_string()));
        assert_eq!(normalize_tag("s. 302"), Some("SEC-302".to_string()));
        assert_eq!(normalize_tag("Article 14"), Some("ART-14".to_string()));
        assert_eq!(normalize_tag("art-14"), Some("ART-14".to_string()));
        assert_eq!(normalize_tag("SEC-120B"), Some("SEC-120B".to_string()));
        assert_eq!(normalize_tag("indian penal code"), Some("ACT-IPC".to_string()));
        assert_eq!(normalize_tag("free text"), None);
        assert_eq!(normalize_tag("  "), None);
    }

    #[test]
    fn index_and_query_tags_are_comparable() {
        let indexed = extract_statute_tags("Section 302 of the Indian Penal Code");
        let queried = normalize_tag("sec 302").unwrap();
        assert!(indexed.contains(&queried));
    }
}
