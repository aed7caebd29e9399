//! Query-scoping filter normalization.
//!
//! Turns a free-form scoping map into a validated [`CaseFilters`] value and a
//! backend-neutral [`FilterPredicate`]. Unknown keys are dropped silently,
//! invalid values are dropped with a debug log; an empty result yields no
//! predicate, so search runs unfiltered rather than impossible.

use crate::tags::normalize_tag;
use crate::types::ChunkKind;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Earliest year a filter may reference
pub const MIN_FILTER_YEAR: i32 = 1900;

/// Validated, canonical query-scoping filters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CaseFilters {
    /// Court codes, uppercased
    #[serde(default)]
    pub courts: Vec<String>,

    /// Inclusive year range
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,

    /// Judge name fragment, trimmed
    pub judge: Option<String>,

    /// Normalized statute tags (SEC-/ART-/ACT-)
    #[serde(default)]
    pub statute_tags: Vec<String>,

    /// Require (or forbid) chunks that carry a citation
    pub require_citation: Option<bool>,

    /// Restrict to one chunk type
    pub chunk_kind: Option<ChunkKind>,
}

impl CaseFilters {
    /// Whether no condition survived validation
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courts.is_empty()
            && self.year_from.is_none()
            && self.year_to.is_none()
            && self.judge.is_none()
            && self.statute_tags.is_empty()
            && self.require_citation.is_none()
            && self.chunk_kind.is_none()
    }

    /// Build the conjunction predicate; `None` when empty (unfiltered search).
    #[must_use]
    pub fn predicate(&self) -> Option<FilterPredicate> {
        let mut conditions = Vec::new();

        if !self.courts.is_empty() {
            conditions.push(FieldCondition::CourtIn(self.courts.clone()));
        }
        match (self.year_from, self.year_to) {
            (None, None) => {}
            (from, to) => conditions.push(FieldCondition::YearBetween(
                from.unwrap_or(MIN_FILTER_YEAR),
                to.unwrap_or(current_year()),
            )),
        }
        if let Some(judge) = &self.judge {
            conditions.push(FieldCondition::JudgeContains(judge.to_lowercase()));
        }
        if !self.statute_tags.is_empty() {
            conditions.push(FieldCondition::TagIn(self.statute_tags.clone()));
        }
        if let Some(flag) = self.require_citation {
            conditions.push(FieldCondition::HasCitation(flag));
        }
        if let Some(kind) = self.chunk_kind {
            conditions.push(FieldCondition::KindIs(kind));
        }

        if conditions.is_empty() {
            None
        } else {
            Some(FilterPredicate { conditions })
        }
    }
}

/// One per-field condition in the conjunction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FieldCondition {
    /// Court code set membership
    CourtIn(Vec<String>),
    /// Inclusive year range
    YearBetween(i32, i32),
    /// Case-insensitive substring over judge names
    JudgeContains(String),
    /// Statute tag intersection (any-of)
    TagIn(Vec<String>),
    /// Citation-presence equality
    HasCitation(bool),
    /// Chunk type equality
    KindIs(ChunkKind),
}

impl FieldCondition {
    /// Whether the condition is expressible at authority granularity
    #[must_use]
    pub const fn applies_to_authority(&self) -> bool {
        matches!(
            self,
            Self::CourtIn(_) | Self::YearBetween(_, _) | Self::JudgeContains(_)
        )
    }
}

/// Conjunction of per-field conditions, evaluable in-memory and translatable
/// by remote index backends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterPredicate {
    pub conditions: Vec<FieldCondition>,
}

/// Field view a predicate evaluates against. Sources populate whichever
/// fields their granularity knows about; a condition over a missing field
/// fails closed.
#[derive(Debug, Clone, Default)]
pub struct FilterTarget<'a> {
    pub court: Option<&'a str>,
    pub year: Option<i32>,
    pub judges: &'a [String],
    pub statute_tags: Option<&'a BTreeSet<String>>,
    pub has_citation: Option<bool>,
    pub chunk_kind: Option<ChunkKind>,
}

impl FilterPredicate {
    /// Evaluate the conjunction against one target.
    #[must_use]
    pub fn matches(&self, target: &FilterTarget<'_>) -> bool {
        self.conditions.iter().all(|cond| Self::eval(cond, target))
    }

    /// Evaluate only the authority-level conditions, for sources whose
    /// granularity has no chunk fields (lexical, citation similarity).
    #[must_use]
    pub fn matches_authority(&self, target: &FilterTarget<'_>) -> bool {
        self.conditions
            .iter()
            .filter(|cond| cond.applies_to_authority())
            .all(|cond| Self::eval(cond, target))
    }

    fn eval(cond: &FieldCondition, target: &FilterTarget<'_>) -> bool {
        match cond {
            FieldCondition::CourtIn(courts) => target
                .court
                .is_some_and(|c| courts.iter().any(|want| want.eq_ignore_ascii_case(c))),
            FieldCondition::YearBetween(from, to) => {
                target.year.is_some_and(|y| y >= *from && y <= *to)
            }
            FieldCondition::JudgeContains(needle) => target
                .judges
                .iter()
                .any(|j| j.to_lowercase().contains(needle)),
            FieldCondition::TagIn(tags) => target
                .statute_tags
                .is_some_and(|have| tags.iter().any(|t| have.contains(t))),
            FieldCondition::HasCitation(want) => target.has_citation == Some(*want),
            FieldCondition::KindIs(kind) => target.chunk_kind == Some(*kind),
        }
    }
}

/// Canonicalize a free-form scoping map. Never errors: unknown keys and
/// unusable values are dropped.
#[must_use]
pub fn normalize_filters(raw: &Map<String, Value>) -> CaseFilters {
    let mut filters = CaseFilters::default();
    let max_year = current_year();

    for (key, value) in raw {
        match key.as_str() {
            "court" | "courts" => {
                filters.courts = string_list(value)
                    .into_iter()
                    .map(|c| c.trim().to_uppercase())
                    .filter(|c| !c.is_empty())
                    .collect();
            }
            "year" => {
                if let Some(year) = valid_year(value, max_year) {
                    filters.year_from = Some(year);
                    filters.year_to = Some(year);
                }
            }
            "year_from" => filters.year_from = valid_year(value, max_year),
            "year_to" => filters.year_to = valid_year(value, max_year),
            "year_range" => {
                if let Some(range) = value.as_array() {
                    filters.year_from = range.first().and_then(|v| valid_year(v, max_year));
                    filters.year_to = range.get(1).and_then(|v| valid_year(v, max_year));
                }
            }
            "judge" => {
                let trimmed = value.as_str().map(str::trim).unwrap_or_default();
                if trimmed.chars().count() >= 2 {
                    filters.judge = Some(trimmed.to_string());
                } else if !trimmed.is_empty() {
                    log::debug!("dropping judge filter shorter than 2 chars: {trimmed:?}");
                }
            }
            "statute_tags" | "tags" => {
                filters.statute_tags = string_list(value)
                    .into_iter()
                    .filter_map(|t| {
                        let normalized = normalize_tag(&t);
                        if normalized.is_none() {
                            log::debug!("dropping unrecognized statute tag: {t:?}");
                        }
                        normalized
                    })
                    .collect();
            }
            "has_citation" => filters.require_citation = value.as_bool(),
            "chunk_type" => {
                filters.chunk_kind = value.as_str().and_then(ChunkKind::parse);
            }
            other => {
                log::debug!("dropping unknown filter key: {other:?}");
            }
        }
    }

    // An inverted range would match nothing; treat it as invalid input.
    if let (Some(from), Some(to)) = (filters.year_from, filters.year_to) {
        if from > to {
            log::debug!("dropping inverted year range {from}..{to}");
            filters.year_from = None;
            filters.year_to = None;
        }
    }

    filters
}

fn current_year() -> i32 {
    chrono::Utc::now().year()
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn valid_year(value: &Value, max_year: i32) -> Option<i32> {
    let year = match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }?;
    if (MIN_FILTER_YEAR..=max_year).contains(&year) {
        Some(year)
    } else {
        log::debug!("dropping out-of-range year filter: {year}");
        None
    }
}
