use crate::error::{Result, SegmenterError};
use std::path::Path;
use tokenizers::Tokenizer;

/// Token counting for window accounting. Uses a real subword tokenizer when
/// one is configured, with a deterministic chars/4 heuristic otherwise, so
/// segmentation is exercisable without model assets. Chunk boundaries depend
/// on the counts only through the configured thresholds.
pub enum TokenCounter {
    /// HuggingFace subword tokenizer
    Subword(Box<Tokenizer>),
    /// Deterministic fallback: ceil-free chars/4, minimum 1
    Heuristic,
}

impl TokenCounter {
    /// Load a subword tokenizer from a `tokenizer.json` file. Load failures
    /// surface here, at construction, never during segmentation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let tokenizer = Tokenizer::from_file(path.as_ref())
            .map_err(|e| SegmenterError::Tokenizer(e.to_string()))?;
        Ok(Self::Subword(Box::new(tokenizer)))
    }

    /// Count tokens in `text`. A runtime encode failure falls back to the
    /// heuristic for that text so one odd paragraph cannot stop a document.
    #[must_use]
    pub fn count(&self, text: &str) -> usize {
        match self {
            Self::Subword(tokenizer) => match tokenizer.encode(text, false) {
                Ok(encoding) => encoding.get_ids().len().max(1),
                Err(e) => {
                    log::warn!("subword encode failed, using heuristic count: {e}");
                    heuristic_count(text)
                }
            },
            Self::Heuristic => heuristic_count(text),
        }
    }
}

/// Rough estimate: 4 chars per token on average for legal prose
#[must_use]
pub fn heuristic_count(text: &str) -> usize {
    (text.chars().count() / 4).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_is_chars_over_four() {
        assert_eq!(heuristic_count("abcdefgh"), 2);
        assert_eq!(heuristic_count(&"a".repeat(800)), 200);
    }

    #[test]
    fn heuristic_never_returns_zero() {
        assert_eq!(heuristic_count(""), 1);
        assert_eq!(heuristic_count("ab"), 1);
    }

    #[test]
    fn missing_tokenizer_file_errors_at_construction() {
        let dir = tempfile::tempdir().unwrap();
        let result = TokenCounter::from_file(dir.path().join("missing.json"));
        assert!(matches!(result, Err(SegmenterError::Tokenizer(_))));
    }
}
