use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for document segmentation behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Upper token bound for content chunks (soft: forced inclusion may
    /// exceed it by at most one paragraph)
    pub max_chunk_tokens: usize,

    /// Lower token bound a content chunk should reach before being emitted
    pub min_chunk_tokens: usize,

    /// Fraction of an emitted chunk's tokens re-included as overlap in the
    /// next chunk
    pub overlap_ratio: f32,

    /// Paragraphs on each side of a citation paragraph included in its
    /// citation-context chunk
    pub citation_context_radius: usize,

    /// How many leading paragraphs are considered for positional headnote
    /// classification
    pub headnote_scan_window: usize,

    /// Minimum word count for positional headnote classification
    pub headnote_min_words: usize,

    /// Path to a HuggingFace `tokenizer.json`; when unset, the deterministic
    /// chars/4 heuristic is used
    pub tokenizer_path: Option<PathBuf>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_chunk_tokens: 800,
            min_chunk_tokens: 550,
            overlap_ratio: 0.15,
            citation_context_radius: 2,
            headnote_scan_window: 3,
            headnote_min_words: 50,
            tokenizer_path: None,
        }
    }
}

impl SegmenterConfig {
    /// Small bounds for exercising window edges in tests
    #[must_use]
    pub fn with_bounds(min_chunk_tokens: usize, max_chunk_tokens: usize) -> Self {
        Self {
            min_chunk_tokens,
            max_chunk_tokens,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_tokens == 0 {
            return Err("max_chunk_tokens must be > 0".to_string());
        }

        if self.min_chunk_tokens > self.max_chunk_tokens {
            return Err(format!(
                "min_chunk_tokens ({}) cannot exceed max_chunk_tokens ({})",
                self.min_chunk_tokens, self.max_chunk_tokens
            ));
        }

        if !(0.0..1.0).contains(&self.overlap_ratio) {
            return Err(format!(
                "overlap_ratio ({}) must be in [0, 1)",
                self.overlap_ratio
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        let config = SegmenterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_chunk_tokens, 800);
        assert_eq!(config.min_chunk_tokens, 550);
    }

    #[test]
    fn config_validation() {
        let mut config = SegmenterConfig::default();

        config.min_chunk_tokens = 900;
        assert!(config.validate().is_err());

        config.min_chunk_tokens = 550;
        config.overlap_ratio = 1.0;
        assert!(config.validate().is_err());

        config.overlap_ratio = 0.15;
        config.max_chunk_tokens = 0;
        assert!(config.validate().is_err());
    }
}
