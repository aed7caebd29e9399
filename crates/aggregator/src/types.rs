use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Outcome of one aggregation round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregationResult {
    /// The merged answer text
    pub answer: String,

    /// Aggregate confidence in [0,1]
    pub confidence: f32,

    /// Agents whose vote fell in the majority cluster
    pub aligned: BTreeSet<String>,

    /// True when the aligned cluster was a minority or every vote was a
    /// placeholder
    pub low_consensus: bool,

    /// Per-agent trust weights before this round's update
    pub weights_before: BTreeMap<String, f64>,

    /// Per-agent trust weights after this round's update; same total mass
    pub weights_after: BTreeMap<String, f64>,
}

/// Aggregator tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Multiplier applied to aligned agents' weights (>1)
    pub growth_factor: f64,

    /// Multiplier applied to non-aligned agents' weights (<1)
    pub decay_factor: f64,

    /// Confidence assigned to placeholder votes for failed agents, and the
    /// floor reported for degenerate rounds
    pub placeholder_confidence: f32,

    /// Answer-similarity threshold for clustering votes without decision
    /// labels
    pub similarity_threshold: f32,

    /// Per-agent wall-clock budget in the fan-out
    pub agent_timeout: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            growth_factor: 1.15,
            decay_factor: 0.85,
            placeholder_confidence: 0.1,
            similarity_threshold: 0.5,
            agent_timeout: Duration::from_secs(90),
        }
    }
}

impl AggregatorConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.growth_factor <= 1.0 {
            return Err(format!("growth_factor ({}) must be > 1", self.growth_factor));
        }
        if !(0.0..1.0).contains(&self.decay_factor) {
            return Err(format!("decay_factor ({}) must be in (0, 1)", self.decay_factor));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(format!(
                "similarity_threshold ({}) must be in [0, 1]",
                self.similarity_threshold
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
        assert!(AggregatorConfig::default().validate().is_ok());
    }

    #[test]
    fn config_validation() {
        let mut config = AggregatorConfig::default();
        config.growth_factor = 1.0;
        assert!(config.validate().is_err());

        config.growth_factor = 1.15;
        config.decay_factor = 1.2;
        assert!(config.validate().is_err());
    }
}
