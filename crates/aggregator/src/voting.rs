use crate::types::{AggregationResult, AggregatorConfig};
use crate::weights::WeightState;
use matter_protocol::AgentVote;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Merges independent agent votes into one answer via confidence-weighted
/// voting with multiplicative weight updates. Never fails: degenerate input
/// produces a floor-confidence result with the low-consensus marker set.
pub struct Aggregator {
    config: AggregatorConfig,
    weights: WeightState,
}

impl Aggregator {
    /// Create an aggregator over an injected weight state
    #[must_use]
    pub fn new(config: AggregatorConfig, weights: WeightState) -> Self {
        config
            .validate()
            .expect("Invalid aggregator configuration provided");
        Self { config, weights }
    }

    /// The injected weight state, for snapshotting by the caller
    #[must_use]
    pub fn weights(&self) -> &WeightState {
        &self.weights
    }

    /// Aggregate one round of votes. Expects exactly one vote per configured
    /// agent (failed agents as placeholders); votes are clustered, the
    /// majority cluster blended into the answer, and agent trust weights
    /// updated multiplicatively inside a single critical section.
    pub async fn aggregate(
        &self,
        votes: &BTreeMap<String, AgentVote>,
        query: &str,
    ) -> AggregationResult {
        if votes.is_empty() {
            log::warn!("aggregate called with no votes for query: {query}");
            return AggregationResult {
                answer: String::new(),
                confidence: self.config.placeholder_confidence,
                aligned: BTreeSet::new(),
                low_consensus: true,
                weights_before: BTreeMap::new(),
                weights_after: BTreeMap::new(),
            };
        }

        let names: Vec<&str> = votes.keys().map(String::as_str).collect();
        let clusters = self.cluster_votes(votes);
        let degenerate = votes.values().all(|v| v.placeholder);

        let growth = self.config.growth_factor;
        let decay = self.config.decay_factor;

        let (weights_before, weights_after, outcome) = self
            .weights
            .update_round(&names, |weights| {
                let aligned = majority_cluster(&clusters, votes, weights);
                let outcome = blend(votes, &aligned, weights, &self.config, degenerate);

                // No trust signal in a round where every agent failed;
                // leave the weights untouched.
                if !degenerate {
                    let before_total: f64 = weights.values().sum();
                    for (name, weight) in weights.iter_mut() {
                        *weight *= if aligned.contains(name.as_str()) {
                            growth
                        } else {
                            decay
                        };
                    }
                    // Redistribution, not inflation: restore the pre-update mass.
                    let new_total: f64 = weights.values().sum();
                    if new_total > 0.0 {
                        let scale = before_total / new_total;
                        for weight in weights.values_mut() {
                            *weight *= scale;
                        }
                    }
                }

                outcome
            })
            .await;

        log::debug!(
            "aggregated {} votes, {} aligned, confidence {:.2}",
            votes.len(),
            outcome.aligned.len(),
            outcome.confidence
        );

        AggregationResult {
            answer: outcome.answer,
            confidence: outcome.confidence,
            aligned: outcome.aligned,
            low_consensus: outcome.low_consensus,
            weights_before,
            weights_after,
        }
    }

    /// Cluster votes by decision label when every vote carries one,
    /// otherwise by greedy token-Jaccard similarity of the answer texts.
    fn cluster_votes<'a>(&self, votes: &'a BTreeMap<String, AgentVote>) -> Vec<Vec<&'a str>> {
        let all_labeled = votes.values().all(|v| v.decision.is_some());

        if all_labeled {
            let mut by_label: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
            for (name, vote) in votes {
                let label = vote.decision.as_ref().map_or("", |d| d.as_str());
                by_label.entry(label).or_default().push(name.as_str());
            }
            return by_label.into_values().collect();
        }

        let mut clusters: Vec<Vec<&str>> = Vec::new();
        let mut representatives: Vec<BTreeSet<String>> = Vec::new();
        for (name, vote) in votes {
            let tokens = answer_tokens(&vote.reasoning);
            let joined = representatives
                .iter()
                .position(|rep| jaccard(rep, &tokens) >= self.config.similarity_threshold);
            match joined {
                Some(i) => clusters[i].push(name.as_str()),
                None => {
                    clusters.push(vec![name.as_str()]);
                    representatives.push(tokens);
                }
            }
        }
        clusters
    }
}

struct BlendOutcome {
    answer: String,
    confidence: f32,
    aligned: BTreeSet<String>,
    low_consensus: bool,
}

/// Pick the majority cluster: most members, ties broken by total
/// weight x confidence, then by first member name for determinism.
fn majority_cluster<'a>(
    clusters: &[Vec<&'a str>],
    votes: &BTreeMap<String, AgentVote>,
    weights: &HashMap<String, f64>,
) -> BTreeSet<&'a str> {
    let mass = |members: &[&str]| -> f64 {
        members
            .iter()
            .map(|name| {
                let weight = weights.get(*name).copied().unwrap_or(0.0);
                let confidence = votes.get(*name).map_or(0.0, |v| f64::from(v.confidence));
                weight * confidence
            })
            .sum()
    };

    clusters
        .iter()
        .max_by(|a, b| {
            a.len()
                .cmp(&b.len())
                .then_with(|| mass(a).partial_cmp(&mass(b)).unwrap_or(std::cmp::Ordering::Equal))
                .then_with(|| b.first().cmp(&a.first()))
        })
        .map(|members| members.iter().copied().collect())
        .unwrap_or_default()
}

/// Merge the aligned cluster into one answer and compute the aggregate
/// confidence.
fn blend(
    votes: &BTreeMap<String, AgentVote>,
    aligned: &BTreeSet<&str>,
    weights: &HashMap<String, f64>,
    config: &AggregatorConfig,
    degenerate: bool,
) -> BlendOutcome {
    // weight x confidence is the blend coefficient; the strongest aligned
    // vote provides the answer text, ties resolved by higher confidence.
    let representative = aligned
        .iter()
        .filter_map(|name| votes.get(*name).map(|vote| (*name, vote)))
        .max_by(|(a_name, a), (b_name, b)| {
            let a_coeff = weights.get(*a_name).copied().unwrap_or(0.0) * f64::from(a.confidence);
            let b_coeff = weights.get(*b_name).copied().unwrap_or(0.0) * f64::from(b.confidence);
            a_coeff
                .partial_cmp(&b_coeff)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    a.confidence
                        .partial_cmp(&b.confidence)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| b_name.cmp(a_name))
        });

    let answer = representative.map_or(String::new(), |(_, vote)| vote.reasoning.clone());

    // Weighted mean of aligned confidences, scaled down when the aligned
    // set is a minority: low consensus must not report high confidence.
    let (weight_sum, weighted_confidence) = aligned.iter().fold((0.0_f64, 0.0_f64), |acc, name| {
        let weight = weights.get(*name).copied().unwrap_or(0.0);
        let confidence = votes.get(*name).map_or(0.0, |v| f64::from(v.confidence));
        (acc.0 + weight, acc.1 + weight * confidence)
    });
    let mut confidence = if weight_sum > 0.0 {
        (weighted_confidence / weight_sum) as f32
    } else {
        0.0
    };

    let minority = aligned.len() * 2 < votes.len();
    if minority {
        confidence *= aligned.len() as f32 / votes.len() as f32;
    }

    let low_consensus = minority || degenerate;
    if degenerate {
        confidence = confidence.min(config.placeholder_confidence);
    }

    BlendOutcome {
        answer,
        confidence: confidence.clamp(0.0, 1.0),
        aligned: aligned.iter().map(|s| (*s).to_string()).collect(),
        low_consensus,
    }
}

fn answer_tokens(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .map(str::to_lowercase)
        .filter(|t| t.len() >= 3)
        .collect()
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f32 / union as f32
}
