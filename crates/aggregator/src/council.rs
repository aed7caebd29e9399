use crate::types::AggregatorConfig;
use async_trait::async_trait;
use futures::future::join_all;
use matter_protocol::{AgentVote, Pack};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// One specialized reasoning unit. A black box from the aggregator's point
/// of view: it consumes the retrieved packs and returns a reasoned vote.
#[async_trait]
pub trait ReasoningAgent: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, query: &str, packs: &[Pack]) -> anyhow::Result<AgentVote>;
}

/// Fans a query out to every configured agent concurrently and waits for all
/// of them. An agent error or timeout is converted at this boundary into a
/// placeholder vote; the aggregator only ever sees vote values, one per
/// agent, never an exception.
pub struct AgentCouncil {
    agents: Vec<Arc<dyn ReasoningAgent>>,
    timeout: Duration,
    placeholder_confidence: f32,
}

impl AgentCouncil {
    #[must_use]
    pub fn new(agents: Vec<Arc<dyn ReasoningAgent>>, config: &AggregatorConfig) -> Self {
        Self {
            agents,
            timeout: config.agent_timeout,
            placeholder_confidence: config.placeholder_confidence,
        }
    }

    #[must_use]
    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name()).collect()
    }

    /// Run one round. This is a synchronization barrier: every launched
    /// agent resolves (success, error, or timeout) before the map returns.
    pub async fn run_round(&self, query: &str, packs: &[Pack]) -> BTreeMap<String, AgentVote> {
        let runs = self.agents.iter().map(|agent| {
            let agent = Arc::clone(agent);
            let query = query.to_string();
            async move {
                let name = agent.name().to_string();
                let outcome = tokio::time::timeout(self.timeout, agent.run(&query, packs)).await;
                (name, outcome)
            }
        });

        join_all(runs)
            .await
            .into_iter()
            .map(|(name, outcome)| {
                let vote = match outcome {
                    Ok(Ok(mut vote)) => {
                        // The agent's name in the vote is authoritative from
                        // the council's registry, not the agent's own claim.
                        vote.agent_name = name.clone();
                        vote
                    }
                    Ok(Err(e)) => {
                        log::warn!("agent {name} failed: {e}");
                        self.placeholder(&name, format!("agent failed: {e}"))
                    }
                    Err(_) => {
                        log::warn!("agent {name} timed out after {:?}", self.timeout);
                        self.placeholder(&name, "agent timed out".to_string())
                    }
                };
                (name, vote)
            })
            .collect()
    }

    fn placeholder(&self, name: &str, reasoning: String) -> AgentVote {
        let mut vote = AgentVote::new(name, reasoning, self.placeholder_confidence);
        vote.placeholder = true;
        vote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct OkAgent;

    #[async_trait]
    impl ReasoningAgent for OkAgent {
        fn name(&self) -> &str {
            "statute-analyst"
        }

        async fn run(&self, _query: &str, _packs: &[Pack]) -> anyhow::Result<AgentVote> {
            Ok(AgentVote::new("whatever-i-call-myself", "The claim is barred.", 0.8)
                .decision("dismiss"))
        }
    }

    struct FailingAgent;

    #[async_trait]
    impl ReasoningAgent for FailingAgent {
        fn name(&self) -> &str {
            "precedent-analyst"
        }

        async fn run(&self, _query: &str, _packs: &[Pack]) -> anyhow::Result<AgentVote> {
            anyhow::bail!("model endpoint unavailable")
        }
    }

    struct SlowAgent;

    #[async_trait]
    impl ReasoningAgent for SlowAgent {
        fn name(&self) -> &str {
            "procedure-analyst"
        }

        async fn run(&self, _query: &str, _packs: &[Pack]) -> anyhow::Result<AgentVote> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(AgentVote::new("procedure-analyst", "too late", 0.9))
        }
    }

    fn council() -> AgentCouncil {
        AgentCouncil::new(
            vec![Arc::new(OkAgent), Arc::new(FailingAgent), Arc::new(SlowAgent)],
            &AggregatorConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn every_agent_is_represented_exactly_once() {
        let votes = council().run_round("is the suit barred?", &[]).await;

        assert_eq!(votes.len(), 3);
        assert!(votes.contains_key("statute-analyst"));
        assert!(votes.contains_key("precedent-analyst"));
        assert!(votes.contains_key("procedure-analyst"));
    }

    #[tokio::test(start_paused = true)]
    async fn failures_become_placeholder_votes() {
        let votes = council().run_round("is the suit barred?", &[]).await;

        let failed = &votes["precedent-analyst"];
        assert!(failed.placeholder);
        assert!((failed.confidence - 0.1).abs() < 1e-6);
        assert!(failed.reasoning.contains("model endpoint unavailable"));

        let timed_out = &votes["procedure-analyst"];
        assert!(timed_out.placeholder);
        assert_eq!(timed_out.reasoning, "agent timed out");
    }

    #[tokio::test(start_paused = true)]
    async fn successful_votes_carry_the_registered_name() {
        let votes = council().run_round("is the suit barred?", &[]).await;

        let ok = &votes["statute-analyst"];
        assert!(!ok.placeholder);
        assert_eq!(ok.agent_name, "statute-analyst");
        assert_eq!(ok.reasoning, "The claim is barred.");
    }
}
