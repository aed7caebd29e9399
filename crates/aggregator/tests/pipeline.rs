//! The full query lifecycle: paragraphs are segmented and indexed, a query
//! is retrieved into packs, a council of agents votes over the packs, the
//! votes are aggregated, and the cited evidence is committed to a Merkle
//! root.

use async_trait::async_trait;
use matter_aggregator::{AgentCouncil, Aggregator, AggregatorConfig, ReasoningAgent, WeightState};
use matter_commitment::build_commitment;
use matter_protocol::{AgentVote, AuthorityMeta, Pack, Paragraph};
use matter_retrieval::{
    Embedder, LexicalOverlapReranker, Result as RetrievalResult, RetrievalConfig,
    RetrievalOrchestrator, StaticAuthorityResolver, VectorMemorySource,
};
use matter_segmenter::{Segmenter, SegmenterConfig};
use std::sync::Arc;

struct TopicEmbedder;

#[async_trait]
impl Embedder for TopicEmbedder {
    async fn embed(&self, text: &str) -> RetrievalResult<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(vec![
            lower.matches("possession").count() as f32,
            lower.matches("limitation").count() as f32,
        ])
    }

    fn dimension(&self) -> usize {
        2
    }
}

/// Agent that answers from whatever pack ranks first
struct PackReader {
    name: String,
    decision: String,
    confidence: f32,
}

#[async_trait]
impl ReasoningAgent for PackReader {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, _query: &str, packs: &[Pack]) -> anyhow::Result<AgentVote> {
        let top = packs.first().ok_or_else(|| anyhow::anyhow!("no packs"))?;
        let para_ids: Vec<u32> = top.paragraphs.iter().map(|p| p.para_id).collect();
        Ok(
            AgentVote::new(&self.name, format!("Relying on {}.", top.title), self.confidence)
                .decision(&self.decision)
                .source(top.authority_id.clone(), para_ids),
        )
    }
}

struct BrokenAgent;

#[async_trait]
impl ReasoningAgent for BrokenAgent {
    fn name(&self) -> &str {
        "broken-analyst"
    }

    async fn run(&self, _query: &str, _packs: &[Pack]) -> anyhow::Result<AgentVote> {
        anyhow::bail!("model endpoint unavailable")
    }
}

fn paragraphs() -> Vec<Paragraph> {
    (1..=3)
        .map(|id| {
            Paragraph::new(
                id,
                format!(
                    "Possession remained open and continuous throughout. {}",
                    "The plea of adverse possession was examined in detail. ".repeat(6)
                ),
            )
        })
        .collect()
}

#[tokio::test]
async fn query_flows_from_chunks_to_commitment() {
    // Segment and index one authority.
    let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
    let authority = AuthorityMeta {
        id: "auth-a".to_string(),
        title: "Nair v. Kumar".to_string(),
        court: Some("SC".to_string()),
        year: Some(2019),
        ..Default::default()
    };

    let paras = paragraphs();
    let chunks = segmenter.segment("auth-a", &paras).unwrap();
    let mut vector = VectorMemorySource::new(Arc::new(TopicEmbedder));
    for chunk in chunks {
        vector.index_chunk(chunk, authority.clone()).await.unwrap();
    }

    let orchestrator = RetrievalOrchestrator::new(
        vec![Arc::new(vector)],
        Arc::new(LexicalOverlapReranker::default()),
        Arc::new(StaticAuthorityResolver::new(vec![authority])),
        RetrievalConfig::default(),
    );

    // Retrieve packs for the question.
    let packs = orchestrator
        .retrieve("was possession adverse and continuous", 3, None)
        .await
        .unwrap();
    assert!(!packs.is_empty());

    // Council round: two working agents agree, one is down.
    let config = AggregatorConfig::default();
    let council = AgentCouncil::new(
        vec![
            Arc::new(PackReader {
                name: "statute-analyst".to_string(),
                decision: "allow".to_string(),
                confidence: 0.85,
            }),
            Arc::new(PackReader {
                name: "precedent-analyst".to_string(),
                decision: "allow".to_string(),
                confidence: 0.8,
            }),
            Arc::new(BrokenAgent),
        ],
        &config,
    );
    let votes = council.run_round("was possession adverse and continuous", &packs).await;
    assert_eq!(votes.len(), 3);
    assert!(votes["broken-analyst"].placeholder);

    // Aggregate: the two aligned agents win, mass is conserved.
    let aggregator = Aggregator::new(config, WeightState::new());
    let result = aggregator
        .aggregate(&votes, "was possession adverse and continuous")
        .await;

    assert!(result.aligned.contains("statute-analyst"));
    assert!(result.aligned.contains("precedent-analyst"));
    assert!(result.confidence > 0.5);
    let before: f64 = result.weights_before.values().sum();
    let after: f64 = result.weights_after.values().sum();
    assert!((before - after).abs() < 1e-9);

    // Commit the paragraphs actually cited by the winning votes.
    let cited: Vec<&str> = result
        .aligned
        .iter()
        .filter_map(|name| votes.get(name))
        .flat_map(|vote| vote.sources.iter())
        .flat_map(|source| source.para_ids.iter())
        .filter_map(|para_id| paras.iter().find(|p| p.id == *para_id))
        .map(|p| p.text.as_str())
        .collect();

    let commitment = build_commitment(&cited);
    assert!(!commitment.is_empty());

    // The commitment is reproducible from the same evidence.
    let again = build_commitment(&cited);
    assert_eq!(commitment.root, again.root);
}
