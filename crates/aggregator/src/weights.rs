use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Process-wide evolving trust state: one weight per agent, summing to 1.
/// Explicitly injected into the aggregator rather than hidden module state;
/// the caller persists snapshots and reloads them on deployment restart.
///
/// The mutex guards only the in-memory read-modify-write of the map. No lock
/// is ever held across a network or model call.
#[derive(Clone, Default)]
pub struct WeightState {
    inner: Arc<Mutex<HashMap<String, f64>>>,
}

impl WeightState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the state with a persisted snapshot
    pub async fn load(&self, snapshot: BTreeMap<String, f64>) {
        let mut weights = self.inner.lock().await;
        *weights = snapshot.into_iter().collect();
    }

    /// Current weights, deterministically ordered for persistence
    pub async fn snapshot(&self) -> BTreeMap<String, f64> {
        self.inner
            .lock()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    /// Run one read-modify-write round inside the critical section. `round`
    /// receives the map with every named agent present (missing agents are
    /// initialized first) and may mutate it; the (before, after) snapshots
    /// and the closure's output are returned together.
    pub(crate) async fn update_round<F, T>(
        &self,
        agent_names: &[&str],
        round: F,
    ) -> (BTreeMap<String, f64>, BTreeMap<String, f64>, T)
    where
        F: FnOnce(&mut HashMap<String, f64>) -> T,
    {
        let mut weights = self.inner.lock().await;
        ensure_agents(&mut weights, agent_names);

        let before: BTreeMap<String, f64> =
            weights.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let output = round(&mut weights);
        let after: BTreeMap<String, f64> =
            weights.iter().map(|(k, v)| (k.clone(), *v)).collect();

        (before, after, output)
    }
}

/// Initialize missing agents. A fresh deployment gets equal weights summing
/// to 1; an agent added later joins at the mean of existing weights, after
/// which the whole map is renormalized back to unit mass.
fn ensure_agents(weights: &mut HashMap<String, f64>, agent_names: &[&str]) {
    if agent_names.is_empty() {
        return;
    }

    if weights.is_empty() {
        let equal = 1.0 / agent_names.len() as f64;
        for name in agent_names {
            weights.insert((*name).to_string(), equal);
        }
        return;
    }

    let mean = weights.values().sum::<f64>() / weights.len() as f64;
    let mut added = false;
    for name in agent_names {
        if !weights.contains_key(*name) {
            weights.insert((*name).to_string(), mean);
            added = true;
        }
    }

    if added {
        let total: f64 = weights.values().sum();
        if total > 0.0 {
            for value in weights.values_mut() {
                *value /= total;
            }
        }
    }
}
