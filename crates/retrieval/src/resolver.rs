use crate::error::Result;
use async_trait::async_trait;
use matter_protocol::AuthorityMeta;
use std::collections::HashMap;

/// Resolves an authority id to its full metadata record at packing time.
/// Backed by the matter store in production; by a map in tests.
#[async_trait]
pub trait AuthorityResolver: Send + Sync {
    async fn resolve(&self, authority_id: &str) -> Result<Option<AuthorityMeta>>;
}

/// Map-backed resolver
#[derive(Default)]
pub struct StaticAuthorityResolver {
    records: HashMap<String, AuthorityMeta>,
}

impl StaticAuthorityResolver {
    #[must_use]
    pub fn new(authorities: impl IntoIterator<Item = AuthorityMeta>) -> Self {
        Self {
            records: authorities.into_iter().map(|a| (a.id.clone(), a)).collect(),
        }
    }
}

#[async_trait]
impl AuthorityResolver for StaticAuthorityResolver {
    async fn resolve(&self, authority_id: &str) -> Result<Option<AuthorityMeta>> {
        Ok(self.records.get(authority_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_known_ids_only() {
        let resolver = StaticAuthorityResolver::new(vec![AuthorityMeta {
            id: "auth-1".to_string(),
            title: "Sharma v. State".to_string(),
            ..Default::default()
        }]);

        assert!(resolver.resolve("auth-1").await.unwrap().is_some());
        assert!(resolver.resolve("auth-9").await.unwrap().is_none());
    }
}
