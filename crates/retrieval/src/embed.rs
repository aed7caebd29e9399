use crate::error::Result;
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Query/document embedding, provided by an external model service.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embedding dimension, fixed per embedder
    fn dimension(&self) -> usize;
}

/// LRU cache in front of an [`Embedder`], keyed by exact text. Queries
/// repeat often (retries, multi-agent rounds over the same question), so the
/// cache saves a model round-trip per repeat.
pub struct CachedEmbedder<E> {
    inner: E,
    cache: Mutex<LruCache<String, Arc<Vec<f32>>>>,
}

impl<E: Embedder> CachedEmbedder<E> {
    #[must_use]
    pub fn new(inner: E, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity is at least 1");
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }
}

#[async_trait]
impl<E: Embedder> Embedder for CachedEmbedder<E> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(hit) = self
            .cache
            .lock()
            .expect("embedding cache lock poisoned")
            .get(text)
        {
            return Ok(hit.as_ref().clone());
        }

        // The lock is never held across the model call.
        let vector = self.inner.embed(text).await?;
        self.cache
            .lock()
            .expect("embedding cache lock poisoned")
            .put(text.to_string(), Arc::new(vector.clone()));
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}
