// In-memory translation cache using DashMap
use crate::domain::model::TranslationOutcome;
use crate::domain::traits::TranslationBackend;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Thread-safe map from query text to its successful translation
pub struct MemoryCache {
    map: DashMap<String, String>,
    capacity: usize,
}

impl MemoryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            map: DashMap::new(),
            capacity,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, key: String, value: String) {
        if self.capacity == 0 {
            return;
        }
        // 满了直接清空, 输入法式的查询很少回头
        if self.map.len() >= self.capacity && !self.map.contains_key(&key) {
            self.map.clear();
        }
        self.map.insert(key, value);
    }

    pub fn clear(&self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Backend decorator that memoises successful translations.
///
/// Cancelled and failed outcomes always go back to the inner backend next time.
pub struct CachedBackend {
    inner: Arc<dyn TranslationBackend>,
    cache: MemoryCache,
}

impl CachedBackend {
    pub fn new(inner: Arc<dyn TranslationBackend>, capacity: usize) -> Self {
        Self {
            inner,
            cache: MemoryCache::new(capacity),
        }
    }

    pub fn cache(&self) -> &MemoryCache {
        &self.cache
    }
}

#[async_trait]
impl TranslationBackend for CachedBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn translate(&self, text: &str, cancel: &CancellationToken) -> TranslationOutcome {
        let key = text.trim();
        if let Some(hit) = self.cache.get(key) {
            debug!(query = key, "translation cache hit");
            return TranslationOutcome::Success(hit);
        }

        let outcome = self.inner.translate(text, cancel).await;
        if let TranslationOutcome::Success(translation) = &outcome {
            self.cache.insert(key.to_string(), translation.clone());
        }
        outcome
    }

    fn release(&self) {
        self.cache.clear();
        self.inner.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::FailureReason;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        calls: AtomicUsize,
        outcome: TranslationOutcome,
        released: AtomicUsize,
    }

    #[async_trait]
    impl TranslationBackend for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn translate(&self, _text: &str, _cancel: &CancellationToken) -> TranslationOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }

        fn release(&self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn scripted(outcome: TranslationOutcome) -> Arc<Scripted> {
        Arc::new(Scripted {
            calls: AtomicUsize::new(0),
            outcome,
            released: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let inner = scripted(TranslationOutcome::Success("猫".to_string()));
        let cached = CachedBackend::new(inner.clone(), 8);
        let token = CancellationToken::new();

        assert_eq!(
            cached.translate("cat", &token).await,
            TranslationOutcome::Success("猫".to_string())
        );
        assert_eq!(
            cached.translate(" cat ", &token).await,
            TranslationOutcome::Success("猫".to_string())
        );
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_and_cancellations_are_not_cached() {
        for outcome in [
            TranslationOutcome::Cancelled,
            TranslationOutcome::Failure(FailureReason::NotFound),
        ] {
            let inner = scripted(outcome.clone());
            let cached = CachedBackend::new(inner.clone(), 8);
            let token = CancellationToken::new();
            assert_eq!(cached.translate("cat", &token).await, outcome);
            assert_eq!(cached.translate("cat", &token).await, outcome);
            assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
            assert!(cached.cache().is_empty());
        }
    }

    #[test]
    fn full_cache_starts_over() {
        let cache = MemoryCache::new(2);
        cache.insert("a".into(), "1".into());
        cache.insert("b".into(), "2".into());
        cache.insert("b".into(), "3".into());
        assert_eq!(cache.len(), 2);
        cache.insert("c".into(), "4".into());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("c").as_deref(), Some("4"));
    }

    #[test]
    fn release_reaches_inner_backend() {
        let inner = scripted(TranslationOutcome::Cancelled);
        let cached = CachedBackend::new(inner.clone(), 8);
        cached.cache.insert("x".into(), "y".into());
        cached.release();
        assert!(cached.cache().is_empty());
        assert_eq!(inner.released.load(Ordering::SeqCst), 1);
    }
}
