//! Lazily loaded, network-backed values.

use crate::error::Result;
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use tokio::sync::OnceCell;

/// Observable state of a [`CachedResource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loaded,
    /// The last attempt failed; the next access loads again.
    Failed(String),
}

/// A value loaded on first access and kept after the first success.
///
/// Failures are never cached: each access after a failed load runs the
/// loader again. Nothing is retried automatically.
pub struct CachedResource<T> {
    value: OnceCell<T>,
    last_error: Mutex<Option<String>>,
}

impl<T> CachedResource<T> {
    pub fn new() -> Self {
        Self {
            value: OnceCell::new(),
            last_error: Mutex::new(None),
        }
    }

    /// The loaded value, if a load has succeeded.
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    pub fn state(&self) -> LoadState {
        if self.value.initialized() {
            return LoadState::Loaded;
        }
        match self.last_error.lock().as_ref() {
            Some(message) => LoadState::Failed(message.clone()),
            None => LoadState::NotLoaded,
        }
    }

    /// Return the cached value, running `loader` if nothing is cached yet.
    ///
    /// Concurrent callers wait for a single in-flight load.
    pub async fn get_or_load<F, Fut>(&self, loader: F) -> Result<&T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let result = self.value.get_or_try_init(loader).await;
        match &result {
            Ok(_) => *self.last_error.lock() = None,
            Err(e) => {
                log::warn!("lazy load failed, will retry on next access: {}", e);
                *self.last_error.lock() = Some(e.to_string());
            }
        }
        result
    }
}

impl<T> Default for CachedResource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CachedResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedResource")
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrcidError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_loads_once_after_success() {
        let resource = CachedResource::new();
        let calls = AtomicUsize::new(0);
        assert_eq!(resource.state(), LoadState::NotLoaded);

        for _ in 0..3 {
            let value = resource
                .get_or_load(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec!["work".to_string()])
                })
                .await
                .unwrap();
            assert_eq!(value, &["work"]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(resource.state(), LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_failure_is_retryable() {
        let resource: CachedResource<u32> = CachedResource::new();
        let calls = AtomicUsize::new(0);

        let first = resource
            .get_or_load(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(OrcidError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                })
            })
            .await;
        assert!(first.is_err());
        assert!(resource.get().is_none());
        assert!(matches!(resource.state(), LoadState::Failed(m) if m.contains("503")));

        let second = resource
            .get_or_load(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await
            .unwrap();
        assert_eq!(*second, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(resource.state(), LoadState::Loaded);
    }
}
