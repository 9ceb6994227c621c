//! Test doubles for the persistence layer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{KeyValueStore, MemoryStore, WriteBatch};
use crate::error::{Error, Result};

/// Memory store that counts write calls.
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    writes: Arc<AtomicUsize>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set`, `remove` and `apply` calls observed
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

impl KeyValueStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.record();
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.record();
        self.inner.remove(key).await
    }

    async fn apply(&self, batch: WriteBatch) -> Result<()> {
        self.record();
        self.inner.apply(batch).await
    }
}

/// Backend whose every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::Storage("backend unavailable".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Storage("backend unavailable".into()))
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Err(Error::Storage("backend unavailable".into()))
    }

    async fn apply(&self, _batch: WriteBatch) -> Result<()> {
        Err(Error::Storage("backend unavailable".into()))
    }
}
