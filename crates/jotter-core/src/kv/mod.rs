//! Key-value store adapter.
//!
//! Every persisted value in Jotter is a string stored under a string key.
//! Backends implement [`KeyValueStore`]; the persistence layer in
//! [`crate::storage`] builds typed operations on top of it.

mod batch;
mod memory;
#[cfg(test)]
pub(crate) mod testing;

pub use batch::{WriteBatch, WriteOp};
pub use memory::MemoryStore;

use crate::error::Result;

/// Asynchronous string-keyed storage backend.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Apply every operation in `batch` or none of them.
    async fn apply(&self, batch: WriteBatch) -> Result<()>;
}
