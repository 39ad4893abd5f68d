//! Port for the durable key-value store backing the identity gate.
//!
//! The store mirrors the browser `localStorage` contract: string keys map to
//! string values, and values outlive the process. Adapters live under
//! `outbound::store`.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by key-value store adapters.
    pub enum KeyValueStoreError {
        /// The backing medium could not be read or written.
        Backend { message: String } => "key-value store backend failure: {message}",
        /// The persisted document could not be encoded or decoded.
        Serialization { message: String } =>
            "key-value store serialisation failed: {message}",
    }
}

/// Durable string-to-string store.
///
/// Implementations must make a completed `set` or `remove` visible to every
/// later `get`, including from a new process when the medium is durable.
/// Concurrent writers are not coordinated; the last write wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    /// Delete `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;
}
