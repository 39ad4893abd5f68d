//! Identity gate service.
//!
//! The gate is the single source of truth for whether a local identity
//! exists. It reads and writes one key in an injected [`KeyValueStore`];
//! `save` and `clear` are the only operations that mutate the store.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};
use crate::domain::{IdentityCandidate, IdentityRecord, IdentityValidationError};

/// Store key the identity record is kept under unless configured otherwise.
pub const IDENTITY_STORAGE_KEY: &str = "lockedview_userinfo";

/// Errors returned by [`IdentityGate::save`] and [`IdentityGate::clear`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityGateError {
    /// The submission was rejected; nothing was written.
    #[error(transparent)]
    Validation(#[from] IdentityValidationError),
    /// The store refused the write.
    #[error("identity store unavailable: {0}")]
    Store(#[from] KeyValueStoreError),
}

/// Loads, saves and clears the local identity record.
#[derive(Debug)]
pub struct IdentityGate<S> {
    store: Arc<S>,
    key: String,
}

impl<S> Clone for IdentityGate<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
        }
    }
}

impl<S> IdentityGate<S> {
    /// Gate over `store` using [`IDENTITY_STORAGE_KEY`].
    pub fn new(store: Arc<S>) -> Self {
        Self::with_key(store, IDENTITY_STORAGE_KEY)
    }

    /// Gate over `store` using a custom key.
    pub fn with_key(store: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Key the record is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<S> IdentityGate<S>
where
    S: KeyValueStore,
{
    /// Read the stored record.
    ///
    /// Returns `None` when the key is absent, when the stored value is not a
    /// well-formed record, or when the store cannot be read. None of these
    /// are reported as errors.
    pub async fn load(&self) -> Option<IdentityRecord> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no identity recorded");
                return None;
            }
            Err(error) => {
                warn!(key = %self.key, %error, "identity store read failed; treating as absent");
                return None;
            }
        };

        match serde_json::from_str::<IdentityRecord>(&raw) {
            Ok(record) => Some(record),
            Err(error) => {
                debug!(key = %self.key, %error, "ignoring malformed identity record");
                None
            }
        }
    }

    /// Validate and persist a submission, overwriting any previous record.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityGateError::Validation`] when either field is blank
    /// after trimming; the store is not touched. Returns
    /// [`IdentityGateError::Store`] when the write fails.
    pub async fn save(
        &self,
        candidate: IdentityCandidate,
    ) -> Result<IdentityRecord, IdentityGateError> {
        let record = IdentityRecord::try_from(candidate)?;
        let payload = serde_json::to_string(&record)
            .map_err(|err| KeyValueStoreError::serialization(err.to_string()))?;

        self.store.set(&self.key, &payload).await?;
        info!(key = %self.key, username = %record.username(), "identity recorded");
        Ok(record)
    }

    /// Remove the stored record. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityGateError::Store`] when the removal fails.
    pub async fn clear(&self) -> Result<(), IdentityGateError> {
        self.store.remove(&self.key).await?;
        info!(key = %self.key, "identity cleared");
        Ok(())
    }
}
