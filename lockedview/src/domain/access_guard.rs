//! Access guard deciding whether protected content may be shown.
//!
//! The guard owns the [`IdentityState`] seen by one consumer. Until the first
//! load completes it reports [`AccessDecision::Pending`]; afterwards it either
//! prompts for an identity or grants access with the stored record. Nothing
//! dismisses the prompt except a successful submission.

use tracing::debug;

use crate::domain::ports::KeyValueStore;
use crate::domain::{
    IdentityCandidate, IdentityGate, IdentityGateError, IdentityRecord, IdentityState,
};

/// What the guarded view should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision<'a> {
    /// The identity has not been loaded yet; render neither prompt nor content.
    Pending,
    /// No identity is stored; render the blocking prompt.
    Prompt,
    /// An identity is stored; render the protected content.
    Granted(&'a IdentityRecord),
}

/// Gatekeeper for one consumer of protected content.
#[derive(Debug)]
pub struct AccessGuard<S> {
    gate: IdentityGate<S>,
    state: IdentityState,
}

impl<S> AccessGuard<S> {
    /// Guard in the [`IdentityState::Unknown`] state.
    pub fn new(gate: IdentityGate<S>) -> Self {
        Self {
            gate,
            state: IdentityState::Unknown,
        }
    }

    /// Current identity state.
    pub fn state(&self) -> &IdentityState {
        &self.state
    }

    /// Stored record, when present.
    pub fn record(&self) -> Option<&IdentityRecord> {
        self.state.record()
    }

    /// What the guarded view should render right now.
    pub fn decision(&self) -> AccessDecision<'_> {
        match &self.state {
            IdentityState::Unknown => AccessDecision::Pending,
            IdentityState::Absent => AccessDecision::Prompt,
            IdentityState::Present(record) => AccessDecision::Granted(record),
        }
    }
}

impl<S> AccessGuard<S>
where
    S: KeyValueStore,
{
    /// Perform the initial load. Later calls return the cached decision
    /// without touching the store.
    pub async fn resolve(&mut self) -> AccessDecision<'_> {
        if !self.state.is_resolved() {
            self.state = IdentityState::from(self.gate.load().await);
            debug!(present = self.state.record().is_some(), "identity resolved");
        }
        self.decision()
    }

    /// Submit the prompt. On success the state becomes `Present`.
    ///
    /// # Errors
    ///
    /// Propagates [`IdentityGateError`]; the state is unchanged on error.
    pub async fn submit(
        &mut self,
        candidate: IdentityCandidate,
    ) -> Result<IdentityRecord, IdentityGateError> {
        let record = self.gate.save(candidate).await?;
        self.state = IdentityState::Present(record.clone());
        Ok(record)
    }

    /// Clear the stored identity and return to the prompt.
    ///
    /// # Errors
    ///
    /// Propagates [`IdentityGateError::Store`]; the state is unchanged on
    /// error.
    pub async fn sign_out(&mut self) -> Result<(), IdentityGateError> {
        self.gate.clear().await?;
        self.state = IdentityState::Absent;
        Ok(())
    }
}
