//! Domain primitives, ports and services.
//!
//! Purpose: Define the identity record that gates the character directory,
//! the store port it is persisted through, and the services deciding whether
//! protected content may be shown.
//!
//! Public surface:
//! - IdentityRecord (alias to `identity::IdentityRecord`): validated
//!   `{username, jobTitle}` pair.
//! - IdentityState (alias to `identity::IdentityState`): load state seen by
//!   a consumer.
//! - IdentityGate (alias to `identity_gate::IdentityGate`): load, save and
//!   clear over a [`ports::KeyValueStore`].
//! - AccessGuard (alias to `access_guard::AccessGuard`): cached state and
//!   render decision for one consumer.

pub mod access_guard;
pub mod identity;
pub mod identity_gate;
pub mod ports;

pub use self::access_guard::{AccessDecision, AccessGuard};
pub use self::identity::{
    IdentityCandidate, IdentityField, IdentityRecord, IdentityState, IdentityValidationError,
    JobTitle, Username,
};
pub use self::identity_gate::{IDENTITY_STORAGE_KEY, IdentityGate, IdentityGateError};
