//! Identity gate and page state for the LockedView character directory.
//!
//! - [`domain`]: the identity record, the store port and the services that
//!   decide whether protected content may be shown.
//! - [`outbound`]: in-memory and file-backed store adapters.
//! - [`config`]: settings loaded from the environment.
//! - [`cli`]: the command-line front end used by the `lockedview` binary.
//!
//! Page query state and pagination math live in the `pagination` crate.

pub mod cli;
pub mod config;
pub mod domain;
pub mod outbound;
