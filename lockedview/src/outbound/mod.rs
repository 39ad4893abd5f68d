//! Outbound adapters implementing domain ports.
//!
//! - **store**: in-memory and file-backed implementations of
//!   [`crate::domain::ports::KeyValueStore`].
//!
//! Adapters translate between the port contract and the backing medium and
//! contain no identity logic.

pub mod store;
