//! Key-value store adapters.

mod atomic_io;
mod file;
mod memory;

pub use file::{FileKeyValueStore, STORE_FILE_NAME};
pub use memory::InMemoryKeyValueStore;
