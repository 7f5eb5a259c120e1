//! captionbridge storage library
//!
//! Small durable key-value store used to persist caches between runs.
//!
//! # Key format
//!
//! Keys are flat identifiers (`[A-Za-z0-9._-]`). They must not contain `..`,
//! path separators or a leading `.`. Each backend maps a key to one value.

pub mod local;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use traits::{validate_key, KeyValueStore, StorageError, StorageResult};
