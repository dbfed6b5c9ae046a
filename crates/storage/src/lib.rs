//! Swapdesk Storage
//!
//! Local durable cache used for network lists, token lists, and
//! previously imported custom tokens. Entries carry an update timestamp
//! and are evaluated against a per-kind TTL on read; corrupted payloads
//! are treated as a miss, never surfaced to callers.

pub mod file_store;
pub mod keys;
pub mod memory_store;
pub mod traits;

pub use file_store::FileStore;
pub use keys::{imported_tokens_key, tokens_key, NETWORKS_KEY};
pub use memory_store::MemoryStore;
pub use traits::{read_fresh, write_now, CacheEntry, CacheStore, StorageError, StorageResult};
