//! Cache storage trait and TTL envelope

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
	#[error("storage backend error: {0}")]
	Backend(String),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Raw key/value store for cache payloads
///
/// Implementations must make `read_raw` return `Ok(None)` for unknown
/// keys and unreadable entries; only genuine backend faults (e.g., an
/// unwritable directory) surface as errors.
#[async_trait]
pub trait CacheStore: Send + Sync {
	async fn read_raw(&self, key: &str) -> StorageResult<Option<String>>;
	async fn write_raw(&self, key: &str, payload: String) -> StorageResult<()>;
	async fn remove(&self, key: &str) -> StorageResult<()>;
}

/// A cached value with its write timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
	pub data: T,
	pub updated_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
	pub fn new(data: T) -> Self {
		Self {
			data,
			updated_at: Utc::now(),
		}
	}

	/// Valid iff `now - updated_at <= ttl`
	pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
		now.signed_duration_since(self.updated_at) <= ttl
	}
}

/// Read a typed entry, treating missing, corrupt, and expired payloads
/// uniformly as absent
pub async fn read_fresh<T: DeserializeOwned>(
	store: &dyn CacheStore,
	key: &str,
	ttl: Duration,
) -> Option<T> {
	let raw = match store.read_raw(key).await {
		Ok(Some(raw)) => raw,
		Ok(None) => return None,
		Err(err) => {
			debug!("cache read failed for {}: {}", key, err);
			return None;
		},
	};

	let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
		Ok(entry) => entry,
		Err(err) => {
			debug!("discarding corrupt cache entry {}: {}", key, err);
			return None;
		},
	};

	if !entry.is_fresh(ttl, Utc::now()) {
		return None;
	}
	Some(entry.data)
}

/// Write a typed entry stamped with the current time
pub async fn write_now<T: Serialize>(
	store: &dyn CacheStore,
	key: &str,
	data: &T,
) -> StorageResult<()> {
	let entry = CacheEntry {
		data,
		updated_at: Utc::now(),
	};
	let payload = serde_json::to_string(&entry)?;
	store.write_raw(key, payload).await
}
