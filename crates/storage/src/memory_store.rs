//! In-memory cache store backed by DashMap
//!
//! Used in tests and as a session-only cache when no durable directory
//! is configured.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::traits::{CacheStore, StorageResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[async_trait]
impl CacheStore for MemoryStore {
	async fn read_raw(&self, key: &str) -> StorageResult<Option<String>> {
		Ok(self.entries.get(key).map(|entry| entry.value().clone()))
	}

	async fn write_raw(&self, key: &str, payload: String) -> StorageResult<()> {
		self.entries.insert(key.to_string(), payload);
		Ok(())
	}

	async fn remove(&self, key: &str) -> StorageResult<()> {
		self.entries.remove(key);
		Ok(())
	}
}
