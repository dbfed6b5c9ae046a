//! File-backed cache store
//!
//! One JSON file per key under a cache directory, so catalog data and
//! imported tokens survive process restarts. Unreadable files are a
//! cache miss; only write-side faults surface as errors.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::traits::{CacheStore, StorageError, StorageResult};

#[derive(Debug, Clone)]
pub struct FileStore {
	directory: PathBuf,
}

impl FileStore {
	pub fn new(directory: impl Into<PathBuf>) -> Self {
		Self {
			directory: directory.into(),
		}
	}

	/// Map a cache key onto a file name, keeping dots and dashes and
	/// replacing anything else that would be path-hostile
	fn path_for(&self, key: &str) -> PathBuf {
		let sanitized: String = key
			.chars()
			.map(|c| {
				if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
					c
				} else {
					'_'
				}
			})
			.collect();
		self.directory.join(format!("{}.json", sanitized))
	}

	async fn ensure_directory(&self) -> StorageResult<()> {
		fs::create_dir_all(&self.directory)
			.await
			.map_err(|err| StorageError::Backend(err.to_string()))
	}
}

#[async_trait]
impl CacheStore for FileStore {
	async fn read_raw(&self, key: &str) -> StorageResult<Option<String>> {
		let path = self.path_for(key);
		match fs::read_to_string(&path).await {
			Ok(payload) => Ok(Some(payload)),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
			Err(err) => {
				debug!("cache file {} unreadable: {}", path.display(), err);
				Ok(None)
			},
		}
	}

	async fn write_raw(&self, key: &str, payload: String) -> StorageResult<()> {
		self.ensure_directory().await?;
		let path = self.path_for(key);
		fs::write(&path, payload)
			.await
			.map_err(|err| StorageError::Backend(err.to_string()))
	}

	async fn remove(&self, key: &str) -> StorageResult<()> {
		let path = self.path_for(key);
		match fs::remove_file(&path).await {
			Ok(()) => Ok(()),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(err) => Err(StorageError::Backend(err.to_string())),
		}
	}
}

impl AsRef<Path> for FileStore {
	fn as_ref(&self) -> &Path {
		&self.directory
	}
}
