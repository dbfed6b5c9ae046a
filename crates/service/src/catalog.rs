//! Network and token catalog resolution.
//!
//! The configured allow-list is the source of truth for which chains exist;
//! the remote catalog can only enrich those entries with fresher metadata and
//! extra RPC endpoints. Token lists prefer the remote catalog, fall back to
//! the curated configuration set when the remote list is empty or
//! unavailable, and always carry locally imported tokens on top.

use std::sync::Arc;

use chrono::Duration;
use swapdesk_adapters::{CatalogClient, RemoteNetwork};
use swapdesk_storage::{
	imported_tokens_key, read_fresh, tokens_key, write_now, CacheStore, StorageResult,
	NETWORKS_KEY,
};
use swapdesk_types::models::{dedupe_tokens, Network, Token};
use tracing::{debug, warn};

/// TTL for imported tokens. They persist until explicitly removed, so the
/// envelope timestamp is effectively ignored.
const IMPORTED_TTL_DAYS: i64 = 36_500;

pub struct CatalogService {
	client: Arc<dyn CatalogClient>,
	store: Arc<dyn CacheStore>,
	allow_list: Vec<Network>,
	curated: Vec<Token>,
	ttl: Duration,
}

impl CatalogService {
	pub fn new(
		client: Arc<dyn CatalogClient>,
		store: Arc<dyn CacheStore>,
		allow_list: Vec<Network>,
		curated: Vec<Token>,
		ttl: Duration,
	) -> Self {
		Self {
			client,
			store,
			allow_list,
			curated,
			ttl,
		}
	}

	/// The configured allow-list, untouched by remote data.
	pub fn allow_list(&self) -> &[Network] {
		&self.allow_list
	}

	pub fn network(&self, chain_id: u64) -> Option<&Network> {
		self.allow_list.iter().find(|n| n.chain_id == chain_id)
	}

	fn is_allowed(&self, chain_id: u64) -> bool {
		self.network(chain_id).is_some()
	}

	/// Resolves the network list: cached merge when fresh, otherwise a remote
	/// fetch merged over the allow-list. Every failure mode degrades to the
	/// configured allow-list, never to an empty list.
	pub async fn list_networks(&self) -> Vec<Network> {
		if let Some(cached) = read_fresh::<Vec<Network>>(self.store.as_ref(), NETWORKS_KEY, self.ttl).await {
			// A cached merge from an older allow-list must not resurrect
			// chains that are no longer configured.
			let filtered: Vec<Network> = cached
				.into_iter()
				.filter(|n| self.is_allowed(n.chain_id))
				.collect();
			if !filtered.is_empty() {
				return filtered;
			}
		}

		match self.client.fetch_networks().await {
			Ok(remote) => {
				let merged = merge_networks(&self.allow_list, &remote);
				if let Err(err) = write_now(self.store.as_ref(), NETWORKS_KEY, &merged).await {
					debug!(error = %err, "failed to cache merged network list");
				}
				merged
			}
			Err(err) => {
				warn!(error = %err, "network catalog unavailable, serving configured allow-list");
				self.allow_list.clone()
			}
		}
	}

	/// The token list for one chain: remote (cached) when non-empty, curated
	/// fallback otherwise, with imported tokens appended last so a colliding
	/// import overrides catalog metadata.
	pub async fn tokens_for_chain(&self, chain_id: u64) -> Vec<Token> {
		if !self.is_allowed(chain_id) {
			return Vec::new();
		}

		let base = match self.remote_tokens(chain_id).await {
			Some(tokens) if !tokens.is_empty() => tokens,
			_ => self.curated_for_chain(chain_id),
		};

		let imported = self.imported_tokens(chain_id).await;
		let mut combined = base;
		combined.extend(imported);
		dedupe_tokens(combined)
	}

	async fn remote_tokens(&self, chain_id: u64) -> Option<Vec<Token>> {
		let key = tokens_key(chain_id);
		if let Some(cached) = read_fresh::<Vec<Token>>(self.store.as_ref(), &key, self.ttl).await {
			if !cached.is_empty() {
				return Some(cached);
			}
		}

		match self.client.fetch_tokens(chain_id).await {
			Ok(tokens) => {
				// Empty lists are not cached; a transient empty answer must
				// not mask the curated fallback for a full TTL window.
				if !tokens.is_empty() {
					if let Err(err) = write_now(self.store.as_ref(), &key, &tokens).await {
						debug!(chain_id, error = %err, "failed to cache token list");
					}
				}
				Some(tokens)
			}
			Err(err) => {
				warn!(chain_id, error = %err, "token catalog unavailable, using curated fallback");
				None
			}
		}
	}

	fn curated_for_chain(&self, chain_id: u64) -> Vec<Token> {
		self.curated
			.iter()
			.filter(|t| t.chain_id == chain_id)
			.cloned()
			.collect()
	}

	/// Locally imported tokens for a chain, oldest first.
	pub async fn imported_tokens(&self, chain_id: u64) -> Vec<Token> {
		read_fresh::<Vec<Token>>(
			self.store.as_ref(),
			&imported_tokens_key(chain_id),
			Duration::days(IMPORTED_TTL_DAYS),
		)
		.await
		.unwrap_or_default()
	}

	/// Persists an imported token. Re-importing the same contract replaces
	/// the stored metadata without growing the list.
	pub async fn register_imported(&self, token: Token) -> StorageResult<()> {
		let key = imported_tokens_key(token.chain_id);
		let mut imported = self.imported_tokens(token.chain_id).await;
		imported.push(token);
		let imported = dedupe_tokens(imported);
		write_now(self.store.as_ref(), &key, &imported).await
	}
}

/// Merges remote catalog entries over the configured allow-list.
///
/// The allow-list fixes the set of chain ids and their order; a matching
/// remote entry wins on metadata it actually provides and its endpoints are
/// prepended ahead of the configured ones.
pub fn merge_networks(allow_list: &[Network], remote: &[RemoteNetwork]) -> Vec<Network> {
	allow_list
		.iter()
		.map(|network| {
			let mut merged = network.clone();
			if let Some(entry) = remote.iter().find(|r| r.chain_id == network.chain_id) {
				if !entry.name.trim().is_empty() {
					merged.name = entry.name.clone();
				}
				if let Some(symbol) = entry.native_symbol.as_deref() {
					if !symbol.trim().is_empty() {
						merged.native_symbol = symbol.to_string();
					}
				}
				if let Some(explorer) = entry.explorer_url.as_deref() {
					if !explorer.trim().is_empty() {
						merged.explorer_url = explorer.to_string();
					}
				}
				if entry.chain_key.is_some() {
					merged.chain_key = entry.chain_key.clone();
				}
				if entry.icon.is_some() {
					merged.icon = entry.icon.clone();
				}

				let mut endpoints = entry.endpoints.clone();
				for url in &network.endpoints {
					if !endpoints.contains(url) {
						endpoints.push(url.clone());
					}
				}
				merged.endpoints = endpoints;
			}
			merged
		})
		.collect()
}
