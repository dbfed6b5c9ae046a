//! Live RPC endpoint selection with a sticky per-chain preference.
//!
//! Each network carries an ordered list of candidate RPC URLs. The selector
//! probes them with a cheap `eth_blockNumber` call and remembers the last
//! endpoint that answered, so subsequent resolutions try the known-good URL
//! first before falling back to the configured order.

use std::sync::Arc;

use dashmap::DashMap;
use swapdesk_adapters::RpcClient;
use swapdesk_types::models::EndpointError;
use tracing::debug;

/// Resolves a live RPC endpoint for a chain, preferring whichever URL
/// most recently passed a liveness probe.
pub struct EndpointSelector {
	rpc: Arc<dyn RpcClient>,
	preferred: DashMap<u64, String>,
}

impl EndpointSelector {
	pub fn new(rpc: Arc<dyn RpcClient>) -> Self {
		Self {
			rpc,
			preferred: DashMap::new(),
		}
	}

	/// Candidate URLs in probe order: the sticky preference first (when it is
	/// still one of the configured candidates), then the configured order with
	/// the preference deduplicated out.
	pub fn ordered_candidates(&self, chain_id: u64, candidates: &[String]) -> Vec<String> {
		let preferred = self
			.preferred
			.get(&chain_id)
			.map(|entry| entry.value().clone())
			.filter(|url| candidates.iter().any(|candidate| candidate == url));

		let mut ordered = Vec::with_capacity(candidates.len());
		if let Some(url) = preferred {
			ordered.push(url);
		}
		for candidate in candidates {
			if !ordered.contains(candidate) {
				ordered.push(candidate.clone());
			}
		}
		ordered
	}

	/// Probes candidates in order and returns the first URL that answers a
	/// block-number request. The winner becomes the sticky preference for the
	/// chain. Stops at the first success, so a healthy preferred endpoint
	/// costs exactly one probe.
	pub async fn resolve(&self, chain_id: u64, candidates: &[String]) -> Result<String, EndpointError> {
		if candidates.is_empty() {
			return Err(EndpointError::NoneConfigured { chain_id });
		}

		for url in self.ordered_candidates(chain_id, candidates) {
			match self.rpc.block_number(&url).await {
				Ok(block) => {
					debug!(chain_id, endpoint = %url, block, "endpoint probe succeeded");
					self.preferred.insert(chain_id, url.clone());
					return Ok(url);
				}
				Err(e) => {
					debug!(chain_id, endpoint = %url, error = %e, "endpoint probe failed");
				}
			}
		}

		Err(EndpointError::Exhausted { chain_id })
	}

	/// The currently remembered endpoint for a chain, if any.
	pub fn preferred(&self, chain_id: u64) -> Option<String> {
		self.preferred.get(&chain_id).map(|entry| entry.value().clone())
	}
}
