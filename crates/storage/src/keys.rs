//! Cache key naming
//!
//! Keys are versioned so a payload-shape change invalidates old entries
//! instead of tripping over them.

/// Merged remote network list
pub const NETWORKS_KEY: &str = "swapdesk.networks.v1";

/// Remote token list for one chain
pub fn tokens_key(chain_id: u64) -> String {
	format!("swapdesk.token.metadata.v1.{}", chain_id)
}

/// User-imported tokens for one chain
pub fn imported_tokens_key(chain_id: u64) -> String {
	format!("swapdesk.imported.tokens.v1.{}", chain_id)
}
