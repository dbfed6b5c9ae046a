//! Swap quote request model

use serde::{Deserialize, Serialize};

use crate::models::TokenAddress;

/// Fallback swapper used when no wallet is connected, so quotes can be
/// previewed before authentication
pub const FALLBACK_SWAPPER_ADDRESS: &str = "0x000000000000000000000000000000000000dEaD";

/// A fully specified swap to be quoted
///
/// Immutable value; a new request supersedes any in-flight one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwapQuoteRequest {
	/// Input amount as an integer string in the input token's smallest unit
	pub amount: String,
	pub swapper: String,
	pub token_in: TokenAddress,
	pub token_in_chain_id: u64,
	pub token_out: TokenAddress,
	pub token_out_chain_id: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub slippage: Option<f64>,
}

impl SwapQuoteRequest {
	/// Resolve the swapper for a possibly missing or invalid wallet address
	pub fn resolve_swapper(wallet_address: Option<&str>) -> String {
		match wallet_address {
			Some(address) if crate::models::is_hex_address(address) => address.to_string(),
			_ => FALLBACK_SWAPPER_ADDRESS.to_string(),
		}
	}
}
