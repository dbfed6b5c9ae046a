//! Swap quote response model

use serde::{Deserialize, Serialize};

/// One hop of the proposed route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteRouteStep {
	pub id: String,
	pub step_type: String,
	pub tool: String,
	pub from_token: String,
	pub to_token: String,
	pub from_amount: String,
	pub to_amount: String,
	pub to_amount_min: String,
	pub approval_address: String,
}

/// One side of the quoted swap
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteSide {
	/// Integer string in the side's smallest unit
	pub amount: String,
	pub token: String,
	pub chain_id: u64,
}

/// A settled quote from the provider
///
/// Derived, never mutated; consumed once to update the displayed
/// receive amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwapQuoteResponse {
	pub swapper: String,
	pub input: QuoteSide,
	pub output: QuoteSide,
	pub recipient: String,
	pub route: Vec<QuoteRouteStep>,
	/// Human-readable route summary, e.g. "swap:uniswap -> cross:stargate"
	pub route_string: String,
	/// Applied slippage in percent, when the provider reports one
	pub slippage: Option<f64>,
	/// Price impact in percent, when both USD legs are known
	pub price_impact: Option<f64>,
	/// Summed gas fee in the source chain's smallest unit
	pub gas_fee: String,
	pub gas_fee_usd: Option<String>,
	pub gas_use_estimate: String,
	/// Opaque provider quote id
	pub quote_id: String,
}
