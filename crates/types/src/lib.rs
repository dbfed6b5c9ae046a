//! Swapdesk Types
//!
//! Shared models and error taxonomy for the swap-workspace data
//! orchestration core. This crate contains all domain models organized
//! by business entity.

pub mod models;
pub mod quotes;
pub mod risk;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

pub use models::{
	dedupe_tokens, format_balance, format_from_smallest, is_hex_address, to_smallest_unit,
	AddressParseError, EndpointError, Network, NetworkScope, Token, TokenAddress, TokenImportError,
	ZERO_BALANCE,
};

pub use quotes::{
	QuoteResult, QuoteRouteStep, QuoteSide, SwapQuoteError, SwapQuoteRequest, SwapQuoteResponse,
	FALLBACK_SWAPPER_ADDRESS,
};

pub use risk::{RiskAlertLevel, RiskDecision, TokenRiskBadge, TokenRiskResponse};
