//! Blockchain network models

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Deployment scope of a network
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NetworkScope {
	Production,
	Development,
}

/// Supported blockchain network
///
/// Immutable once resolved for a session. The allow-list of chain ids is
/// fixed in configuration; remote catalog data may enrich optional fields
/// but never adds or removes chain ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Network {
	/// Chain ID (e.g., 1 for Ethereum mainnet, 137 for Polygon)
	pub chain_id: u64,
	/// Human-readable name (e.g., "Ethereum", "Polygon")
	pub name: String,
	/// Candidate RPC endpoints, in probe order
	pub endpoints: Vec<String>,
	/// Block explorer base URL
	pub explorer_url: String,
	/// Symbol of the native coin (e.g., "ETH", "MATIC")
	pub native_symbol: String,
	pub scope: NetworkScope,
	/// Catalog slug for icon lookup (e.g., "ethereum"), when known
	pub chain_key: Option<String>,
	/// Icon URI from the remote catalog, when known
	pub icon: Option<String>,
}

impl Network {
	pub fn new(
		chain_id: u64,
		name: impl Into<String>,
		endpoints: Vec<String>,
		explorer_url: impl Into<String>,
		native_symbol: impl Into<String>,
		scope: NetworkScope,
	) -> Self {
		Self {
			chain_id,
			name: name.into(),
			endpoints,
			explorer_url: explorer_url.into(),
			native_symbol: native_symbol.into(),
			scope,
			chain_key: None,
			icon: None,
		}
	}
}

/// Errors raised while resolving a live RPC endpoint
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EndpointError {
	#[error("no reachable endpoint for chain {chain_id}")]
	Exhausted { chain_id: u64 },

	#[error("no endpoints configured for chain {chain_id}")]
	NoneConfigured { chain_id: u64 },
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_network_scope_serde() {
		let json = serde_json::to_string(&NetworkScope::Production).unwrap();
		assert_eq!(json, "\"production\"");
		let scope: NetworkScope = serde_json::from_str("\"development\"").unwrap();
		assert_eq!(scope, NetworkScope::Development);
	}

	#[test]
	fn test_endpoint_error_display() {
		let err = EndpointError::Exhausted { chain_id: 137 };
		assert!(err.to_string().contains("137"));
	}
}
