//! Token models
//!
//! A token is identified within a chain by its lowercase address. The
//! native coin of a chain is represented by a distinguished sentinel
//! rather than a contract address.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The sentinel spelling of a chain's native coin
pub const NATIVE_SENTINEL: &str = "native";

/// Alternate native spelling used by some remote catalogs
const NATIVE_PLACEHOLDER_ADDRESS: &str = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee";

/// Check that a string is a syntactically valid account address (0x + 40 hex chars)
pub fn is_hex_address(value: &str) -> bool {
	let Some(body) = value.strip_prefix("0x") else {
		return false;
	};
	body.len() == 40 && body.chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid token address: {value}")]
pub struct AddressParseError {
	pub value: String,
}

/// Token address: either the native-coin sentinel or a contract address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenAddress {
	Native,
	Contract(String),
}

impl TokenAddress {
	/// Identity key: lowercase spelling, stable across provenances
	pub fn key(&self) -> String {
		match self {
			TokenAddress::Native => NATIVE_SENTINEL.to_string(),
			TokenAddress::Contract(address) => address.to_lowercase(),
		}
	}

	pub fn is_native(&self) -> bool {
		matches!(self, TokenAddress::Native)
	}

	/// Contract address, if this is not the native sentinel
	pub fn contract(&self) -> Option<&str> {
		match self {
			TokenAddress::Native => None,
			TokenAddress::Contract(address) => Some(address),
		}
	}
}

impl FromStr for TokenAddress {
	type Err = AddressParseError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		let trimmed = value.trim();
		let lowered = trimmed.to_lowercase();
		if lowered == NATIVE_SENTINEL || lowered == NATIVE_PLACEHOLDER_ADDRESS {
			return Ok(TokenAddress::Native);
		}
		if is_hex_address(trimmed) {
			return Ok(TokenAddress::Contract(trimmed.to_string()));
		}
		Err(AddressParseError {
			value: trimmed.to_string(),
		})
	}
}

impl fmt::Display for TokenAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TokenAddress::Native => write!(f, "{}", NATIVE_SENTINEL),
			TokenAddress::Contract(address) => write!(f, "{}", address),
		}
	}
}

impl Serialize for TokenAddress {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for TokenAddress {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let value = String::deserialize(deserializer)?;
		value.parse().map_err(serde::de::Error::custom)
	}
}

/// A swappable token on one chain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
	pub chain_id: u64,
	pub address: TokenAddress,
	pub symbol: String,
	pub name: String,
	pub decimals: u8,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub icon: Option<String>,
}

impl Token {
	pub fn new(
		chain_id: u64,
		address: TokenAddress,
		symbol: impl Into<String>,
		name: impl Into<String>,
		decimals: u8,
	) -> Self {
		Self {
			chain_id,
			address,
			symbol: symbol.into(),
			name: name.into(),
			decimals,
			icon: None,
		}
	}

	/// Lowercase identity key within a chain
	pub fn identity_key(&self) -> String {
		self.address.key()
	}

	pub fn is_native(&self) -> bool {
		self.address.is_native()
	}
}

/// De-duplicate tokens by identity key, later entry wins
///
/// A colliding later entry replaces an earlier one's metadata but keeps
/// the earlier entry's position, so list order stays stable under merges.
pub fn dedupe_tokens(tokens: Vec<Token>) -> Vec<Token> {
	let mut position: HashMap<String, usize> = HashMap::new();
	let mut result: Vec<Token> = Vec::with_capacity(tokens.len());

	for token in tokens {
		let key = token.identity_key();
		match position.get(&key) {
			Some(&index) => result[index] = token,
			None => {
				position.insert(key, result.len());
				result.push(token);
			},
		}
	}

	result
}

/// Token import failures, classified once at the lookup boundary
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenImportError {
	#[error("enter a valid 0x token contract address")]
	InvalidAddress,

	#[error("token not found or invalid token address")]
	NotFound,

	#[error("token lookup unavailable, try again")]
	LookupUnavailable,
}
