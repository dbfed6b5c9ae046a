//! Shared domain models

pub mod amount;
pub mod network;
pub mod token;

pub use amount::{format_balance, format_from_smallest, to_smallest_unit, ZERO_BALANCE};
pub use network::{EndpointError, Network, NetworkScope};
pub use token::{
	dedupe_tokens, is_hex_address, AddressParseError, Token, TokenAddress, TokenImportError,
	NATIVE_SENTINEL,
};
