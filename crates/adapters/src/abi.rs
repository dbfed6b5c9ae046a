//! Minimal ERC-20 calldata encoding and return-data decoding
//!
//! Only the four reads the workspace needs: balanceOf, symbol, name,
//! decimals. Symbol and name decode both the standard dynamic-string
//! layout and the legacy bytes32 layout some older tokens use.

use thiserror::Error;

pub const SELECTOR_BALANCE_OF: &str = "0x70a08231";
pub const SELECTOR_SYMBOL: &str = "0x95d89b41";
pub const SELECTOR_NAME: &str = "0x06fdde03";
pub const SELECTOR_DECIMALS: &str = "0x313ce567";

const WORD: usize = 32;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AbiError {
	#[error("call returned no data")]
	Empty,

	#[error("failed to decode return data: {0}")]
	Decode(String),
}

/// Calldata for `balanceOf(address)`
pub fn encode_balance_of(holder: &str) -> String {
	let body = holder.trim_start_matches("0x").to_lowercase();
	format!("{}{:0>64}", SELECTOR_BALANCE_OF, body)
}

fn decode_hex(data: &str) -> Result<Vec<u8>, AbiError> {
	let body = data.trim().trim_start_matches("0x");
	if body.is_empty() {
		return Err(AbiError::Empty);
	}
	hex::decode(body).map_err(|err| AbiError::Decode(err.to_string()))
}

fn word_to_u128(word: &[u8]) -> Result<u128, AbiError> {
	if word.len() != WORD {
		return Err(AbiError::Decode(format!(
			"expected a 32-byte word, got {} bytes",
			word.len()
		)));
	}
	if word[..WORD - 16].iter().any(|&b| b != 0) {
		return Err(AbiError::Decode("value exceeds u128 range".to_string()));
	}
	let mut buf = [0u8; 16];
	buf.copy_from_slice(&word[WORD - 16..]);
	Ok(u128::from_be_bytes(buf))
}

/// Decode a single uint return value (balanceOf, decimals)
pub fn decode_uint(data: &str) -> Result<u128, AbiError> {
	let bytes = decode_hex(data)?;
	if bytes.len() < WORD {
		return Err(AbiError::Decode("return data shorter than one word".to_string()));
	}
	word_to_u128(&bytes[..WORD])
}

/// Decode a string return value (symbol, name), accepting both the
/// dynamic ABI layout and a raw bytes32 value
pub fn decode_string(data: &str) -> Result<String, AbiError> {
	let bytes = decode_hex(data)?;

	if bytes.len() == WORD {
		// bytes32 layout: right-padded with NULs
		let trimmed: Vec<u8> = bytes.iter().copied().take_while(|&b| b != 0).collect();
		return String::from_utf8(trimmed)
			.map_err(|err| AbiError::Decode(err.to_string()));
	}

	if bytes.len() < 2 * WORD {
		return Err(AbiError::Decode("return data too short for a string".to_string()));
	}

	// Offset and length words come from untrusted return data; every cast
	// and addition stays checked so hostile values decode as errors.
	let offset = checked_index(word_to_u128(&bytes[..WORD])?)?;
	let length_end = offset
		.checked_add(WORD)
		.filter(|&end| end <= bytes.len())
		.ok_or_else(|| AbiError::Decode("string offset out of range".to_string()))?;
	let length = checked_index(word_to_u128(&bytes[offset..length_end])?)?;
	let end = length_end
		.checked_add(length)
		.filter(|&end| end <= bytes.len())
		.ok_or_else(|| AbiError::Decode("string length out of range".to_string()))?;

	String::from_utf8(bytes[length_end..end].to_vec())
		.map_err(|err| AbiError::Decode(err.to_string()))
}

fn checked_index(value: u128) -> Result<usize, AbiError> {
	usize::try_from(value)
		.map_err(|_| AbiError::Decode("value exceeds addressable range".to_string()))
}
