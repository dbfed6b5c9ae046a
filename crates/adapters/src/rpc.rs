//! Chain RPC client
//!
//! Standard JSON-RPC reads: block number (liveness probe), native
//! balance, batched ERC-20 `balanceOf`, and the symbol/name/decimals
//! introspection trio combined into a single round-trip.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::abi;

pub type RpcResult<T> = Result<T, RpcError>;

/// RPC failures, classified once at this boundary
#[derive(Debug, Error)]
pub enum RpcError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("HTTP {status_code}: {reason}")]
	HttpStatus { status_code: u16, reason: String },

	#[error("RPC error {code}: {message}")]
	Rpc { code: i64, message: String },

	#[error(transparent)]
	Abi(#[from] abi::AbiError),

	#[error("invalid response format: {reason}")]
	InvalidResponse { reason: String },
}

impl RpcError {
	/// Failure patterns that indicate the target is not a usable token
	/// contract (reverted call, missing function, no data, undecodable
	/// return value)
	pub fn indicates_contract_absence(&self) -> bool {
		match self {
			RpcError::Abi(_) => true,
			RpcError::Rpc { message, .. } => {
				let lowered = message.to_lowercase();
				lowered.contains("revert")
					|| lowered.contains("invalid opcode")
					|| lowered.contains("out of gas")
					|| lowered.contains("no data")
			},
			_ => false,
		}
	}

	/// Failure patterns that indicate a transient network condition
	/// worth trying again later
	pub fn is_transient(&self) -> bool {
		match self {
			RpcError::Http(_) => true,
			RpcError::HttpStatus { status_code, .. } => {
				*status_code == 429 || *status_code >= 500
			},
			RpcError::Rpc { message, .. } => {
				let lowered = message.to_lowercase();
				lowered.contains("timeout")
					|| lowered.contains("timed out")
					|| lowered.contains("rate limit")
					|| lowered.contains("too many requests")
			},
			_ => false,
		}
	}
}

/// Result of the symbol/name/decimals introspection trio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
	pub symbol: String,
	pub name: String,
	pub decimals: u8,
}

/// Read-only chain RPC operations used by the workspace
#[async_trait]
pub trait RpcClient: Send + Sync {
	/// Lightweight liveness probe
	async fn block_number(&self, endpoint: &str) -> RpcResult<u64>;

	/// Native coin balance in the chain's smallest unit
	async fn native_balance(&self, endpoint: &str, holder: &str) -> RpcResult<u128>;

	/// Batched `balanceOf` reads, one combined call per invocation.
	/// Entries that fail individually inside the batch come back as
	/// `None`; a transport-level failure fails the whole call.
	async fn token_balances(
		&self,
		endpoint: &str,
		holder: &str,
		tokens: &[String],
	) -> RpcResult<Vec<Option<u128>>>;

	/// Symbol, name and decimals in a single combined round-trip
	async fn token_metadata(&self, endpoint: &str, token: &str) -> RpcResult<TokenMetadata>;
}

/// JSON-RPC over HTTP implementation
#[derive(Debug, Clone)]
pub struct HttpRpcClient {
	client: reqwest::Client,
}

impl HttpRpcClient {
	pub fn new() -> RpcResult<Self> {
		let mut headers = HeaderMap::new();
		headers.insert("Content-Type", HeaderValue::from_static("application/json"));
		headers.insert("Accept", HeaderValue::from_static("application/json"));

		let client = reqwest::Client::builder()
			.default_headers(headers)
			.build()
			.map_err(RpcError::Http)?;

		Ok(Self { client })
	}

	async fn post(&self, endpoint: &str, body: &Value) -> RpcResult<Value> {
		let response = self.client.post(endpoint).json(body).send().await?;
		let status = response.status();
		if !status.is_success() {
			return Err(RpcError::HttpStatus {
				status_code: status.as_u16(),
				reason: status.canonical_reason().unwrap_or("request failed").to_string(),
			});
		}
		Ok(response.json().await?)
	}

	/// Single JSON-RPC call returning the hex-encoded result
	async fn call(&self, endpoint: &str, method: &str, params: Value) -> RpcResult<String> {
		let body = json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method,
			"params": params,
		});
		let payload = self.post(endpoint, &body).await?;
		extract_result(&payload)
	}

	/// JSON-RPC batch call; results keyed by request id, individual
	/// failures kept as errors
	async fn batch(
		&self,
		endpoint: &str,
		requests: Vec<(u64, &str, Value)>,
	) -> RpcResult<HashMap<u64, RpcResult<String>>> {
		let body: Vec<Value> = requests
			.iter()
			.map(|(id, method, params)| {
				json!({
					"jsonrpc": "2.0",
					"id": id,
					"method": method,
					"params": params,
				})
			})
			.collect();

		let payload = self.post(endpoint, &Value::Array(body)).await?;
		let entries = payload.as_array().ok_or_else(|| RpcError::InvalidResponse {
			reason: "batch response is not an array".to_string(),
		})?;

		let mut results = HashMap::with_capacity(entries.len());
		for entry in entries {
			let Some(id) = entry.get("id").and_then(Value::as_u64) else {
				continue;
			};
			results.insert(id, extract_result(entry));
		}
		Ok(results)
	}
}

fn extract_result(payload: &Value) -> RpcResult<String> {
	if let Some(error) = payload.get("error") {
		return Err(RpcError::Rpc {
			code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
			message: error
				.get("message")
				.and_then(Value::as_str)
				.unwrap_or("unknown error")
				.to_string(),
		});
	}
	match payload.get("result") {
		Some(Value::String(result)) => Ok(result.clone()),
		Some(Value::Null) | None => Err(RpcError::Abi(abi::AbiError::Empty)),
		Some(other) => Err(RpcError::InvalidResponse {
			reason: format!("unexpected result type: {}", other),
		}),
	}
}

fn parse_quantity(hex_value: &str) -> RpcResult<u128> {
	let body = hex_value.trim_start_matches("0x");
	if body.is_empty() {
		return Ok(0);
	}
	u128::from_str_radix(body, 16).map_err(|err| RpcError::InvalidResponse {
		reason: format!("bad quantity {}: {}", hex_value, err),
	})
}

fn eth_call_params(to: &str, data: String) -> Value {
	json!([{ "to": to, "data": data }, "latest"])
}

#[async_trait]
impl RpcClient for HttpRpcClient {
	async fn block_number(&self, endpoint: &str) -> RpcResult<u64> {
		let result = self.call(endpoint, "eth_blockNumber", json!([])).await?;
		Ok(parse_quantity(&result)? as u64)
	}

	async fn native_balance(&self, endpoint: &str, holder: &str) -> RpcResult<u128> {
		let result = self
			.call(endpoint, "eth_getBalance", json!([holder, "latest"]))
			.await?;
		parse_quantity(&result)
	}

	async fn token_balances(
		&self,
		endpoint: &str,
		holder: &str,
		tokens: &[String],
	) -> RpcResult<Vec<Option<u128>>> {
		if tokens.is_empty() {
			return Ok(Vec::new());
		}

		let requests: Vec<(u64, &str, Value)> = tokens
			.iter()
			.enumerate()
			.map(|(index, token)| {
				(
					index as u64,
					"eth_call",
					eth_call_params(token, abi::encode_balance_of(holder)),
				)
			})
			.collect();

		let mut results = self.batch(endpoint, requests).await?;
		let balances = tokens
			.iter()
			.enumerate()
			.map(|(index, token)| match results.remove(&(index as u64)) {
				Some(Ok(data)) => match abi::decode_uint(&data) {
					Ok(balance) => Some(balance),
					Err(err) => {
						debug!("balanceOf decode failed for {}: {}", token, err);
						None
					},
				},
				Some(Err(err)) => {
					debug!("balanceOf failed for {}: {}", token, err);
					None
				},
				None => None,
			})
			.collect();
		Ok(balances)
	}

	async fn token_metadata(&self, endpoint: &str, token: &str) -> RpcResult<TokenMetadata> {
		let requests = vec![
			(1u64, "eth_call", eth_call_params(token, abi::SELECTOR_SYMBOL.to_string())),
			(2u64, "eth_call", eth_call_params(token, abi::SELECTOR_NAME.to_string())),
			(
				3u64,
				"eth_call",
				eth_call_params(token, abi::SELECTOR_DECIMALS.to_string()),
			),
		];

		let mut results = self.batch(endpoint, requests).await?;
		let mut take = |id: u64| -> RpcResult<String> {
			results
				.remove(&id)
				.unwrap_or(Err(RpcError::Abi(abi::AbiError::Empty)))
		};

		let symbol = abi::decode_string(&take(1)?)?;
		let name = abi::decode_string(&take(2)?)?;
		let decimals_raw = abi::decode_uint(&take(3)?)?;
		let decimals = u8::try_from(decimals_raw).map_err(|_| RpcError::InvalidResponse {
			reason: format!("implausible decimals value {}", decimals_raw),
		})?;

		Ok(TokenMetadata {
			symbol,
			name,
			decimals,
		})
	}
}
