//! Catalog service client
//!
//! Fetches the remote network list and per-chain token lists. The
//! remote catalog's field names vary across deployments, so decoding is
//! deliberately lenient: aliased fields, optional wrapper envelopes,
//! and per-entry validation that skips malformed records instead of
//! failing the whole response.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use swapdesk_types::{Token, TokenAddress};

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("HTTP {status_code}: {reason}")]
	HttpStatus { status_code: u16, reason: String },

	#[error("invalid response format: {reason}")]
	InvalidResponse { reason: String },
}

/// A network entry as described by the remote catalog
///
/// All metadata beyond the chain id is optional; the catalog only ever
/// enriches the configured allow-list, it cannot introduce chains.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteNetwork {
	pub chain_id: u64,
	pub name: String,
	pub chain_key: Option<String>,
	pub endpoints: Vec<String>,
	pub explorer_url: Option<String>,
	pub native_symbol: Option<String>,
	pub icon: Option<String>,
}

#[async_trait]
pub trait CatalogClient: Send + Sync {
	async fn fetch_networks(&self) -> CatalogResult<Vec<RemoteNetwork>>;
	async fn fetch_tokens(&self, chain_id: u64) -> CatalogResult<Vec<Token>>;
}

/// Wrapper envelopes seen in the wild: a bare array, or an object with
/// the list under `chains`/`tokens`/`data`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing<T> {
	Bare(Vec<T>),
	Chains { chains: Vec<T> },
	Tokens { tokens: Vec<T> },
	Data { data: Vec<T> },
}

impl<T> Listing<T> {
	fn into_vec(self) -> Vec<T> {
		match self {
			Listing::Bare(list)
			| Listing::Chains { chains: list }
			| Listing::Tokens { tokens: list }
			| Listing::Data { data: list } => list,
		}
	}
}

#[derive(Debug, Deserialize)]
struct RawChain {
	#[serde(alias = "chainId", alias = "chain_id")]
	id: Option<u64>,
	#[serde(alias = "chainName")]
	name: Option<String>,
	#[serde(alias = "chainKey", alias = "key", alias = "slug")]
	chain_key: Option<String>,
	#[serde(default, alias = "rpcUrls", alias = "rpc", alias = "publicRpcUrls")]
	endpoints: Vec<String>,
	#[serde(alias = "explorerUrl", alias = "scanUrl", alias = "blockExplorer")]
	explorer: Option<String>,
	#[serde(alias = "nativeSymbol", alias = "nativeTokenSymbol", alias = "gasSymbol")]
	native_symbol: Option<String>,
	#[serde(alias = "logoURI", alias = "logoUrl")]
	icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawToken {
	#[serde(alias = "tokenAddress", alias = "contractAddress")]
	address: Option<String>,
	symbol: Option<String>,
	name: Option<String>,
	decimals: Option<serde_json::Value>,
	#[serde(alias = "chainId", alias = "chain_id")]
	chain_id: Option<u64>,
	#[serde(alias = "logoURI", alias = "logoUrl", alias = "icon")]
	logo: Option<String>,
}

fn coerce_decimals(value: &serde_json::Value) -> Option<u8> {
	match value {
		serde_json::Value::Number(number) => number.as_u64().and_then(|n| u8::try_from(n).ok()),
		serde_json::Value::String(text) => text.trim().parse().ok(),
		_ => None,
	}
}

fn token_from_raw(raw: RawToken, chain_id: u64) -> Option<Token> {
	if let Some(token_chain) = raw.chain_id {
		if token_chain != chain_id {
			return None;
		}
	}

	let address: TokenAddress = raw.address?.parse().ok()?;
	let symbol = raw.symbol.filter(|s| !s.trim().is_empty())?;
	let name = raw.name.filter(|s| !s.trim().is_empty())?;
	let decimals = coerce_decimals(&raw.decimals?)?;

	let mut token = Token::new(chain_id, address, symbol, name, decimals);
	token.icon = raw.logo;
	Some(token)
}

/// HTTP implementation over the catalog service
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
	base_url: String,
	client: reqwest::Client,
}

impl HttpCatalogClient {
	pub fn new(base_url: impl Into<String>) -> CatalogResult<Self> {
		let client = reqwest::Client::builder().build().map_err(CatalogError::Http)?;
		Ok(Self {
			base_url: base_url.into(),
			client,
		})
	}

	async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> CatalogResult<T> {
		let response = self.client.get(url).send().await?;
		let status = response.status();
		if !status.is_success() {
			return Err(CatalogError::HttpStatus {
				status_code: status.as_u16(),
				reason: status.canonical_reason().unwrap_or("request failed").to_string(),
			});
		}
		response
			.json()
			.await
			.map_err(|err| CatalogError::InvalidResponse {
				reason: err.to_string(),
			})
	}
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
	async fn fetch_networks(&self) -> CatalogResult<Vec<RemoteNetwork>> {
		let url = format!("{}/chains", self.base_url);
		let listing: Listing<RawChain> = self.get_json(&url).await?;

		let networks = listing
			.into_vec()
			.into_iter()
			.filter_map(|raw| {
				let chain_id = raw.id?;
				let name = raw.name.filter(|n| !n.trim().is_empty())?;
				Some(RemoteNetwork {
					chain_id,
					name,
					chain_key: raw.chain_key,
					endpoints: raw.endpoints,
					explorer_url: raw.explorer,
					native_symbol: raw.native_symbol,
					icon: raw.icon,
				})
			})
			.collect::<Vec<_>>();

		debug!("catalog returned {} usable networks", networks.len());
		Ok(networks)
	}

	async fn fetch_tokens(&self, chain_id: u64) -> CatalogResult<Vec<Token>> {
		let url = format!("{}/tokens?chainId={}", self.base_url, chain_id);
		let listing: Listing<RawToken> = self.get_json(&url).await?;

		let tokens: Vec<Token> = listing
			.into_vec()
			.into_iter()
			.filter_map(|raw| token_from_raw(raw, chain_id))
			.collect();

		debug!("catalog returned {} usable tokens for chain {}", tokens.len(), chain_id);
		Ok(tokens)
	}
}
