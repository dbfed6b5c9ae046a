//! Token USD price lookup
//!
//! Backed by CoinGecko's public simple-price endpoints. Native assets
//! resolve through per-chain coin ids (testnets price against their
//! mainnet asset), contract tokens through the chain's platform slug.
//! Chains without a mapping simply have no price.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use swapdesk_types::models::TokenAddress;

pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

pub type PriceResult<T> = Result<T, PriceError>;

#[derive(Debug, Error)]
pub enum PriceError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("price request returned status {status_code}")]
	HttpStatus { status_code: u16 },
}

#[async_trait]
pub trait PriceClient: Send + Sync {
	/// USD price of one whole unit of the token, or `None` when the chain
	/// or token is not covered.
	async fn usd_price(&self, chain_id: u64, token: &TokenAddress) -> PriceResult<Option<f64>>;
}

/// Candidate CoinGecko coin ids for a chain's native asset, tried in
/// order until one resolves.
fn native_coin_ids(chain_id: u64) -> &'static [&'static str] {
	match chain_id {
		1 | 8453 | 11155111 | 84532 => &["ethereum"],
		137 | 80002 => &["polygon-ecosystem-token", "matic-network"],
		_ => &[],
	}
}

/// CoinGecko asset-platform slug for contract-token prices.
fn platform_slug(chain_id: u64) -> Option<&'static str> {
	match chain_id {
		1 => Some("ethereum"),
		137 => Some("polygon-pos"),
		8453 => Some("base"),
		_ => None,
	}
}

#[derive(Debug, Deserialize)]
struct UsdQuote {
	usd: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct HttpPriceClient {
	base_url: String,
	client: reqwest::Client,
}

impl HttpPriceClient {
	pub fn new(base_url: impl Into<String>) -> PriceResult<Self> {
		let client = reqwest::Client::builder().build().map_err(PriceError::Http)?;
		Ok(Self {
			base_url: base_url.into(),
			client,
		})
	}

	async fn read_usd(
		&self,
		path: &str,
		query: &[(&str, &str)],
		key: &str,
	) -> PriceResult<Option<f64>> {
		let url = format!("{}{}", self.base_url, path);
		let response = self.client.get(&url).query(query).send().await?;

		let status = response.status();
		if !status.is_success() {
			return Err(PriceError::HttpStatus {
				status_code: status.as_u16(),
			});
		}

		let payload: HashMap<String, UsdQuote> = response.json().await.map_err(PriceError::Http)?;
		Ok(extract_usd(&payload, key))
	}
}

fn extract_usd(payload: &HashMap<String, UsdQuote>, key: &str) -> Option<f64> {
	payload
		.get(key)
		.and_then(|quote| quote.usd)
		.filter(|price| price.is_finite())
}

#[async_trait]
impl PriceClient for HttpPriceClient {
	async fn usd_price(&self, chain_id: u64, token: &TokenAddress) -> PriceResult<Option<f64>> {
		match token.contract() {
			None => {
				for &coin_id in native_coin_ids(chain_id) {
					let found = self
						.read_usd(
							"/simple/price",
							&[("ids", coin_id), ("vs_currencies", "usd")],
							coin_id,
						)
						.await?;
					if found.is_some() {
						return Ok(found);
					}
				}
				Ok(None)
			}
			Some(contract) => {
				let Some(platform) = platform_slug(chain_id) else {
					return Ok(None);
				};
				let address = contract.to_lowercase();
				self.read_usd(
					&format!("/simple/token_price/{}", platform),
					&[("contract_addresses", address.as_str()), ("vs_currencies", "usd")],
					&address,
				)
				.await
			}
		}
	}
}
