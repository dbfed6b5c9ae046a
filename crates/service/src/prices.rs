//! Token USD valuation.
//!
//! Prices are looked up per token and held for a minute so repeated
//! renders of the same selection do not hammer the price API. A failed
//! lookup is retried once; after that the token simply shows no USD
//! value until the cached miss expires.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use swapdesk_adapters::PriceClient;
use swapdesk_types::models::TokenAddress;
use tokio::time::Instant;
use tracing::debug;

/// How long a looked-up price (or a confirmed miss) stays current.
pub const PRICE_TTL: Duration = Duration::from_secs(60);

pub struct PriceService {
	client: Arc<dyn PriceClient>,
	cache: DashMap<String, CachedPrice>,
	ttl: Duration,
}

struct CachedPrice {
	price: Option<f64>,
	fetched_at: Instant,
}

impl PriceService {
	pub fn new(client: Arc<dyn PriceClient>) -> Self {
		Self {
			client,
			cache: DashMap::new(),
			ttl: PRICE_TTL,
		}
	}

	/// USD price for a token, served from cache within the TTL.
	pub async fn usd_price(&self, chain_id: u64, token: &TokenAddress) -> Option<f64> {
		let key = cache_key(chain_id, token);
		if let Some(entry) = self.cache.get(&key) {
			if entry.fetched_at.elapsed() < self.ttl {
				return entry.price;
			}
		}

		let price = match self.client.usd_price(chain_id, token).await {
			Ok(price) => price,
			Err(_) => match self.client.usd_price(chain_id, token).await {
				Ok(price) => price,
				Err(err) => {
					debug!(chain_id, token = %token.key(), error = %err, "usd price lookup failed");
					None
				}
			},
		};
		self.cache.insert(
			key,
			CachedPrice {
				price,
				fetched_at: Instant::now(),
			},
		);
		price
	}

	/// USD value of a displayed token amount. No price means no value; an
	/// unparseable or non-positive amount is worth zero.
	pub async fn usd_value(&self, chain_id: u64, token: &TokenAddress, amount: &str) -> Option<f64> {
		let price = self.usd_price(chain_id, token).await?;
		let amount = amount
			.trim()
			.parse::<f64>()
			.ok()
			.filter(|value| value.is_finite() && *value > 0.0)
			.unwrap_or(0.0);
		Some(amount * price)
	}
}

fn cache_key(chain_id: u64, token: &TokenAddress) -> String {
	format!("{}:{}", chain_id, token.key())
}
