//! Risk service client
//!
//! Consulted by the orchestrator when the user asks to review a swap
//! into a non-native token. Responses may arrive bare or wrapped in the
//! platform's response envelope.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use swapdesk_types::TokenRiskResponse;

pub type RiskResult<T> = Result<T, RiskError>;

#[derive(Debug, Error)]
pub enum RiskError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("{message}")]
	Service { message: String },

	#[error("invalid response format: {reason}")]
	InvalidResponse { reason: String },
}

#[async_trait]
pub trait RiskClient: Send + Sync {
	async fn token_risk(&self, chain_id: u64, token_address: &str)
		-> RiskResult<TokenRiskResponse>;
}

#[derive(Debug, Deserialize)]
struct Envelope {
	success: Option<bool>,
	message: Option<String>,
	data: Option<TokenRiskResponse>,
}

/// Bare first: the envelope's fields are all optional, so it would
/// accept any object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RiskPayload {
	Bare(TokenRiskResponse),
	Wrapped(Envelope),
}

#[derive(Debug, Clone)]
pub struct HttpRiskClient {
	base_url: String,
	client: reqwest::Client,
}

impl HttpRiskClient {
	pub fn new(base_url: impl Into<String>) -> RiskResult<Self> {
		let client = reqwest::Client::builder().build().map_err(RiskError::Http)?;
		Ok(Self {
			base_url: base_url.into(),
			client,
		})
	}
}

#[async_trait]
impl RiskClient for HttpRiskClient {
	async fn token_risk(
		&self,
		chain_id: u64,
		token_address: &str,
	) -> RiskResult<TokenRiskResponse> {
		let url = format!("{}/risk/token", self.base_url);
		let response = self
			.client
			.get(&url)
			.query(&[
				("chainId", chain_id.to_string()),
				("tokenAddress", token_address.to_string()),
			])
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let body: Option<Envelope> = response.json().await.ok();
			let message = body
				.and_then(|b| b.message)
				.unwrap_or_else(|| "Failed to fetch token risk".to_string());
			return Err(RiskError::Service { message });
		}

		let payload: RiskPayload =
			response
				.json()
				.await
				.map_err(|err| RiskError::InvalidResponse {
					reason: err.to_string(),
				})?;

		match payload {
			RiskPayload::Bare(risk) => Ok(risk),
			RiskPayload::Wrapped(envelope) => match envelope.data {
				Some(risk) => Ok(risk),
				None => Err(RiskError::Service {
					message: envelope
						.message
						.filter(|m| !m.is_empty() && envelope.success != Some(true))
						.unwrap_or_else(|| "Risk response was empty".to_string()),
				}),
			},
		}
	}
}
