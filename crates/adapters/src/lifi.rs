//! Quote provider adapter (LiFi-shaped API)
//!
//! Turns a fully specified swap request into a provider quote and
//! classifies failures: the provider signals "no route between these
//! tokens" with HTTP 404 and error code 1002, which is final for the
//! current inputs and must not be retried; everything else follows the
//! generic status-based policy in `SwapQuoteError`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use swapdesk_types::{
	QuoteResult, QuoteRouteStep, QuoteSide, SwapQuoteError, SwapQuoteRequest, SwapQuoteResponse,
	TokenAddress,
};

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
const NO_ROUTES_CODE: i64 = 1002;

/// Provider for swap price quotes
#[async_trait]
pub trait QuoteAdapter: Send + Sync {
	async fn fetch_quote(&self, request: &SwapQuoteRequest) -> QuoteResult<SwapQuoteResponse>;
}

/// Quote provider connection settings
#[derive(Debug, Clone)]
pub struct LifiConfig {
	pub base_url: String,
	pub integrator: String,
	pub api_key: Option<String>,
}

impl Default for LifiConfig {
	fn default() -> Self {
		Self {
			base_url: "https://li.quest/v1".to_string(),
			integrator: "swapdesk".to_string(),
			api_key: None,
		}
	}
}

#[derive(Debug, Clone)]
pub struct LifiAdapter {
	config: LifiConfig,
	client: reqwest::Client,
}

impl LifiAdapter {
	pub fn new(config: LifiConfig) -> QuoteResult<Self> {
		let mut headers = HeaderMap::new();
		headers.insert("Accept", HeaderValue::from_static("application/json"));
		if let Some(api_key) = &config.api_key {
			if let Ok(value) = HeaderValue::from_str(api_key) {
				headers.insert("x-lifi-api-key", value);
			}
		}

		let client = reqwest::Client::builder()
			.default_headers(headers)
			.build()
			.map_err(|err| SwapQuoteError::Transport(err.to_string()))?;

		Ok(Self { config, client })
	}
}

/// Native sentinel maps to the zero address on the wire; contract
/// addresses travel lowercased
pub fn to_api_token_address(address: &TokenAddress) -> String {
	match address {
		TokenAddress::Native => ZERO_ADDRESS.to_string(),
		TokenAddress::Contract(contract) => contract.to_lowercase(),
	}
}

/// Values above 0.05 are treated as percentages and scaled down;
/// non-positive or non-finite values are dropped
pub fn normalize_slippage(raw: Option<f64>) -> Option<f64> {
	let value = raw?;
	if !value.is_finite() || value <= 0.0 {
		return None;
	}
	Some(if value > 0.05 { value / 100.0 } else { value })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LifiToken {
	address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LifiGasCost {
	amount: Option<String>,
	#[serde(rename = "amountUSD")]
	amount_usd: Option<String>,
	estimate: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LifiEstimate {
	to_amount: Option<String>,
	to_amount_min: Option<String>,
	approval_address: Option<String>,
	#[serde(default)]
	gas_costs: Vec<LifiGasCost>,
	#[serde(rename = "fromAmountUSD")]
	from_amount_usd: Option<String>,
	#[serde(rename = "toAmountUSD")]
	to_amount_usd: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LifiAction {
	from_chain_id: u64,
	to_chain_id: u64,
	from_token: LifiToken,
	to_token: LifiToken,
	from_amount: String,
	to_address: Option<String>,
	slippage: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LifiStep {
	id: String,
	#[serde(rename = "type")]
	step_type: String,
	tool: String,
	action: LifiAction,
	estimate: Option<LifiEstimate>,
	#[serde(default)]
	included_steps: Vec<LifiStep>,
}

#[derive(Debug, Deserialize)]
struct LifiErrorBody {
	message: Option<String>,
	code: Option<i64>,
}

fn sum_amounts(values: impl Iterator<Item = Option<String>>) -> String {
	let mut total: u128 = 0;
	for value in values.flatten() {
		if let Ok(parsed) = value.parse::<u128>() {
			total = total.saturating_add(parsed);
		}
	}
	total.to_string()
}

fn sum_usd(values: impl Iterator<Item = Option<String>>) -> f64 {
	values
		.flatten()
		.filter_map(|v| v.parse::<f64>().ok())
		.filter(|v| v.is_finite())
		.sum()
}

fn round4(value: f64) -> f64 {
	(value * 10_000.0).round() / 10_000.0
}

fn map_step(step: LifiStep, swapper: &str) -> SwapQuoteResponse {
	let empty_estimate = |s: &LifiStep| {
		s.estimate
			.as_ref()
			.and_then(|e| e.to_amount.clone())
			.unwrap_or_else(|| "0".to_string())
	};

	let gas_costs: Vec<&LifiGasCost> = step
		.estimate
		.iter()
		.flat_map(|e| e.gas_costs.iter())
		.collect();
	let gas_fee = sum_amounts(gas_costs.iter().map(|c| c.amount.clone()));
	let gas_use_estimate = sum_amounts(gas_costs.iter().map(|c| c.estimate.clone()));
	let gas_fee_usd_number = sum_usd(gas_costs.iter().map(|c| c.amount_usd.clone()));
	let gas_fee_usd = if gas_fee_usd_number.is_finite() {
		Some(format!("{:.6}", gas_fee_usd_number))
	} else {
		None
	};

	let from_usd = step
		.estimate
		.as_ref()
		.and_then(|e| e.from_amount_usd.as_ref())
		.and_then(|v| v.parse::<f64>().ok());
	let to_usd = step
		.estimate
		.as_ref()
		.and_then(|e| e.to_amount_usd.as_ref())
		.and_then(|v| v.parse::<f64>().ok());
	let price_impact = match (from_usd, to_usd) {
		(Some(from), Some(to)) if from > 0.0 && from.is_finite() && to.is_finite() => {
			Some(round4((from - to) / from * 100.0))
		},
		_ => None,
	};

	let to_amount = empty_estimate(&step);
	let recipient = step
		.action
		.to_address
		.clone()
		.unwrap_or_else(|| swapper.to_string());
	let slippage = step.action.slippage.map(|s| round4(s * 100.0));

	let inner: Vec<&LifiStep> = if step.included_steps.is_empty() {
		vec![&step]
	} else {
		step.included_steps.iter().collect()
	};

	let route: Vec<QuoteRouteStep> = inner
		.iter()
		.map(|s| QuoteRouteStep {
			id: s.id.clone(),
			step_type: s.step_type.clone(),
			tool: s.tool.clone(),
			from_token: s.action.from_token.address.clone(),
			to_token: s.action.to_token.address.clone(),
			from_amount: s.action.from_amount.clone(),
			to_amount: empty_estimate(s),
			to_amount_min: s
				.estimate
				.as_ref()
				.and_then(|e| e.to_amount_min.clone())
				.unwrap_or_else(|| "0".to_string()),
			approval_address: s
				.estimate
				.as_ref()
				.and_then(|e| e.approval_address.clone())
				.unwrap_or_default(),
		})
		.collect();

	let route_string = inner
		.iter()
		.map(|s| format!("{}:{}", s.step_type, s.tool))
		.collect::<Vec<_>>()
		.join(" -> ");

	SwapQuoteResponse {
		swapper: swapper.to_string(),
		input: QuoteSide {
			amount: step.action.from_amount.clone(),
			token: step.action.from_token.address.clone(),
			chain_id: step.action.from_chain_id,
		},
		output: QuoteSide {
			amount: to_amount,
			token: step.action.to_token.address.clone(),
			chain_id: step.action.to_chain_id,
		},
		recipient,
		route,
		route_string,
		slippage,
		price_impact,
		gas_fee,
		gas_fee_usd,
		gas_use_estimate,
		quote_id: step.id.clone(),
	}
}

#[async_trait]
impl QuoteAdapter for LifiAdapter {
	async fn fetch_quote(&self, request: &SwapQuoteRequest) -> QuoteResult<SwapQuoteResponse> {
		debug!(
			"requesting quote {} -> {} for amount {}",
			request.token_in, request.token_out, request.amount
		);

		let mut query: Vec<(&str, String)> = vec![
			("fromChain", request.token_in_chain_id.to_string()),
			("toChain", request.token_out_chain_id.to_string()),
			("fromToken", to_api_token_address(&request.token_in)),
			("toToken", to_api_token_address(&request.token_out)),
			("fromAmount", request.amount.clone()),
			("fromAddress", request.swapper.clone()),
			("toAddress", request.swapper.clone()),
			("integrator", self.config.integrator.clone()),
		];
		if let Some(slippage) = normalize_slippage(request.slippage) {
			query.push(("slippage", slippage.to_string()));
		}

		let url = format!("{}/quote", self.config.base_url);
		let response = self
			.client
			.get(&url)
			.query(&query)
			.send()
			.await
			.map_err(|err| SwapQuoteError::Transport(err.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let body: Option<LifiErrorBody> = response.json().await.ok();
			let code = body.as_ref().and_then(|b| b.code);
			let message = body
				.and_then(|b| b.message)
				.unwrap_or_else(|| format!("quote provider error (HTTP {})", status.as_u16()));
			let no_route_found = status.as_u16() == 404 && code == Some(NO_ROUTES_CODE);
			return Err(SwapQuoteError::provider(
				message,
				Some(status.as_u16()),
				no_route_found,
			));
		}

		let step: LifiStep = response
			.json()
			.await
			.map_err(|err| SwapQuoteError::InvalidResponse {
				reason: err.to_string(),
			})?;

		Ok(map_step(step, &request.swapper))
	}
}
