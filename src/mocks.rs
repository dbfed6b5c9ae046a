//! Mock collaborators for tests and demos
//!
//! Scriptable in-memory implementations of the network-facing trait seams.
//! Each mock counts its calls so tests can assert how much traffic an
//! operation generated, not just what it returned.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use swapdesk_adapters::{
	CatalogClient, CatalogError, CatalogResult, PriceClient, PriceError, PriceResult,
	QuoteAdapter, RemoteNetwork, RiskClient, RiskError, RiskResult, RpcClient, RpcError,
	RpcResult, TokenMetadata,
};
use swapdesk_types::{
	QuoteResult, QuoteSide, SwapQuoteRequest, SwapQuoteResponse, Token, TokenAddress,
	TokenRiskResponse,
};

/// RPC mock backed by per-endpoint and per-token fixtures.
#[derive(Default)]
pub struct MockRpcClient {
	/// Endpoints that answer probes; an empty set means every endpoint is up.
	pub live_endpoints: HashSet<String>,
	/// Native balance per holder address (lowercase).
	pub native_balances: HashMap<String, u128>,
	/// Token balance per contract address (lowercase), applied to any holder.
	pub token_balances: HashMap<String, u128>,
	/// Metadata per contract address (lowercase).
	pub metadata: HashMap<String, TokenMetadata>,
	pub probe_calls: AtomicUsize,
	pub native_calls: AtomicUsize,
	pub batch_calls: AtomicUsize,
	pub metadata_calls: AtomicUsize,
}

impl MockRpcClient {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_native_balance(mut self, holder: &str, balance: u128) -> Self {
		self.native_balances.insert(holder.to_lowercase(), balance);
		self
	}

	pub fn with_token_balance(mut self, contract: &str, balance: u128) -> Self {
		self.token_balances.insert(contract.to_lowercase(), balance);
		self
	}

	pub fn with_metadata(mut self, contract: &str, symbol: &str, name: &str, decimals: u8) -> Self {
		self.metadata.insert(
			contract.to_lowercase(),
			TokenMetadata {
				symbol: symbol.to_string(),
				name: name.to_string(),
				decimals,
			},
		);
		self
	}

	pub fn with_live_endpoint(mut self, endpoint: &str) -> Self {
		self.live_endpoints.insert(endpoint.to_string());
		self
	}

	fn endpoint_is_live(&self, endpoint: &str) -> bool {
		self.live_endpoints.is_empty() || self.live_endpoints.contains(endpoint)
	}
}

#[async_trait]
impl RpcClient for MockRpcClient {
	async fn block_number(&self, endpoint: &str) -> RpcResult<u64> {
		self.probe_calls.fetch_add(1, Ordering::SeqCst);
		if self.endpoint_is_live(endpoint) {
			Ok(1)
		} else {
			Err(RpcError::InvalidResponse {
				reason: format!("unreachable endpoint {endpoint}"),
			})
		}
	}

	async fn native_balance(&self, endpoint: &str, holder: &str) -> RpcResult<u128> {
		self.native_calls.fetch_add(1, Ordering::SeqCst);
		if !self.endpoint_is_live(endpoint) {
			return Err(RpcError::InvalidResponse {
				reason: format!("unreachable endpoint {endpoint}"),
			});
		}
		Ok(self
			.native_balances
			.get(&holder.to_lowercase())
			.copied()
			.unwrap_or(0))
	}

	async fn token_balances(
		&self,
		endpoint: &str,
		_holder: &str,
		tokens: &[String],
	) -> RpcResult<Vec<Option<u128>>> {
		self.batch_calls.fetch_add(1, Ordering::SeqCst);
		if !self.endpoint_is_live(endpoint) {
			return Err(RpcError::InvalidResponse {
				reason: format!("unreachable endpoint {endpoint}"),
			});
		}
		Ok(tokens
			.iter()
			.map(|contract| self.token_balances.get(&contract.to_lowercase()).copied())
			.collect())
	}

	async fn token_metadata(&self, endpoint: &str, token: &str) -> RpcResult<TokenMetadata> {
		self.metadata_calls.fetch_add(1, Ordering::SeqCst);
		if !self.endpoint_is_live(endpoint) {
			return Err(RpcError::HttpStatus {
				status_code: 503,
				reason: "unreachable endpoint".to_string(),
			});
		}
		self.metadata
			.get(&token.to_lowercase())
			.cloned()
			.ok_or(RpcError::Rpc {
				code: 3,
				message: "execution reverted".to_string(),
			})
	}
}

/// Catalog mock serving fixed network and token lists.
#[derive(Default)]
pub struct MockCatalogClient {
	pub networks: Vec<RemoteNetwork>,
	pub tokens_by_chain: HashMap<u64, Vec<Token>>,
	/// When set, every fetch fails with this message.
	pub failure: Option<String>,
	pub network_calls: AtomicUsize,
	pub token_calls: AtomicUsize,
}

impl MockCatalogClient {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn failing(message: &str) -> Self {
		Self {
			failure: Some(message.to_string()),
			..Self::default()
		}
	}

	pub fn with_tokens(mut self, chain_id: u64, tokens: Vec<Token>) -> Self {
		self.tokens_by_chain.insert(chain_id, tokens);
		self
	}

	pub fn with_networks(mut self, networks: Vec<RemoteNetwork>) -> Self {
		self.networks = networks;
		self
	}
}

#[async_trait]
impl CatalogClient for MockCatalogClient {
	async fn fetch_networks(&self) -> CatalogResult<Vec<RemoteNetwork>> {
		self.network_calls.fetch_add(1, Ordering::SeqCst);
		match &self.failure {
			Some(message) => Err(CatalogError::InvalidResponse {
				reason: message.clone(),
			}),
			None => Ok(self.networks.clone()),
		}
	}

	async fn fetch_tokens(&self, chain_id: u64) -> CatalogResult<Vec<Token>> {
		self.token_calls.fetch_add(1, Ordering::SeqCst);
		match &self.failure {
			Some(message) => Err(CatalogError::InvalidResponse {
				reason: message.clone(),
			}),
			None => Ok(self.tokens_by_chain.get(&chain_id).cloned().unwrap_or_default()),
		}
	}
}

/// Quote adapter mock consuming a queue of scripted answers.
///
/// The final answer repeats once the queue is drained, and every request is
/// recorded for inspection.
pub struct MockQuoteAdapter {
	answers: Mutex<Vec<QuoteResult<SwapQuoteResponse>>>,
	pub requests: Mutex<Vec<SwapQuoteRequest>>,
	pub calls: AtomicUsize,
}

impl MockQuoteAdapter {
	pub fn new(answers: Vec<QuoteResult<SwapQuoteResponse>>) -> Self {
		Self {
			answers: Mutex::new(answers),
			requests: Mutex::new(Vec::new()),
			calls: AtomicUsize::new(0),
		}
	}

	pub fn always(answer: QuoteResult<SwapQuoteResponse>) -> Self {
		Self::new(vec![answer])
	}

	/// A minimal settled response echoing the request with a fixed output
	/// amount.
	pub fn response_for(request: &SwapQuoteRequest, output_amount: &str) -> SwapQuoteResponse {
		SwapQuoteResponse {
			swapper: request.swapper.clone(),
			input: QuoteSide {
				amount: request.amount.clone(),
				token: request.token_in.to_string(),
				chain_id: request.token_in_chain_id,
			},
			output: QuoteSide {
				amount: output_amount.to_string(),
				token: request.token_out.to_string(),
				chain_id: request.token_out_chain_id,
			},
			recipient: request.swapper.clone(),
			route: vec![],
			route_string: "swap:mockdex".to_string(),
			slippage: request.slippage,
			price_impact: None,
			gas_fee: "0".to_string(),
			gas_fee_usd: None,
			gas_use_estimate: "0".to_string(),
			quote_id: "mock-quote-1".to_string(),
		}
	}
}

#[async_trait]
impl QuoteAdapter for MockQuoteAdapter {
	async fn fetch_quote(&self, request: &SwapQuoteRequest) -> QuoteResult<SwapQuoteResponse> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.requests.lock().unwrap().push(request.clone());
		let mut answers = self.answers.lock().unwrap();
		if answers.len() > 1 {
			answers.remove(0)
		} else {
			match answers.first() {
				Some(Ok(response)) => Ok(response.clone()),
				Some(Err(err)) => Err(err.clone()),
				None => Ok(Self::response_for(request, &request.amount)),
			}
		}
	}
}

/// Risk client mock returning one fixed assessment.
pub struct MockRiskClient {
	pub assessment: Option<TokenRiskResponse>,
	pub calls: AtomicUsize,
}

impl MockRiskClient {
	pub fn new(assessment: TokenRiskResponse) -> Self {
		Self {
			assessment: Some(assessment),
			calls: AtomicUsize::new(0),
		}
	}

	pub fn failing() -> Self {
		Self {
			assessment: None,
			calls: AtomicUsize::new(0),
		}
	}
}

/// Price client mock with per-token USD prices.
#[derive(Default)]
pub struct MockPriceClient {
	/// USD price keyed by `chain_id:token_key`; missing entries have no price.
	pub prices: HashMap<String, f64>,
	/// When set, every lookup fails with this HTTP status.
	pub failure_status: Option<u16>,
	pub calls: AtomicUsize,
}

impl MockPriceClient {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn failing(status_code: u16) -> Self {
		Self {
			failure_status: Some(status_code),
			..Self::default()
		}
	}

	pub fn with_price(mut self, chain_id: u64, token: &TokenAddress, usd: f64) -> Self {
		self.prices.insert(format!("{}:{}", chain_id, token.key()), usd);
		self
	}
}

#[async_trait]
impl PriceClient for MockPriceClient {
	async fn usd_price(&self, chain_id: u64, token: &TokenAddress) -> PriceResult<Option<f64>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if let Some(status_code) = self.failure_status {
			return Err(PriceError::HttpStatus { status_code });
		}
		Ok(self
			.prices
			.get(&format!("{}:{}", chain_id, token.key()))
			.copied())
	}
}

#[async_trait]
impl RiskClient for MockRiskClient {
	async fn token_risk(&self, _chain_id: u64, _token_address: &str) -> RiskResult<TokenRiskResponse> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		match &self.assessment {
			Some(assessment) => Ok(assessment.clone()),
			None => Err(RiskError::Service {
				message: "risk service unavailable".to_string(),
			}),
		}
	}
}
