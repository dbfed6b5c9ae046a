//! Swap workspace orchestration.
//!
//! Holds the user-facing selection state for both sides of a swap and keeps
//! it coherent as token lists resolve, chains change, and quotes settle.
//! All transitions are explicit methods; nothing here reacts to anything on
//! its own.

use std::sync::Arc;
use std::time::Duration;

use swapdesk_adapters::RiskClient;
use swapdesk_types::models::{
	format_from_smallest, is_hex_address, to_smallest_unit, Network, Token, TokenAddress,
	TokenImportError,
};
use swapdesk_types::quotes::SwapQuoteRequest;
use swapdesk_types::TokenRiskResponse;
use tracing::{debug, warn};

use crate::balances::{BalanceFeed, BalanceMap, BalanceService};
use crate::catalog::CatalogService;
use crate::importer::ImportService;
use crate::quote::{QuoteEngine, QuoteOutcome};

/// Receive-amount display before any quote has settled.
pub const RECEIVE_PLACEHOLDER: &str = "0.0";

/// Mutable selection and display state for one swap workspace.
#[derive(Debug, Clone)]
pub struct WorkspaceState {
	pub from_chain_id: u64,
	pub to_chain_id: u64,
	pub from_token: TokenAddress,
	pub to_token: Option<TokenAddress>,
	/// Raw user-entered input amount, decimal string.
	pub amount: String,
	/// Quote-derived output amount, display formatted.
	pub receive_amount: String,
	pub wallet_address: Option<String>,
	pub slippage: Option<f64>,
	pub from_tokens: Vec<Token>,
	pub to_tokens: Vec<Token>,
	pub balances: BalanceMap,
	pub risk: Option<TokenRiskResponse>,
	pub risk_error: Option<String>,
}

impl WorkspaceState {
	fn new(chain_id: u64) -> Self {
		Self {
			from_chain_id: chain_id,
			to_chain_id: chain_id,
			from_token: TokenAddress::Native,
			to_token: None,
			amount: String::new(),
			receive_amount: RECEIVE_PLACEHOLDER.to_string(),
			wallet_address: None,
			slippage: None,
			from_tokens: Vec::new(),
			to_tokens: Vec::new(),
			balances: BalanceMap::new(),
			risk: None,
			risk_error: None,
		}
	}
}

pub struct Workspace {
	catalog: Arc<CatalogService>,
	balances: Arc<BalanceService>,
	importer: Arc<ImportService>,
	quotes: Arc<QuoteEngine>,
	risk: Arc<dyn RiskClient>,
	max_balance_tokens: usize,
	balance_refresh_interval: Duration,
	state: WorkspaceState,
}

impl Workspace {
	pub fn new(
		catalog: Arc<CatalogService>,
		balances: Arc<BalanceService>,
		importer: Arc<ImportService>,
		quotes: Arc<QuoteEngine>,
		risk: Arc<dyn RiskClient>,
		default_chain_id: u64,
		max_balance_tokens: usize,
		balance_refresh_interval: Duration,
	) -> Self {
		Self {
			catalog,
			balances,
			importer,
			quotes,
			risk,
			max_balance_tokens,
			balance_refresh_interval,
			state: WorkspaceState::new(default_chain_id),
		}
	}

	pub fn state(&self) -> &WorkspaceState {
		&self.state
	}

	pub fn quote_engine(&self) -> &Arc<QuoteEngine> {
		&self.quotes
	}

	/// Re-resolves both sides' token lists and re-validates the current
	/// selections against them.
	pub async fn refresh_tokens(&mut self) {
		self.state.from_tokens = self.catalog.tokens_for_chain(self.state.from_chain_id).await;
		self.state.to_tokens = if self.state.to_chain_id == self.state.from_chain_id {
			self.state.from_tokens.clone()
		} else {
			self.catalog.tokens_for_chain(self.state.to_chain_id).await
		};
		self.sync_selection();
	}

	/// Keeps selections valid for the resolved lists.
	///
	/// The input side falls back to the native entry, then the first listed
	/// token. The output side is re-picked when its selection disappeared or
	/// collides with the input selection on the same chain, preferring the
	/// first token that differs from the input.
	fn sync_selection(&mut self) {
		if !self.state.from_tokens.is_empty()
			&& !contains_key(&self.state.from_tokens, &self.state.from_token.key())
		{
			self.state.from_token = default_selection(&self.state.from_tokens);
		}

		if self.state.to_tokens.is_empty() {
			return;
		}
		let from_key = self.state.from_token.key();
		let same_chain = self.state.to_chain_id == self.state.from_chain_id;
		let needs_repick = match &self.state.to_token {
			None => true,
			Some(to) => {
				!contains_key(&self.state.to_tokens, &to.key())
					|| (same_chain && to.key() == from_key)
			}
		};
		if needs_repick {
			let prior = self.state.to_token.take();
			self.state.to_token = self
				.state
				.to_tokens
				.iter()
				.find(|t| !(same_chain && t.identity_key() == from_key))
				.map(|t| t.address.clone());
			// A repick changes the reviewed token, so any prior risk result
			// no longer describes the selection.
			if self.state.to_token != prior {
				self.state.risk = None;
				self.state.risk_error = None;
			}
		}
	}

	/// Cancels any in-flight quote and clears everything derived from one.
	fn reset_quote_view(&mut self) {
		self.quotes.reset();
		self.state.receive_amount = RECEIVE_PLACEHOLDER.to_string();
		self.state.risk = None;
		self.state.risk_error = None;
	}

	pub async fn select_input_chain(&mut self, chain_id: u64) {
		self.state.from_chain_id = chain_id;
		self.reset_quote_view();
		self.state.balances.clear();
		self.refresh_tokens().await;
	}

	pub async fn select_output_chain(&mut self, chain_id: u64) {
		self.state.to_chain_id = chain_id;
		self.state.to_token = None;
		self.reset_quote_view();
		self.refresh_tokens().await;
	}

	pub fn set_wallet(&mut self, wallet: Option<String>) {
		self.state.wallet_address = wallet;
		self.state.balances.clear();
	}

	pub fn set_slippage(&mut self, slippage: Option<f64>) {
		self.state.slippage = slippage;
	}

	/// Records a new input amount. An empty or non-positive amount clears
	/// the displayed receive amount at once, without waiting for a quote.
	pub fn set_amount(&mut self, value: &str) {
		self.state.amount = value.to_string();
		if self.smallest_unit_amount().is_none() {
			self.state.receive_amount = RECEIVE_PLACEHOLDER.to_string();
		}
	}

	pub fn select_input_token(&mut self, address: TokenAddress) {
		self.state.from_token = address;
		self.state.receive_amount = RECEIVE_PLACEHOLDER.to_string();
		self.sync_selection();
	}

	pub fn select_output_token(&mut self, address: TokenAddress) {
		self.state.to_token = Some(address);
		self.state.receive_amount = RECEIVE_PLACEHOLDER.to_string();
		self.state.risk = None;
		self.state.risk_error = None;
	}

	/// Swaps the two sides: chains, tokens, and amounts. A workspace without
	/// an output selection has nothing to flip, so this is a no-op.
	pub fn flip_tokens(&mut self) {
		let Some(to_token) = self.state.to_token.take() else {
			return;
		};

		std::mem::swap(&mut self.state.from_chain_id, &mut self.state.to_chain_id);
		std::mem::swap(&mut self.state.from_tokens, &mut self.state.to_tokens);
		self.state.to_token = Some(std::mem::replace(&mut self.state.from_token, to_token));

		// The settled receive amount becomes the new input amount when it is
		// a usable number; the receive display always starts over.
		let prior_receive = std::mem::replace(
			&mut self.state.receive_amount,
			RECEIVE_PLACEHOLDER.to_string(),
		);
		if parses_positive(&prior_receive) {
			self.state.amount = prior_receive;
		}

		self.state.risk = None;
		self.state.risk_error = None;
		self.state.balances.clear();
	}

	/// Refreshes balances for the input side's visible tokens, capped for
	/// periodic use.
	pub async fn refresh_balances(&mut self) {
		let Some(network) = self.resolved_network(self.state.from_chain_id).await else {
			return;
		};
		let tracked: Vec<Token> = self
			.state
			.from_tokens
			.iter()
			.take(self.max_balance_tokens)
			.cloned()
			.collect();
		self.state.balances = self
			.balances
			.fetch_balances(&network, self.state.wallet_address.as_deref(), &tracked)
			.await;
	}

	/// Starts the periodic background refresh over the same capped token set
	/// as [`refresh_balances`](Self::refresh_balances), publishing each cycle
	/// on the returned feed. `None` when the input chain cannot be resolved.
	/// Dropping the feed stops the task.
	pub async fn start_balance_refresh(&self) -> Option<BalanceFeed> {
		let network = self.resolved_network(self.state.from_chain_id).await?;
		let tracked: Vec<Token> = self
			.state
			.from_tokens
			.iter()
			.take(self.max_balance_tokens)
			.cloned()
			.collect();
		Some(self.balances.spawn_refresh(
			network,
			self.state.wallet_address.clone(),
			tracked,
			self.balance_refresh_interval,
		))
	}

	/// One-shot uncapped balance fetch for the token picker.
	pub async fn fetch_all_balances(&mut self) {
		let Some(network) = self.resolved_network(self.state.from_chain_id).await else {
			return;
		};
		let tokens = self.state.from_tokens.clone();
		self.state.balances = self
			.balances
			.fetch_balances(&network, self.state.wallet_address.as_deref(), &tokens)
			.await;
	}

	/// The quote request for the current selections, or `None` while they
	/// are incomplete (unresolved token, missing output, non-positive
	/// amount).
	pub fn build_quote_request(&self) -> Option<SwapQuoteRequest> {
		let from = find_by_key(&self.state.from_tokens, &self.state.from_token.key())?;
		let to_address = self.state.to_token.as_ref()?;
		let to = find_by_key(&self.state.to_tokens, &to_address.key())?;
		let amount = to_smallest_unit(&self.state.amount, from.decimals)?;

		Some(SwapQuoteRequest {
			amount,
			swapper: SwapQuoteRequest::resolve_swapper(self.state.wallet_address.as_deref()),
			token_in: from.address.clone(),
			token_in_chain_id: self.state.from_chain_id,
			token_out: to.address.clone(),
			token_out_chain_id: self.state.to_chain_id,
			slippage: self.state.slippage,
		})
	}

	/// Requests a fresh quote for the current selections and applies the
	/// settled receive amount. Incomplete selections cancel any in-flight
	/// request instead.
	pub async fn refresh_quote(&mut self) -> Option<QuoteOutcome> {
		let Some(request) = self.build_quote_request() else {
			self.quotes.reset();
			self.state.receive_amount = RECEIVE_PLACEHOLDER.to_string();
			return None;
		};
		let token_out = request.token_out.clone();
		let outcome = self.quotes.request_quote(request).await;

		if let QuoteOutcome::Settled(response) = &outcome {
			// Apply only when the output selection has not moved on since
			// the request was built.
			let still_selected = self
				.state
				.to_token
				.as_ref()
				.map(|t| t.key() == token_out.key())
				.unwrap_or(false);
			if still_selected {
				if let Some(to) = find_by_key(&self.state.to_tokens, &token_out.key()) {
					self.state.receive_amount =
						format_from_smallest(&response.output.amount, to.decimals);
				}
			} else {
				debug!("discarding settled quote for a deselected output token");
			}
		}
		Some(outcome)
	}

	/// Risk check for the review step. A native output needs no check and
	/// clears any prior result without a network call.
	pub async fn review_output_token(&mut self) -> Option<TokenRiskResponse> {
		let contract = match self.state.to_token.as_ref().and_then(TokenAddress::contract) {
			Some(contract) => contract.to_string(),
			None => {
				self.state.risk = None;
				self.state.risk_error = None;
				return None;
			}
		};

		match self.risk.token_risk(self.state.to_chain_id, &contract).await {
			Ok(result) => {
				self.state.risk = Some(result.clone());
				self.state.risk_error = None;
				Some(result)
			}
			Err(err) => {
				warn!(error = %err, "token risk check failed");
				self.state.risk = None;
				self.state.risk_error = Some(err.to_string());
				None
			}
		}
	}

	/// Imports a custom token onto a chain and refreshes the token lists so
	/// it becomes selectable.
	pub async fn import_token(
		&mut self,
		chain_id: u64,
		raw_address: &str,
	) -> Result<Token, TokenImportError> {
		let network = self
			.resolved_network(chain_id)
			.await
			.ok_or(TokenImportError::LookupUnavailable)?;
		let token = self.importer.import_token(&network, raw_address).await?;
		self.refresh_tokens().await;
		Ok(token)
	}

	async fn resolved_network(&self, chain_id: u64) -> Option<Network> {
		self.catalog
			.list_networks()
			.await
			.into_iter()
			.find(|n| n.chain_id == chain_id)
	}

	fn smallest_unit_amount(&self) -> Option<String> {
		let decimals = find_by_key(&self.state.from_tokens, &self.state.from_token.key())
			.map(|t| t.decimals)
			.unwrap_or(18);
		to_smallest_unit(&self.state.amount, decimals)
	}
}

fn contains_key(tokens: &[Token], key: &str) -> bool {
	tokens.iter().any(|t| t.identity_key() == key)
}

fn find_by_key<'a>(tokens: &'a [Token], key: &str) -> Option<&'a Token> {
	tokens.iter().find(|t| t.identity_key() == key)
}

fn default_selection(tokens: &[Token]) -> TokenAddress {
	tokens
		.iter()
		.find(|t| t.is_native())
		.or_else(|| tokens.first())
		.map(|t| t.address.clone())
		.unwrap_or(TokenAddress::Native)
}

fn parses_positive(value: &str) -> bool {
	value.trim().parse::<f64>().map(|v| v > 0.0).unwrap_or(false)
}

/// Tokens ordered by held balance, largest first; ties keep list order.
pub fn sort_tokens_by_balance(tokens: &[Token], balances: &BalanceMap) -> Vec<Token> {
	let mut sorted: Vec<Token> = tokens.to_vec();
	sorted.sort_by(|a, b| {
		let balance_of = |t: &Token| {
			balances
				.get(&t.identity_key())
				.and_then(|v| v.parse::<f64>().ok())
				.unwrap_or(0.0)
		};
		balance_of(b)
			.partial_cmp(&balance_of(a))
			.unwrap_or(std::cmp::Ordering::Equal)
	});
	sorted
}

/// Case-insensitive token search over symbol, name, and contract address.
pub fn filter_tokens(tokens: &[Token], query: &str) -> Vec<Token> {
	let needle = query.trim().to_lowercase();
	if needle.is_empty() {
		return tokens.to_vec();
	}
	tokens
		.iter()
		.filter(|t| {
			t.symbol.to_lowercase().contains(&needle)
				|| t.name.to_lowercase().contains(&needle)
				|| t.identity_key().contains(&needle)
		})
		.cloned()
		.collect()
}

/// Whether a picker query is importable: a well-formed contract address not
/// already present in the list.
pub fn can_import(tokens: &[Token], query: &str) -> bool {
	let trimmed = query.trim();
	is_hex_address(trimmed) && !contains_key(tokens, &trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::time::Duration;
	use swapdesk_adapters::{
		CatalogClient, CatalogResult, QuoteAdapter, RemoteNetwork, RiskResult, RpcClient,
		RpcError, TokenMetadata,
	};
	use swapdesk_storage::MemoryStore;
	use swapdesk_types::models::NetworkScope;
	use swapdesk_types::quotes::{QuoteResult, QuoteSide, SwapQuoteResponse};
	use swapdesk_types::{RiskAlertLevel, RiskDecision};

	const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
	const USDT: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";
	const WALLET: &str = "0x1111111111111111111111111111111111111111";

	struct NullCatalogClient;

	#[async_trait]
	impl CatalogClient for NullCatalogClient {
		async fn fetch_networks(&self) -> CatalogResult<Vec<RemoteNetwork>> {
			Ok(vec![])
		}

		async fn fetch_tokens(&self, _chain_id: u64) -> CatalogResult<Vec<Token>> {
			Ok(vec![])
		}
	}

	struct StubRpc;

	#[async_trait]
	impl RpcClient for StubRpc {
		async fn block_number(&self, _endpoint: &str) -> Result<u64, RpcError> {
			Ok(1)
		}

		async fn native_balance(&self, _endpoint: &str, _holder: &str) -> Result<u128, RpcError> {
			Ok(0)
		}

		async fn token_balances(
			&self,
			_endpoint: &str,
			_holder: &str,
			tokens: &[String],
		) -> Result<Vec<Option<u128>>, RpcError> {
			Ok(vec![None; tokens.len()])
		}

		async fn token_metadata(&self, _endpoint: &str, _token: &str) -> Result<TokenMetadata, RpcError> {
			Ok(TokenMetadata {
				symbol: "NEW".to_string(),
				name: "New Token".to_string(),
				decimals: 8,
			})
		}
	}

	struct FixedQuoteAdapter {
		output_amount: String,
		calls: AtomicUsize,
	}

	#[async_trait]
	impl QuoteAdapter for FixedQuoteAdapter {
		async fn fetch_quote(&self, request: &SwapQuoteRequest) -> QuoteResult<SwapQuoteResponse> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(SwapQuoteResponse {
				swapper: request.swapper.clone(),
				input: QuoteSide {
					amount: request.amount.clone(),
					token: request.token_in.to_string(),
					chain_id: request.token_in_chain_id,
				},
				output: QuoteSide {
					amount: self.output_amount.clone(),
					token: request.token_out.to_string(),
					chain_id: request.token_out_chain_id,
				},
				recipient: request.swapper.clone(),
				route: vec![],
				route_string: "swap:uniswap".to_string(),
				slippage: None,
				price_impact: None,
				gas_fee: "0".to_string(),
				gas_fee_usd: None,
				gas_use_estimate: "0".to_string(),
				quote_id: "quote-1".to_string(),
			})
		}
	}

	struct ScriptedRisk {
		calls: AtomicUsize,
	}

	#[async_trait]
	impl RiskClient for ScriptedRisk {
		async fn token_risk(&self, _chain_id: u64, _token_address: &str) -> RiskResult<TokenRiskResponse> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(TokenRiskResponse {
				decision: RiskDecision::Warn,
				score: Some(61.0),
				badges: vec![],
				alert_level: RiskAlertLevel::Warning,
				alert_title: "Caution".to_string(),
				alert_message: "Token has elevated sell tax".to_string(),
			})
		}
	}

	fn network() -> Network {
		Network::new(
			1,
			"Ethereum",
			vec!["https://rpc.example".to_string()],
			"https://etherscan.io",
			"ETH",
			NetworkScope::Production,
		)
	}

	fn native_eth() -> Token {
		Token::new(1, TokenAddress::Native, "ETH", "Ether", 18)
	}

	fn usdc() -> Token {
		Token::new(1, USDC.parse().unwrap(), "USDC", "USD Coin", 6)
	}

	fn usdt() -> Token {
		Token::new(1, USDT.parse().unwrap(), "USDT", "Tether USD", 6)
	}

	struct Fixture {
		workspace: Workspace,
		quote_calls: Arc<FixedQuoteAdapter>,
		risk_calls: Arc<ScriptedRisk>,
	}

	fn fixture() -> Fixture {
		let rpc = Arc::new(StubRpc);
		let selector = Arc::new(crate::endpoints::EndpointSelector::new(rpc.clone()));
		let catalog = Arc::new(CatalogService::new(
			Arc::new(NullCatalogClient),
			Arc::new(MemoryStore::new()),
			vec![network()],
			vec![native_eth(), usdc(), usdt()],
			chrono::Duration::minutes(30),
		));
		let balances = Arc::new(BalanceService::new(rpc.clone(), selector.clone()));
		let importer = Arc::new(ImportService::new(rpc, selector, catalog.clone()));
		let quote_adapter = Arc::new(FixedQuoteAdapter {
			output_amount: "250000000".to_string(),
			calls: AtomicUsize::new(0),
		});
		let quotes = Arc::new(QuoteEngine::new(quote_adapter.clone(), Duration::ZERO));
		let risk = Arc::new(ScriptedRisk {
			calls: AtomicUsize::new(0),
		});

		Fixture {
			workspace: Workspace::new(
				catalog,
				balances,
				importer,
				quotes,
				risk.clone(),
				1,
				30,
				Duration::from_secs(30),
			),
			quote_calls: quote_adapter,
			risk_calls: risk,
		}
	}

	#[tokio::test]
	async fn default_selection_prefers_native_and_distinct_output() {
		let mut fx = fixture();
		fx.workspace.refresh_tokens().await;

		let state = fx.workspace.state();
		assert_eq!(state.from_token, TokenAddress::Native);
		assert_eq!(state.to_token, Some(usdc().address));
	}

	#[tokio::test]
	async fn output_repicks_when_it_collides_with_input() {
		let mut fx = fixture();
		fx.workspace.refresh_tokens().await;

		fx.workspace.select_input_token(usdc().address);
		let state = fx.workspace.state();
		assert_eq!(state.from_token, usdc().address);
		assert_ne!(state.to_token, Some(usdc().address));
	}

	#[tokio::test]
	async fn output_repick_clears_stale_risk_assessment() {
		let mut fx = fixture();
		fx.workspace.refresh_tokens().await;

		// Review stores a Warn result for the USDC output selection.
		fx.workspace.review_output_token().await.unwrap();
		assert!(fx.workspace.state().risk.is_some());

		// Picking USDC as input forces the output to re-pick (to native
		// here), so the stored assessment no longer describes it.
		fx.workspace.select_input_token(usdc().address);
		let state = fx.workspace.state();
		assert_eq!(state.to_token, Some(TokenAddress::Native));
		assert!(state.risk.is_none());
		assert!(state.risk_error.is_none());
	}

	#[tokio::test]
	async fn flip_without_output_token_is_a_no_op() {
		let mut fx = fixture();
		fx.workspace.set_amount("1.5");

		fx.workspace.flip_tokens();
		let state = fx.workspace.state();
		assert_eq!(state.from_token, TokenAddress::Native);
		assert_eq!(state.to_token, None);
		assert_eq!(state.amount, "1.5");
	}

	#[tokio::test]
	async fn flip_swaps_sides_and_resets_receive() {
		let mut fx = fixture();
		fx.workspace.refresh_tokens().await;
		fx.workspace.set_amount("1");
		fx.workspace.refresh_quote().await;
		assert_eq!(fx.workspace.state().receive_amount, "250");

		fx.workspace.flip_tokens();
		let state = fx.workspace.state();
		assert_eq!(state.from_token, usdc().address);
		assert_eq!(state.to_token, Some(TokenAddress::Native));
		assert_eq!(state.amount, "250");
		assert_eq!(state.receive_amount, RECEIVE_PLACEHOLDER);
	}

	#[tokio::test]
	async fn empty_or_zero_amount_clears_receive_immediately() {
		let mut fx = fixture();
		fx.workspace.refresh_tokens().await;
		fx.workspace.set_amount("1");
		fx.workspace.refresh_quote().await;
		assert_eq!(fx.workspace.state().receive_amount, "250");

		fx.workspace.set_amount("0");
		assert_eq!(fx.workspace.state().receive_amount, RECEIVE_PLACEHOLDER);

		fx.workspace.set_amount("");
		assert_eq!(fx.workspace.state().receive_amount, RECEIVE_PLACEHOLDER);
	}

	#[tokio::test]
	async fn quote_request_converts_amount_to_smallest_unit() {
		let mut fx = fixture();
		fx.workspace.refresh_tokens().await;
		fx.workspace.set_amount("0.1");

		let request = fx.workspace.build_quote_request().unwrap();
		assert_eq!(request.amount, "100000000000000000");
		assert_eq!(request.token_in, TokenAddress::Native);
		assert_eq!(request.token_out, usdc().address);
		assert_eq!(request.swapper, swapdesk_types::quotes::FALLBACK_SWAPPER_ADDRESS);
	}

	#[tokio::test]
	async fn incomplete_selection_builds_no_request_and_resets_engine() {
		let mut fx = fixture();
		fx.workspace.refresh_tokens().await;
		// No amount entered yet.
		assert!(fx.workspace.build_quote_request().is_none());
		assert!(fx.workspace.refresh_quote().await.is_none());
		assert_eq!(fx.quote_calls.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn settled_quote_formats_receive_in_output_decimals() {
		let mut fx = fixture();
		fx.workspace.refresh_tokens().await;
		fx.workspace.set_amount("0.1");

		let outcome = fx.workspace.refresh_quote().await.unwrap();
		assert!(matches!(outcome, QuoteOutcome::Settled(_)));
		// 250000000 in 6 decimals.
		assert_eq!(fx.workspace.state().receive_amount, "250");
		assert_eq!(fx.quote_calls.calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn review_skips_risk_check_for_native_output() {
		let mut fx = fixture();
		fx.workspace.refresh_tokens().await;
		fx.workspace.select_output_token(TokenAddress::Native);

		let result = fx.workspace.review_output_token().await;
		assert!(result.is_none());
		assert!(fx.workspace.state().risk.is_none());
		assert_eq!(fx.risk_calls.calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn review_checks_risk_for_contract_output() {
		let mut fx = fixture();
		fx.workspace.refresh_tokens().await;

		let result = fx.workspace.review_output_token().await.unwrap();
		assert_eq!(result.decision, RiskDecision::Warn);
		assert!(fx.workspace.state().risk.is_some());
		assert_eq!(fx.risk_calls.calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn imported_token_becomes_selectable() {
		let mut fx = fixture();
		fx.workspace.refresh_tokens().await;

		let address = "0x2222222222222222222222222222222222222222";
		let token = fx.workspace.import_token(1, address).await.unwrap();
		assert_eq!(token.symbol, "NEW");
		assert!(contains_key(&fx.workspace.state().from_tokens, address));
	}

	#[tokio::test(start_paused = true)]
	async fn background_refresh_feed_publishes_input_side_balances() {
		let mut fx = fixture();
		fx.workspace.refresh_tokens().await;
		fx.workspace.set_wallet(Some(WALLET.to_string()));

		let mut feed = fx.workspace.start_balance_refresh().await.unwrap();
		feed.updates.changed().await.unwrap();

		let published = feed.updates.borrow().clone();
		assert_eq!(published.len(), fx.workspace.state().from_tokens.len());
		assert_eq!(published[&native_eth().identity_key()], "0.0000");
	}

	#[tokio::test]
	async fn wallet_less_refresh_leaves_balances_empty() {
		let mut fx = fixture();
		fx.workspace.refresh_tokens().await;
		fx.workspace.refresh_balances().await;
		assert!(fx.workspace.state().balances.is_empty());
	}

	#[test]
	fn balance_sort_is_descending_and_stable() {
		let tokens = vec![native_eth(), usdc(), usdt()];
		let mut balances = BalanceMap::new();
		balances.insert(usdc().identity_key(), "12.5000".to_string());
		balances.insert(native_eth().identity_key(), "0.0000".to_string());

		let sorted = sort_tokens_by_balance(&tokens, &balances);
		assert_eq!(sorted[0], usdc());
		// Ties at zero keep list order.
		assert_eq!(sorted[1], native_eth());
		assert_eq!(sorted[2], usdt());
	}

	#[test]
	fn search_matches_symbol_name_and_address() {
		let tokens = vec![native_eth(), usdc(), usdt()];
		assert_eq!(filter_tokens(&tokens, "usd").len(), 2);
		assert_eq!(filter_tokens(&tokens, "ether"), vec![native_eth()]);
		assert_eq!(filter_tokens(&tokens, USDT), vec![usdt()]);
		assert_eq!(filter_tokens(&tokens, ""), tokens);
	}

	#[test]
	fn import_eligibility_requires_new_valid_address() {
		let tokens = vec![usdc()];
		assert!(can_import(&tokens, "0x2222222222222222222222222222222222222222"));
		assert!(!can_import(&tokens, USDC));
		assert!(!can_import(&tokens, "usdc"));
	}
}
