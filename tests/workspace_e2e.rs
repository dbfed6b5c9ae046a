//! End-to-end workspace flows through the builder with mocked collaborators

use std::sync::atomic::Ordering;
use std::sync::Arc;

use swapdesk::mocks::{MockCatalogClient, MockQuoteAdapter, MockRiskClient, MockRpcClient};
use swapdesk::{
	NetworkScope, QuoteOutcome, RiskAlertLevel, RiskDecision, Settings, SwapQuoteRequest, Token,
	TokenAddress, TokenRiskResponse, WorkspaceBuilder, RECEIVE_PLACEHOLDER, ZERO_BALANCE,
};

const WALLET: &str = "0x1111111111111111111111111111111111111111";
const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";

fn mainnet_settings() -> Settings {
	let mut settings = Settings::default();
	settings.scope = NetworkScope::Production;
	settings.refresh.quote_debounce_ms = 0;
	settings
}

fn warn_assessment() -> TokenRiskResponse {
	TokenRiskResponse {
		decision: RiskDecision::Warn,
		score: Some(61.0),
		badges: vec![],
		alert_level: RiskAlertLevel::Warning,
		alert_title: "Caution".to_string(),
		alert_message: "Token has elevated sell tax".to_string(),
	}
}

fn quote_request(amount: &str, output: &str) -> SwapQuoteRequest {
	SwapQuoteRequest {
		amount: amount.to_string(),
		swapper: WALLET.to_string(),
		token_in: TokenAddress::Native,
		token_in_chain_id: 1,
		token_out: output.parse().unwrap(),
		token_out_chain_id: 1,
		slippage: None,
	}
}

#[tokio::test]
async fn connected_wallet_swap_flow_settles_a_quote() {
	let rpc = Arc::new(
		MockRpcClient::new()
			.with_native_balance(WALLET, 1_500_000_000_000_000_000)
			.with_token_balance(USDC, 2_500_000_000),
	);
	let request = quote_request("100000000000000000", USDC);
	let quotes = Arc::new(MockQuoteAdapter::always(Ok(MockQuoteAdapter::response_for(
		&request,
		"250000000",
	))));
	let mut workspace = WorkspaceBuilder::new(mainnet_settings())
		.with_rpc(rpc)
		.with_catalog_client(Arc::new(MockCatalogClient::new()))
		.with_quote_adapter(quotes.clone())
		.with_risk_client(Arc::new(MockRiskClient::new(warn_assessment())))
		.build()
		.unwrap();

	workspace.set_wallet(Some(WALLET.to_string()));
	workspace.refresh_tokens().await;
	workspace.refresh_balances().await;

	// Curated mainnet list: native first, USDC preselected as output.
	let state = workspace.state();
	assert_eq!(state.from_chain_id, 1);
	assert_eq!(state.from_token, TokenAddress::Native);
	assert_eq!(state.to_token, Some(USDC.parse().unwrap()));
	assert_eq!(state.balances["native"], "1.5000");
	assert_eq!(state.balances[USDC], "2500.0000");

	workspace.set_amount("0.1");
	let outcome = workspace.refresh_quote().await.unwrap();
	assert!(matches!(outcome, QuoteOutcome::Settled(_)));
	assert_eq!(workspace.state().receive_amount, "250");

	// Amount already in smallest units on the wire.
	let sent = quotes.requests.lock().unwrap();
	assert_eq!(sent.len(), 1);
	assert_eq!(sent[0].amount, "100000000000000000");
	assert_eq!(sent[0].swapper, WALLET);
}

#[tokio::test]
async fn no_wallet_yields_no_balances_and_fallback_swapper() {
	let rpc = Arc::new(MockRpcClient::new());
	let quotes = Arc::new(MockQuoteAdapter::new(vec![]));
	let mut workspace = WorkspaceBuilder::new(mainnet_settings())
		.with_rpc(rpc.clone())
		.with_catalog_client(Arc::new(MockCatalogClient::new()))
		.with_quote_adapter(quotes.clone())
		.with_risk_client(Arc::new(MockRiskClient::failing()))
		.build()
		.unwrap();

	workspace.refresh_tokens().await;
	workspace.refresh_balances().await;
	assert!(workspace.state().balances.is_empty());
	assert_eq!(rpc.native_calls.load(Ordering::SeqCst), 0);
	assert_eq!(rpc.batch_calls.load(Ordering::SeqCst), 0);

	// Quotes still work, addressed to the preview swapper.
	workspace.set_amount("1");
	workspace.refresh_quote().await.unwrap();
	let sent = quotes.requests.lock().unwrap();
	assert_eq!(sent[0].swapper, swapdesk::FALLBACK_SWAPPER_ADDRESS);
}

#[tokio::test]
async fn catalog_outage_degrades_to_configured_lists() {
	let mut workspace = WorkspaceBuilder::new(mainnet_settings())
		.with_rpc(Arc::new(MockRpcClient::new()))
		.with_catalog_client(Arc::new(MockCatalogClient::failing("upstream down")))
		.with_quote_adapter(Arc::new(MockQuoteAdapter::new(vec![])))
		.with_risk_client(Arc::new(MockRiskClient::failing()))
		.build()
		.unwrap();

	workspace.refresh_tokens().await;
	let state = workspace.state();
	// Curated fallback still offers the mainnet set.
	assert!(state.from_tokens.iter().any(|t| t.symbol == "ETH"));
	assert!(state.from_tokens.iter().any(|t| t.symbol == "USDC"));
}

#[tokio::test]
async fn remote_catalog_list_replaces_curated_fallback() {
	let pepe = Token::new(
		1,
		"0x6982508145454ce325ddbe47a25d4ec3d2311933".parse().unwrap(),
		"PEPE",
		"Pepe",
		18,
	);
	let catalog = MockCatalogClient::new().with_tokens(1, vec![pepe.clone()]);
	let mut workspace = WorkspaceBuilder::new(mainnet_settings())
		.with_rpc(Arc::new(MockRpcClient::new()))
		.with_catalog_client(Arc::new(catalog))
		.with_quote_adapter(Arc::new(MockQuoteAdapter::new(vec![])))
		.with_risk_client(Arc::new(MockRiskClient::failing()))
		.build()
		.unwrap();

	workspace.refresh_tokens().await;
	assert_eq!(workspace.state().from_tokens, vec![pepe]);
}

#[tokio::test]
async fn flip_without_output_token_is_a_no_op() {
	let mut workspace = WorkspaceBuilder::new(mainnet_settings())
		.with_rpc(Arc::new(MockRpcClient::new()))
		.with_catalog_client(Arc::new(MockCatalogClient::new()))
		.with_quote_adapter(Arc::new(MockQuoteAdapter::new(vec![])))
		.with_risk_client(Arc::new(MockRiskClient::failing()))
		.build()
		.unwrap();

	// Token lists never resolved, so no output token was ever picked.
	workspace.set_amount("2.5");
	workspace.flip_tokens();

	let state = workspace.state();
	assert_eq!(state.from_token, TokenAddress::Native);
	assert_eq!(state.to_token, None);
	assert_eq!(state.amount, "2.5");
	assert_eq!(state.receive_amount, RECEIVE_PLACEHOLDER);
}

#[tokio::test]
async fn import_flow_adds_a_selectable_token() {
	let contract = "0x2222222222222222222222222222222222222222";
	let rpc = Arc::new(MockRpcClient::new().with_metadata(contract, "NEW", "New Token", 8));
	let mut workspace = WorkspaceBuilder::new(mainnet_settings())
		.with_rpc(rpc.clone())
		.with_catalog_client(Arc::new(MockCatalogClient::new()))
		.with_quote_adapter(Arc::new(MockQuoteAdapter::new(vec![])))
		.with_risk_client(Arc::new(MockRiskClient::failing()))
		.build()
		.unwrap();
	workspace.refresh_tokens().await;

	let token = workspace.import_token(1, contract).await.unwrap();
	assert_eq!(token.symbol, "NEW");
	assert!(workspace
		.state()
		.from_tokens
		.iter()
		.any(|t| t.identity_key() == contract));

	// Importing the same contract again is served from the stored entry.
	workspace.import_token(1, contract).await.unwrap();
	assert_eq!(rpc.metadata_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn risk_gate_skips_native_and_checks_contracts() {
	let risk = Arc::new(MockRiskClient::new(warn_assessment()));
	let mut workspace = WorkspaceBuilder::new(mainnet_settings())
		.with_rpc(Arc::new(MockRpcClient::new()))
		.with_catalog_client(Arc::new(MockCatalogClient::new()))
		.with_quote_adapter(Arc::new(MockQuoteAdapter::new(vec![])))
		.with_risk_client(risk.clone())
		.build()
		.unwrap();
	workspace.refresh_tokens().await;

	let assessment = workspace.review_output_token().await.unwrap();
	assert_eq!(assessment.decision, RiskDecision::Warn);
	assert_eq!(risk.calls.load(Ordering::SeqCst), 1);

	workspace.select_output_token(TokenAddress::Native);
	assert!(workspace.review_output_token().await.is_none());
	assert!(workspace.state().risk.is_none());
	assert_eq!(risk.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn dead_endpoints_zero_fill_tracked_balances() {
	let rpc = Arc::new(MockRpcClient::new().with_live_endpoint("https://nowhere.example"));
	let mut workspace = WorkspaceBuilder::new(mainnet_settings())
		.with_rpc(rpc)
		.with_catalog_client(Arc::new(MockCatalogClient::new()))
		.with_quote_adapter(Arc::new(MockQuoteAdapter::new(vec![])))
		.with_risk_client(Arc::new(MockRiskClient::failing()))
		.build()
		.unwrap();
	workspace.set_wallet(Some(WALLET.to_string()));
	workspace.refresh_tokens().await;
	workspace.refresh_balances().await;

	let state = workspace.state();
	assert!(!state.balances.is_empty());
	assert!(state.balances.values().all(|v| v == ZERO_BALANCE));
}
