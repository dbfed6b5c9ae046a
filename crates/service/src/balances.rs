//! Wallet balance aggregation.
//!
//! Balances for the visible token set are fetched in one pass per cycle: a
//! single native-balance call covers every native entry, and contract tokens
//! go through batched `balanceOf` reads in fixed-size chunks. Partial
//! failures degrade to zero rather than failing the cycle; display strings
//! always come back formatted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use swapdesk_adapters::RpcClient;
use swapdesk_types::models::{format_balance, is_hex_address, Network, Token, ZERO_BALANCE};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::endpoints::EndpointSelector;

/// Contract tokens per batched `balanceOf` request.
pub const CONTRACT_CHUNK_SIZE: usize = 100;

/// Balance display strings keyed by token identity key.
pub type BalanceMap = HashMap<String, String>;

pub struct BalanceService {
	rpc: Arc<dyn RpcClient>,
	selector: Arc<EndpointSelector>,
}

impl BalanceService {
	pub fn new(rpc: Arc<dyn RpcClient>, selector: Arc<EndpointSelector>) -> Self {
		Self { rpc, selector }
	}

	/// Fetches formatted balances for `tokens` held by `wallet`.
	///
	/// Without a valid wallet address or any tokens the result is empty and
	/// no network traffic happens. When no endpoint answers, every token maps
	/// to the zero display value. A failed contract chunk zero-fills only its
	/// own tokens; the rest of the cycle proceeds.
	pub async fn fetch_balances(
		&self,
		network: &Network,
		wallet: Option<&str>,
		tokens: &[Token],
	) -> BalanceMap {
		let wallet = match wallet {
			Some(addr) if is_hex_address(addr) => addr,
			_ => return BalanceMap::new(),
		};
		if tokens.is_empty() {
			return BalanceMap::new();
		}

		let mut balances = BalanceMap::new();

		let endpoint = match self.selector.resolve(network.chain_id, &network.endpoints).await {
			Ok(endpoint) => endpoint,
			Err(err) => {
				debug!(chain_id = network.chain_id, error = %err, "no live endpoint, zero-filling balances");
				zero_fill(&mut balances, tokens);
				return balances;
			}
		};

		let natives: Vec<&Token> = tokens.iter().filter(|t| t.is_native()).collect();
		let contracts: Vec<&Token> = tokens.iter().filter(|t| !t.is_native()).collect();

		if !natives.is_empty() {
			match self.rpc.native_balance(&endpoint, wallet).await {
				Ok(raw) => {
					for token in &natives {
						balances.insert(token.identity_key(), format_balance(raw, token.decimals));
					}
				}
				Err(err) => {
					debug!(chain_id = network.chain_id, error = %err, "native balance fetch failed");
				}
			}
		}

		for chunk in contracts.chunks(CONTRACT_CHUNK_SIZE) {
			let addresses: Vec<String> = chunk
				.iter()
				.filter_map(|t| t.address.contract().map(str::to_string))
				.collect();
			match self.rpc.token_balances(&endpoint, wallet, &addresses).await {
				Ok(results) => {
					for (token, raw) in chunk.iter().zip(results) {
						if let Some(raw) = raw {
							balances.insert(token.identity_key(), format_balance(raw, token.decimals));
						}
					}
				}
				Err(err) => {
					debug!(
						chain_id = network.chain_id,
						chunk_len = chunk.len(),
						error = %err,
						"balance chunk failed"
					);
				}
			}
		}

		zero_fill(&mut balances, tokens);
		balances
	}

	/// Spawns a periodic refresh that publishes each cycle's balances on a
	/// watch channel. The task runs an immediate first cycle, then one per
	/// interval, and stops once every receiver is gone.
	pub fn spawn_refresh(
		self: &Arc<Self>,
		network: Network,
		wallet: Option<String>,
		tokens: Vec<Token>,
		interval: Duration,
	) -> BalanceFeed {
		let (tx, rx) = watch::channel(BalanceMap::new());
		let service = Arc::clone(self);

		let handle = tokio::spawn(async move {
			info!(
				chain_id = network.chain_id,
				tokens = tokens.len(),
				interval_secs = interval.as_secs(),
				"starting balance refresh task"
			);
			let mut ticker = tokio::time::interval(interval);
			loop {
				ticker.tick().await;
				let balances = service
					.fetch_balances(&network, wallet.as_deref(), &tokens)
					.await;
				if tx.send(balances).is_err() {
					debug!(chain_id = network.chain_id, "balance feed closed, stopping refresh task");
					break;
				}
			}
		});

		BalanceFeed { updates: rx, handle }
	}
}

/// Handle to a running balance refresh task. Dropping it aborts the task.
pub struct BalanceFeed {
	pub updates: watch::Receiver<BalanceMap>,
	handle: JoinHandle<()>,
}

impl Drop for BalanceFeed {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

fn zero_fill(balances: &mut BalanceMap, tokens: &[Token]) {
	for token in tokens {
		balances
			.entry(token.identity_key())
			.or_insert_with(|| ZERO_BALANCE.to_string());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use swapdesk_adapters::{RpcError, TokenMetadata};
	use swapdesk_types::models::{NetworkScope, TokenAddress, NATIVE_SENTINEL};

	const WALLET: &str = "0x1111111111111111111111111111111111111111";

	struct ScriptedRpc {
		native: Result<u128, ()>,
		contracts: Result<Vec<Option<u128>>, ()>,
		native_calls: AtomicUsize,
		batch_calls: AtomicUsize,
	}

	impl ScriptedRpc {
		fn new(native: Result<u128, ()>, contracts: Result<Vec<Option<u128>>, ()>) -> Self {
			Self {
				native,
				contracts,
				native_calls: AtomicUsize::new(0),
				batch_calls: AtomicUsize::new(0),
			}
		}
	}

	fn transport_error() -> RpcError {
		RpcError::HttpStatus {
			status_code: 502,
			reason: "bad gateway".into(),
		}
	}

	#[async_trait]
	impl RpcClient for ScriptedRpc {
		async fn block_number(&self, _endpoint: &str) -> Result<u64, RpcError> {
			Ok(1)
		}

		async fn native_balance(&self, _endpoint: &str, _holder: &str) -> Result<u128, RpcError> {
			self.native_calls.fetch_add(1, Ordering::SeqCst);
			self.native.map_err(|_| transport_error())
		}

		async fn token_balances(
			&self,
			_endpoint: &str,
			_holder: &str,
			tokens: &[String],
		) -> Result<Vec<Option<u128>>, RpcError> {
			self.batch_calls.fetch_add(1, Ordering::SeqCst);
			match &self.contracts {
				Ok(all) => Ok(all.iter().take(tokens.len()).copied().collect()),
				Err(_) => Err(transport_error()),
			}
		}

		async fn token_metadata(&self, _endpoint: &str, _token: &str) -> Result<TokenMetadata, RpcError> {
			unimplemented!()
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

	fn native_token() -> Token {
		Token::new(1, TokenAddress::Native, "ETH", "Ether", 18)
	}

	fn contract_token(n: u8) -> Token {
		let address = format!("0x{:040x}", n as u64 + 0xa000);
		Token::new(1, TokenAddress::Contract(address), "TKN", "Token", 6)
	}

	fn service(rpc: Arc<ScriptedRpc>) -> BalanceService {
		let selector = Arc::new(EndpointSelector::new(rpc.clone()));
		BalanceService::new(rpc, selector)
	}

	#[tokio::test]
	async fn missing_wallet_yields_empty_map_without_calls() {
		let rpc = Arc::new(ScriptedRpc::new(Ok(0), Ok(vec![])));
		let balances = service(rpc.clone())
			.fetch_balances(&network(), None, &[native_token()])
			.await;
		assert!(balances.is_empty());
		assert_eq!(rpc.native_calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn invalid_wallet_yields_empty_map_without_calls() {
		let rpc = Arc::new(ScriptedRpc::new(Ok(0), Ok(vec![])));
		let balances = service(rpc.clone())
			.fetch_balances(&network(), Some("vitalik.eth"), &[native_token()])
			.await;
		assert!(balances.is_empty());
		assert_eq!(rpc.native_calls.load(Ordering::SeqCst), 0);
	}

	#[tokio::test]
	async fn native_and_contract_balances_are_formatted() {
		// 1.5 ETH and 2500.123456 units of a 6-decimal token.
		let rpc = Arc::new(ScriptedRpc::new(
			Ok(1_500_000_000_000_000_000),
			Ok(vec![Some(2_500_123_456)]),
		));
		let tokens = vec![native_token(), contract_token(1)];
		let balances = service(rpc).fetch_balances(&network(), Some(WALLET), &tokens).await;

		assert_eq!(balances[NATIVE_SENTINEL], "1.5000");
		assert_eq!(balances[&tokens[1].identity_key()], "2500.1234");
	}

	#[tokio::test]
	async fn failed_contract_chunk_zero_fills_but_keeps_native() {
		let rpc = Arc::new(ScriptedRpc::new(Ok(1_000_000_000_000_000_000), Err(())));
		let tokens = vec![native_token(), contract_token(1), contract_token(2)];
		let balances = service(rpc).fetch_balances(&network(), Some(WALLET), &tokens).await;

		assert_eq!(balances[NATIVE_SENTINEL], "1.0000");
		assert_eq!(balances[&tokens[1].identity_key()], ZERO_BALANCE);
		assert_eq!(balances[&tokens[2].identity_key()], ZERO_BALANCE);
	}

	#[tokio::test]
	async fn per_token_batch_misses_become_zero() {
		let rpc = Arc::new(ScriptedRpc::new(Ok(0), Ok(vec![Some(5_000_000), None])));
		let tokens = vec![contract_token(1), contract_token(2)];
		let balances = service(rpc).fetch_balances(&network(), Some(WALLET), &tokens).await;

		assert_eq!(balances[&tokens[0].identity_key()], "5.0000");
		assert_eq!(balances[&tokens[1].identity_key()], ZERO_BALANCE);
	}

	#[tokio::test]
	async fn contract_tokens_are_chunked() {
		let results: Vec<Option<u128>> = vec![Some(1_000_000); 150];
		let rpc = Arc::new(ScriptedRpc::new(Ok(0), Ok(results)));
		let tokens: Vec<Token> = (0..150).map(|n| contract_token(n as u8)).collect();

		// 150 unique contract addresses requires exactly two batches.
		let unique: std::collections::HashSet<String> =
			tokens.iter().map(|t| t.identity_key()).collect();
		assert_eq!(unique.len(), 150);

		let balances = service(rpc.clone())
			.fetch_balances(&network(), Some(WALLET), &tokens)
			.await;
		assert_eq!(balances.len(), 150);
		assert_eq!(rpc.batch_calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test(start_paused = true)]
	async fn refresh_task_publishes_cycles_and_stops_when_dropped() {
		let rpc = Arc::new(ScriptedRpc::new(Ok(2_000_000_000_000_000_000), Ok(vec![])));
		let service = Arc::new(service(rpc));
		let mut feed = service.spawn_refresh(
			network(),
			Some(WALLET.to_string()),
			vec![native_token()],
			Duration::from_secs(30),
		);

		feed.updates.changed().await.unwrap();
		assert_eq!(feed.updates.borrow()[NATIVE_SENTINEL], "2.0000");
	}
}
