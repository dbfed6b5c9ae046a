//! Swapdesk Library
//!
//! Client-side data orchestration for a cross-chain swap review workspace:
//! network and token catalogs with a durable local cache, live RPC endpoint
//! selection, wallet balance aggregation, custom token import, and debounced
//! last-request-wins quoting.

use std::sync::Arc;

use swapdesk_adapters::{
	CatalogClient, HttpCatalogClient, HttpRiskClient, HttpRpcClient, LifiAdapter, LifiConfig,
	QuoteAdapter, RiskClient, RpcClient,
};
use swapdesk_service::{
	BalanceService, CatalogService, EndpointSelector, ImportService, QuoteEngine, Workspace,
};
use swapdesk_storage::{CacheStore, FileStore, MemoryStore};
use swapdesk_types::chrono::Duration as TtlDuration;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Core domain types - the most commonly used types
pub use swapdesk_types::{
	chrono,
	// External dependencies for convenience
	serde_json,
	dedupe_tokens,
	format_balance,
	format_from_smallest,
	is_hex_address,
	to_smallest_unit,
	EndpointError,
	// Primary domain entities
	Network,
	NetworkScope,
	QuoteRouteStep,
	QuoteSide,
	RiskAlertLevel,
	RiskDecision,
	// Error types
	SwapQuoteError,
	FALLBACK_SWAPPER_ADDRESS,
	SwapQuoteRequest,
	SwapQuoteResponse,
	Token,
	TokenAddress,
	TokenImportError,
	TokenRiskBadge,
	TokenRiskResponse,
	ZERO_BALANCE,
};

// Service layer
pub use swapdesk_service::{
	can_import, filter_tokens, sort_tokens_by_balance, BalanceFeed, BalanceMap, PriceService,
	QuoteOutcome, QuoteState, WorkspaceState, CONTRACT_CHUNK_SIZE, PRICE_TTL, RECEIVE_PLACEHOLDER,
};

// Storage layer
pub use swapdesk_storage::{CacheEntry, StorageError, StorageResult};

// Adapters
pub use swapdesk_adapters::{HttpPriceClient, PriceClient, RpcError, TokenMetadata, COINGECKO_BASE_URL};

// Config
pub use swapdesk_config::{load_config, LogFormat, LoggingSettings, Settings};

// Module aliases for direct access to the member crates
pub mod models {
	pub use swapdesk_types::*;
}

pub mod storage {
	pub use swapdesk_storage::*;
}

pub mod config {
	pub use swapdesk_config::*;
}

pub mod adapters {
	pub use swapdesk_adapters::*;
}

pub mod service {
	pub use swapdesk_service::*;
}

pub mod mocks;

// Re-export external dependencies for downstream tests and demos
pub use async_trait;

/// Failures while assembling a workspace from settings
#[derive(Debug, Error)]
pub enum BuildError {
	#[error("rpc client: {0}")]
	Rpc(#[from] swapdesk_adapters::RpcError),

	#[error("catalog client: {0}")]
	Catalog(#[from] swapdesk_adapters::CatalogError),

	#[error("quote adapter: {0}")]
	Quote(#[from] swapdesk_types::SwapQuoteError),

	#[error("risk client: {0}")]
	Risk(#[from] swapdesk_adapters::RiskError),
}

/// Builder wiring settings into a ready-to-use [`Workspace`].
///
/// Every collaborator can be swapped for a test double before `build`;
/// anything left unset is constructed from the settings.
pub struct WorkspaceBuilder {
	settings: Settings,
	rpc: Option<Arc<dyn RpcClient>>,
	catalog_client: Option<Arc<dyn CatalogClient>>,
	quote_adapter: Option<Arc<dyn QuoteAdapter>>,
	risk_client: Option<Arc<dyn RiskClient>>,
	store: Option<Arc<dyn CacheStore>>,
}

impl WorkspaceBuilder {
	pub fn new(settings: Settings) -> Self {
		Self {
			settings,
			rpc: None,
			catalog_client: None,
			quote_adapter: None,
			risk_client: None,
			store: None,
		}
	}

	/// Builder from the config file merged over built-in defaults.
	pub fn from_config() -> Result<Self, swapdesk_config::ConfigError> {
		Ok(Self::new(load_config()?))
	}

	pub fn with_rpc(mut self, rpc: Arc<dyn RpcClient>) -> Self {
		self.rpc = Some(rpc);
		self
	}

	pub fn with_catalog_client(mut self, client: Arc<dyn CatalogClient>) -> Self {
		self.catalog_client = Some(client);
		self
	}

	pub fn with_quote_adapter(mut self, adapter: Arc<dyn QuoteAdapter>) -> Self {
		self.quote_adapter = Some(adapter);
		self
	}

	pub fn with_risk_client(mut self, client: Arc<dyn RiskClient>) -> Self {
		self.risk_client = Some(client);
		self
	}

	pub fn with_store(mut self, store: Arc<dyn CacheStore>) -> Self {
		self.store = Some(store);
		self
	}

	pub fn build(self) -> Result<Workspace, BuildError> {
		let settings = self.settings;

		let rpc: Arc<dyn RpcClient> = match self.rpc {
			Some(rpc) => rpc,
			None => Arc::new(HttpRpcClient::new()?),
		};
		let catalog_client: Arc<dyn CatalogClient> = match self.catalog_client {
			Some(client) => client,
			None => Arc::new(HttpCatalogClient::new(settings.catalog.base_url.clone())?),
		};
		let quote_adapter: Arc<dyn QuoteAdapter> = match self.quote_adapter {
			Some(adapter) => adapter,
			None => Arc::new(LifiAdapter::new(LifiConfig {
				base_url: settings.quote.base_url.clone(),
				integrator: settings.quote.integrator.clone(),
				api_key: settings.quote.api_key.clone(),
			})?),
		};
		let risk_client: Arc<dyn RiskClient> = match self.risk_client {
			Some(client) => client,
			None => Arc::new(HttpRiskClient::new(settings.risk.base_url.clone())?),
		};
		let store: Arc<dyn CacheStore> = match self.store {
			Some(store) => store,
			None => match &settings.cache.directory {
				Some(directory) => Arc::new(FileStore::new(directory)),
				None => Arc::new(MemoryStore::new()),
			},
		};

		let allow_list = settings.allowed_networks();
		let curated: Vec<Token> = allow_list
			.iter()
			.flat_map(|network| settings.curated_tokens_for(network.chain_id))
			.collect();
		let default_chain_id = settings.default_chain_id().unwrap_or(1);

		let selector = Arc::new(EndpointSelector::new(rpc.clone()));
		let catalog = Arc::new(CatalogService::new(
			catalog_client,
			store,
			allow_list,
			curated,
			TtlDuration::minutes(settings.cache.metadata_ttl_minutes),
		));
		let balances = Arc::new(BalanceService::new(rpc.clone(), selector.clone()));
		let importer = Arc::new(ImportService::new(rpc, selector, catalog.clone()));
		let quotes = Arc::new(QuoteEngine::new(
			quote_adapter,
			std::time::Duration::from_millis(settings.refresh.quote_debounce_ms),
		));

		info!(
			chains = catalog.allow_list().len(),
			default_chain_id, "workspace assembled"
		);

		Ok(Workspace::new(
			catalog,
			balances,
			importer,
			quotes,
			risk_client,
			default_chain_id,
			settings.refresh.max_balance_tokens,
			std::time::Duration::from_secs(settings.refresh.balance_interval_secs),
		))
	}
}

/// Initialize tracing from the logging settings; `RUST_LOG` overrides the
/// configured level when set.
pub fn init_tracing(logging: &LoggingSettings) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(logging.level.clone()));
	let builder = tracing_subscriber::fmt().with_env_filter(filter);
	match logging.format {
		LogFormat::Json => builder.json().init(),
		LogFormat::Pretty => builder.pretty().init(),
		LogFormat::Compact => builder.compact().init(),
	}
}
