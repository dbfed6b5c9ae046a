//! Configuration settings structures

use serde::{Deserialize, Serialize};

use swapdesk_types::{Network, NetworkScope, Token, TokenAddress};

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
	/// Which deployment scope of the allow-list is active
	pub scope: NetworkScope,
	/// Build-time chain allow-list with minimal metadata
	pub chains: Vec<ChainSettings>,
	/// Static fallback tokens used when the remote catalog is empty or
	/// unavailable
	pub curated_tokens: Vec<TokenSettings>,
	pub catalog: CatalogSettings,
	pub quote: QuoteSettings,
	pub risk: RiskSettings,
	pub cache: CacheSettings,
	pub refresh: RefreshSettings,
	pub logging: LoggingSettings,
}

/// One allow-listed chain
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChainSettings {
	pub chain_id: u64,
	pub name: String,
	/// Candidate RPC endpoints in probe order
	pub endpoints: Vec<String>,
	pub explorer_url: String,
	pub native_symbol: String,
	pub scope: NetworkScope,
	/// Catalog slug for icon lookup
	pub chain_key: Option<String>,
}

impl From<ChainSettings> for Network {
	fn from(settings: ChainSettings) -> Self {
		let mut network = Network::new(
			settings.chain_id,
			settings.name,
			settings.endpoints,
			settings.explorer_url,
			settings.native_symbol,
			settings.scope,
		);
		network.chain_key = settings.chain_key;
		network
	}
}

/// One curated fallback token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenSettings {
	pub chain_id: u64,
	/// "native" or a 0x contract address
	pub address: String,
	pub symbol: String,
	pub name: String,
	pub decimals: u8,
	pub icon: Option<String>,
}

impl TokenSettings {
	fn to_token(&self) -> Option<Token> {
		let address: TokenAddress = self.address.parse().ok()?;
		let mut token = Token::new(
			self.chain_id,
			address,
			self.symbol.clone(),
			self.name.clone(),
			self.decimals,
		);
		token.icon = self.icon.clone();
		Some(token)
	}
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CatalogSettings {
	pub base_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuoteSettings {
	pub base_url: String,
	pub integrator: String,
	pub api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RiskSettings {
	pub base_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheSettings {
	/// Directory for the durable file cache; session-only memory cache
	/// when unset
	pub directory: Option<String>,
	/// TTL for remote network and token metadata
	pub metadata_ttl_minutes: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshSettings {
	/// Periodic balance refresh while a wallet is connected
	pub balance_interval_secs: u64,
	/// Input quiescence before a quote request is issued
	pub quote_debounce_ms: u64,
	/// Cap on the tracked token subset for periodic balance refresh
	pub max_balance_tokens: usize,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			scope: NetworkScope::Development,
			chains: default_chains(),
			curated_tokens: default_curated_tokens(),
			catalog: CatalogSettings {
				base_url: "https://stargate.finance/api/v1".to_string(),
			},
			quote: QuoteSettings {
				base_url: "https://li.quest/v1".to_string(),
				integrator: "swapdesk".to_string(),
				api_key: None,
			},
			risk: RiskSettings {
				base_url: "http://localhost:8080".to_string(),
			},
			cache: CacheSettings {
				directory: None,
				metadata_ttl_minutes: 30,
			},
			refresh: RefreshSettings {
				balance_interval_secs: 30,
				quote_debounce_ms: 350,
				max_balance_tokens: 30,
			},
			logging: LoggingSettings {
				level: "info".to_string(),
				format: LogFormat::Pretty,
			},
		}
	}
}

impl Settings {
	/// Allow-listed networks for the active scope, in configured order
	pub fn allowed_networks(&self) -> Vec<Network> {
		self.chains
			.iter()
			.filter(|chain| chain.scope == self.scope)
			.cloned()
			.map(Network::from)
			.collect()
	}

	/// Curated fallback tokens for one allow-listed chain
	pub fn curated_tokens_for(&self, chain_id: u64) -> Vec<Token> {
		let allowed = self
			.chains
			.iter()
			.any(|chain| chain.scope == self.scope && chain.chain_id == chain_id);
		if !allowed {
			return Vec::new();
		}
		self.curated_tokens
			.iter()
			.filter(|token| token.chain_id == chain_id)
			.filter_map(TokenSettings::to_token)
			.collect()
	}

	/// First allow-listed chain id, used as the initial selection
	pub fn default_chain_id(&self) -> Option<u64> {
		self.chains
			.iter()
			.find(|chain| chain.scope == self.scope)
			.map(|chain| chain.chain_id)
	}
}

fn default_chains() -> Vec<ChainSettings> {
	vec![
		ChainSettings {
			chain_id: 1,
			name: "Ethereum".to_string(),
			endpoints: vec![
				"https://ethereum-rpc.publicnode.com".to_string(),
				"https://eth-mainnet.public.blastapi.io".to_string(),
			],
			explorer_url: "https://etherscan.io".to_string(),
			native_symbol: "ETH".to_string(),
			scope: NetworkScope::Production,
			chain_key: Some("ethereum".to_string()),
		},
		ChainSettings {
			chain_id: 137,
			name: "Polygon".to_string(),
			endpoints: vec![
				"https://polygon-bor-rpc.publicnode.com".to_string(),
				"https://polygon-rpc.com".to_string(),
			],
			explorer_url: "https://polygonscan.com".to_string(),
			native_symbol: "MATIC".to_string(),
			scope: NetworkScope::Production,
			chain_key: Some("polygon".to_string()),
		},
		ChainSettings {
			chain_id: 11155111,
			name: "Sepolia".to_string(),
			endpoints: vec!["https://ethereum-sepolia-rpc.publicnode.com".to_string()],
			explorer_url: "https://sepolia.etherscan.io".to_string(),
			native_symbol: "ETH".to_string(),
			scope: NetworkScope::Development,
			chain_key: Some("ethereum".to_string()),
		},
		ChainSettings {
			chain_id: 80002,
			name: "Polygon Amoy".to_string(),
			endpoints: vec!["https://rpc-amoy.polygon.technology".to_string()],
			explorer_url: "https://amoy.polygonscan.com".to_string(),
			native_symbol: "POL".to_string(),
			scope: NetworkScope::Development,
			chain_key: Some("polygon".to_string()),
		},
		ChainSettings {
			chain_id: 84532,
			name: "Base Sepolia".to_string(),
			endpoints: vec![
				"https://sepolia.base.org".to_string(),
				"https://base-sepolia-rpc.publicnode.com".to_string(),
			],
			explorer_url: "https://sepolia.basescan.org".to_string(),
			native_symbol: "ETH".to_string(),
			scope: NetworkScope::Development,
			chain_key: Some("base".to_string()),
		},
	]
}

fn default_curated_tokens() -> Vec<TokenSettings> {
	vec![
		TokenSettings {
			chain_id: 1,
			address: "native".to_string(),
			symbol: "ETH".to_string(),
			name: "Ether".to_string(),
			decimals: 18,
			icon: Some("https://assets.coingecko.com/coins/images/279/small/ethereum.png".to_string()),
		},
		TokenSettings {
			chain_id: 1,
			address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".to_string(),
			symbol: "USDC".to_string(),
			name: "USD Coin".to_string(),
			decimals: 6,
			icon: Some("https://assets.coingecko.com/coins/images/6319/small/usdc.png".to_string()),
		},
		TokenSettings {
			chain_id: 1,
			address: "0xdAC17F958D2ee523a2206206994597C13D831ec7".to_string(),
			symbol: "USDT".to_string(),
			name: "Tether".to_string(),
			decimals: 6,
			icon: Some("https://assets.coingecko.com/coins/images/325/small/Tether.png".to_string()),
		},
		TokenSettings {
			chain_id: 137,
			address: "native".to_string(),
			symbol: "MATIC".to_string(),
			name: "Polygon".to_string(),
			decimals: 18,
			icon: Some("https://assets.coingecko.com/coins/images/4713/small/polygon.png".to_string()),
		},
		TokenSettings {
			chain_id: 137,
			address: "0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174".to_string(),
			symbol: "USDC".to_string(),
			name: "USD Coin (PoS)".to_string(),
			decimals: 6,
			icon: Some("https://assets.coingecko.com/coins/images/6319/small/usdc.png".to_string()),
		},
		TokenSettings {
			chain_id: 11155111,
			address: "native".to_string(),
			symbol: "ETH".to_string(),
			name: "Sepolia Ether".to_string(),
			decimals: 18,
			icon: None,
		},
		TokenSettings {
			chain_id: 80002,
			address: "native".to_string(),
			symbol: "POL".to_string(),
			name: "Amoy POL".to_string(),
			decimals: 18,
			icon: None,
		},
		TokenSettings {
			chain_id: 84532,
			address: "native".to_string(),
			symbol: "ETH".to_string(),
			name: "Base Sepolia Ether".to_string(),
			decimals: 18,
			icon: None,
		},
	]
}
