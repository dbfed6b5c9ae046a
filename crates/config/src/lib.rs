//! Swapdesk Config
//!
//! Settings structures and the configuration loader. Defaults embed the
//! build-time chain allow-list and the curated fallback token list, so
//! the workspace functions without any config file present.

pub mod loader;
pub mod settings;

pub use config::ConfigError;
pub use loader::load_config;
pub use settings::{
	CacheSettings, CatalogSettings, ChainSettings, LogFormat, LoggingSettings, QuoteSettings,
	RefreshSettings, RiskSettings, Settings, TokenSettings,
};
