//! Swapdesk Adapters
//!
//! Trait seams and reqwest implementations for the network-facing
//! collaborators: chain RPC endpoints, the catalog service, the quote
//! provider, the risk service, and the USD price feed. Error
//! classification happens once at
//! these boundaries; callers only see the closed taxonomy.

pub mod abi;
pub mod catalog;
pub mod lifi;
pub mod prices;
pub mod risk;
pub mod rpc;

pub use catalog::{CatalogClient, CatalogError, CatalogResult, HttpCatalogClient, RemoteNetwork};
pub use lifi::{LifiAdapter, LifiConfig, QuoteAdapter};
pub use prices::{HttpPriceClient, PriceClient, PriceError, PriceResult, COINGECKO_BASE_URL};
pub use risk::{HttpRiskClient, RiskClient, RiskError, RiskResult};
pub use rpc::{HttpRpcClient, RpcClient, RpcError, RpcResult, TokenMetadata};
