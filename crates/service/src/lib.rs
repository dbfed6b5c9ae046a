//! Swapdesk Service
//!
//! Core orchestration for the swap workspace: live endpoint selection,
//! network/token catalog resolution with a local cache, wallet balance
//! aggregation, custom token import, debounced quote fetching, token USD
//! valuation, and the workspace state machine that ties them together.

pub mod balances;
pub mod catalog;
pub mod endpoints;
pub mod importer;
pub mod prices;
pub mod quote;
pub mod workspace;

pub use balances::{BalanceFeed, BalanceMap, BalanceService, CONTRACT_CHUNK_SIZE};
pub use catalog::{merge_networks, CatalogService};
pub use endpoints::EndpointSelector;
pub use importer::ImportService;
pub use prices::{PriceService, PRICE_TTL};
pub use quote::{QuoteEngine, QuoteOutcome, QuoteState};
pub use workspace::{
	can_import, filter_tokens, sort_tokens_by_balance, Workspace, WorkspaceState,
	RECEIVE_PLACEHOLDER,
};
