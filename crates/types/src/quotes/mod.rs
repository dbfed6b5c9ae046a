//! Swap quote models and errors

pub mod errors;
pub mod request;
pub mod response;

pub use errors::{QuoteResult, SwapQuoteError};
pub use request::{SwapQuoteRequest, FALLBACK_SWAPPER_ADDRESS};
pub use response::{QuoteRouteStep, QuoteSide, SwapQuoteResponse};
