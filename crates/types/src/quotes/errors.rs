//! Error types for quote operations
//!
//! Provider failures carry an HTTP-style status and a machine-readable
//! no-route flag; both are derived once at the adapter boundary and
//! drive the engine's retry policy.

use thiserror::Error;

pub type QuoteResult<T> = Result<T, SwapQuoteError>;

/// Quote failures, classified at the provider boundary
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SwapQuoteError {
	#[error("{message}")]
	Provider {
		message: String,
		status: Option<u16>,
		no_route_found: bool,
	},

	#[error("quote request failed: {0}")]
	Transport(String),

	#[error("invalid quote response: {reason}")]
	InvalidResponse { reason: String },
}

impl SwapQuoteError {
	pub fn provider(message: impl Into<String>, status: Option<u16>, no_route_found: bool) -> Self {
		Self::Provider {
			message: message.into(),
			status,
			no_route_found,
		}
	}

	/// HTTP-style status code, if the provider reported one
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Provider { status, .. } => *status,
			_ => None,
		}
	}

	/// True when the provider confirmed no swap path exists
	pub fn no_route_found(&self) -> bool {
		matches!(
			self,
			Self::Provider {
				no_route_found: true,
				..
			}
		)
	}

	/// Retry policy: never retry a confirmed no-route result or a
	/// client-error status; everything else is transient and worth one
	/// more attempt.
	pub fn is_retryable(&self) -> bool {
		if self.no_route_found() {
			return false;
		}
		if let Some(status) = self.status() {
			if (400..500).contains(&status) {
				return false;
			}
		}
		true
	}

	/// Actionable message for the review surface
	pub fn user_message(&self) -> String {
		match self {
			Self::Provider {
				message,
				no_route_found: true,
				..
			} => {
				if message.is_empty() {
					"No route found for this token pair.".to_string()
				} else {
					message.clone()
				}
			},
			Self::Provider { message, .. } if !message.is_empty() => message.clone(),
			_ => "Unable to fetch a quote right now. Please try again.".to_string(),
		}
	}
}
