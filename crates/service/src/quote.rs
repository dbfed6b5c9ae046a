//! Debounced, last-request-wins quote fetching.
//!
//! Every request starts a debounce window; a newer request bumps the shared
//! generation counter, which makes every older in-flight request resolve as
//! superseded without touching the published state. Only the newest
//! generation may commit a settled quote or a failure.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use swapdesk_adapters::QuoteAdapter;
use swapdesk_types::quotes::{SwapQuoteError, SwapQuoteRequest, SwapQuoteResponse};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Published quote lifecycle, one value per workspace.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteState {
	Idle,
	Debouncing,
	Fetching,
	Settled(SwapQuoteResponse),
	Failed(SwapQuoteError),
}

/// What one `request_quote` call resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteOutcome {
	/// A newer request took over while this one was debouncing or in flight.
	Superseded,
	Settled(SwapQuoteResponse),
	Failed(SwapQuoteError),
}

pub struct QuoteEngine {
	adapter: Arc<dyn QuoteAdapter>,
	debounce: Duration,
	generation: AtomicU64,
	state: watch::Sender<QuoteState>,
}

impl QuoteEngine {
	pub fn new(adapter: Arc<dyn QuoteAdapter>, debounce: Duration) -> Self {
		let (state, _) = watch::channel(QuoteState::Idle);
		Self {
			adapter,
			debounce,
			generation: AtomicU64::new(0),
			state,
		}
	}

	/// Subscribe to published quote state transitions.
	pub fn subscribe(&self) -> watch::Receiver<QuoteState> {
		self.state.subscribe()
	}

	pub fn current_state(&self) -> QuoteState {
		self.state.borrow().clone()
	}

	/// Cancels any in-flight request and returns the published state to
	/// idle. Called when the request inputs become incomplete.
	pub fn reset(&self) {
		self.generation.fetch_add(1, Ordering::SeqCst);
		self.state.send_replace(QuoteState::Idle);
	}

	fn is_current(&self, generation: u64) -> bool {
		self.generation.load(Ordering::SeqCst) == generation
	}

	/// Requests a quote after the debounce window.
	///
	/// A transient failure is retried exactly once; provider answers that
	/// say "no route" and client-side rejections (4xx) are terminal on the
	/// first attempt.
	pub async fn request_quote(&self, request: SwapQuoteRequest) -> QuoteOutcome {
		let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
		self.state.send_replace(QuoteState::Debouncing);

		tokio::time::sleep(self.debounce).await;
		if !self.is_current(generation) {
			return QuoteOutcome::Superseded;
		}
		self.state.send_replace(QuoteState::Fetching);

		let mut retried = false;
		loop {
			match self.adapter.fetch_quote(&request).await {
				Ok(response) => {
					if !self.is_current(generation) {
						return QuoteOutcome::Superseded;
					}
					self.state.send_replace(QuoteState::Settled(response.clone()));
					return QuoteOutcome::Settled(response);
				}
				Err(err) => {
					if !self.is_current(generation) {
						return QuoteOutcome::Superseded;
					}
					if !retried && err.is_retryable() {
						debug!(error = %err, "quote fetch failed, retrying once");
						retried = true;
						continue;
					}
					warn!(error = %err, "quote fetch failed");
					self.state.send_replace(QuoteState::Failed(err.clone()));
					return QuoteOutcome::Failed(err);
				}
			}
		}
	}
}
