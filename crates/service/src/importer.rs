//! Custom token import via on-chain introspection.
//!
//! An import validates the pasted address locally, then asks the chain for
//! the contract's symbol, name, and decimals, walking the network's endpoint
//! candidates until one answers. Lookup failures collapse into two user
//! outcomes: the token does not exist, or the lookup could not be performed
//! right now.

use std::sync::Arc;

use swapdesk_adapters::{RpcClient, RpcError};
use swapdesk_storage::StorageError;
use swapdesk_types::models::{is_hex_address, Network, Token, TokenImportError};
use tracing::{debug, warn};

use crate::catalog::CatalogService;
use crate::endpoints::EndpointSelector;

pub struct ImportService {
	rpc: Arc<dyn RpcClient>,
	selector: Arc<EndpointSelector>,
	catalog: Arc<CatalogService>,
}

impl ImportService {
	pub fn new(
		rpc: Arc<dyn RpcClient>,
		selector: Arc<EndpointSelector>,
		catalog: Arc<CatalogService>,
	) -> Self {
		Self {
			rpc,
			selector,
			catalog,
		}
	}

	/// Imports the token at `raw_address` on `network`.
	///
	/// Address validation happens before any network traffic; a malformed
	/// address never costs an RPC call. An address already present in the
	/// chain's imported set is returned as-is without a fresh lookup.
	pub async fn import_token(
		&self,
		network: &Network,
		raw_address: &str,
	) -> Result<Token, TokenImportError> {
		let address = raw_address.trim();
		if !is_hex_address(address) {
			return Err(TokenImportError::InvalidAddress);
		}
		let key = address.to_lowercase();

		if let Some(existing) = self
			.catalog
			.imported_tokens(network.chain_id)
			.await
			.into_iter()
			.find(|t| t.identity_key() == key)
		{
			return Ok(existing);
		}

		let candidates = self
			.selector
			.ordered_candidates(network.chain_id, &network.endpoints);
		if candidates.is_empty() {
			return Err(TokenImportError::LookupUnavailable);
		}

		let mut last_error: Option<RpcError> = None;
		for endpoint in candidates {
			match self.rpc.token_metadata(&endpoint, address).await {
				Ok(metadata) => {
					let token = Token::new(
						network.chain_id,
						swapdesk_types::models::TokenAddress::Contract(key),
						metadata.symbol,
						metadata.name,
						metadata.decimals,
					);
					self.catalog
						.register_imported(token.clone())
						.await
						.map_err(|err: StorageError| {
							warn!(error = %err, "failed to persist imported token");
							TokenImportError::LookupUnavailable
						})?;
					return Ok(token);
				}
				Err(err) => {
					debug!(
						chain_id = network.chain_id,
						endpoint = %endpoint,
						error = %err,
						"token metadata lookup failed"
					);
					last_error = Some(err);
				}
			}
		}

		// Classify based on the last failure seen. A contract-absence pattern
		// means the address is not a token; a transient pattern means the
		// answer is unknowable right now, not negative.
		Err(match last_error {
			Some(err) if err.indicates_contract_absence() => TokenImportError::NotFound,
			Some(err) if err.is_transient() => TokenImportError::LookupUnavailable,
			_ => TokenImportError::NotFound,
		})
	}
}
