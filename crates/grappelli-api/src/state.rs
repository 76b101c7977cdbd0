//! Shared service state handed to every handler.

use std::sync::Arc;

use grappelli_auth::mail::EmailBackend;
use grappelli_auth::tokens::{ConfirmationCodeService, TokenService};
use grappelli_core::PageNumberPagination;
use grappelli_models::store::Store;

use crate::config::ApiConfig;

/// Everything handlers need: the store, the token services, the mail backend
/// and the paginator. Cheap to clone, shared across connections.
#[derive(Clone)]
pub struct AppState {
	pub store: Arc<dyn Store>,
	pub tokens: TokenService,
	pub codes: ConfirmationCodeService,
	pub mail: Arc<dyn EmailBackend>,
	pub pagination: PageNumberPagination,
}

impl AppState {
	pub fn new(config: &ApiConfig, store: Arc<dyn Store>, mail: Arc<dyn EmailBackend>) -> Self {
		let secret = config.secret_key.as_bytes();
		Self {
			store,
			tokens: TokenService::with_lifetime(
				secret,
				chrono::Duration::seconds(config.token_lifetime_secs),
			),
			codes: ConfirmationCodeService::new(secret.to_vec()),
			mail,
			pagination: PageNumberPagination::new().page_size(config.page_size),
		}
	}
}
