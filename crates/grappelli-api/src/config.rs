//! Runtime configuration.
//!
//! Read once at startup from the environment. Every knob has a development
//! default so `ApiConfig::from_env()` never fails; a missing secret key is
//! replaced by a random one, which keeps dev servers working and makes issued
//! credentials worthless across restarts.

use rand::Rng;
use rand::distributions::Alphanumeric;

const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

/// Configuration for the API service.
#[derive(Debug, Clone)]
pub struct ApiConfig {
	/// Signing secret for confirmation codes and access tokens.
	pub secret_key: String,
	/// Default page size for list endpoints.
	pub page_size: usize,
	/// Access token lifetime in seconds.
	pub token_lifetime_secs: i64,
}

impl ApiConfig {
	/// Build from `GRAPPELLI_SECRET_KEY`, `GRAPPELLI_PAGE_SIZE` and
	/// `GRAPPELLI_TOKEN_LIFETIME` environment variables, with defaults for
	/// anything unset or unparsable.
	pub fn from_env() -> Self {
		let secret_key = std::env::var("GRAPPELLI_SECRET_KEY").unwrap_or_else(|_| {
			tracing::warn!("GRAPPELLI_SECRET_KEY is not set, using an ephemeral secret");
			random_secret()
		});
		let page_size = std::env::var("GRAPPELLI_PAGE_SIZE")
			.ok()
			.and_then(|raw| raw.parse().ok())
			.unwrap_or(DEFAULT_PAGE_SIZE);
		let token_lifetime_secs = std::env::var("GRAPPELLI_TOKEN_LIFETIME")
			.ok()
			.and_then(|raw| raw.parse().ok())
			.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
		Self {
			secret_key,
			page_size,
			token_lifetime_secs,
		}
	}

	pub fn with_secret(secret_key: impl Into<String>) -> Self {
		Self {
			secret_key: secret_key.into(),
			page_size: DEFAULT_PAGE_SIZE,
			token_lifetime_secs: DEFAULT_TOKEN_LIFETIME_SECS,
		}
	}
}

fn random_secret() -> String {
	rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(50)
		.map(char::from)
		.collect()
}
