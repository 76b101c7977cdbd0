//! Confirmation codes and access tokens.
//!
//! Signup emails carry a stateless confirmation code: an HMAC over the
//! account's identity tuple. Nothing is stored server-side, and any change to
//! the tuple (a role grant, an email change) invalidates codes issued before
//! it. The token endpoint exchanges a valid code for a signed JWT bearer
//! credential.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use grappelli_core::{Error, Result};
use grappelli_models::User;
use hmac::{Hmac, Mac};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Issues and checks emailed confirmation codes.
#[derive(Debug, Clone)]
pub struct ConfirmationCodeService {
	secret: Vec<u8>,
}

impl ConfirmationCodeService {
	pub fn new(secret: impl Into<Vec<u8>>) -> Self {
		Self { secret: secret.into() }
	}

	fn mac(&self, user: &User) -> Result<HmacSha256> {
		let mut mac = HmacSha256::new_from_slice(&self.secret)
			.map_err(|e| Error::Internal(e.to_string()))?;
		mac.update(user.id.to_string().as_bytes());
		mac.update(b":");
		mac.update(user.username.as_bytes());
		mac.update(b":");
		mac.update(user.email.as_bytes());
		mac.update(b":");
		mac.update(user.role.as_str().as_bytes());
		Ok(mac)
	}

	/// The confirmation code for this account in its current state.
	pub fn generate(&self, user: &User) -> Result<String> {
		let digest = self.mac(user)?.finalize().into_bytes();
		Ok(URL_SAFE_NO_PAD.encode(digest))
	}

	/// Constant-time check of a presented code against the account.
	pub fn verify(&self, user: &User, code: &str) -> Result<bool> {
		let Ok(presented) = URL_SAFE_NO_PAD.decode(code) else {
			return Ok(false);
		};
		Ok(self.mac(user)?.verify_slice(&presented).is_ok())
	}
}

/// JWT payload for an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
	/// Account id.
	pub sub: i64,
	pub username: String,
	pub iat: i64,
	pub exp: i64,
}

/// Signs and validates JWT access tokens (HS256).
#[derive(Clone)]
pub struct TokenService {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	lifetime: Duration,
}

impl TokenService {
	/// Tokens default to a one-day lifetime.
	pub fn new(secret: &[u8]) -> Self {
		Self::with_lifetime(secret, Duration::days(1))
	}

	pub fn with_lifetime(secret: &[u8], lifetime: Duration) -> Self {
		Self {
			encoding_key: EncodingKey::from_secret(secret),
			decoding_key: DecodingKey::from_secret(secret),
			lifetime,
		}
	}

	pub fn issue(&self, user: &User) -> Result<String> {
		let now = Utc::now();
		let claims = AccessClaims {
			sub: user.id,
			username: user.username.clone(),
			iat: now.timestamp(),
			exp: (now + self.lifetime).timestamp(),
		};
		encode(&Header::default(), &claims, &self.encoding_key)
			.map_err(|e| Error::Internal(e.to_string()))
	}

	/// Decode and validate a presented token. Signature or expiry failures
	/// surface as authentication errors, never as internal ones.
	pub fn decode(&self, token: &str) -> Result<AccessClaims> {
		decode::<AccessClaims>(token, &self.decoding_key, &Validation::default())
			.map(|data| data.claims)
			.map_err(|_| Error::Authentication("token is invalid or expired".into()))
	}
}
