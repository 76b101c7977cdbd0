//! Signup and token exchange.

use grappelli_auth::mail::EmailMessage;
use grappelli_core::{Error, Request, Response, Result};
use serde_json::json;

use crate::serializers::{SignupPayload, TokenPayload};
use crate::state::AppState;

/// `POST /api/v1/auth/signup/`
///
/// Open to anyone. Creates the account (or finds the matching one, so the
/// code can be re-sent) and emails a confirmation code. Delivery failure is
/// logged but does not fail the request; the client can always sign up again.
pub async fn signup(state: &AppState, request: &Request) -> Result<Response> {
	let payload: SignupPayload = request.json()?;
	payload.validate()?;

	let user = state
		.store
		.get_or_create_user(&payload.username, &payload.email)
		.await?;
	let code = state.codes.generate(&user)?;

	if let Err(error) = state.mail.send(EmailMessage::confirmation(&user, &code)).await {
		tracing::warn!(username = %user.username, %error, "confirmation email delivery failed");
	}

	Response::ok().with_json(&json!({
		"username": user.username,
		"email": user.email,
	}))
}

/// `POST /api/v1/auth/token/`
///
/// Exchanges a username and its emailed confirmation code for a JWT. An
/// unknown username is 404 (signup never got that far); a wrong code for a
/// known username is an authorization failure, not a malformed field.
pub async fn token(state: &AppState, request: &Request) -> Result<Response> {
	let payload: TokenPayload = request.json()?;
	let user = state.store.get_user_by_username(&payload.username).await?;

	if !state.codes.verify(&user, &payload.confirmation_code)? {
		return Err(Error::Authorization("invalid confirmation code".into()));
	}

	let token = state.tokens.issue(&user)?;
	Response::ok().with_json(&json!({ "token": token }))
}
