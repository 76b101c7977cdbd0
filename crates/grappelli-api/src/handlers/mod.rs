//! Endpoint handlers.
//!
//! Every handler follows the same shape: establish the actor, authorize,
//! validate the payload, call the store, serialize the result. Errors bubble
//! with `?` and become JSON error responses at the service boundary.

pub mod auth;
pub mod categories;
pub mod comments;
pub mod genres;
pub mod reviews;
pub mod titles;
pub mod users;

use grappelli_auth::permissions::{Actor, PermissionContext};
use grappelli_core::{Error, Request, Result};
use grappelli_models::User;

use crate::state::AppState;

/// Resolve the request's actor from its bearer token.
///
/// No token means anonymous. A presented token must be valid and must map to
/// a live account, otherwise the request fails with 401 even on endpoints
/// that would have allowed anonymous access.
pub(crate) async fn actor(state: &AppState, request: &Request) -> Result<Actor> {
	match request.bearer_token() {
		Some(token) => {
			let claims = state.tokens.decode(token)?;
			let user = state.store.get_user(claims.sub).await.map_err(|_| {
				Error::Authentication("the account for this token no longer exists".into())
			})?;
			Ok(Actor::Known(user))
		}
		None => Ok(Actor::Anonymous),
	}
}

pub(crate) fn require_user(actor: &Actor) -> Result<&User> {
	actor.user().ok_or_else(|| {
		Error::Authentication("authentication credentials were not provided".into())
	})
}

pub(crate) fn context<'a>(request: &'a Request, actor: &'a Actor) -> PermissionContext<'a> {
	PermissionContext::new(&request.method, actor)
}

/// Username for an author id, tolerating a gap if the account vanished
/// between the read of the feedback row and the read of the author.
pub(crate) async fn author_username(state: &AppState, author_id: i64) -> String {
	match state.store.get_user(author_id).await {
		Ok(user) => user.username,
		Err(_) => String::new(),
	}
}
