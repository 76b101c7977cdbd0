//! Account administration and the self-profile endpoint.

use grappelli_auth::permissions::authorize;
use grappelli_auth::policy::{Operation, Resource, policy_for};
use grappelli_core::{Request, Response, Result};

use crate::filters::search_term;
use crate::serializers::{UserOut, UserPatch, UserPayload, reject_fields};
use crate::state::AppState;

/// `GET /api/v1/users/` (admin only), searchable by username substring.
pub async fn list(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Account, Operation::List),
		&super::context(request, &actor),
	)
	.await?;

	let mut users = state.store.list_users().await?;
	if let Some(term) = search_term(&request.query_params) {
		users.retain(|user| user.username.contains(term));
	}
	let results: Vec<UserOut> = users.into_iter().map(UserOut::from).collect();
	let page = state
		.pagination
		.paginate(request.path(), &request.query_params, results)?;
	Response::ok().with_json(&page)
}

/// `POST /api/v1/users/` (admin only)
///
/// Unlike signup, an admin may provision any role directly.
pub async fn create(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Account, Operation::Create),
		&super::context(request, &actor),
	)
	.await?;

	let payload: UserPayload = request.json()?;
	let user = state.store.create_user(payload.validate()?).await?;
	Response::created().with_json(&UserOut::from(user))
}

/// `GET /api/v1/users/{username}/` (admin only)
pub async fn retrieve(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Account, Operation::Retrieve),
		&super::context(request, &actor),
	)
	.await?;

	let username = request.path_param("username")?;
	let user = state.store.get_user_by_username(username).await?;
	Response::ok().with_json(&UserOut::from(user))
}

/// `PATCH /api/v1/users/{username}/` (admin only)
///
/// This is the only route that can change a role.
pub async fn update(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Account, Operation::Update),
		&super::context(request, &actor),
	)
	.await?;

	let username = request.path_param("username")?;
	let user = state.store.get_user_by_username(username).await?;
	let payload: UserPatch = request.json()?;
	let updated = state.store.update_user(user.id, payload.validate()?).await?;
	Response::ok().with_json(&UserOut::from(updated))
}

/// `DELETE /api/v1/users/{username}/` (admin only)
///
/// Cascades to the account's reviews and comments.
pub async fn delete(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Account, Operation::Delete),
		&super::context(request, &actor),
	)
	.await?;

	let username = request.path_param("username")?;
	state.store.delete_user(username).await?;
	Ok(Response::no_content())
}

/// `GET /api/v1/users/me/` (any authenticated user)
pub async fn me_retrieve(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Profile, Operation::Retrieve),
		&super::context(request, &actor),
	)
	.await?;
	let user = super::require_user(&actor)?;
	Response::ok().with_json(&UserOut::from(user.clone()))
}

/// `PATCH /api/v1/users/me/` (any authenticated user)
///
/// Profile edits only. A `role` key in the body is rejected whole, whatever
/// its value; role changes go through the admin route.
pub async fn me_update(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Profile, Operation::Update),
		&super::context(request, &actor),
	)
	.await?;
	let user = super::require_user(&actor)?;

	reject_fields(&request.body, &["role"])?;
	let payload: UserPatch = request.json()?;
	let updated = state.store.update_user(user.id, payload.validate()?).await?;
	Response::ok().with_json(&UserOut::from(updated))
}
