//! Genre endpoints. Same surface and policy rows as categories.

use grappelli_auth::permissions::authorize;
use grappelli_auth::policy::{Operation, Resource, policy_for};
use grappelli_core::{Request, Response, Result};

use crate::filters::search_term;
use crate::serializers::{SlugOut, SlugPayload};
use crate::state::AppState;

/// `GET /api/v1/genres/`
pub async fn list(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Genre, Operation::List),
		&super::context(request, &actor),
	)
	.await?;

	let items = state
		.store
		.list_genres(search_term(&request.query_params))
		.await?;
	let results: Vec<SlugOut> = items.into_iter().map(SlugOut::from).collect();
	let page = state
		.pagination
		.paginate(request.path(), &request.query_params, results)?;
	Response::ok().with_json(&page)
}

/// `POST /api/v1/genres/` (admin only)
pub async fn create(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Genre, Operation::Create),
		&super::context(request, &actor),
	)
	.await?;

	let payload: SlugPayload = request.json()?;
	payload.validate()?;

	let genre = state.store.create_genre(&payload.name, &payload.slug).await?;
	Response::created().with_json(&SlugOut::from(genre))
}

/// `DELETE /api/v1/genres/{slug}/` (admin only)
pub async fn delete(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Genre, Operation::Delete),
		&super::context(request, &actor),
	)
	.await?;

	let slug = request.path_param("slug")?;
	state.store.delete_genre(slug).await?;
	Ok(Response::no_content())
}
