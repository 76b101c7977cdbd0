//! Category endpoints: list, create, delete. No retrieve or update; categories
//! are immutable reference data.

use grappelli_auth::permissions::authorize;
use grappelli_auth::policy::{Operation, Resource, policy_for};
use grappelli_core::{Request, Response, Result};

use crate::filters::search_term;
use crate::serializers::{SlugOut, SlugPayload};
use crate::state::AppState;

/// `GET /api/v1/categories/`
pub async fn list(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Category, Operation::List),
		&super::context(request, &actor),
	)
	.await?;

	let items = state
		.store
		.list_categories(search_term(&request.query_params))
		.await?;
	let results: Vec<SlugOut> = items.into_iter().map(SlugOut::from).collect();
	let page = state
		.pagination
		.paginate(request.path(), &request.query_params, results)?;
	Response::ok().with_json(&page)
}

/// `POST /api/v1/categories/` (admin only)
pub async fn create(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Category, Operation::Create),
		&super::context(request, &actor),
	)
	.await?;

	let payload: SlugPayload = request.json()?;
	payload.validate()?;

	let category = state.store.create_category(&payload.name, &payload.slug).await?;
	Response::created().with_json(&SlugOut::from(category))
}

/// `DELETE /api/v1/categories/{slug}/` (admin only)
pub async fn delete(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Category, Operation::Delete),
		&super::context(request, &actor),
	)
	.await?;

	let slug = request.path_param("slug")?;
	state.store.delete_category(slug).await?;
	Ok(Response::no_content())
}
