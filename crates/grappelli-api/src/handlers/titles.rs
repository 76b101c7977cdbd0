//! Title endpoints: the catalog proper.

use grappelli_auth::permissions::authorize;
use grappelli_auth::policy::{Operation, Resource, policy_for};
use grappelli_core::{Request, Response, Result};

use crate::filters::title_filter;
use crate::serializers::{TitleOut, TitlePatch, TitlePayload};
use crate::state::AppState;

/// `GET /api/v1/titles/`
///
/// Filterable by `name`, `year`, `category` and `genre`; paginated. The
/// rating on each row is derived from review scores at read time.
pub async fn list(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Title, Operation::List),
		&super::context(request, &actor),
	)
	.await?;

	let filter = title_filter(&request.query_params)?;
	let items = state.store.list_titles(&filter).await?;
	let results: Vec<TitleOut> = items.into_iter().map(TitleOut::from).collect();
	let page = state
		.pagination
		.paginate(request.path(), &request.query_params, results)?;
	Response::ok().with_json(&page)
}

/// `POST /api/v1/titles/` (admin only)
pub async fn create(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Title, Operation::Create),
		&super::context(request, &actor),
	)
	.await?;

	let payload: TitlePayload = request.json()?;
	let detail = state.store.create_title(payload.validate()?).await?;
	Response::created().with_json(&TitleOut::from(detail))
}

/// `GET /api/v1/titles/{title_id}/`
pub async fn retrieve(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Title, Operation::Retrieve),
		&super::context(request, &actor),
	)
	.await?;

	let title_id = request.path_param_id("title_id")?;
	let detail = state.store.get_title(title_id).await?;
	Response::ok().with_json(&TitleOut::from(detail))
}

/// `PATCH /api/v1/titles/{title_id}/` (admin only)
pub async fn update(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Title, Operation::Update),
		&super::context(request, &actor),
	)
	.await?;

	let title_id = request.path_param_id("title_id")?;
	let payload: TitlePatch = request.json()?;
	let detail = state.store.update_title(title_id, payload.validate()?).await?;
	Response::ok().with_json(&TitleOut::from(detail))
}

/// `DELETE /api/v1/titles/{title_id}/` (admin only)
///
/// Cascades to the title's reviews and their comments.
pub async fn delete(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Title, Operation::Delete),
		&super::context(request, &actor),
	)
	.await?;

	let title_id = request.path_param_id("title_id")?;
	state.store.delete_title(title_id).await?;
	Ok(Response::no_content())
}
