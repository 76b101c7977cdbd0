//! Review endpoints, nested under a title.
//!
//! Creation runs the linear flow: validate the payload, resolve the title and
//! check the one-review-per-author constraint, authorize, persist. The store
//! repeats the uniqueness check under its write lock, so a racing duplicate
//! still loses even after passing the friendly pre-check.

use grappelli_auth::permissions::{authorize, authorize_object};
use grappelli_auth::policy::{Operation, Resource, policy_for};
use grappelli_core::{Error, Request, Response, Result};

use crate::serializers::{ReviewOut, ReviewPatch, ReviewPayload};
use crate::state::AppState;

/// `GET /api/v1/titles/{title_id}/reviews/`
pub async fn list(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Review, Operation::List),
		&super::context(request, &actor),
	)
	.await?;

	let title_id = request.path_param_id("title_id")?;
	let reviews = state.store.list_reviews(title_id).await?;

	let mut results = Vec::with_capacity(reviews.len());
	for review in reviews {
		let author = super::author_username(state, review.author_id).await;
		results.push(ReviewOut::new(review, author));
	}
	let page = state
		.pagination
		.paginate(request.path(), &request.query_params, results)?;
	Response::ok().with_json(&page)
}

/// `POST /api/v1/titles/{title_id}/reviews/` (authenticated, one per title)
pub async fn create(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	let author = super::require_user(&actor)?;

	let payload: ReviewPayload = request.json()?;
	let score = payload.validate()?;

	let title_id = request.path_param_id("title_id")?;
	state.store.get_title(title_id).await?;
	if state.store.author_reviewed_title(title_id, author.id).await? {
		return Err(Error::Conflict("you have already reviewed this title".into()));
	}

	authorize(
		policy_for(Resource::Review, Operation::Create),
		&super::context(request, &actor),
	)
	.await?;

	let review = state
		.store
		.create_review(title_id, author.id, &payload.text, score)
		.await?;
	Response::created().with_json(&ReviewOut::new(review, author.username.clone()))
}

/// `GET /api/v1/titles/{title_id}/reviews/{review_id}/`
pub async fn retrieve(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Review, Operation::Retrieve),
		&super::context(request, &actor),
	)
	.await?;

	let title_id = request.path_param_id("title_id")?;
	let review_id = request.path_param_id("review_id")?;
	let review = state.store.get_review(title_id, review_id).await?;
	let author = super::author_username(state, review.author_id).await;
	Response::ok().with_json(&ReviewOut::new(review, author))
}

/// `PATCH /api/v1/titles/{title_id}/reviews/{review_id}/`
///
/// Author, moderator or admin. The score stays within bounds on edit too.
pub async fn update(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	let title_id = request.path_param_id("title_id")?;
	let review_id = request.path_param_id("review_id")?;
	let review = state.store.get_review(title_id, review_id).await?;
	authorize_object(
		policy_for(Resource::Review, Operation::Update),
		&super::context(request, &actor),
		review.author_id,
	)
	.await?;

	let payload: ReviewPatch = request.json()?;
	let score = payload.validate()?;
	let updated = state
		.store
		.update_review(review_id, payload.text.as_deref(), score)
		.await?;
	let author = super::author_username(state, updated.author_id).await;
	Response::ok().with_json(&ReviewOut::new(updated, author))
}

/// `DELETE /api/v1/titles/{title_id}/reviews/{review_id}/`
///
/// Author, moderator or admin. Cascades to the review's comments.
pub async fn delete(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	let title_id = request.path_param_id("title_id")?;
	let review_id = request.path_param_id("review_id")?;
	let review = state.store.get_review(title_id, review_id).await?;
	authorize_object(
		policy_for(Resource::Review, Operation::Delete),
		&super::context(request, &actor),
		review.author_id,
	)
	.await?;

	state.store.delete_review(review_id).await?;
	Ok(Response::no_content())
}
