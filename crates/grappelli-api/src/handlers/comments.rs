//! Comment endpoints, nested under a review (itself nested under a title).

use grappelli_auth::permissions::{authorize, authorize_object};
use grappelli_auth::policy::{Operation, Resource, policy_for};
use grappelli_core::{Request, Response, Result};
use grappelli_models::Review;

use crate::serializers::{CommentOut, CommentPayload};
use crate::state::AppState;

/// The review must exist under the title named in the path, otherwise every
/// comment route is a 404.
async fn parent_review(state: &AppState, request: &Request) -> Result<Review> {
	let title_id = request.path_param_id("title_id")?;
	let review_id = request.path_param_id("review_id")?;
	state.store.get_review(title_id, review_id).await
}

/// `GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/`
pub async fn list(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Comment, Operation::List),
		&super::context(request, &actor),
	)
	.await?;

	let review = parent_review(state, request).await?;
	let comments = state.store.list_comments(review.id).await?;

	let mut results = Vec::with_capacity(comments.len());
	for comment in comments {
		let author = super::author_username(state, comment.author_id).await;
		results.push(CommentOut::new(comment, author));
	}
	let page = state
		.pagination
		.paginate(request.path(), &request.query_params, results)?;
	Response::ok().with_json(&page)
}

/// `POST /api/v1/titles/{title_id}/reviews/{review_id}/comments/` (authenticated)
pub async fn create(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	let author = super::require_user(&actor)?;

	let payload: CommentPayload = request.json()?;
	payload.validate()?;

	let review = parent_review(state, request).await?;
	authorize(
		policy_for(Resource::Comment, Operation::Create),
		&super::context(request, &actor),
	)
	.await?;

	let comment = state
		.store
		.create_comment(review.id, author.id, &payload.text)
		.await?;
	Response::created().with_json(&CommentOut::new(comment, author.username.clone()))
}

/// `GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/`
pub async fn retrieve(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	authorize(
		policy_for(Resource::Comment, Operation::Retrieve),
		&super::context(request, &actor),
	)
	.await?;

	let review = parent_review(state, request).await?;
	let comment_id = request.path_param_id("comment_id")?;
	let comment = state.store.get_comment(review.id, comment_id).await?;
	let author = super::author_username(state, comment.author_id).await;
	Response::ok().with_json(&CommentOut::new(comment, author))
}

/// `PATCH .../comments/{comment_id}/` (author, moderator or admin)
pub async fn update(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	let review = parent_review(state, request).await?;
	let comment_id = request.path_param_id("comment_id")?;
	let comment = state.store.get_comment(review.id, comment_id).await?;
	authorize_object(
		policy_for(Resource::Comment, Operation::Update),
		&super::context(request, &actor),
		comment.author_id,
	)
	.await?;

	let payload: CommentPayload = request.json()?;
	payload.validate()?;

	let updated = state.store.update_comment(comment_id, &payload.text).await?;
	let author = super::author_username(state, updated.author_id).await;
	Response::ok().with_json(&CommentOut::new(updated, author))
}

/// `DELETE .../comments/{comment_id}/` (author, moderator or admin)
pub async fn delete(state: &AppState, request: &Request) -> Result<Response> {
	let actor = super::actor(state, request).await?;
	let review = parent_review(state, request).await?;
	let comment_id = request.path_param_id("comment_id")?;
	let comment = state.store.get_comment(review.id, comment_id).await?;
	authorize_object(
		policy_for(Resource::Comment, Operation::Delete),
		&super::context(request, &actor),
		comment.author_id,
	)
	.await?;

	state.store.delete_comment(comment_id).await?;
	Ok(Response::no_content())
}
