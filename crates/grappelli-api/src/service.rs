//! Request dispatch.
//!
//! A flat route table of compiled patterns maps paths to endpoints; named
//! captures become path parameters. The `/users/me/` route is listed ahead of
//! `/users/{username}/` so the reserved name always wins.

use grappelli_core::{Request, Response};
use hyper::{Method, StatusCode};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::handlers;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
	Signup,
	Token,
	Users,
	Me,
	UserDetail,
	Categories,
	CategoryDetail,
	Genres,
	GenreDetail,
	Titles,
	TitleDetail,
	Reviews,
	ReviewDetail,
	Comments,
	CommentDetail,
}

struct Route {
	pattern: Regex,
	endpoint: Endpoint,
}

fn route(pattern: &str, endpoint: Endpoint) -> Route {
	Route {
		pattern: Regex::new(pattern).expect("route pattern must compile"),
		endpoint,
	}
}

static ROUTES: Lazy<Vec<Route>> = Lazy::new(|| {
	vec![
		route(r"^/api/v1/auth/signup/?$", Endpoint::Signup),
		route(r"^/api/v1/auth/token/?$", Endpoint::Token),
		route(r"^/api/v1/users/me/?$", Endpoint::Me),
		route(r"^/api/v1/users/?$", Endpoint::Users),
		route(
			r"^/api/v1/users/(?P<username>[\w.@+-]+)/?$",
			Endpoint::UserDetail,
		),
		route(r"^/api/v1/categories/?$", Endpoint::Categories),
		route(
			r"^/api/v1/categories/(?P<slug>[-\w]+)/?$",
			Endpoint::CategoryDetail,
		),
		route(r"^/api/v1/genres/?$", Endpoint::Genres),
		route(r"^/api/v1/genres/(?P<slug>[-\w]+)/?$", Endpoint::GenreDetail),
		route(r"^/api/v1/titles/?$", Endpoint::Titles),
		route(r"^/api/v1/titles/(?P<title_id>\d+)/?$", Endpoint::TitleDetail),
		route(
			r"^/api/v1/titles/(?P<title_id>\d+)/reviews/?$",
			Endpoint::Reviews,
		),
		route(
			r"^/api/v1/titles/(?P<title_id>\d+)/reviews/(?P<review_id>\d+)/?$",
			Endpoint::ReviewDetail,
		),
		route(
			r"^/api/v1/titles/(?P<title_id>\d+)/reviews/(?P<review_id>\d+)/comments/?$",
			Endpoint::Comments,
		),
		route(
			r"^/api/v1/titles/(?P<title_id>\d+)/reviews/(?P<review_id>\d+)/comments/(?P<comment_id>\d+)/?$",
			Endpoint::CommentDetail,
		),
	]
});

fn resolve(request: &mut Request) -> Option<Endpoint> {
	let path = request.path().to_string();
	for route in ROUTES.iter() {
		if let Some(captures) = route.pattern.captures(&path) {
			for name in route.pattern.capture_names().flatten() {
				if let Some(value) = captures.name(name) {
					request
						.path_params
						.insert(name.to_string(), value.as_str().to_string());
				}
			}
			return Some(route.endpoint);
		}
	}
	None
}

/// The HTTP service: owns the shared state and turns requests into responses.
#[derive(Clone)]
pub struct ApiService {
	state: AppState,
}

impl ApiService {
	pub fn new(state: AppState) -> Self {
		Self { state }
	}

	pub fn state(&self) -> &AppState {
		&self.state
	}

	/// Dispatch one request. Never panics and never returns an error; every
	/// failure becomes a JSON error response.
	pub async fn handle(&self, mut request: Request) -> Response {
		let Some(endpoint) = resolve(&mut request) else {
			return error_response(StatusCode::NOT_FOUND, "not found");
		};

		let state = &self.state;
		let result = match (endpoint, &request.method) {
			(Endpoint::Signup, &Method::POST) => handlers::auth::signup(state, &request).await,
			(Endpoint::Token, &Method::POST) => handlers::auth::token(state, &request).await,

			(Endpoint::Users, &Method::GET) => handlers::users::list(state, &request).await,
			(Endpoint::Users, &Method::POST) => handlers::users::create(state, &request).await,
			(Endpoint::Me, &Method::GET) => handlers::users::me_retrieve(state, &request).await,
			(Endpoint::Me, &Method::PATCH) => handlers::users::me_update(state, &request).await,
			(Endpoint::UserDetail, &Method::GET) => {
				handlers::users::retrieve(state, &request).await
			}
			(Endpoint::UserDetail, &Method::PATCH) => {
				handlers::users::update(state, &request).await
			}
			(Endpoint::UserDetail, &Method::DELETE) => {
				handlers::users::delete(state, &request).await
			}

			(Endpoint::Categories, &Method::GET) => {
				handlers::categories::list(state, &request).await
			}
			(Endpoint::Categories, &Method::POST) => {
				handlers::categories::create(state, &request).await
			}
			(Endpoint::CategoryDetail, &Method::DELETE) => {
				handlers::categories::delete(state, &request).await
			}

			(Endpoint::Genres, &Method::GET) => handlers::genres::list(state, &request).await,
			(Endpoint::Genres, &Method::POST) => handlers::genres::create(state, &request).await,
			(Endpoint::GenreDetail, &Method::DELETE) => {
				handlers::genres::delete(state, &request).await
			}

			(Endpoint::Titles, &Method::GET) => handlers::titles::list(state, &request).await,
			(Endpoint::Titles, &Method::POST) => handlers::titles::create(state, &request).await,
			(Endpoint::TitleDetail, &Method::GET) => {
				handlers::titles::retrieve(state, &request).await
			}
			(Endpoint::TitleDetail, &Method::PATCH) => {
				handlers::titles::update(state, &request).await
			}
			(Endpoint::TitleDetail, &Method::DELETE) => {
				handlers::titles::delete(state, &request).await
			}

			(Endpoint::Reviews, &Method::GET) => handlers::reviews::list(state, &request).await,
			(Endpoint::Reviews, &Method::POST) => {
				handlers::reviews::create(state, &request).await
			}
			(Endpoint::ReviewDetail, &Method::GET) => {
				handlers::reviews::retrieve(state, &request).await
			}
			(Endpoint::ReviewDetail, &Method::PATCH) => {
				handlers::reviews::update(state, &request).await
			}
			(Endpoint::ReviewDetail, &Method::DELETE) => {
				handlers::reviews::delete(state, &request).await
			}

			(Endpoint::Comments, &Method::GET) => handlers::comments::list(state, &request).await,
			(Endpoint::Comments, &Method::POST) => {
				handlers::comments::create(state, &request).await
			}
			(Endpoint::CommentDetail, &Method::GET) => {
				handlers::comments::retrieve(state, &request).await
			}
			(Endpoint::CommentDetail, &Method::PATCH) => {
				handlers::comments::update(state, &request).await
			}
			(Endpoint::CommentDetail, &Method::DELETE) => {
				handlers::comments::delete(state, &request).await
			}

			_ => {
				return error_response(
					StatusCode::METHOD_NOT_ALLOWED,
					&format!("method \"{}\" not allowed", request.method),
				);
			}
		};

		match result {
			Ok(response) => response,
			Err(error) => {
				if error.status_code() >= 500 {
					tracing::error!(%error, path = %request.path(), "request failed");
				}
				error.into()
			}
		}
	}
}

fn error_response(status: StatusCode, detail: &str) -> Response {
	Response::new(status)
		.with_json(&json!({ "detail": detail }))
		.unwrap_or_else(|_| Response::new(status))
}
