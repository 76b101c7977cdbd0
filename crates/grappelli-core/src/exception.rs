//! Error taxonomy for the whole backend.
//!
//! Every fallible operation below the HTTP boundary returns [`Result`]. The
//! variants map one-to-one onto response status codes, so handlers can bubble
//! errors with `?` and let the boundary turn them into JSON error responses.

use crate::http::Response;
use hyper::StatusCode;

/// Unified error type.
///
/// `Validation` carries a field-scoped message ("score: must be between 1 and
/// 10"), `Conflict` a duplicate-state explanation, `Authorization` a policy
/// denial. The distinction matters to clients: a denied write must never look
/// like a malformed one.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Validation error: {0}")]
	Validation(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Authentication required: {0}")]
	Authentication(String),

	#[error("Permission denied: {0}")]
	Authorization(String),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Malformed request: {0}")]
	Parse(String),

	#[error("Internal error: {0}")]
	Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
	/// Field-scoped validation error, formatted the way serializers report
	/// per-field failures.
	pub fn validation(field: &str, message: impl Into<String>) -> Self {
		Error::Validation(format!("{}: {}", field, message.into()))
	}

	/// HTTP status code this error maps to.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_core::Error;
	///
	/// assert_eq!(Error::NotFound("title".into()).status_code(), 404);
	/// assert_eq!(Error::Authorization("denied".into()).status_code(), 403);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::Validation(_) => 400,
			Error::Parse(_) => 400,
			Error::Authentication(_) => 401,
			Error::Authorization(_) => 403,
			Error::NotFound(_) => 404,
			Error::Conflict(_) => 409,
			Error::Internal(_) => 500,
		}
	}
}

impl From<Error> for Response {
	fn from(error: Error) -> Self {
		let status = StatusCode::from_u16(error.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let body = serde_json::json!({ "detail": error.to_string() });
		Response::new(status)
			.with_json(&body)
			.unwrap_or_else(|_| Response::new(status))
	}
}

impl From<serde_json::Error> for Error {
	fn from(error: serde_json::Error) -> Self {
		Error::Parse(error.to_string())
	}
}
