use bytes::Bytes;
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::exception::{Error, Result};

/// HTTP response representation.
#[derive(Debug)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new response with the given status code.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_core::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn created() -> Self {
		Self::new(StatusCode::CREATED)
	}

	pub fn no_content() -> Self {
		Self::new(StatusCode::NO_CONTENT)
	}

	pub fn bad_request() -> Self {
		Self::new(StatusCode::BAD_REQUEST)
	}

	pub fn unauthorized() -> Self {
		Self::new(StatusCode::UNAUTHORIZED)
	}

	pub fn forbidden() -> Self {
		Self::new(StatusCode::FORBIDDEN)
	}

	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	pub fn method_not_allowed() -> Self {
		Self::new(StatusCode::METHOD_NOT_ALLOWED)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Serialize `value` as the JSON body and set the content type.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_core::Response;
	/// use serde_json::json;
	///
	/// let response = Response::ok().with_json(&json!({"token": "abc"})).unwrap();
	/// assert_eq!(
	///     response.headers.get(hyper::header::CONTENT_TYPE).unwrap(),
	///     "application/json"
	/// );
	/// ```
	pub fn with_json<T: Serialize>(mut self, value: &T) -> Result<Self> {
		let body = serde_json::to_vec(value).map_err(|e| Error::Internal(e.to_string()))?;
		self.headers.insert(
			hyper::header::CONTENT_TYPE,
			hyper::header::HeaderValue::from_static("application/json"),
		);
		self.body = Bytes::from(body);
		Ok(self)
	}

	/// Deserialize the JSON body, mainly for tests.
	pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
		serde_json::from_slice(&self.body).map_err(|e| Error::Parse(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_constructors() {
		assert_eq!(Response::ok().status, StatusCode::OK);
		assert_eq!(Response::created().status, StatusCode::CREATED);
		assert_eq!(Response::no_content().status, StatusCode::NO_CONTENT);
		assert_eq!(Response::forbidden().status, StatusCode::FORBIDDEN);
		assert_eq!(Response::not_found().status, StatusCode::NOT_FOUND);
	}

	#[test]
	fn test_json_round_trip() {
		let response = Response::ok().with_json(&json!({"rating": 7.0})).unwrap();
		let value: serde_json::Value = response.json().unwrap();
		assert_eq!(value["rating"], 7.0);
	}
}
