use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use std::collections::HashMap;

use crate::exception::{Error, Result};

/// HTTP request representation.
///
/// Query parameters are parsed eagerly from the URI; path parameters are
/// filled in by the dispatcher once a route pattern has matched.
///
/// # Examples
///
/// ```
/// use grappelli_core::Request;
/// use hyper::Method;
///
/// let request = Request::builder()
///     .method(Method::GET)
///     .uri("/api/v1/titles?year=1965&page=2")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.query_params.get("year"), Some(&"1965".to_string()));
/// assert_eq!(request.path(), "/api/v1/titles");
/// ```
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub path_params: HashMap<String, String>,
	pub query_params: HashMap<String, String>,
}

impl Request {
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Bearer credential from the `Authorization` header, if present.
	pub fn bearer_token(&self) -> Option<&str> {
		self.headers
			.get(hyper::header::AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.strip_prefix("Bearer "))
	}

	/// Named path parameter captured by the router.
	pub fn path_param(&self, name: &str) -> Result<&str> {
		self.path_params
			.get(name)
			.map(|value| value.as_str())
			.ok_or_else(|| Error::Internal(format!("missing path parameter '{}'", name)))
	}

	/// Path parameter parsed as a numeric identifier.
	pub fn path_param_id(&self, name: &str) -> Result<i64> {
		let raw = self.path_param(name)?;
		raw.parse::<i64>()
			.map_err(|_| Error::NotFound(format!("invalid identifier '{}'", raw)))
	}

	/// Deserialize the JSON body into `T`.
	pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
		serde_json::from_slice(&self.body).map_err(|e| Error::Parse(e.to_string()))
	}

	/// True for safe (read-only) HTTP methods.
	pub fn is_safe_method(&self) -> bool {
		matches!(self.method, Method::GET | Method::HEAD | Method::OPTIONS)
	}
}

/// Builder for [`Request`].
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<Uri>,
	version: Option<Version>,
	headers: Option<HeaderMap>,
	body: Option<Bytes>,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn uri<U>(mut self, uri: U) -> Self
	where
		U: TryInto<Uri>,
	{
		self.uri = uri.try_into().ok();
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = Some(version);
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = Some(headers);
		self
	}

	pub fn header(mut self, name: &'static str, value: &str) -> Self {
		let mut headers = self.headers.unwrap_or_default();
		if let Ok(value) = value.parse() {
			headers.insert(name, value);
		}
		self.headers = Some(headers);
		self
	}

	pub fn body(mut self, body: Bytes) -> Self {
		self.body = Some(body);
		self
	}

	pub fn json<T: serde::Serialize>(mut self, value: &T) -> Self {
		if let Ok(encoded) = serde_json::to_vec(value) {
			self.body = Some(Bytes::from(encoded));
		}
		self
	}

	pub fn build(self) -> Result<Request> {
		let uri = self
			.uri
			.ok_or_else(|| Error::Internal("request URI is required".into()))?;
		let query_params = parse_query(uri.query().unwrap_or(""));
		Ok(Request {
			method: self.method.unwrap_or(Method::GET),
			uri,
			version: self.version.unwrap_or(Version::HTTP_11),
			headers: self.headers.unwrap_or_default(),
			body: self.body.unwrap_or_default(),
			path_params: HashMap::new(),
			query_params,
		})
	}
}

fn parse_query(query: &str) -> HashMap<String, String> {
	query
		.split('&')
		.filter(|pair| !pair.is_empty())
		.filter_map(|pair| {
			let mut parts = pair.splitn(2, '=');
			let key = parts.next()?;
			let value = parts.next().unwrap_or("");
			Some((percent_decode(key), percent_decode(value)))
		})
		.collect()
}

// Decodes into bytes first: a multi-byte UTF-8 sequence arrives as several
// percent escapes and only forms a character once reassembled.
fn percent_decode(value: &str) -> String {
	let mut out = Vec::with_capacity(value.len());
	let mut bytes = value.bytes();
	while let Some(b) = bytes.next() {
		match b {
			b'+' => out.push(b' '),
			b'%' => {
				let hi = bytes.next();
				let lo = bytes.next();
				match (hi, lo) {
					(Some(hi), Some(lo)) => {
						let hex = [hi, lo];
						if let Ok(hex) = std::str::from_utf8(&hex)
							&& let Ok(byte) = u8::from_str_radix(hex, 16)
						{
							out.push(byte);
						}
					}
					_ => out.push(b'%'),
				}
			}
			other => out.push(other),
		}
	}
	String::from_utf8_lossy(&out).into_owned()
}
