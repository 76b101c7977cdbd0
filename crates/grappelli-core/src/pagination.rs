//! Page-number pagination for list endpoints.
//!
//! Inspired by Django REST Framework's `PageNumberPagination`: clients ask for
//! `?page=N&page_size=M`, responses carry `count`/`next`/`previous` links
//! alongside the page of results.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::exception::{Error, Result};

/// Paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
	pub count: usize,
	pub next: Option<String>,
	pub previous: Option<String>,
	pub results: Vec<T>,
}

/// Page-number paginator with a default and a maximum page size.
///
/// # Examples
///
/// ```
/// use grappelli_core::PageNumberPagination;
/// use std::collections::HashMap;
///
/// let paginator = PageNumberPagination::new().page_size(3);
/// let items: Vec<i32> = (1..=10).collect();
///
/// let mut params = HashMap::new();
/// params.insert("page".to_string(), "2".to_string());
///
/// let page = paginator.paginate("/api/v1/titles", &params, items).unwrap();
/// assert_eq!(page.count, 10);
/// assert_eq!(page.results, vec![4, 5, 6]);
/// assert!(page.next.is_some());
/// assert!(page.previous.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct PageNumberPagination {
	page_size: usize,
	max_page_size: usize,
}

impl Default for PageNumberPagination {
	fn default() -> Self {
		Self {
			page_size: 10,
			max_page_size: 100,
		}
	}
}

impl PageNumberPagination {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn page_size(mut self, page_size: usize) -> Self {
		self.page_size = page_size.max(1);
		self
	}

	pub fn max_page_size(mut self, max_page_size: usize) -> Self {
		self.max_page_size = max_page_size.max(1);
		self
	}

	/// Slice `items` according to the `page`/`page_size` query parameters.
	///
	/// An out-of-range or non-numeric `page` is a validation error, matching
	/// DRF's invalid-page behavior.
	pub fn paginate<T>(
		&self,
		base_path: &str,
		query_params: &HashMap<String, String>,
		items: Vec<T>,
	) -> Result<PaginatedResponse<T>> {
		let page = match query_params.get("page") {
			Some(raw) => raw
				.parse::<usize>()
				.ok()
				.filter(|page| *page >= 1)
				.ok_or_else(|| Error::validation("page", "invalid page number"))?,
			None => 1,
		};
		let page_size = match query_params.get("page_size") {
			Some(raw) => raw
				.parse::<usize>()
				.ok()
				.filter(|size| *size >= 1)
				.ok_or_else(|| Error::validation("page_size", "invalid page size"))?
				.min(self.max_page_size),
			None => self.page_size,
		};

		let count = items.len();
		let num_pages = count.div_ceil(page_size).max(1);
		if page > num_pages {
			return Err(Error::validation("page", "page out of range"));
		}

		let start = (page - 1) * page_size;
		let results: Vec<T> = items
			.into_iter()
			.skip(start)
			.take(page_size)
			.collect();

		// Filter parameters ride along on the page links, so following `next`
		// keeps the same result set.
		let mut extra: Vec<(&str, &str)> = query_params
			.iter()
			.filter(|(key, _)| key.as_str() != "page" && key.as_str() != "page_size")
			.map(|(key, value)| (key.as_str(), value.as_str()))
			.collect();
		extra.sort_unstable();
		let link = |target: usize| {
			let mut url = format!("{}?page={}&page_size={}", base_path, target, page_size);
			for (key, value) in &extra {
				url.push('&');
				url.push_str(key);
				url.push('=');
				url.push_str(&encode_component(value));
			}
			url
		};
		Ok(PaginatedResponse {
			count,
			next: (page < num_pages).then(|| link(page + 1)),
			previous: (page > 1).then(|| link(page - 1)),
			results,
		})
	}
}

// Percent-encodes everything outside the URI unreserved set.
fn encode_component(value: &str) -> String {
	let mut out = String::with_capacity(value.len());
	for byte in value.bytes() {
		match byte {
			b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
				out.push(byte as char);
			}
			other => out.push_str(&format!("%{:02X}", other)),
		}
	}
	out
}
