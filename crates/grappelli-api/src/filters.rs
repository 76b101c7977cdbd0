//! Query-parameter filtering for list endpoints.

use std::collections::HashMap;

use grappelli_core::{Error, Result};
use grappelli_models::TitleFilter;

/// Parse title list filters from the query string.
///
/// `category` and `genre` filter by slug, `name` by substring, `year` by exact
/// match. A non-numeric `year` is a validation error rather than an empty
/// result.
pub fn title_filter(query_params: &HashMap<String, String>) -> Result<TitleFilter> {
	let year = match query_params.get("year") {
		Some(raw) => Some(
			raw.parse::<i32>()
				.map_err(|_| Error::validation("year", "must be an integer"))?,
		),
		None => None,
	};
	Ok(TitleFilter {
		name: query_params.get("name").cloned(),
		year,
		category: query_params.get("category").cloned(),
		genre: query_params.get("genre").cloned(),
	})
}

/// The `search` parameter used by category, genre and user lists.
pub fn search_term(query_params: &HashMap<String, String>) -> Option<&str> {
	query_params.get("search").map(|s| s.as_str())
}
