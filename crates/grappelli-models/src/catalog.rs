//! Catalog reference data: categories, genres, titles and their linkage.

use serde::{Deserialize, Serialize};

/// A top-level grouping for titles ("books", "films", ...).
///
/// Immutable reference data: created and deleted by admins, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
	pub id: i64,
	pub name: String,
	pub slug: String,
}

/// A genre tag ("sci-fi", "jazz", ...), attached to titles many-to-many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
	pub id: i64,
	pub name: String,
	pub slug: String,
}

/// A reviewable work.
///
/// The average rating is intentionally absent here; it is derived from review
/// scores on every read (see [`crate::rating`]) and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
	pub id: i64,
	pub name: String,
	pub year: i32,
	#[serde(default)]
	pub description: String,
	/// Set to `None` when the referenced category is deleted.
	pub category_id: Option<i64>,
}

/// Link row for the title/genre many-to-many relation. Pure relation, no
/// identity beyond the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenreTitle {
	pub genre_id: i64,
	pub title_id: i64,
}

/// Read model for title endpoints: the entity with its references resolved and
/// the rating freshly aggregated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleDetail {
	pub title: Title,
	pub category: Option<Category>,
	pub genres: Vec<Genre>,
	pub rating: Option<f64>,
}
