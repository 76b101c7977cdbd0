//! User feedback: reviews on titles, comments on reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scored review of a title.
///
/// At most one review may exist per (author, title) pair; the store enforces
/// this atomically at insert time. `pub_date` is server-set and immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
	pub id: i64,
	pub title_id: i64,
	pub author_id: i64,
	pub text: String,
	pub score: u8,
	pub pub_date: DateTime<Utc>,
}

/// A comment attached to a review. No uniqueness constraint; deleted together
/// with its review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
	pub id: i64,
	pub review_id: i64,
	pub author_id: i64,
	pub text: String,
	pub pub_date: DateTime<Utc>,
}
