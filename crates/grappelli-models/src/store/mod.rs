//! Persistence boundary.
//!
//! Handlers talk to a [`Store`] and nothing else. The trait captures the
//! relational semantics the domain relies on: unique slugs/usernames/emails,
//! the one-review-per-(author, title) constraint enforced atomically at write
//! time, cascade deletes (title → reviews → comments, user → authored
//! feedback) and set-null on category removal.
//!
//! [`MemoryStore`] is the reference implementation; a SQL-backed store would
//! implement the same trait.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use grappelli_core::Result;

use crate::catalog::{Category, Genre, TitleDetail};
use crate::feedback::{Comment, Review};
use crate::users::{Role, User};

/// Input for creating a user (admin provisioning or seeding).
#[derive(Debug, Clone, Default)]
pub struct NewUser {
	pub username: String,
	pub email: String,
	pub role: Role,
	pub is_staff: bool,
	pub first_name: String,
	pub last_name: String,
	pub bio: String,
}

/// Partial update of a user record. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
	pub username: Option<String>,
	pub email: Option<String>,
	pub role: Option<Role>,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub bio: Option<String>,
}

/// Input for creating a title. Category and genres are referenced by slug, the
/// way write payloads carry them.
#[derive(Debug, Clone, Default)]
pub struct NewTitle {
	pub name: String,
	pub year: i32,
	pub description: String,
	pub category: Option<String>,
	pub genres: Vec<String>,
}

/// Partial update of a title.
#[derive(Debug, Clone, Default)]
pub struct TitleUpdate {
	pub name: Option<String>,
	pub year: Option<i32>,
	pub description: Option<String>,
	/// `Some(Some(slug))` re-points the category, `Some(None)` clears it,
	/// `None` leaves it untouched.
	pub category: Option<Option<String>>,
	/// Full replacement of the genre set when present.
	pub genres: Option<Vec<String>>,
}

/// Title list filtering: name substring, exact year, category and genre slugs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TitleFilter {
	pub name: Option<String>,
	pub year: Option<i32>,
	pub category: Option<String>,
	pub genre: Option<String>,
}

/// The relational persistence service.
///
/// Uniqueness violations surface as `Error::Conflict`, missing references as
/// `Error::NotFound` (or a field-scoped `Error::Validation` where the
/// reference arrived in a write payload). Implementations must make the
/// check-and-insert for review uniqueness atomic; callers may pre-check for a
/// friendlier error but must not rely on it.
#[async_trait]
pub trait Store: Send + Sync {
	// Users

	async fn create_user(&self, user: NewUser) -> Result<User>;

	/// Signup upsert: return the existing user when the (username, email)
	/// pair matches exactly, create one otherwise. A username or email that
	/// is already taken by a different pairing is a conflict.
	async fn get_or_create_user(&self, username: &str, email: &str) -> Result<User>;

	async fn get_user(&self, id: i64) -> Result<User>;

	async fn get_user_by_username(&self, username: &str) -> Result<User>;

	async fn list_users(&self) -> Result<Vec<User>>;

	async fn update_user(&self, id: i64, update: UserUpdate) -> Result<User>;

	/// Delete a user and cascade to their reviews and comments.
	async fn delete_user(&self, username: &str) -> Result<()>;

	// Categories

	async fn create_category(&self, name: &str, slug: &str) -> Result<Category>;

	async fn list_categories(&self, search: Option<&str>) -> Result<Vec<Category>>;

	/// Delete a category; titles referencing it keep existing with their
	/// category cleared.
	async fn delete_category(&self, slug: &str) -> Result<()>;

	// Genres

	async fn create_genre(&self, name: &str, slug: &str) -> Result<Genre>;

	async fn list_genres(&self, search: Option<&str>) -> Result<Vec<Genre>>;

	/// Delete a genre and its title links.
	async fn delete_genre(&self, slug: &str) -> Result<()>;

	// Titles

	async fn create_title(&self, title: NewTitle) -> Result<TitleDetail>;

	async fn get_title(&self, id: i64) -> Result<TitleDetail>;

	async fn list_titles(&self, filter: &TitleFilter) -> Result<Vec<TitleDetail>>;

	async fn update_title(&self, id: i64, update: TitleUpdate) -> Result<TitleDetail>;

	/// Delete a title and cascade to its reviews and their comments.
	async fn delete_title(&self, id: i64) -> Result<()>;

	// Reviews

	/// Create a review. Fails with `Conflict` when the author has already
	/// reviewed the title; the check and the insert happen under one lock.
	async fn create_review(
		&self,
		title_id: i64,
		author_id: i64,
		text: &str,
		score: u8,
	) -> Result<Review>;

	/// Advisory pre-check used for the friendly duplicate-review error.
	async fn author_reviewed_title(&self, title_id: i64, author_id: i64) -> Result<bool>;

	async fn list_reviews(&self, title_id: i64) -> Result<Vec<Review>>;

	async fn get_review(&self, title_id: i64, review_id: i64) -> Result<Review>;

	async fn update_review(
		&self,
		review_id: i64,
		text: Option<&str>,
		score: Option<u8>,
	) -> Result<Review>;

	/// Delete a review and cascade to its comments.
	async fn delete_review(&self, review_id: i64) -> Result<()>;

	// Comments

	async fn create_comment(&self, review_id: i64, author_id: i64, text: &str) -> Result<Comment>;

	async fn list_comments(&self, review_id: i64) -> Result<Vec<Comment>>;

	async fn get_comment(&self, review_id: i64, comment_id: i64) -> Result<Comment>;

	async fn update_comment(&self, comment_id: i64, text: &str) -> Result<Comment>;

	async fn delete_comment(&self, comment_id: i64) -> Result<()>;
}
