//! Request payloads and response shapes.
//!
//! Inputs deserialize from JSON bodies and validate themselves into store
//! inputs; every rule failure is a field-scoped validation error. Outputs are
//! the wire representations: slugged references are embedded as objects,
//! authors as usernames, ratings as freshly derived numbers.

use serde::{Deserialize, Serialize};

use grappelli_core::validators::{
	validate_email, validate_score, validate_slug, validate_username, validate_year,
};
use grappelli_core::{Error, Result};
use grappelli_models::store::{NewTitle, NewUser, TitleUpdate, UserUpdate};
use grappelli_models::{Category, Comment, Genre, Review, Role, TitleDetail, User};

// ---------------------------------------------------------------------------
// Inputs

/// Body of `POST /auth/signup/`.
#[derive(Debug, Deserialize)]
pub struct SignupPayload {
	pub username: String,
	pub email: String,
}

impl SignupPayload {
	pub fn validate(&self) -> Result<()> {
		validate_username(&self.username)?;
		validate_email(&self.email)?;
		Ok(())
	}
}

/// Body of `POST /auth/token/`.
#[derive(Debug, Deserialize)]
pub struct TokenPayload {
	pub username: String,
	pub confirmation_code: String,
}

/// Body of admin `POST /users/`.
#[derive(Debug, Deserialize)]
pub struct UserPayload {
	pub username: String,
	pub email: String,
	#[serde(default)]
	pub role: Option<Role>,
	#[serde(default)]
	pub first_name: String,
	#[serde(default)]
	pub last_name: String,
	#[serde(default)]
	pub bio: String,
}

impl UserPayload {
	pub fn validate(self) -> Result<NewUser> {
		validate_username(&self.username)?;
		validate_email(&self.email)?;
		Ok(NewUser {
			username: self.username,
			email: self.email,
			role: self.role.unwrap_or_default(),
			is_staff: false,
			first_name: self.first_name,
			last_name: self.last_name,
			bio: self.bio,
		})
	}
}

/// Body of `PATCH /users/{username}/` and `PATCH /users/me/`.
#[derive(Debug, Default, Deserialize)]
pub struct UserPatch {
	pub username: Option<String>,
	pub email: Option<String>,
	pub role: Option<Role>,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub bio: Option<String>,
}

impl UserPatch {
	pub fn validate(self) -> Result<UserUpdate> {
		if let Some(username) = &self.username {
			validate_username(username)?;
		}
		if let Some(email) = &self.email {
			validate_email(email)?;
		}
		Ok(UserUpdate {
			username: self.username,
			email: self.email,
			role: self.role,
			first_name: self.first_name,
			last_name: self.last_name,
			bio: self.bio,
		})
	}
}

/// Body of `POST /categories/` and `POST /genres/`.
#[derive(Debug, Deserialize)]
pub struct SlugPayload {
	pub name: String,
	pub slug: String,
}

impl SlugPayload {
	pub fn validate(&self) -> Result<()> {
		if self.name.is_empty() || self.name.len() > 256 {
			return Err(Error::validation("name", "ensure this field has 1 to 256 characters"));
		}
		validate_slug(&self.slug)
	}
}

/// Body of `POST /titles/`.
#[derive(Debug, Deserialize)]
pub struct TitlePayload {
	pub name: String,
	pub year: i32,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default, rename = "genre")]
	pub genres: Vec<String>,
}

impl TitlePayload {
	pub fn validate(self) -> Result<NewTitle> {
		if self.name.is_empty() || self.name.len() > 256 {
			return Err(Error::validation("name", "ensure this field has 1 to 256 characters"));
		}
		validate_year(self.year)?;
		Ok(NewTitle {
			name: self.name,
			year: self.year,
			description: self.description,
			category: self.category,
			genres: self.genres,
		})
	}
}

/// Body of `PATCH /titles/{title_id}/`.
///
/// `category` distinguishes an absent key (leave as is) from an explicit
/// `null` (clear the category).
#[derive(Debug, Default, Deserialize)]
pub struct TitlePatch {
	pub name: Option<String>,
	pub year: Option<i32>,
	pub description: Option<String>,
	#[serde(default, deserialize_with = "double_option")]
	pub category: Option<Option<String>>,
	#[serde(rename = "genre")]
	pub genres: Option<Vec<String>>,
}

// Maps a present value (null included) to `Some`; serde's default covers the
// absent key.
fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
	T: serde::Deserialize<'de>,
	D: serde::Deserializer<'de>,
{
	Option::<T>::deserialize(deserializer).map(Some)
}

impl TitlePatch {
	pub fn validate(self) -> Result<TitleUpdate> {
		if let Some(name) = &self.name
			&& (name.is_empty() || name.len() > 256)
		{
			return Err(Error::validation("name", "ensure this field has 1 to 256 characters"));
		}
		if let Some(year) = self.year {
			validate_year(year)?;
		}
		Ok(TitleUpdate {
			name: self.name,
			year: self.year,
			description: self.description,
			category: self.category,
			genres: self.genres,
		})
	}
}

/// Body of `POST /titles/{title_id}/reviews/`.
#[derive(Debug, Deserialize)]
pub struct ReviewPayload {
	pub text: String,
	pub score: i64,
}

impl ReviewPayload {
	/// Returns the score narrowed to its valid range.
	pub fn validate(&self) -> Result<u8> {
		if self.text.is_empty() {
			return Err(Error::validation("text", "this field may not be blank"));
		}
		validate_score(self.score)?;
		Ok(self.score as u8)
	}
}

/// Body of `PATCH /titles/{title_id}/reviews/{review_id}/`.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewPatch {
	pub text: Option<String>,
	pub score: Option<i64>,
}

impl ReviewPatch {
	pub fn validate(&self) -> Result<Option<u8>> {
		if let Some(text) = &self.text
			&& text.is_empty()
		{
			return Err(Error::validation("text", "this field may not be blank"));
		}
		match self.score {
			Some(score) => {
				validate_score(score)?;
				Ok(Some(score as u8))
			}
			None => Ok(None),
		}
	}
}

/// Body of comment create and update.
#[derive(Debug, Deserialize)]
pub struct CommentPayload {
	pub text: String,
}

impl CommentPayload {
	pub fn validate(&self) -> Result<()> {
		if self.text.is_empty() {
			return Err(Error::validation("text", "this field may not be blank"));
		}
		Ok(())
	}
}

/// Reject payload keys a caller is not allowed to touch.
///
/// The self-profile endpoint refuses a `role` key outright, even when the
/// value matches the current role; silently ignoring it would let a denied
/// escalation look like a success.
pub fn reject_fields(body: &[u8], forbidden: &[&str]) -> Result<()> {
	let value: serde_json::Value = serde_json::from_slice(body)?;
	if let Some(object) = value.as_object() {
		for field in forbidden {
			if object.contains_key(*field) {
				return Err(Error::validation(field, "this field cannot be modified here"));
			}
		}
	}
	Ok(())
}

// ---------------------------------------------------------------------------
// Outputs

#[derive(Debug, Serialize)]
pub struct UserOut {
	pub username: String,
	pub email: String,
	pub first_name: String,
	pub last_name: String,
	pub bio: String,
	pub role: Role,
}

impl From<User> for UserOut {
	fn from(user: User) -> Self {
		Self {
			username: user.username,
			email: user.email,
			first_name: user.first_name,
			last_name: user.last_name,
			bio: user.bio,
			role: user.role,
		}
	}
}

/// Category and genre share one wire shape: `{name, slug}`, no id.
#[derive(Debug, Serialize)]
pub struct SlugOut {
	pub name: String,
	pub slug: String,
}

impl From<Category> for SlugOut {
	fn from(category: Category) -> Self {
		Self { name: category.name, slug: category.slug }
	}
}

impl From<Genre> for SlugOut {
	fn from(genre: Genre) -> Self {
		Self { name: genre.name, slug: genre.slug }
	}
}

#[derive(Debug, Serialize)]
pub struct TitleOut {
	pub id: i64,
	pub name: String,
	pub year: i32,
	/// Mean review score, absent until the first review lands.
	pub rating: Option<f64>,
	pub description: String,
	pub genre: Vec<SlugOut>,
	pub category: Option<SlugOut>,
}

impl From<TitleDetail> for TitleOut {
	fn from(detail: TitleDetail) -> Self {
		Self {
			id: detail.title.id,
			name: detail.title.name,
			year: detail.title.year,
			rating: detail.rating,
			description: detail.title.description,
			genre: detail.genres.into_iter().map(SlugOut::from).collect(),
			category: detail.category.map(SlugOut::from),
		}
	}
}

#[derive(Debug, Serialize)]
pub struct ReviewOut {
	pub id: i64,
	pub text: String,
	/// Author's username.
	pub author: String,
	pub score: u8,
	pub pub_date: chrono::DateTime<chrono::Utc>,
}

impl ReviewOut {
	pub fn new(review: Review, author: String) -> Self {
		Self {
			id: review.id,
			text: review.text,
			author,
			score: review.score,
			pub_date: review.pub_date,
		}
	}
}

#[derive(Debug, Serialize)]
pub struct CommentOut {
	pub id: i64,
	pub text: String,
	pub author: String,
	pub pub_date: chrono::DateTime<chrono::Utc>,
}

impl CommentOut {
	pub fn new(comment: Comment, author: String) -> Self {
		Self {
			id: comment.id,
			text: comment.text,
			author,
			pub_date: comment.pub_date,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_signup_rejects_reserved_username() {
		let payload = SignupPayload {
			username: "me".into(),
			email: "me@example.com".into(),
		};
		assert!(matches!(payload.validate(), Err(Error::Validation(_))));
	}

	#[test]
	fn test_review_score_bounds() {
		let valid = ReviewPayload { text: "fine".into(), score: 10 };
		assert_eq!(valid.validate().unwrap(), 10);

		let too_high = ReviewPayload { text: "fine".into(), score: 11 };
		assert!(too_high.validate().is_err());

		let zero = ReviewPayload { text: "fine".into(), score: 0 };
		assert!(zero.validate().is_err());
	}

	#[test]
	fn test_title_year_validated() {
		let future = TitlePayload {
			name: "Dune 3".into(),
			year: chrono::Datelike::year(&chrono::Utc::now()) + 1,
			description: String::new(),
			category: None,
			genres: Vec::new(),
		};
		assert!(future.validate().is_err());
	}

	#[test]
	fn test_title_patch_category_null_vs_absent() {
		let patch: TitlePatch = serde_json::from_str(r#"{"name": "Dune"}"#).unwrap();
		assert_eq!(patch.category, None);

		let patch: TitlePatch = serde_json::from_str(r#"{"category": null}"#).unwrap();
		assert_eq!(patch.category, Some(None));

		let patch: TitlePatch = serde_json::from_str(r#"{"category": "books"}"#).unwrap();
		assert_eq!(patch.category, Some(Some("books".to_string())));
	}

	#[test]
	fn test_title_genre_key_name() {
		let payload: TitlePayload = serde_json::from_str(
			r#"{"name": "Dune", "year": 1965, "genre": ["sci-fi"], "category": "books"}"#,
		)
		.unwrap();
		assert_eq!(payload.genres, vec!["sci-fi".to_string()]);
	}

	#[test]
	fn test_reject_fields() {
		let body = br#"{"bio": "hello", "role": "admin"}"#;
		assert!(reject_fields(body, &["role"]).is_err());

		let body = br#"{"bio": "hello"}"#;
		assert!(reject_fields(body, &["role"]).is_ok());
	}

	#[test]
	fn test_reject_fields_even_when_value_unchanged() {
		// asking for your current role is still asking for a role
		let body = br#"{"role": "user"}"#;
		assert!(reject_fields(body, &["role"]).is_err());
	}

	#[test]
	fn test_title_output_shape() {
		use grappelli_models::Title;

		let detail = TitleDetail {
			title: Title {
				id: 3,
				name: "Dune".into(),
				year: 1965,
				description: String::new(),
				category_id: None,
			},
			category: None,
			genres: Vec::new(),
			rating: None,
		};
		let out = TitleOut::from(detail);
		let json = serde_json::to_value(&out).unwrap();
		assert_eq!(json["rating"], serde_json::Value::Null);
		assert_eq!(json["category"], serde_json::Value::Null);
		assert_eq!(json["genre"], serde_json::json!([]));
	}
}
