//! Field validators shared by serializers and the seeding loader.
//!
//! Rules follow the account and catalog constraints: usernames are Django-style
//! (`[\w.@+-]`, max 150, `"me"` reserved), emails are RFC-shaped and capped at
//! 254 characters, slugs are URL-safe, title years cannot be in the future and
//! review scores live in `[1, 10]`.

use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::exception::{Error, Result};

pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_SLUG_LENGTH: usize = 50;

/// Usernames reserved for routing purposes (`/users/me` is the self-profile
/// endpoint, so no account may claim it).
pub const RESERVED_USERNAMES: &[&str] = &["me"];

static USERNAME_PATTERN: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username pattern"));
static EMAIL_PATTERN: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));
static SLUG_PATTERN: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug pattern"));

pub fn validate_username(value: &str) -> Result<()> {
	if value.is_empty() {
		return Err(Error::validation("username", "this field may not be blank"));
	}
	if value.len() > MAX_USERNAME_LENGTH {
		return Err(Error::validation(
			"username",
			format!("ensure this field has at most {} characters", MAX_USERNAME_LENGTH),
		));
	}
	if RESERVED_USERNAMES.contains(&value) {
		return Err(Error::validation(
			"username",
			format!("'{}' is a reserved username", value),
		));
	}
	if !USERNAME_PATTERN.is_match(value) {
		return Err(Error::validation(
			"username",
			"may contain only letters, digits and @/./+/-/_ characters",
		));
	}
	Ok(())
}

pub fn validate_email(value: &str) -> Result<()> {
	if value.len() > MAX_EMAIL_LENGTH {
		return Err(Error::validation(
			"email",
			format!("ensure this field has at most {} characters", MAX_EMAIL_LENGTH),
		));
	}
	if !EMAIL_PATTERN.is_match(value) {
		return Err(Error::validation("email", "enter a valid email address"));
	}
	Ok(())
}

pub fn validate_slug(value: &str) -> Result<()> {
	if value.is_empty() || value.len() > MAX_SLUG_LENGTH {
		return Err(Error::validation(
			"slug",
			format!("ensure this field has 1 to {} characters", MAX_SLUG_LENGTH),
		));
	}
	if !SLUG_PATTERN.is_match(value) {
		return Err(Error::validation(
			"slug",
			"may contain only letters, digits, hyphens and underscores",
		));
	}
	Ok(())
}

/// Title years must fall in `[1, current year]`; nothing gets published in the
/// future.
pub fn validate_year(value: i32) -> Result<()> {
	let current = chrono::Utc::now().year();
	if value < 1 || value > current {
		return Err(Error::validation(
			"year",
			format!("must be between 1 and {}", current),
		));
	}
	Ok(())
}

pub fn validate_score(value: i64) -> Result<()> {
	if !(1..=10).contains(&value) {
		return Err(Error::validation("score", "must be between 1 and 10"));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_username_accepts_word_characters() {
		for name in ["capitan", "jack.sparrow", "user+tag", "a@b", "under_score"] {
			assert!(validate_username(name).is_ok(), "rejected {}", name);
		}
	}

	#[test]
	fn test_username_rejects_reserved() {
		let error = validate_username("me").unwrap_err();
		assert!(error.to_string().contains("reserved"));
	}

	#[test]
	fn test_username_rejects_invalid_characters() {
		assert!(validate_username("no spaces").is_err());
		assert!(validate_username("semi;colon").is_err());
		assert!(validate_username("").is_err());
	}

	#[test]
	fn test_username_rejects_overlong() {
		let name = "a".repeat(MAX_USERNAME_LENGTH + 1);
		assert!(validate_username(&name).is_err());
	}

	#[test]
	fn test_email() {
		assert!(validate_email("user@example.com").is_ok());
		assert!(validate_email("not-an-email").is_err());
		assert!(validate_email("missing@tld").is_err());
		let long = format!("{}@example.com", "a".repeat(MAX_EMAIL_LENGTH));
		assert!(validate_email(&long).is_err());
	}

	#[test]
	fn test_slug() {
		assert!(validate_slug("sci-fi").is_ok());
		assert!(validate_slug("books_2024").is_ok());
		assert!(validate_slug("no spaces").is_err());
		assert!(validate_slug("").is_err());
		assert!(validate_slug(&"x".repeat(MAX_SLUG_LENGTH + 1)).is_err());
	}

	#[test]
	fn test_year_bounds() {
		let current = chrono::Utc::now().year();
		assert!(validate_year(1).is_ok());
		assert!(validate_year(current).is_ok());
		assert!(validate_year(0).is_err());
		assert!(validate_year(current + 1).is_err());
	}

	#[test]
	fn test_score_bounds() {
		assert!(validate_score(1).is_ok());
		assert!(validate_score(10).is_ok());
		assert!(validate_score(0).is_err());
		assert!(validate_score(11).is_err());
		assert!(validate_score(-3).is_err());
	}
}
