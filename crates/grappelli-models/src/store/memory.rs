//! In-memory reference store.
//!
//! A single `RwLock` guards all tables, so every uniqueness check and its
//! insert happen under one write lock; the duplicate-review race the advisory
//! pre-check leaves open is closed here, the way a SQL unique constraint
//! closes it at commit time.

use async_trait::async_trait;
use chrono::Utc;
use grappelli_core::{Error, Result};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::catalog::{Category, Genre, GenreTitle, Title, TitleDetail};
use crate::feedback::{Comment, Review};
use crate::rating::mean_score;
use crate::users::{Role, User};

use super::{NewTitle, NewUser, Store, TitleFilter, TitleUpdate, UserUpdate};

#[derive(Debug, Default)]
struct Inner {
	users: BTreeMap<i64, User>,
	categories: BTreeMap<i64, Category>,
	genres: BTreeMap<i64, Genre>,
	titles: BTreeMap<i64, Title>,
	genre_titles: Vec<GenreTitle>,
	reviews: BTreeMap<i64, Review>,
	comments: BTreeMap<i64, Comment>,
	next_id: i64,
}

impl Inner {
	fn allocate_id(&mut self) -> i64 {
		self.next_id += 1;
		self.next_id
	}

	fn category_by_slug(&self, slug: &str) -> Option<&Category> {
		self.categories.values().find(|c| c.slug == slug)
	}

	fn genre_by_slug(&self, slug: &str) -> Option<&Genre> {
		self.genres.values().find(|g| g.slug == slug)
	}

	fn resolve_category(&self, slug: &str) -> Result<i64> {
		self.category_by_slug(slug).map(|c| c.id).ok_or_else(|| {
			Error::validation("category", format!("object with slug '{}' does not exist", slug))
		})
	}

	fn resolve_genres(&self, slugs: &[String]) -> Result<Vec<i64>> {
		slugs
			.iter()
			.map(|slug| {
				self.genre_by_slug(slug).map(|g| g.id).ok_or_else(|| {
					Error::validation(
						"genre",
						format!("object with slug '{}' does not exist", slug),
					)
				})
			})
			.collect()
	}

	fn title_detail(&self, title: &Title) -> TitleDetail {
		let category = title
			.category_id
			.and_then(|id| self.categories.get(&id))
			.cloned();
		let genres: Vec<Genre> = self
			.genre_titles
			.iter()
			.filter(|link| link.title_id == title.id)
			.filter_map(|link| self.genres.get(&link.genre_id))
			.cloned()
			.collect();
		let scores: Vec<u8> = self
			.reviews
			.values()
			.filter(|review| review.title_id == title.id)
			.map(|review| review.score)
			.collect();
		TitleDetail {
			title: title.clone(),
			category,
			genres,
			rating: mean_score(&scores),
		}
	}

	fn remove_review_cascade(&mut self, review_id: i64) {
		self.reviews.remove(&review_id);
		self.comments.retain(|_, comment| comment.review_id != review_id);
	}

	fn remove_title_cascade(&mut self, title_id: i64) {
		self.titles.remove(&title_id);
		self.genre_titles.retain(|link| link.title_id != title_id);
		let review_ids: Vec<i64> = self
			.reviews
			.values()
			.filter(|review| review.title_id == title_id)
			.map(|review| review.id)
			.collect();
		for review_id in review_ids {
			self.remove_review_cascade(review_id);
		}
	}
}

/// Thread-safe in-memory [`Store`].
#[derive(Debug, Default)]
pub struct MemoryStore {
	inner: RwLock<Inner>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl Store for MemoryStore {
	async fn create_user(&self, user: NewUser) -> Result<User> {
		let mut inner = self.inner.write().await;
		if inner.users.values().any(|u| u.username == user.username) {
			return Err(Error::Conflict(format!(
				"a user with username '{}' already exists",
				user.username
			)));
		}
		if inner.users.values().any(|u| u.email == user.email) {
			return Err(Error::Conflict(format!(
				"a user with email '{}' already exists",
				user.email
			)));
		}
		let id = inner.allocate_id();
		let record = User {
			id,
			username: user.username,
			email: user.email,
			role: user.role,
			is_staff: user.is_staff,
			first_name: user.first_name,
			last_name: user.last_name,
			bio: user.bio,
		};
		inner.users.insert(id, record.clone());
		Ok(record)
	}

	async fn get_or_create_user(&self, username: &str, email: &str) -> Result<User> {
		let mut inner = self.inner.write().await;
		if let Some(user) = inner
			.users
			.values()
			.find(|u| u.username == username && u.email == email)
		{
			return Ok(user.clone());
		}
		if inner.users.values().any(|u| u.username == username) {
			return Err(Error::Conflict(format!(
				"a user with username '{}' already exists",
				username
			)));
		}
		if inner.users.values().any(|u| u.email == email) {
			return Err(Error::Conflict(format!(
				"a user with email '{}' already exists",
				email
			)));
		}
		let id = inner.allocate_id();
		let record = User {
			id,
			username: username.to_string(),
			email: email.to_string(),
			role: Role::User,
			is_staff: false,
			first_name: String::new(),
			last_name: String::new(),
			bio: String::new(),
		};
		inner.users.insert(id, record.clone());
		Ok(record)
	}

	async fn get_user(&self, id: i64) -> Result<User> {
		let inner = self.inner.read().await;
		inner
			.users
			.get(&id)
			.cloned()
			.ok_or_else(|| Error::NotFound(format!("user {} does not exist", id)))
	}

	async fn get_user_by_username(&self, username: &str) -> Result<User> {
		let inner = self.inner.read().await;
		inner
			.users
			.values()
			.find(|u| u.username == username)
			.cloned()
			.ok_or_else(|| Error::NotFound(format!("user '{}' does not exist", username)))
	}

	async fn list_users(&self) -> Result<Vec<User>> {
		let inner = self.inner.read().await;
		Ok(inner.users.values().cloned().collect())
	}

	async fn update_user(&self, id: i64, update: UserUpdate) -> Result<User> {
		let mut inner = self.inner.write().await;
		if let Some(username) = &update.username
			&& inner
				.users
				.values()
				.any(|u| u.id != id && u.username == *username)
		{
			return Err(Error::Conflict(format!(
				"a user with username '{}' already exists",
				username
			)));
		}
		if let Some(email) = &update.email
			&& inner.users.values().any(|u| u.id != id && u.email == *email)
		{
			return Err(Error::Conflict(format!(
				"a user with email '{}' already exists",
				email
			)));
		}
		let user = inner
			.users
			.get_mut(&id)
			.ok_or_else(|| Error::NotFound(format!("user {} does not exist", id)))?;
		if let Some(username) = update.username {
			user.username = username;
		}
		if let Some(email) = update.email {
			user.email = email;
		}
		if let Some(role) = update.role {
			user.role = role;
		}
		if let Some(first_name) = update.first_name {
			user.first_name = first_name;
		}
		if let Some(last_name) = update.last_name {
			user.last_name = last_name;
		}
		if let Some(bio) = update.bio {
			user.bio = bio;
		}
		Ok(user.clone())
	}

	async fn delete_user(&self, username: &str) -> Result<()> {
		let mut inner = self.inner.write().await;
		let user_id = inner
			.users
			.values()
			.find(|u| u.username == username)
			.map(|u| u.id)
			.ok_or_else(|| Error::NotFound(format!("user '{}' does not exist", username)))?;
		inner.users.remove(&user_id);
		let review_ids: Vec<i64> = inner
			.reviews
			.values()
			.filter(|review| review.author_id == user_id)
			.map(|review| review.id)
			.collect();
		for review_id in review_ids {
			inner.remove_review_cascade(review_id);
		}
		inner
			.comments
			.retain(|_, comment| comment.author_id != user_id);
		Ok(())
	}

	async fn create_category(&self, name: &str, slug: &str) -> Result<Category> {
		let mut inner = self.inner.write().await;
		if inner.category_by_slug(slug).is_some() {
			return Err(Error::Conflict(format!(
				"a category with slug '{}' already exists",
				slug
			)));
		}
		let id = inner.allocate_id();
		let category = Category {
			id,
			name: name.to_string(),
			slug: slug.to_string(),
		};
		inner.categories.insert(id, category.clone());
		Ok(category)
	}

	async fn list_categories(&self, search: Option<&str>) -> Result<Vec<Category>> {
		let inner = self.inner.read().await;
		let needle = search.map(|s| s.to_lowercase());
		Ok(inner
			.categories
			.values()
			.filter(|category| match &needle {
				Some(needle) => category.name.to_lowercase().contains(needle),
				None => true,
			})
			.cloned()
			.collect())
	}

	async fn delete_category(&self, slug: &str) -> Result<()> {
		let mut inner = self.inner.write().await;
		let category_id = inner
			.category_by_slug(slug)
			.map(|c| c.id)
			.ok_or_else(|| Error::NotFound(format!("category '{}' does not exist", slug)))?;
		inner.categories.remove(&category_id);
		// set-null, not cascade: the titles survive
		for title in inner.titles.values_mut() {
			if title.category_id == Some(category_id) {
				title.category_id = None;
			}
		}
		Ok(())
	}

	async fn create_genre(&self, name: &str, slug: &str) -> Result<Genre> {
		let mut inner = self.inner.write().await;
		if inner.genre_by_slug(slug).is_some() {
			return Err(Error::Conflict(format!(
				"a genre with slug '{}' already exists",
				slug
			)));
		}
		let id = inner.allocate_id();
		let genre = Genre {
			id,
			name: name.to_string(),
			slug: slug.to_string(),
		};
		inner.genres.insert(id, genre.clone());
		Ok(genre)
	}

	async fn list_genres(&self, search: Option<&str>) -> Result<Vec<Genre>> {
		let inner = self.inner.read().await;
		let needle = search.map(|s| s.to_lowercase());
		Ok(inner
			.genres
			.values()
			.filter(|genre| match &needle {
				Some(needle) => genre.name.to_lowercase().contains(needle),
				None => true,
			})
			.cloned()
			.collect())
	}

	async fn delete_genre(&self, slug: &str) -> Result<()> {
		let mut inner = self.inner.write().await;
		let genre_id = inner
			.genre_by_slug(slug)
			.map(|g| g.id)
			.ok_or_else(|| Error::NotFound(format!("genre '{}' does not exist", slug)))?;
		inner.genres.remove(&genre_id);
		inner.genre_titles.retain(|link| link.genre_id != genre_id);
		Ok(())
	}

	async fn create_title(&self, title: NewTitle) -> Result<TitleDetail> {
		let mut inner = self.inner.write().await;
		let category_id = match &title.category {
			Some(slug) => Some(inner.resolve_category(slug)?),
			None => None,
		};
		let genre_ids = inner.resolve_genres(&title.genres)?;
		let id = inner.allocate_id();
		let record = Title {
			id,
			name: title.name,
			year: title.year,
			description: title.description,
			category_id,
		};
		inner.titles.insert(id, record.clone());
		for genre_id in genre_ids {
			inner.genre_titles.push(GenreTitle {
				genre_id,
				title_id: id,
			});
		}
		Ok(inner.title_detail(&record))
	}

	async fn get_title(&self, id: i64) -> Result<TitleDetail> {
		let inner = self.inner.read().await;
		let title = inner
			.titles
			.get(&id)
			.ok_or_else(|| Error::NotFound(format!("title {} does not exist", id)))?;
		Ok(inner.title_detail(title))
	}

	async fn list_titles(&self, filter: &TitleFilter) -> Result<Vec<TitleDetail>> {
		let inner = self.inner.read().await;
		let category_id = match &filter.category {
			Some(slug) => match inner.category_by_slug(slug) {
				Some(category) => Some(category.id),
				// unknown slug matches nothing
				None => return Ok(Vec::new()),
			},
			None => None,
		};
		let genre_id = match &filter.genre {
			Some(slug) => match inner.genre_by_slug(slug) {
				Some(genre) => Some(genre.id),
				None => return Ok(Vec::new()),
			},
			None => None,
		};
		Ok(inner
			.titles
			.values()
			.filter(|title| match &filter.name {
				Some(name) => title.name.contains(name.as_str()),
				None => true,
			})
			.filter(|title| match filter.year {
				Some(year) => title.year == year,
				None => true,
			})
			.filter(|title| match category_id {
				Some(category_id) => title.category_id == Some(category_id),
				None => true,
			})
			.filter(|title| match genre_id {
				Some(genre_id) => inner
					.genre_titles
					.iter()
					.any(|link| link.title_id == title.id && link.genre_id == genre_id),
				None => true,
			})
			.map(|title| inner.title_detail(title))
			.collect())
	}

	async fn update_title(&self, id: i64, update: TitleUpdate) -> Result<TitleDetail> {
		let mut inner = self.inner.write().await;
		if !inner.titles.contains_key(&id) {
			return Err(Error::NotFound(format!("title {} does not exist", id)));
		}
		let category_id = match &update.category {
			Some(Some(slug)) => Some(Some(inner.resolve_category(slug)?)),
			Some(None) => Some(None),
			None => None,
		};
		let genre_ids = match &update.genres {
			Some(slugs) => Some(inner.resolve_genres(slugs)?),
			None => None,
		};
		let Some(title) = inner.titles.get_mut(&id) else {
			return Err(Error::NotFound(format!("title {} does not exist", id)));
		};
		if let Some(name) = update.name {
			title.name = name;
		}
		if let Some(year) = update.year {
			title.year = year;
		}
		if let Some(description) = update.description {
			title.description = description;
		}
		if let Some(category_id) = category_id {
			title.category_id = category_id;
		}
		let record = title.clone();
		if let Some(genre_ids) = genre_ids {
			inner.genre_titles.retain(|link| link.title_id != id);
			for genre_id in genre_ids {
				inner.genre_titles.push(GenreTitle {
					genre_id,
					title_id: id,
				});
			}
		}
		Ok(inner.title_detail(&record))
	}

	async fn delete_title(&self, id: i64) -> Result<()> {
		let mut inner = self.inner.write().await;
		if !inner.titles.contains_key(&id) {
			return Err(Error::NotFound(format!("title {} does not exist", id)));
		}
		inner.remove_title_cascade(id);
		Ok(())
	}

	async fn create_review(
		&self,
		title_id: i64,
		author_id: i64,
		text: &str,
		score: u8,
	) -> Result<Review> {
		let mut inner = self.inner.write().await;
		if !inner.titles.contains_key(&title_id) {
			return Err(Error::NotFound(format!("title {} does not exist", title_id)));
		}
		// authoritative uniqueness guard, under the write lock
		if inner
			.reviews
			.values()
			.any(|review| review.title_id == title_id && review.author_id == author_id)
		{
			return Err(Error::Conflict(
				"you have already reviewed this title".into(),
			));
		}
		let id = inner.allocate_id();
		let review = Review {
			id,
			title_id,
			author_id,
			text: text.to_string(),
			score,
			pub_date: Utc::now(),
		};
		inner.reviews.insert(id, review.clone());
		Ok(review)
	}

	async fn author_reviewed_title(&self, title_id: i64, author_id: i64) -> Result<bool> {
		let inner = self.inner.read().await;
		Ok(inner
			.reviews
			.values()
			.any(|review| review.title_id == title_id && review.author_id == author_id))
	}

	async fn list_reviews(&self, title_id: i64) -> Result<Vec<Review>> {
		let inner = self.inner.read().await;
		if !inner.titles.contains_key(&title_id) {
			return Err(Error::NotFound(format!("title {} does not exist", title_id)));
		}
		Ok(inner
			.reviews
			.values()
			.filter(|review| review.title_id == title_id)
			.cloned()
			.collect())
	}

	async fn get_review(&self, title_id: i64, review_id: i64) -> Result<Review> {
		let inner = self.inner.read().await;
		inner
			.reviews
			.get(&review_id)
			.filter(|review| review.title_id == title_id)
			.cloned()
			.ok_or_else(|| {
				Error::NotFound(format!(
					"review {} does not exist for title {}",
					review_id, title_id
				))
			})
	}

	async fn update_review(
		&self,
		review_id: i64,
		text: Option<&str>,
		score: Option<u8>,
	) -> Result<Review> {
		let mut inner = self.inner.write().await;
		let review = inner
			.reviews
			.get_mut(&review_id)
			.ok_or_else(|| Error::NotFound(format!("review {} does not exist", review_id)))?;
		if let Some(text) = text {
			review.text = text.to_string();
		}
		if let Some(score) = score {
			review.score = score;
		}
		Ok(review.clone())
	}

	async fn delete_review(&self, review_id: i64) -> Result<()> {
		let mut inner = self.inner.write().await;
		if !inner.reviews.contains_key(&review_id) {
			return Err(Error::NotFound(format!("review {} does not exist", review_id)));
		}
		inner.remove_review_cascade(review_id);
		Ok(())
	}

	async fn create_comment(&self, review_id: i64, author_id: i64, text: &str) -> Result<Comment> {
		let mut inner = self.inner.write().await;
		if !inner.reviews.contains_key(&review_id) {
			return Err(Error::NotFound(format!("review {} does not exist", review_id)));
		}
		let id = inner.allocate_id();
		let comment = Comment {
			id,
			review_id,
			author_id,
			text: text.to_string(),
			pub_date: Utc::now(),
		};
		inner.comments.insert(id, comment.clone());
		Ok(comment)
	}

	async fn list_comments(&self, review_id: i64) -> Result<Vec<Comment>> {
		let inner = self.inner.read().await;
		if !inner.reviews.contains_key(&review_id) {
			return Err(Error::NotFound(format!("review {} does not exist", review_id)));
		}
		Ok(inner
			.comments
			.values()
			.filter(|comment| comment.review_id == review_id)
			.cloned()
			.collect())
	}

	async fn get_comment(&self, review_id: i64, comment_id: i64) -> Result<Comment> {
		let inner = self.inner.read().await;
		inner
			.comments
			.get(&comment_id)
			.filter(|comment| comment.review_id == review_id)
			.cloned()
			.ok_or_else(|| {
				Error::NotFound(format!(
					"comment {} does not exist for review {}",
					comment_id, review_id
				))
			})
	}

	async fn update_comment(&self, comment_id: i64, text: &str) -> Result<Comment> {
		let mut inner = self.inner.write().await;
		let comment = inner
			.comments
			.get_mut(&comment_id)
			.ok_or_else(|| Error::NotFound(format!("comment {} does not exist", comment_id)))?;
		comment.text = text.to_string();
		Ok(comment.clone())
	}

	async fn delete_comment(&self, comment_id: i64) -> Result<()> {
		let mut inner = self.inner.write().await;
		inner
			.comments
			.remove(&comment_id)
			.map(|_| ())
			.ok_or_else(|| Error::NotFound(format!("comment {} does not exist", comment_id)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	async fn seed_catalog(store: &MemoryStore) -> TitleDetail {
		store.create_category("Books", "books").await.unwrap();
		store.create_genre("Sci-Fi", "sci-fi").await.unwrap();
		store
			.create_title(NewTitle {
				name: "Dune".into(),
				year: 1965,
				description: String::new(),
				category: Some("books".into()),
				genres: vec!["sci-fi".into()],
			})
			.await
			.unwrap()
	}

	async fn seed_user(store: &MemoryStore, username: &str) -> User {
		store
			.get_or_create_user(username, &format!("{}@example.com", username))
			.await
			.unwrap()
	}

	#[tokio::test]
	async fn test_title_embeds_resolved_references() {
		let store = MemoryStore::new();
		let detail = seed_catalog(&store).await;

		assert_eq!(detail.category.as_ref().unwrap().slug, "books");
		assert_eq!(detail.genres.len(), 1);
		assert_eq!(detail.genres[0].slug, "sci-fi");
		assert_eq!(detail.rating, None);
	}

	#[tokio::test]
	async fn test_title_unknown_category_is_field_error() {
		let store = MemoryStore::new();
		let result = store
			.create_title(NewTitle {
				name: "Dune".into(),
				year: 1965,
				..Default::default()
			})
			.await;
		assert!(result.is_ok(), "category is optional");

		let result = store
			.create_title(NewTitle {
				name: "Dune".into(),
				year: 1965,
				category: Some("missing".into()),
				..Default::default()
			})
			.await;
		assert!(matches!(result, Err(Error::Validation(_))));
	}

	#[tokio::test]
	async fn test_update_title_category_clear_and_keep() {
		let store = MemoryStore::new();
		let detail = seed_catalog(&store).await;
		let title_id = detail.title.id;

		// an update that says nothing about the category keeps it
		let detail = store
			.update_title(
				title_id,
				TitleUpdate {
					name: Some("Dune Messiah".into()),
					..Default::default()
				},
			)
			.await
			.unwrap();
		assert_eq!(detail.category.as_ref().unwrap().slug, "books");

		// an explicit null clears it
		let detail = store
			.update_title(
				title_id,
				TitleUpdate {
					category: Some(None),
					..Default::default()
				},
			)
			.await
			.unwrap();
		assert_eq!(detail.category, None);

		// and a slug re-points it
		let detail = store
			.update_title(
				title_id,
				TitleUpdate {
					category: Some(Some("books".into())),
					..Default::default()
				},
			)
			.await
			.unwrap();
		assert_eq!(detail.category.as_ref().unwrap().slug, "books");
	}

	#[tokio::test]
	async fn test_rating_recomputed_on_read() {
		let store = MemoryStore::new();
		let detail = seed_catalog(&store).await;
		let title_id = detail.title.id;
		let alice = seed_user(&store, "alice").await;
		let bob = seed_user(&store, "bob").await;

		store
			.create_review(title_id, alice.id, "masterpiece", 9)
			.await
			.unwrap();
		assert_eq!(store.get_title(title_id).await.unwrap().rating, Some(9.0));

		store
			.create_review(title_id, bob.id, "decent", 5)
			.await
			.unwrap();
		assert_eq!(store.get_title(title_id).await.unwrap().rating, Some(7.0));
	}

	#[tokio::test]
	async fn test_duplicate_review_conflict() {
		let store = MemoryStore::new();
		let detail = seed_catalog(&store).await;
		let alice = seed_user(&store, "alice").await;

		store
			.create_review(detail.title.id, alice.id, "first", 9)
			.await
			.unwrap();
		let second = store
			.create_review(detail.title.id, alice.id, "second", 7)
			.await;
		assert!(matches!(second, Err(Error::Conflict(_))));

		// same author, different title is fine
		let other = store
			.create_title(NewTitle {
				name: "Messiah".into(),
				year: 1969,
				..Default::default()
			})
			.await
			.unwrap();
		assert!(store
			.create_review(other.title.id, alice.id, "also good", 8)
			.await
			.is_ok());
	}

	#[tokio::test]
	async fn test_concurrent_duplicate_reviews_single_winner() {
		use std::sync::Arc;

		let store = Arc::new(MemoryStore::new());
		let detail = seed_catalog(&store).await;
		let alice = seed_user(&store, "alice").await;

		let mut handles = Vec::new();
		for attempt in 0u8..8 {
			let store = store.clone();
			let title_id = detail.title.id;
			let author_id = alice.id;
			handles.push(tokio::spawn(async move {
				store
					.create_review(title_id, author_id, "racing", (attempt % 10) + 1)
					.await
			}));
		}
		let mut created = 0;
		let mut conflicts = 0;
		for handle in handles {
			match handle.await.unwrap() {
				Ok(_) => created += 1,
				Err(Error::Conflict(_)) => conflicts += 1,
				Err(other) => panic!("unexpected error: {}", other),
			}
		}
		assert_eq!(created, 1);
		assert_eq!(conflicts, 7);
	}

	#[tokio::test]
	async fn test_category_delete_sets_null() {
		let store = MemoryStore::new();
		let detail = seed_catalog(&store).await;

		store.delete_category("books").await.unwrap();
		let after = store.get_title(detail.title.id).await.unwrap();
		assert_eq!(after.category, None);
		assert_eq!(after.title.category_id, None);
	}

	#[tokio::test]
	async fn test_title_delete_cascades_feedback() {
		let store = MemoryStore::new();
		let detail = seed_catalog(&store).await;
		let alice = seed_user(&store, "alice").await;
		let review = store
			.create_review(detail.title.id, alice.id, "good", 8)
			.await
			.unwrap();
		store
			.create_comment(review.id, alice.id, "agreed")
			.await
			.unwrap();

		store.delete_title(detail.title.id).await.unwrap();
		assert!(matches!(
			store.get_review(detail.title.id, review.id).await,
			Err(Error::NotFound(_))
		));
		assert!(matches!(
			store.list_comments(review.id).await,
			Err(Error::NotFound(_))
		));
	}

	#[tokio::test]
	async fn test_user_delete_cascades_authored_feedback() {
		let store = MemoryStore::new();
		let detail = seed_catalog(&store).await;
		let alice = seed_user(&store, "alice").await;
		let bob = seed_user(&store, "bob").await;
		let alice_review = store
			.create_review(detail.title.id, alice.id, "good", 8)
			.await
			.unwrap();
		let bob_review = store
			.create_review(detail.title.id, bob.id, "fine", 6)
			.await
			.unwrap();
		store
			.create_comment(bob_review.id, alice.id, "disagree")
			.await
			.unwrap();

		store.delete_user("alice").await.unwrap();
		assert!(matches!(
			store.get_review(detail.title.id, alice_review.id).await,
			Err(Error::NotFound(_))
		));
		// bob's review survives, alice's comment on it is gone
		assert!(store.get_review(detail.title.id, bob_review.id).await.is_ok());
		assert!(store.list_comments(bob_review.id).await.unwrap().is_empty());
		assert_eq!(
			store.get_title(detail.title.id).await.unwrap().rating,
			Some(6.0)
		);
	}

	#[tokio::test]
	async fn test_genre_delete_removes_links_only() {
		let store = MemoryStore::new();
		let detail = seed_catalog(&store).await;

		store.delete_genre("sci-fi").await.unwrap();
		let after = store.get_title(detail.title.id).await.unwrap();
		assert!(after.genres.is_empty());
	}

	#[tokio::test]
	async fn test_title_filtering() {
		let store = MemoryStore::new();
		seed_catalog(&store).await;
		store.create_genre("Fantasy", "fantasy").await.unwrap();
		store
			.create_title(NewTitle {
				name: "The Hobbit".into(),
				year: 1937,
				category: Some("books".into()),
				genres: vec!["fantasy".into()],
				..Default::default()
			})
			.await
			.unwrap();

		let by_name = store
			.list_titles(&TitleFilter {
				name: Some("Dune".into()),
				..Default::default()
			})
			.await
			.unwrap();
		assert_eq!(by_name.len(), 1);
		assert_eq!(by_name[0].title.name, "Dune");

		let by_year = store
			.list_titles(&TitleFilter {
				year: Some(1937),
				..Default::default()
			})
			.await
			.unwrap();
		assert_eq!(by_year.len(), 1);
		assert_eq!(by_year[0].title.name, "The Hobbit");

		let by_genre = store
			.list_titles(&TitleFilter {
				genre: Some("fantasy".into()),
				..Default::default()
			})
			.await
			.unwrap();
		assert_eq!(by_genre.len(), 1);

		let by_category = store
			.list_titles(&TitleFilter {
				category: Some("books".into()),
				..Default::default()
			})
			.await
			.unwrap();
		assert_eq!(by_category.len(), 2);

		let unknown_genre = store
			.list_titles(&TitleFilter {
				genre: Some("jazz".into()),
				..Default::default()
			})
			.await
			.unwrap();
		assert!(unknown_genre.is_empty());
	}

	#[tokio::test]
	async fn test_signup_upsert_semantics() {
		let store = MemoryStore::new();
		let first = store
			.get_or_create_user("alice", "alice@example.com")
			.await
			.unwrap();
		let again = store
			.get_or_create_user("alice", "alice@example.com")
			.await
			.unwrap();
		assert_eq!(first.id, again.id);

		let stolen_username = store
			.get_or_create_user("alice", "other@example.com")
			.await;
		assert!(matches!(stolen_username, Err(Error::Conflict(_))));

		let stolen_email = store.get_or_create_user("mallory", "alice@example.com").await;
		assert!(matches!(stolen_email, Err(Error::Conflict(_))));
	}

	#[tokio::test]
	async fn test_update_user_uniqueness() {
		let store = MemoryStore::new();
		let alice = seed_user(&store, "alice").await;
		seed_user(&store, "bob").await;

		let taken = store
			.update_user(
				alice.id,
				UserUpdate {
					username: Some("bob".into()),
					..Default::default()
				},
			)
			.await;
		assert!(matches!(taken, Err(Error::Conflict(_))));

		let renamed = store
			.update_user(
				alice.id,
				UserUpdate {
					username: Some("alicia".into()),
					bio: Some("reader".into()),
					..Default::default()
				},
			)
			.await
			.unwrap();
		assert_eq!(renamed.username, "alicia");
		assert_eq!(renamed.bio, "reader");
	}
}
