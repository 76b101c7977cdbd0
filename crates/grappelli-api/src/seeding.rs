//! CSV seeding.
//!
//! Loads a catalog dump (one CSV per table) into a fresh store. Source rows
//! carry their own ids, which the store does not honor; the loader keeps
//! old-to-new id maps and rewrites every cross reference. Files load in
//! dependency order, and any bad row aborts the load, a half-seeded catalog
//! being worse than none. Publication timestamps are re-stamped at load time.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use grappelli_core::{Error, Result};
use grappelli_models::store::{NewTitle, NewUser, Store};
use grappelli_models::Role;

#[derive(Debug, Deserialize)]
struct UserRow {
	id: i64,
	username: String,
	email: String,
	role: String,
	#[serde(default)]
	bio: String,
	#[serde(default)]
	first_name: String,
	#[serde(default)]
	last_name: String,
}

#[derive(Debug, Deserialize)]
struct SlugRow {
	id: i64,
	name: String,
	slug: String,
}

#[derive(Debug, Deserialize)]
struct TitleRow {
	id: i64,
	name: String,
	year: i32,
	category: i64,
}

#[derive(Debug, Deserialize)]
struct GenreTitleRow {
	title_id: i64,
	genre_id: i64,
}

#[derive(Debug, Deserialize)]
struct ReviewRow {
	id: i64,
	title_id: i64,
	text: String,
	author: i64,
	score: u8,
}

#[derive(Debug, Deserialize)]
struct CommentRow {
	id: i64,
	review_id: i64,
	text: String,
	author: i64,
}

/// Raw CSV contents for one dump.
#[derive(Debug, Default)]
pub struct SeedFiles {
	pub users: String,
	pub categories: String,
	pub genres: String,
	pub titles: String,
	pub genre_titles: String,
	pub reviews: String,
	pub comments: String,
}

impl SeedFiles {
	/// Read the conventional file names (`users.csv`, `category.csv`,
	/// `genre.csv`, `titles.csv`, `genre_title.csv`, `review.csv`,
	/// `comments.csv`) from a directory.
	pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
		let dir = dir.as_ref();
		let read = |name: &str| {
			std::fs::read_to_string(dir.join(name))
				.map_err(|e| Error::Internal(format!("cannot read {}: {}", name, e)))
		};
		Ok(Self {
			users: read("users.csv")?,
			categories: read("category.csv")?,
			genres: read("genre.csv")?,
			titles: read("titles.csv")?,
			genre_titles: read("genre_title.csv")?,
			reviews: read("review.csv")?,
			comments: read("comments.csv")?,
		})
	}
}

/// Row counts after a successful load.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
	pub users: usize,
	pub categories: usize,
	pub genres: usize,
	pub titles: usize,
	pub reviews: usize,
	pub comments: usize,
}

fn rows<T: serde::de::DeserializeOwned>(content: &str) -> Result<Vec<T>> {
	csv::Reader::from_reader(content.as_bytes())
		.deserialize()
		.collect::<std::result::Result<Vec<T>, _>>()
		.map_err(|e| Error::Parse(format!("malformed CSV row: {}", e)))
}

fn mapped(map: &HashMap<i64, i64>, old: i64, what: &str) -> Result<i64> {
	map.get(&old)
		.copied()
		.ok_or_else(|| Error::Validation(format!("{} {} is referenced but never defined", what, old)))
}

/// Load a full dump into `store`.
pub async fn load(store: &dyn Store, files: &SeedFiles) -> Result<SeedReport> {
	let mut report = SeedReport::default();

	let mut user_map = HashMap::new();
	for row in rows::<UserRow>(&files.users)? {
		let role: Role = row
			.role
			.parse()
			.map_err(|e: String| Error::validation("role", e))?;
		let user = store
			.create_user(NewUser {
				username: row.username,
				email: row.email,
				role,
				is_staff: false,
				first_name: row.first_name,
				last_name: row.last_name,
				bio: row.bio,
			})
			.await?;
		user_map.insert(row.id, user.id);
		report.users += 1;
	}

	let mut category_slugs = HashMap::new();
	for row in rows::<SlugRow>(&files.categories)? {
		let category = store.create_category(&row.name, &row.slug).await?;
		category_slugs.insert(row.id, category.slug);
		report.categories += 1;
	}

	let mut genre_slugs = HashMap::new();
	for row in rows::<SlugRow>(&files.genres)? {
		let genre = store.create_genre(&row.name, &row.slug).await?;
		genre_slugs.insert(row.id, genre.slug);
		report.genres += 1;
	}

	// links are read ahead of the titles they decorate
	let mut links: HashMap<i64, Vec<String>> = HashMap::new();
	for row in rows::<GenreTitleRow>(&files.genre_titles)? {
		let slug = genre_slugs.get(&row.genre_id).cloned().ok_or_else(|| {
			Error::Validation(format!("genre {} is referenced but never defined", row.genre_id))
		})?;
		links.entry(row.title_id).or_default().push(slug);
	}

	let mut title_map = HashMap::new();
	for row in rows::<TitleRow>(&files.titles)? {
		let category = category_slugs.get(&row.category).cloned().ok_or_else(|| {
			Error::Validation(format!(
				"category {} is referenced but never defined",
				row.category
			))
		})?;
		let detail = store
			.create_title(NewTitle {
				name: row.name,
				year: row.year,
				description: String::new(),
				category: Some(category),
				genres: links.remove(&row.id).unwrap_or_default(),
			})
			.await?;
		title_map.insert(row.id, detail.title.id);
		report.titles += 1;
	}

	let mut review_map = HashMap::new();
	for row in rows::<ReviewRow>(&files.reviews)? {
		let title_id = mapped(&title_map, row.title_id, "title")?;
		let author_id = mapped(&user_map, row.author, "user")?;
		let review = store
			.create_review(title_id, author_id, &row.text, row.score)
			.await?;
		review_map.insert(row.id, review.id);
		report.reviews += 1;
	}

	for row in rows::<CommentRow>(&files.comments)? {
		let review_id = mapped(&review_map, row.review_id, "review")?;
		let author_id = mapped(&user_map, row.author, "user")?;
		store.create_comment(review_id, author_id, &row.text).await?;
		report.comments += 1;
	}

	tracing::info!(
		users = report.users,
		titles = report.titles,
		reviews = report.reviews,
		"seed data loaded"
	);
	Ok(report)
}

#[cfg(test)]
mod tests {
	use super::*;
	use grappelli_models::{MemoryStore, TitleFilter};

	fn sample_files() -> SeedFiles {
		SeedFiles {
			users: "id,username,email,role,bio,first_name,last_name\n\
				100,capitan,capitan@example.com,user,,Jack,Sparrow\n\
				200,angry,angry@example.com,moderator,,,\n"
				.into(),
			categories: "id,name,slug\n10,Books,books\n".into(),
			genres: "id,name,slug\n20,Sci-Fi,sci-fi\n21,Drama,drama\n".into(),
			titles: "id,name,year,category\n30,Dune,1965,10\n".into(),
			genre_titles: "id,title_id,genre_id\n1,30,20\n2,30,21\n".into(),
			reviews: "id,title_id,text,author,score,pub_date\n\
				40,30,Loved it,100,9,2019-09-24T21:08:21.567Z\n\
				41,30,Decent,200,5,2019-09-24T21:08:21.567Z\n"
				.into(),
			comments: "id,review_id,text,author,pub_date\n\
				50,40,Same here,200,2019-09-24T21:08:21.567Z\n"
				.into(),
		}
	}

	#[tokio::test]
	async fn test_load_full_dump() {
		let store = MemoryStore::new();
		let report = load(&store, &sample_files()).await.unwrap();

		assert_eq!(
			report,
			SeedReport {
				users: 2,
				categories: 1,
				genres: 2,
				titles: 1,
				reviews: 2,
				comments: 1,
			}
		);

		// cross references were rewritten, not trusted
		let titles = store.list_titles(&TitleFilter::default()).await.unwrap();
		assert_eq!(titles.len(), 1);
		let dune = &titles[0];
		assert_eq!(dune.category.as_ref().unwrap().slug, "books");
		assert_eq!(dune.genres.len(), 2);
		assert_eq!(dune.rating, Some(7.0));

		let reviews = store.list_reviews(dune.title.id).await.unwrap();
		let author = store.get_user(reviews[0].author_id).await.unwrap();
		assert_eq!(author.username, "capitan");
	}

	#[tokio::test]
	async fn test_dangling_reference_aborts() {
		let mut files = sample_files();
		files.comments = "id,review_id,text,author,pub_date\n50,999,Orphan,100,x\n".into();

		let store = MemoryStore::new();
		let result = load(&store, &files).await;
		assert!(matches!(result, Err(Error::Validation(_))));
	}

	#[tokio::test]
	async fn test_malformed_row_aborts() {
		let mut files = sample_files();
		files.titles = "id,name,year,category\n30,Dune,not-a-year,10\n".into();

		let store = MemoryStore::new();
		let result = load(&store, &files).await;
		assert!(matches!(result, Err(Error::Parse(_))));
	}
}
