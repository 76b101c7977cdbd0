//! # Grappelli Models
//!
//! Domain model for the review catalog: users with roles, the
//! category/genre/title catalog, reviews and comments, plus the persistence
//! boundary ([`store::Store`]) and an in-memory reference implementation
//! ([`store::MemoryStore`]).
//!
//! Ratings are never stored; [`rating::mean_score`] derives them from review
//! scores at read time.

pub mod catalog;
pub mod feedback;
pub mod rating;
pub mod store;
pub mod users;

pub use catalog::{Category, Genre, GenreTitle, Title, TitleDetail};
pub use feedback::{Comment, Review};
pub use store::{MemoryStore, NewTitle, Store, TitleFilter, TitleUpdate, UserUpdate};
pub use users::{Role, User};
