//! # Grappelli
//!
//! A REST backend for a media-review catalog, in the style of Django REST
//! Framework: categories, genres and titles on the catalog side; reviews and
//! comments on the feedback side; email-confirmation signup, JWT bearer
//! tokens and layered role-based permissions in between.
//!
//! The facade re-exports the workspace crates:
//!
//! - [`core`]: HTTP types, the error taxonomy, pagination and validators
//! - [`models`]: domain entities, rating aggregation and the [`models::Store`]
//!   persistence boundary
//! - [`auth`]: permission policies, confirmation codes, access tokens, mail
//! - [`api`]: serializers, handlers, routing and CSV seeding
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//!
//! use grappelli::api::{ApiConfig, ApiService, AppState};
//! use grappelli::auth::ConsoleBackend;
//! use grappelli::core::Request;
//! use grappelli::models::MemoryStore;
//! use hyper::Method;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ApiConfig::with_secret("dev-secret");
//!     let state = AppState::new(
//!         &config,
//!         Arc::new(MemoryStore::new()),
//!         Arc::new(ConsoleBackend),
//!     );
//!     let service = ApiService::new(state);
//!
//!     let request = Request::builder()
//!         .method(Method::GET)
//!         .uri("/api/v1/titles/")
//!         .build()
//!         .unwrap();
//!     let response = service.handle(request).await;
//!     assert_eq!(response.status, hyper::StatusCode::OK);
//! }
//! ```

pub use grappelli_api as api;
pub use grappelli_auth as auth;
pub use grappelli_core as core;
pub use grappelli_models as models;

pub use grappelli_api::{ApiConfig, ApiService, AppState};
pub use grappelli_core::{Error, Request, Response, Result};
pub use grappelli_models::{MemoryStore, Store};
