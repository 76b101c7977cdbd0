//! # Grappelli API
//!
//! The HTTP surface of the review catalog: versioned routes under `/api/v1/`,
//! payload serializers, permission-checked handlers and the CSV seeding
//! loader. [`ApiService`] is the entry point; hand it an [`AppState`] and
//! dispatch [`grappelli_core::Request`]s at it.

pub mod config;
pub mod filters;
pub mod handlers;
pub mod seeding;
pub mod serializers;
pub mod service;
pub mod state;

pub use config::ApiConfig;
pub use service::ApiService;
pub use state::AppState;
