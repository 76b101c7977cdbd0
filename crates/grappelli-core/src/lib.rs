//! # Grappelli Core
//!
//! Shared foundation for the grappelli review-catalog backend:
//!
//! - [`exception`]: the error taxonomy every layer speaks
//!   ([`Error`], [`Result`])
//! - [`http`]: framework-agnostic [`Request`]/[`Response`] boundary types
//! - [`pagination`]: page-number pagination for list endpoints
//! - [`validators`]: field-level validators shared by serializers and models

pub mod exception;
pub mod http;
pub mod pagination;
pub mod validators;

pub use exception::{Error, Result};
pub use http::{Request, Response};
pub use pagination::{PageNumberPagination, PaginatedResponse};
