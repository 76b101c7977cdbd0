//! Authentication and authorization for the review catalog.
//!
//! Four concerns live here:
//! - [`permissions`]: composable policy classes evaluated per request and per
//!   record
//! - [`policy`]: the table resolving (resource, operation) to a policy
//! - [`tokens`]: stateless HMAC confirmation codes and JWT access tokens
//! - [`mail`]: the delivery seam for signup confirmation emails

pub mod mail;
pub mod permissions;
pub mod policy;
pub mod tokens;

pub use mail::{ConsoleBackend, EmailBackend, EmailMessage, MemoryBackend};
pub use permissions::{
	Actor, AllowAny, AndPermission, IsAdminOrReadOnly, IsAdminUser, IsAuthenticated,
	IsAuthorModeratorAdminOrReadOnly, NotPermission, OrPermission, Permission, PermissionContext,
	ReadOnly, authorize, authorize_object,
};
pub use policy::{Operation, Resource, policy_for};
pub use tokens::{AccessClaims, ConfirmationCodeService, TokenService};
