//! Permission policies.
//!
//! Each endpoint family declares a permission class; handlers evaluate it
//! through [`authorize`] (request level) and [`authorize_object`] (per-record
//! level, for edits of owned feedback). Composition uses the builder-style
//! combinators [`AndPermission`], [`OrPermission`] and [`NotPermission`].

use async_trait::async_trait;
use grappelli_core::{Error, Result};
use grappelli_models::User;
use hyper::Method;

/// The caller of a request, as established by token authentication.
#[derive(Debug, Clone)]
pub enum Actor {
	Anonymous,
	Known(User),
}

impl Actor {
	pub fn user(&self) -> Option<&User> {
		match self {
			Actor::Anonymous => None,
			Actor::Known(user) => Some(user),
		}
	}

	pub fn is_authenticated(&self) -> bool {
		matches!(self, Actor::Known(_))
	}
}

/// Everything a policy may inspect: the HTTP method and the actor.
#[derive(Debug, Clone, Copy)]
pub struct PermissionContext<'a> {
	pub method: &'a Method,
	pub actor: &'a Actor,
}

impl<'a> PermissionContext<'a> {
	pub fn new(method: &'a Method, actor: &'a Actor) -> Self {
		Self { method, actor }
	}

	/// GET, HEAD and OPTIONS never mutate state.
	pub fn is_safe_method(&self) -> bool {
		matches!(*self.method, Method::GET | Method::HEAD | Method::OPTIONS)
	}

	pub fn is_admin(&self) -> bool {
		self.actor.user().is_some_and(|u| u.is_admin())
	}

	pub fn is_moderator(&self) -> bool {
		self.actor.user().is_some_and(|u| u.is_moderator())
	}
}

/// A composable authorization policy.
///
/// `has_permission` gates the request as a whole; `has_object_permission`
/// additionally gates writes against a specific record, given the record
/// owner's id. The default object check defers to the request-level answer.
#[async_trait]
pub trait Permission: Send + Sync {
	async fn has_permission(&self, context: &PermissionContext<'_>) -> bool;

	async fn has_object_permission(&self, context: &PermissionContext<'_>, _owner_id: i64) -> bool {
		self.has_permission(context).await
	}
}

/// Unrestricted access.
pub struct AllowAny;

#[async_trait]
impl Permission for AllowAny {
	async fn has_permission(&self, _context: &PermissionContext<'_>) -> bool {
		true
	}
}

/// Requires an authenticated actor.
pub struct IsAuthenticated;

#[async_trait]
impl Permission for IsAuthenticated {
	async fn has_permission(&self, context: &PermissionContext<'_>) -> bool {
		context.actor.is_authenticated()
	}
}

/// Requires the admin capability (admin role or the staff flag).
pub struct IsAdminUser;

#[async_trait]
impl Permission for IsAdminUser {
	async fn has_permission(&self, context: &PermissionContext<'_>) -> bool {
		context.is_admin()
	}
}

/// Safe methods only.
pub struct ReadOnly;

#[async_trait]
impl Permission for ReadOnly {
	async fn has_permission(&self, context: &PermissionContext<'_>) -> bool {
		context.is_safe_method()
	}
}

/// Catalog write policy: anyone may read, only admins may mutate.
///
/// # Examples
///
/// ```
/// use grappelli_auth::permissions::{Actor, IsAdminOrReadOnly, Permission, PermissionContext};
/// use hyper::Method;
///
/// #[tokio::main]
/// async fn main() {
///     let policy = IsAdminOrReadOnly;
///     let anonymous = Actor::Anonymous;
///
///     let read = PermissionContext::new(&Method::GET, &anonymous);
///     assert!(policy.has_permission(&read).await);
///
///     let write = PermissionContext::new(&Method::POST, &anonymous);
///     assert!(!policy.has_permission(&write).await);
/// }
/// ```
pub struct IsAdminOrReadOnly;

#[async_trait]
impl Permission for IsAdminOrReadOnly {
	async fn has_permission(&self, context: &PermissionContext<'_>) -> bool {
		context.is_safe_method() || context.is_admin()
	}
}

/// Feedback policy: reads are open, creation needs authentication, and edits
/// of an existing record are reserved to its author, moderators and admins.
pub struct IsAuthorModeratorAdminOrReadOnly;

#[async_trait]
impl Permission for IsAuthorModeratorAdminOrReadOnly {
	async fn has_permission(&self, context: &PermissionContext<'_>) -> bool {
		context.is_safe_method() || context.actor.is_authenticated()
	}

	async fn has_object_permission(&self, context: &PermissionContext<'_>, owner_id: i64) -> bool {
		if context.is_safe_method() || context.is_admin() || context.is_moderator() {
			return true;
		}
		context.actor.user().is_some_and(|u| u.id == owner_id)
	}
}

/// Both operands must grant access.
pub struct AndPermission<A, B> {
	left: A,
	right: B,
}

impl<A, B> AndPermission<A, B> {
	pub fn new(left: A, right: B) -> Self {
		Self { left, right }
	}
}

#[async_trait]
impl<A, B> Permission for AndPermission<A, B>
where
	A: Permission,
	B: Permission,
{
	async fn has_permission(&self, context: &PermissionContext<'_>) -> bool {
		self.left.has_permission(context).await && self.right.has_permission(context).await
	}

	async fn has_object_permission(&self, context: &PermissionContext<'_>, owner_id: i64) -> bool {
		self.left.has_object_permission(context, owner_id).await
			&& self.right.has_object_permission(context, owner_id).await
	}
}

/// Either operand may grant access.
pub struct OrPermission<A, B> {
	left: A,
	right: B,
}

impl<A, B> OrPermission<A, B> {
	pub fn new(left: A, right: B) -> Self {
		Self { left, right }
	}
}

#[async_trait]
impl<A, B> Permission for OrPermission<A, B>
where
	A: Permission,
	B: Permission,
{
	async fn has_permission(&self, context: &PermissionContext<'_>) -> bool {
		self.left.has_permission(context).await || self.right.has_permission(context).await
	}

	async fn has_object_permission(&self, context: &PermissionContext<'_>, owner_id: i64) -> bool {
		self.left.has_object_permission(context, owner_id).await
			|| self.right.has_object_permission(context, owner_id).await
	}
}

/// Inverts the wrapped policy.
pub struct NotPermission<P> {
	inner: P,
}

impl<P> NotPermission<P> {
	pub fn new(inner: P) -> Self {
		Self { inner }
	}
}

#[async_trait]
impl<P> Permission for NotPermission<P>
where
	P: Permission,
{
	async fn has_permission(&self, context: &PermissionContext<'_>) -> bool {
		!self.inner.has_permission(context).await
	}
}

/// Evaluate a request-level policy, turning denial into the right error.
///
/// An anonymous caller gets 401, an authenticated one 403. The split keeps a
/// missing credential distinguishable from an insufficient one.
pub async fn authorize(permission: &dyn Permission, context: &PermissionContext<'_>) -> Result<()> {
	if permission.has_permission(context).await {
		return Ok(());
	}
	deny(context)
}

/// Evaluate an object-level policy against the record's owner.
pub async fn authorize_object(
	permission: &dyn Permission,
	context: &PermissionContext<'_>,
	owner_id: i64,
) -> Result<()> {
	if permission.has_object_permission(context, owner_id).await {
		return Ok(());
	}
	deny(context)
}

fn deny(context: &PermissionContext<'_>) -> Result<()> {
	if context.actor.is_authenticated() {
		Err(Error::Authorization(
			"you do not have permission to perform this action".into(),
		))
	} else {
		Err(Error::Authentication(
			"authentication credentials were not provided".into(),
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use grappelli_models::Role;

	fn user(id: i64, role: Role, is_staff: bool) -> Actor {
		Actor::Known(User {
			id,
			username: format!("user{}", id),
			email: format!("user{}@example.com", id),
			role,
			is_staff,
			first_name: String::new(),
			last_name: String::new(),
			bio: String::new(),
		})
	}

	#[tokio::test]
	async fn test_admin_or_read_only() {
		let policy = IsAdminOrReadOnly;
		let anonymous = Actor::Anonymous;
		let plain = user(1, Role::User, false);
		let admin = user(2, Role::Admin, false);
		let staff = user(3, Role::User, true);

		assert!(policy.has_permission(&PermissionContext::new(&Method::GET, &anonymous)).await);
		assert!(!policy.has_permission(&PermissionContext::new(&Method::POST, &anonymous)).await);
		assert!(!policy.has_permission(&PermissionContext::new(&Method::POST, &plain)).await);
		assert!(policy.has_permission(&PermissionContext::new(&Method::POST, &admin)).await);
		assert!(policy.has_permission(&PermissionContext::new(&Method::DELETE, &staff)).await);
	}

	#[tokio::test]
	async fn test_feedback_object_policy() {
		let policy = IsAuthorModeratorAdminOrReadOnly;
		let author = user(1, Role::User, false);
		let stranger = user(2, Role::User, false);
		let moderator = user(3, Role::Moderator, false);
		let admin = user(4, Role::Admin, false);

		let owner_id = 1;
		fn patch_by(actor: &Actor) -> PermissionContext<'_> {
			PermissionContext::new(&Method::PATCH, actor)
		}

		assert!(policy.has_object_permission(&patch_by(&author), owner_id).await);
		assert!(!policy.has_object_permission(&patch_by(&stranger), owner_id).await);
		assert!(policy.has_object_permission(&patch_by(&moderator), owner_id).await);
		assert!(policy.has_object_permission(&patch_by(&admin), owner_id).await);

		// anyone may read the record
		let anonymous = Actor::Anonymous;
		let read = PermissionContext::new(&Method::GET, &anonymous);
		assert!(policy.has_object_permission(&read, owner_id).await);
	}

	#[tokio::test]
	async fn test_feedback_creation_needs_authentication() {
		let policy = IsAuthorModeratorAdminOrReadOnly;
		let anonymous = Actor::Anonymous;
		let plain = user(1, Role::User, false);

		assert!(!policy.has_permission(&PermissionContext::new(&Method::POST, &anonymous)).await);
		assert!(policy.has_permission(&PermissionContext::new(&Method::POST, &plain)).await);
	}

	#[tokio::test]
	async fn test_denial_maps_to_status() {
		let anonymous = Actor::Anonymous;
		let context = PermissionContext::new(&Method::POST, &anonymous);
		let denied = authorize(&IsAdminUser, &context).await.unwrap_err();
		assert!(matches!(denied, Error::Authentication(_)));

		let plain = user(1, Role::User, false);
		let context = PermissionContext::new(&Method::POST, &plain);
		let denied = authorize(&IsAdminUser, &context).await.unwrap_err();
		assert!(matches!(denied, Error::Authorization(_)));
	}

	#[tokio::test]
	async fn test_combinators() {
		let anonymous = Actor::Anonymous;
		let admin = user(1, Role::Admin, false);

		let both = AndPermission::new(IsAuthenticated, IsAdminUser);
		assert!(both.has_permission(&PermissionContext::new(&Method::GET, &admin)).await);
		assert!(!both.has_permission(&PermissionContext::new(&Method::GET, &anonymous)).await);

		let either = OrPermission::new(ReadOnly, IsAdminUser);
		assert!(either.has_permission(&PermissionContext::new(&Method::GET, &anonymous)).await);
		assert!(!either.has_permission(&PermissionContext::new(&Method::POST, &anonymous)).await);

		let inverted = NotPermission::new(IsAuthenticated);
		assert!(inverted.has_permission(&PermissionContext::new(&Method::GET, &anonymous)).await);
	}
}
