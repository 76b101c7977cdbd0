//! The policy table.
//!
//! One lookup keyed by (resource kind, operation) resolves the permission
//! class every endpoint enforces. Handlers go through [`policy_for`] instead
//! of naming classes inline, so the whole access-control surface reads off
//! this table.

use crate::permissions::{
	IsAdminOrReadOnly, IsAdminUser, IsAuthenticated, IsAuthorModeratorAdminOrReadOnly, Permission,
	ReadOnly,
};

/// The kinds of records an operation can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
	Category,
	Genre,
	Title,
	Review,
	Comment,
	/// Admin-managed user records (`/users/...`).
	Account,
	/// The caller's own record (`/users/me`).
	Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
	List,
	Retrieve,
	Create,
	Update,
	Delete,
}

static READ_ONLY: ReadOnly = ReadOnly;
static CATALOG_WRITE: IsAdminOrReadOnly = IsAdminOrReadOnly;
static FEEDBACK: IsAuthorModeratorAdminOrReadOnly = IsAuthorModeratorAdminOrReadOnly;
static ADMIN_ONLY: IsAdminUser = IsAdminUser;
static AUTHENTICATED: IsAuthenticated = IsAuthenticated;

/// Resolve the policy for an operation on a resource kind.
///
/// Catalog reads are open, catalog writes are admin territory, feedback edits
/// belong to the author and the moderation roles, and account administration
/// is admin-only. Self-profile access just needs authentication; the field
/// restriction on `role` lives in the serializer, not here.
pub fn policy_for(resource: Resource, operation: Operation) -> &'static dyn Permission {
	match (resource, operation) {
		(
			Resource::Category | Resource::Genre | Resource::Title,
			Operation::List | Operation::Retrieve,
		) => &READ_ONLY,
		(Resource::Category | Resource::Genre | Resource::Title, _) => &CATALOG_WRITE,
		(Resource::Review | Resource::Comment, _) => &FEEDBACK,
		(Resource::Account, _) => &ADMIN_ONLY,
		(Resource::Profile, _) => &AUTHENTICATED,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::permissions::{Actor, PermissionContext};
	use grappelli_models::{Role, User};
	use hyper::Method;

	fn actor(role: Role) -> Actor {
		Actor::Known(User {
			id: 1,
			username: "x".into(),
			email: "x@example.com".into(),
			role,
			is_staff: false,
			first_name: String::new(),
			last_name: String::new(),
			bio: String::new(),
		})
	}

	#[tokio::test]
	async fn test_catalog_rows() {
		let anonymous = Actor::Anonymous;
		let admin = actor(Role::Admin);

		for resource in [Resource::Category, Resource::Genre, Resource::Title] {
			let read = policy_for(resource, Operation::List);
			assert!(read.has_permission(&PermissionContext::new(&Method::GET, &anonymous)).await);

			let write = policy_for(resource, Operation::Create);
			assert!(!write.has_permission(&PermissionContext::new(&Method::POST, &anonymous)).await);
			assert!(write.has_permission(&PermissionContext::new(&Method::POST, &admin)).await);
		}
	}

	#[tokio::test]
	async fn test_feedback_rows() {
		let plain = actor(Role::User);
		let moderator = actor(Role::Moderator);

		let create = policy_for(Resource::Review, Operation::Create);
		assert!(create.has_permission(&PermissionContext::new(&Method::POST, &plain)).await);

		let edit = policy_for(Resource::Comment, Operation::Update);
		let context = PermissionContext::new(&Method::PATCH, &moderator);
		// moderator edits a record owned by someone else
		assert!(edit.has_object_permission(&context, 99).await);
	}

	#[tokio::test]
	async fn test_account_rows_are_admin_only() {
		let moderator = actor(Role::Moderator);
		for operation in [Operation::List, Operation::Create, Operation::Delete] {
			let policy = policy_for(Resource::Account, operation);
			let context = PermissionContext::new(&Method::POST, &moderator);
			assert!(!policy.has_permission(&context).await);
		}
	}
}
