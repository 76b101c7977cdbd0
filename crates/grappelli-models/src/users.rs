//! User accounts and role-derived capabilities.

use serde::{Deserialize, Serialize};

/// Closed role set.
///
/// Capabilities are derived from the role (plus the staff flag) through
/// [`User::is_admin`] and [`User::is_moderator`]; nothing else inspects the
/// role directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	#[default]
	User,
	Moderator,
	Admin,
}

impl Role {
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::User => "user",
			Role::Moderator => "moderator",
			Role::Admin => "admin",
		}
	}
}

impl std::str::FromStr for Role {
	type Err = String;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"user" => Ok(Role::User),
			"moderator" => Ok(Role::Moderator),
			"admin" => Ok(Role::Admin),
			other => Err(format!("unknown role '{}'", other)),
		}
	}
}

/// A registered account.
///
/// Accounts are created unconfirmed at signup (or provisioned by an admin) and
/// exchange an emailed confirmation code for a bearer credential. `is_staff`
/// is a provisioning-level override: staff are admins regardless of role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
	pub id: i64,
	pub username: String,
	pub email: String,
	#[serde(default)]
	pub role: Role,
	#[serde(default)]
	pub is_staff: bool,
	#[serde(default)]
	pub first_name: String,
	#[serde(default)]
	pub last_name: String,
	#[serde(default)]
	pub bio: String,
}

impl User {
	pub fn is_admin(&self) -> bool {
		self.is_staff || self.role == Role::Admin
	}

	pub fn is_moderator(&self) -> bool {
		self.role == Role::Moderator
	}
}
