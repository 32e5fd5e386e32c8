// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for collection authorization.
//!
//! This module defines the foundational types used throughout the engine:
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs for different entity types
//!   ([`UserId`], [`OrgId`], [`CollectionId`], etc.) preventing accidental mixing
//! - **Organization roles**: [`OrgRole`] as assigned to an organization member
//! - **Permissions**: the custom-role flag set carried by a member ([`Permissions`])
//! - **Membership context**: what the acting user is within one organization
//!   ([`MembershipContext`])
//! - **Organization ability**: cached organization-wide settings
//!   ([`OrganizationAbility`])
//!
//! All ID types implement transparent serde serialization (as UUID strings) and
//! provide conversion to/from [`uuid::Uuid`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(OrgId, "Unique identifier for an organization.");
define_id_type!(CollectionId, "Unique identifier for a collection.");
define_id_type!(
	OrganizationUserId,
	"Unique identifier for a user's membership record within an organization."
);
define_id_type!(GroupId, "Unique identifier for a group of organization members.");
define_id_type!(ServiceAccountId, "Unique identifier for a service account.");
define_id_type!(ProjectId, "Unique identifier for a secrets project.");

// =============================================================================
// Organization Roles
// =============================================================================

/// Roles within an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgRole {
	/// Full org control, billing, can delete org.
	Owner,
	/// Manage members, settings and every collection.
	Admin,
	/// Standard member access.
	User,
	/// Standard member access extended by explicit [`Permissions`].
	Custom,
}

impl OrgRole {
	/// Returns all available organization roles.
	pub fn all() -> &'static [OrgRole] {
		&[OrgRole::Owner, OrgRole::Admin, OrgRole::User, OrgRole::Custom]
	}

	/// Returns true for the two roles with blanket administrative rights.
	pub fn is_owner_or_admin(&self) -> bool {
		matches!(self, OrgRole::Owner | OrgRole::Admin)
	}
}

impl fmt::Display for OrgRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrgRole::Owner => write!(f, "owner"),
			OrgRole::Admin => write!(f, "admin"),
			OrgRole::User => write!(f, "user"),
			OrgRole::Custom => write!(f, "custom"),
		}
	}
}

// =============================================================================
// Permissions
// =============================================================================

/// Fine-grained permission flags granted to a member, typically with
/// [`OrgRole::Custom`].
///
/// Only `create_new_collections`, `edit_any_collection`,
/// `delete_any_collection` and `manage_users` take part in collection
/// decisions; the remaining flags are carried so the context mirrors what the
/// membership store holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permissions {
	pub access_event_logs: bool,
	pub access_import_export: bool,
	pub access_reports: bool,
	pub create_new_collections: bool,
	pub edit_any_collection: bool,
	pub delete_any_collection: bool,
	pub edit_assigned_collections: bool,
	pub delete_assigned_collections: bool,
	pub manage_groups: bool,
	pub manage_policies: bool,
	pub manage_sso: bool,
	pub manage_users: bool,
	pub manage_reset_password: bool,
	pub manage_scim: bool,
}

impl Permissions {
	/// Creates an empty permission set.
	pub fn none() -> Self {
		Self::default()
	}

	/// Builder: set create_new_collections.
	pub fn with_create_new_collections(mut self, value: bool) -> Self {
		self.create_new_collections = value;
		self
	}

	/// Builder: set edit_any_collection.
	pub fn with_edit_any_collection(mut self, value: bool) -> Self {
		self.edit_any_collection = value;
		self
	}

	/// Builder: set delete_any_collection.
	pub fn with_delete_any_collection(mut self, value: bool) -> Self {
		self.delete_any_collection = value;
		self
	}

	/// Builder: set manage_users.
	pub fn with_manage_users(mut self, value: bool) -> Self {
		self.manage_users = value;
		self
	}

	/// Builder: set manage_groups.
	pub fn with_manage_groups(mut self, value: bool) -> Self {
		self.manage_groups = value;
		self
	}
}

// =============================================================================
// Membership Context
// =============================================================================

/// What the acting user is within one organization.
///
/// Supplied fresh per request by the membership context provider and never
/// mutated during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipContext {
	pub org_id: OrgId,
	pub role: OrgRole,
	#[serde(default)]
	pub permissions: Permissions,
}

impl MembershipContext {
	/// Creates a membership with the given role and no extra permissions.
	pub fn new(org_id: OrgId, role: OrgRole) -> Self {
		Self {
			org_id,
			role,
			permissions: Permissions::none(),
		}
	}

	/// Builder: set permissions.
	pub fn with_permissions(mut self, permissions: Permissions) -> Self {
		self.permissions = permissions;
		self
	}

	/// Returns true if the member is an owner or admin.
	pub fn is_owner_or_admin(&self) -> bool {
		self.role.is_owner_or_admin()
	}
}

// =============================================================================
// Organization Ability
// =============================================================================

/// Cached organization-wide settings relevant to collection management.
///
/// This is a read-only snapshot; it may lag behind the persisted settings by
/// whatever window the cache owning it allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationAbility {
	pub org_id: OrgId,
	/// When true, only owners, admins and members with explicit permissions
	/// may create or delete collections.
	#[serde(default = "default_true")]
	pub limit_collection_creation_deletion: bool,
	/// When true, owners and admins may edit every collection's items.
	#[serde(default = "default_true")]
	pub allow_admin_access_to_all_collection_items: bool,
	#[serde(default)]
	pub flexible_collections: bool,
}

fn default_true() -> bool {
	true
}

impl OrganizationAbility {
	/// Creates an ability snapshot with the defaults a newly persisted
	/// organization gets: creation and deletion limited, admin access to all
	/// collection items allowed, flexible collections off.
	pub fn new(org_id: OrgId) -> Self {
		Self {
			org_id,
			limit_collection_creation_deletion: true,
			allow_admin_access_to_all_collection_items: true,
			flexible_collections: false,
		}
	}

	/// Builder: set limit_collection_creation_deletion.
	pub fn with_limit_collection_creation_deletion(mut self, value: bool) -> Self {
		self.limit_collection_creation_deletion = value;
		self
	}

	/// Builder: set allow_admin_access_to_all_collection_items.
	pub fn with_admin_access_to_all_collection_items(mut self, value: bool) -> Self {
		self.allow_admin_access_to_all_collection_items = value;
		self
	}

	/// Builder: set flexible_collections.
	pub fn with_flexible_collections(mut self, value: bool) -> Self {
		self.flexible_collections = value;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn id_roundtrips_through_display_and_parse() {
		let id = CollectionId::generate();
		let parsed: CollectionId = id.to_string().parse().unwrap();
		assert_eq!(id, parsed);
	}

	#[test]
	fn id_serializes_transparently() {
		let uuid = Uuid::new_v4();
		let json = serde_json::to_string(&OrgId::new(uuid)).unwrap();
		assert_eq!(json, format!("\"{uuid}\""));
	}

	#[test]
	fn only_owner_and_admin_are_administrative() {
		assert!(OrgRole::Owner.is_owner_or_admin());
		assert!(OrgRole::Admin.is_owner_or_admin());
		assert!(!OrgRole::User.is_owner_or_admin());
		assert!(!OrgRole::Custom.is_owner_or_admin());
	}

	#[test]
	fn role_serde_uses_snake_case() {
		assert_eq!(serde_json::to_string(&OrgRole::Custom).unwrap(), "\"custom\"");
		let role: OrgRole = serde_json::from_str("\"owner\"").unwrap();
		assert_eq!(role, OrgRole::Owner);
	}

	#[test]
	fn permissions_default_to_false_when_omitted() {
		let permissions: Permissions =
			serde_json::from_str(r#"{ "edit_any_collection": true }"#).unwrap();
		assert!(permissions.edit_any_collection);
		assert!(!permissions.delete_any_collection);
		assert!(!permissions.create_new_collections);
		assert!(!permissions.manage_users);
	}

	#[test]
	fn membership_builder_sets_permissions() {
		let org_id = OrgId::generate();
		let membership = MembershipContext::new(org_id, OrgRole::Custom)
			.with_permissions(Permissions::none().with_delete_any_collection(true));
		assert_eq!(membership.org_id, org_id);
		assert!(membership.permissions.delete_any_collection);
		assert!(!membership.is_owner_or_admin());
	}

	#[test]
	fn ability_defaults_are_restrictive() {
		let ability = OrganizationAbility::new(OrgId::generate());
		assert!(ability.limit_collection_creation_deletion);
		assert!(ability.allow_admin_access_to_all_collection_items);
		assert!(!ability.flexible_collections);
	}
}
