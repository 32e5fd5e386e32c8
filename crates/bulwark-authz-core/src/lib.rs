// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for Bulwark collection authorization.
//!
//! This crate holds everything that is pure and synchronous:
//!
//! - Typed identifiers, organization roles and permission flags ([`types`])
//! - Collections, bulk operations and handler decisions ([`collection`])
//! - Access-policy grants and their batch validators ([`grant`])
//!
//! The asynchronous policy engines that consume these types live in
//! `bulwark-server-authz`.
//!
//! # Example
//!
//! ```
//! use bulwark_authz_core::{
//!     check_all_have_read, AccessPolicy, AccessPolicyGrant, OrganizationUserId, ProjectId,
//! };
//!
//! let batch = [AccessPolicy::new(
//!     AccessPolicyGrant::UserProject {
//!         organization_user_id: OrganizationUserId::generate(),
//!         granted_project_id: ProjectId::generate(),
//!     },
//!     false,
//!     true,
//! )];
//!
//! assert!(check_all_have_read(&batch).is_err());
//! ```

pub mod collection;
pub mod error;
pub mod grant;
pub mod types;

pub use collection::{
	BulkCollectionOperation, Collection, CollectionAccessDetails, Decision, UnknownOperation,
};
pub use error::{GrantValidationError, Result};
pub use grant::{
	check_all_have_read, check_distinct_grants, validate_grants, AccessPolicy, AccessPolicyGrant,
	GrantTarget, Grantee,
};
pub use types::{
	CollectionId, GroupId, MembershipContext, OrgId, OrgRole, OrganizationAbility,
	OrganizationUserId, Permissions, ProjectId, ServiceAccountId, UserId,
};
