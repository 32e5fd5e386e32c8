// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access-policy grants and the batch validators applied before a set of grants
//! is persisted.
//!
//! A grant links a grantee (an organization member, a group, or a service
//! account) to a target (a project or a service account). Five combinations
//! exist, each modelled as a variant of [`AccessPolicyGrant`]:
//!
//! | Variant                 | Grantee            | Target          |
//! |-------------------------|--------------------|-----------------|
//! | `UserProject`           | organization user  | project         |
//! | `GroupProject`          | group              | project         |
//! | `ServiceAccountProject` | service account    | project         |
//! | `UserServiceAccount`    | organization user  | service account |
//! | `GroupServiceAccount`   | group              | service account |
//!
//! Both validators reject the whole batch on the first violation; nothing in a
//! rejected batch should be applied.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{GrantValidationError, Result};
use crate::types::{GroupId, OrganizationUserId, ProjectId, ServiceAccountId};

/// The relationship a grant establishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessPolicyGrant {
	UserProject {
		organization_user_id: OrganizationUserId,
		granted_project_id: ProjectId,
	},
	GroupProject {
		group_id: GroupId,
		granted_project_id: ProjectId,
	},
	ServiceAccountProject {
		service_account_id: ServiceAccountId,
		granted_project_id: ProjectId,
	},
	UserServiceAccount {
		organization_user_id: OrganizationUserId,
		granted_service_account_id: ServiceAccountId,
	},
	GroupServiceAccount {
		group_id: GroupId,
		granted_service_account_id: ServiceAccountId,
	},
}

impl AccessPolicyGrant {
	pub fn grantee(&self) -> Grantee {
		match *self {
			AccessPolicyGrant::UserProject {
				organization_user_id,
				..
			}
			| AccessPolicyGrant::UserServiceAccount {
				organization_user_id,
				..
			} => Grantee::OrganizationUser(organization_user_id),
			AccessPolicyGrant::GroupProject { group_id, .. }
			| AccessPolicyGrant::GroupServiceAccount { group_id, .. } => Grantee::Group(group_id),
			AccessPolicyGrant::ServiceAccountProject {
				service_account_id, ..
			} => Grantee::ServiceAccount(service_account_id),
		}
	}

	pub fn target(&self) -> GrantTarget {
		match *self {
			AccessPolicyGrant::UserProject {
				granted_project_id, ..
			}
			| AccessPolicyGrant::GroupProject {
				granted_project_id, ..
			}
			| AccessPolicyGrant::ServiceAccountProject {
				granted_project_id, ..
			} => GrantTarget::Project(granted_project_id),
			AccessPolicyGrant::UserServiceAccount {
				granted_service_account_id,
				..
			}
			| AccessPolicyGrant::GroupServiceAccount {
				granted_service_account_id,
				..
			} => GrantTarget::ServiceAccount(granted_service_account_id),
		}
	}

	/// The (grantee, target) pair that must be unique within a batch.
	pub fn identity(&self) -> (Grantee, GrantTarget) {
		(self.grantee(), self.target())
	}
}

/// Who receives access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grantee {
	OrganizationUser(OrganizationUserId),
	Group(GroupId),
	ServiceAccount(ServiceAccountId),
}

impl fmt::Display for Grantee {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Grantee::OrganizationUser(id) => write!(f, "organization user {id}"),
			Grantee::Group(id) => write!(f, "group {id}"),
			Grantee::ServiceAccount(id) => write!(f, "service account {id}"),
		}
	}
}

/// What access is granted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantTarget {
	Project(ProjectId),
	ServiceAccount(ServiceAccountId),
}

impl fmt::Display for GrantTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GrantTarget::Project(id) => write!(f, "project {id}"),
			GrantTarget::ServiceAccount(id) => write!(f, "service account {id}"),
		}
	}
}

/// One grant as submitted in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
	#[serde(flatten)]
	pub grant: AccessPolicyGrant,
	pub read: bool,
	pub write: bool,
}

impl AccessPolicy {
	pub fn new(grant: AccessPolicyGrant, read: bool, write: bool) -> Self {
		Self { grant, read, write }
	}

	/// Shorthand for a read-only grant.
	pub fn read_only(grant: AccessPolicyGrant) -> Self {
		Self::new(grant, true, false)
	}

	/// Shorthand for a read/write grant.
	pub fn read_write(grant: AccessPolicyGrant) -> Self {
		Self::new(grant, true, true)
	}
}

/// Rejects a batch in which two grants share the same (grantee, target) pair.
///
/// Read/write flags do not take part in the identity: two grants for the same
/// relationship are duplicates even if their flags differ.
pub fn check_distinct_grants(policies: &[AccessPolicy]) -> Result<()> {
	let mut seen = HashSet::with_capacity(policies.len());
	for policy in policies {
		let (grantee, target) = policy.grant.identity();
		if !seen.insert((grantee, target)) {
			return Err(GrantValidationError::DuplicateGrant { grantee, target });
		}
	}
	Ok(())
}

/// Rejects a batch in which any grant lacks read permission.
///
/// The write flag is not constrained.
pub fn check_all_have_read(policies: &[AccessPolicy]) -> Result<()> {
	match policies.iter().find(|p| !p.read) {
		Some(policy) => Err(GrantValidationError::MissingReadPermission {
			grantee: policy.grant.grantee(),
			target: policy.grant.target(),
		}),
		None => Ok(()),
	}
}

/// Runs both batch checks, distinctness first.
pub fn validate_grants(policies: &[AccessPolicy]) -> Result<()> {
	check_distinct_grants(policies)?;
	check_all_have_read(policies)
}
