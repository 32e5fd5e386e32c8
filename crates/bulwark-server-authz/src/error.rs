// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for collection authorization.
//!
//! Rules that do not match are not errors; they produce
//! [`Decision::NoDecision`](bulwark_authz_core::Decision::NoDecision). The
//! only failures surfaced here are faults raised by external collaborators,
//! passed through with the identifiers that were being looked up.

use bulwark_authz_core::{OrgId, UserId};
use thiserror::Error;

/// Boxed error returned by collaborator implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while evaluating collection authorization.
#[derive(Debug, Error)]
pub enum AuthzError {
	/// The organization ability cache failed.
	#[error("organization ability lookup failed for org {org_id}")]
	OrganizationAbility {
		org_id: OrgId,
		#[source]
		source: BoxError,
	},

	/// The manage-relation resolver failed.
	#[error("managed collection lookup failed for user {user_id}")]
	ManagedCollections {
		user_id: UserId,
		#[source]
		source: BoxError,
	},

	/// Provider verification failed.
	#[error("provider verification failed for user {user_id} in org {org_id}")]
	ProviderVerification {
		user_id: UserId,
		org_id: OrgId,
		#[source]
		source: BoxError,
	},
}

/// Result type for authorization operations.
pub type Result<T> = std::result::Result<T, AuthzError>;
