// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for grant batch validation.

use thiserror::Error;

use crate::grant::{GrantTarget, Grantee};

/// A grant batch violated one of its invariants and must be rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrantValidationError {
	/// Two grants in the batch target the same relationship.
	#[error("resources must be unique: {grantee} is granted {target} more than once")]
	DuplicateGrant {
		grantee: Grantee,
		target: GrantTarget,
	},

	/// A grant in the batch does not include read permission.
	#[error("resources must be read = true: grant of {target} to {grantee} lacks read")]
	MissingReadPermission {
		grantee: Grantee,
		target: GrantTarget,
	},
}

/// Result type for grant validation.
pub type Result<T> = std::result::Result<T, GrantValidationError>;
