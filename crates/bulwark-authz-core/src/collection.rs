// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Collections, the bulk operations performed on them, and the decisions an
//! authorization handler can reach.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{CollectionId, OrgId};

/// A shared resource scoped to exactly one organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collection {
	pub id: CollectionId,
	pub org_id: OrgId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
}

impl Collection {
	/// Creates a collection reference without a display name.
	pub fn new(id: CollectionId, org_id: OrgId) -> Self {
		Self {
			id,
			org_id,
			name: None,
		}
	}
}

/// A user's assignment to one collection, as computed by the read path that
/// backs the manage-relation resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionAccessDetails {
	pub collection_id: CollectionId,
	pub org_id: OrgId,
	/// The user may administer this collection regardless of organization role.
	#[serde(default)]
	pub manage: bool,
	#[serde(default)]
	pub read_only: bool,
	#[serde(default)]
	pub hide_passwords: bool,
}

impl CollectionAccessDetails {
	/// Creates a plain read/write assignment without manage rights.
	pub fn new(collection_id: CollectionId, org_id: OrgId) -> Self {
		Self {
			collection_id,
			org_id,
			manage: false,
			read_only: false,
			hide_passwords: false,
		}
	}

	/// Builder: set manage.
	pub fn with_manage(mut self, manage: bool) -> Self {
		self.manage = manage;
		self
	}
}

/// Operations that can be requested against one or more collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkCollectionOperation {
	Create,
	Read,
	ReadAccess,
	ReadWithAccess,
	Update,
	ModifyAccess,
	ImportCiphers,
	Delete,
}

impl BulkCollectionOperation {
	/// Returns every operation in the closed set.
	pub fn all() -> &'static [BulkCollectionOperation] {
		&[
			BulkCollectionOperation::Create,
			BulkCollectionOperation::Read,
			BulkCollectionOperation::ReadAccess,
			BulkCollectionOperation::ReadWithAccess,
			BulkCollectionOperation::Update,
			BulkCollectionOperation::ModifyAccess,
			BulkCollectionOperation::ImportCiphers,
			BulkCollectionOperation::Delete,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			BulkCollectionOperation::Create => "create",
			BulkCollectionOperation::Read => "read",
			BulkCollectionOperation::ReadAccess => "read_access",
			BulkCollectionOperation::ReadWithAccess => "read_with_access",
			BulkCollectionOperation::Update => "update",
			BulkCollectionOperation::ModifyAccess => "modify_access",
			BulkCollectionOperation::ImportCiphers => "import_ciphers",
			BulkCollectionOperation::Delete => "delete",
		}
	}
}

impl fmt::Display for BulkCollectionOperation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Returned when an operation name is not part of the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown collection operation: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for BulkCollectionOperation {
	type Err = UnknownOperation;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		BulkCollectionOperation::all()
			.iter()
			.copied()
			.find(|op| op.as_str() == s)
			.ok_or_else(|| UnknownOperation(s.to_string()))
	}
}

/// Outcome of a single handler evaluating one operation against one resource.
///
/// Handlers never deny: the absence of success is left for the caller to
/// aggregate across every registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
	Succeeded,
	NoDecision,
}

impl Decision {
	pub fn is_succeeded(&self) -> bool {
		matches!(self, Decision::Succeeded)
	}

	/// Maps a rule outcome to a decision.
	pub fn succeed_if(condition: bool) -> Self {
		if condition {
			Decision::Succeeded
		} else {
			Decision::NoDecision
		}
	}
}

impl fmt::Display for Decision {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Decision::Succeeded => write!(f, "succeeded"),
			Decision::NoDecision => write!(f, "no_decision"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn operation_names_parse_back() {
		for op in BulkCollectionOperation::all() {
			assert_eq!(op.as_str().parse::<BulkCollectionOperation>().unwrap(), *op);
		}
	}

	#[test]
	fn unknown_operation_is_rejected_at_parse_time() {
		let err = "share".parse::<BulkCollectionOperation>().unwrap_err();
		assert_eq!(err, UnknownOperation("share".to_string()));
	}

	#[test]
	fn operation_serde_matches_display() {
		let json = serde_json::to_string(&BulkCollectionOperation::ReadWithAccess).unwrap();
		assert_eq!(json, "\"read_with_access\"");
	}

	#[test]
	fn succeed_if_maps_booleans() {
		assert_eq!(Decision::succeed_if(true), Decision::Succeeded);
		assert_eq!(Decision::succeed_if(false), Decision::NoDecision);
		assert!(!Decision::NoDecision.is_succeeded());
	}

	#[test]
	fn collection_name_is_optional_in_json() {
		let org_id = OrgId::generate();
		let id = CollectionId::generate();
		let json = format!(r#"{{ "id": "{id}", "org_id": "{org_id}" }}"#);
		let collection: Collection = serde_json::from_str(&json).unwrap();
		assert_eq!(collection, Collection::new(id, org_id));
	}
}
