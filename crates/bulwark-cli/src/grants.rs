// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `bulwark check-grants`: validate a JSON batch of access policies.

use std::path::Path;

use anyhow::Context;
use bulwark_authz_core::{validate_grants, AccessPolicy, GrantValidationError};
use tracing::{info, warn};

pub fn load_batch(path: &Path) -> anyhow::Result<Vec<AccessPolicy>> {
	let content = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read grant batch {}", path.display()))?;
	serde_json::from_str(&content)
		.with_context(|| format!("failed to parse grant batch {}", path.display()))
}

/// Validates a batch, logging the verdict.
pub fn check(policies: &[AccessPolicy]) -> Result<(), GrantValidationError> {
	match validate_grants(policies) {
		Ok(()) => {
			info!(grants = policies.len(), "grant batch is valid");
			Ok(())
		}
		Err(e) => {
			warn!(grants = policies.len(), error = %e, "grant batch rejected");
			Err(e)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bulwark_authz_core::{GroupId, ProjectId};

	#[test]
	fn loads_tagged_policies() {
		let group = GroupId::generate();
		let project = ProjectId::generate();
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("batch.json");
		std::fs::write(
			&path,
			format!(
				r#"[{{"kind":"group_project","group_id":"{group}","granted_project_id":"{project}","read":true,"write":false}}]"#
			),
		)
		.unwrap();

		let batch = load_batch(&path).unwrap();
		assert_eq!(batch.len(), 1);
		assert!(batch[0].read);
		assert!(check(&batch).is_ok());
	}

	#[test]
	fn duplicate_grants_are_rejected() {
		let group = GroupId::generate();
		let project = ProjectId::generate();
		let json = format!(
			r#"[
				{{"kind":"group_project","group_id":"{group}","granted_project_id":"{project}","read":true,"write":false}},
				{{"kind":"group_project","group_id":"{group}","granted_project_id":"{project}","read":true,"write":true}}
			]"#
		);
		let batch: Vec<AccessPolicy> = serde_json::from_str(&json).unwrap();
		assert!(matches!(
			check(&batch),
			Err(GrantValidationError::DuplicateGrant { .. })
		));
	}

	#[test]
	fn malformed_batch_names_the_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("batch.json");
		std::fs::write(&path, r#"[{"kind":"nonsense"}]"#).unwrap();

		let err = load_batch(&path).unwrap_err();
		assert!(err.to_string().contains("batch.json"));
	}
}
