// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Collection policy for provider users acting on behalf of an organization.
//!
//! Providers bypass membership, role and permission rules entirely: a verified
//! provider for the collection's organization may perform every operation.

use std::sync::Arc;

use async_trait::async_trait;
use bulwark_authz_core::{BulkCollectionOperation, Collection, Decision, UserId};
use tracing::{debug, instrument, warn};

use super::CollectionAuthorizationHandler;
use crate::collaborators::{AuthzServices, ProviderVerifier};
use crate::error::{AuthzError, Result};

/// Evaluates collection operations for a provider user.
pub struct ProviderCollectionPolicy {
	user_id: UserId,
	providers: Arc<dyn ProviderVerifier>,
}

impl ProviderCollectionPolicy {
	pub fn new(user_id: UserId, services: &AuthzServices) -> Self {
		Self {
			user_id,
			providers: Arc::clone(&services.providers),
		}
	}

	#[instrument(
		level = "debug",
		skip(self, resource),
		fields(
			user_id = %self.user_id,
			operation = %operation,
			collection_id = ?resource.map(|c| c.id),
		)
	)]
	pub async fn evaluate(
		&self,
		operation: BulkCollectionOperation,
		resource: Option<&Collection>,
	) -> Result<Decision> {
		let Some(resource) = resource else {
			return Ok(Decision::NoDecision);
		};

		// Every operation is allowed; a new variant must be decided here.
		match operation {
			BulkCollectionOperation::Create
			| BulkCollectionOperation::Read
			| BulkCollectionOperation::ReadAccess
			| BulkCollectionOperation::ReadWithAccess
			| BulkCollectionOperation::Update
			| BulkCollectionOperation::ModifyAccess
			| BulkCollectionOperation::ImportCiphers
			| BulkCollectionOperation::Delete => {}
		}

		let is_provider = self
			.providers
			.is_provider_for_org(self.user_id, resource.org_id)
			.await
			.map_err(|source| {
				warn!(org_id = %resource.org_id, error = %source, "provider verification failed");
				AuthzError::ProviderVerification {
					user_id: self.user_id,
					org_id: resource.org_id,
					source,
				}
			})?;

		let decision = Decision::succeed_if(is_provider);
		debug!(decision = %decision, "provider collection policy evaluated");
		Ok(decision)
	}
}

#[async_trait]
impl CollectionAuthorizationHandler for ProviderCollectionPolicy {
	fn name(&self) -> &'static str {
		"provider"
	}

	async fn evaluate(
		&mut self,
		operation: BulkCollectionOperation,
		resource: Option<&Collection>,
	) -> Result<Decision> {
		ProviderCollectionPolicy::evaluate(self, operation, resource).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::BoxError;
	use crate::memory::{
		InMemoryCollectionAccess, InMemoryOrganizationAbilities, InMemoryProviderDirectory,
		StaticFeatureFlags, StaticMemberships,
	};
	use bulwark_authz_core::{CollectionId, OrgId};

	fn services(providers: Arc<dyn ProviderVerifier>) -> AuthzServices {
		AuthzServices::new(
			Arc::new(StaticMemberships::new()),
			Arc::new(InMemoryOrganizationAbilities::new()),
			Arc::new(InMemoryCollectionAccess::new()),
			Arc::new(StaticFeatureFlags::new()),
			providers,
		)
	}

	#[tokio::test]
	async fn provider_for_org_can_do_everything() {
		let user_id = UserId::generate();
		let collection = Collection::new(CollectionId::generate(), OrgId::generate());
		let directory = Arc::new(
			InMemoryProviderDirectory::new().with_provider_user(user_id, collection.org_id),
		);
		let policy = ProviderCollectionPolicy::new(user_id, &services(directory.clone()));

		for op in BulkCollectionOperation::all() {
			let decision = policy.evaluate(*op, Some(&collection)).await.unwrap();
			assert_eq!(decision, Decision::Succeeded, "{op}");
		}
		assert_eq!(directory.lookup_count(), BulkCollectionOperation::all().len());
	}

	#[tokio::test]
	async fn provider_for_other_org_gets_no_decision() {
		let user_id = UserId::generate();
		let collection = Collection::new(CollectionId::generate(), OrgId::generate());
		let directory =
			Arc::new(InMemoryProviderDirectory::new().with_provider_user(user_id, OrgId::generate()));
		let policy = ProviderCollectionPolicy::new(user_id, &services(directory));

		let decision = policy
			.evaluate(BulkCollectionOperation::Delete, Some(&collection))
			.await
			.unwrap();
		assert_eq!(decision, Decision::NoDecision);
	}

	#[tokio::test]
	async fn missing_resource_skips_verification() {
		let directory = Arc::new(InMemoryProviderDirectory::new());
		let policy = ProviderCollectionPolicy::new(UserId::generate(), &services(directory.clone()));

		let decision = policy
			.evaluate(BulkCollectionOperation::Read, None)
			.await
			.unwrap();
		assert_eq!(decision, Decision::NoDecision);
		assert_eq!(directory.lookup_count(), 0);
	}

	struct UnreachableProviders;

	#[async_trait]
	impl ProviderVerifier for UnreachableProviders {
		async fn is_provider_for_org(
			&self,
			_user_id: UserId,
			_org_id: OrgId,
		) -> std::result::Result<bool, BoxError> {
			Err("provider store unavailable".into())
		}
	}

	#[tokio::test]
	async fn verification_failure_propagates() {
		let policy =
			ProviderCollectionPolicy::new(UserId::generate(), &services(Arc::new(UnreachableProviders)));
		let collection = Collection::new(CollectionId::generate(), OrgId::generate());

		let err = policy
			.evaluate(BulkCollectionOperation::Update, Some(&collection))
			.await
			.unwrap_err();
		assert!(matches!(err, AuthzError::ProviderVerification { .. }));
	}
}
