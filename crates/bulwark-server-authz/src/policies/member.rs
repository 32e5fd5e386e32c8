// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Collection policy for organization members.
//!
//! Rules per operation group, checked in order; the first that holds succeeds:
//!
//! | Operations                         | Role / permission                          | Organization setting                                           | Manage relation      |
//! |------------------------------------|--------------------------------------------|----------------------------------------------------------------|----------------------|
//! | Create                             | owner, admin, `create_new_collections`     | creation/deletion not limited                                  | -                    |
//! | Read, ReadAccess                   | owner, admin, `edit_any`, `delete_any`     | -                                                              | manages collection   |
//! | ReadWithAccess                     | as Read, plus `manage_users`               | -                                                              | manages collection   |
//! | Update, ModifyAccess, ImportCiphers| `edit_any`                                 | owner/admin while V1 is off or admin access to all items is on | manages collection   |
//! | Delete                             | owner, admin, `delete_any`                 | creation/deletion not limited *and* manages collection         | (part of the gate)   |
//!
//! Non-members never succeed. Organization settings are only fetched when the
//! role and permission flags did not already decide, and the manage relation
//! is fetched at most once per policy instance.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use bulwark_authz_core::{
	BulkCollectionOperation, Collection, CollectionId, Decision, MembershipContext,
	OrganizationAbility, UserId,
};
use tracing::{debug, instrument, trace, warn};

use super::CollectionAuthorizationHandler;
use crate::collaborators::{
	flags, AuthzServices, FeatureFlagSource, ManagedCollectionResolver, MembershipContextProvider,
	OrganizationAbilityCache,
};
use crate::error::{AuthzError, Result};

/// Evaluates collection operations for one acting organization member.
///
/// Create one instance per authorization session and evaluate every
/// (operation, collection) pair of that session through it, so the managed
/// collection lookup is shared.
pub struct MemberCollectionPolicy {
	user_id: UserId,
	memberships: Arc<dyn MembershipContextProvider>,
	abilities: Arc<dyn OrganizationAbilityCache>,
	managed_collections: Arc<dyn ManagedCollectionResolver>,
	features: Arc<dyn FeatureFlagSource>,
	include_extended_visibility: bool,
	managed_collection_ids: Option<HashSet<CollectionId>>,
}

impl MemberCollectionPolicy {
	pub fn new(user_id: UserId, services: &AuthzServices) -> Self {
		Self {
			user_id,
			memberships: Arc::clone(&services.memberships),
			abilities: Arc::clone(&services.abilities),
			managed_collections: Arc::clone(&services.managed_collections),
			features: Arc::clone(&services.features),
			include_extended_visibility: services.options.include_extended_visibility,
			managed_collection_ids: None,
		}
	}

	/// Evaluates one operation against one collection.
	///
	/// A missing collection or a user without membership in the collection's
	/// organization yields [`Decision::NoDecision`] without consulting any
	/// other collaborator.
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
		&mut self,
		operation: BulkCollectionOperation,
		resource: Option<&Collection>,
	) -> Result<Decision> {
		let Some(resource) = resource else {
			return Ok(Decision::NoDecision);
		};

		let Some(membership) = self.memberships.membership(resource.org_id) else {
			trace!(org_id = %resource.org_id, "acting user is not a member of the organization");
			return Ok(Decision::NoDecision);
		};

		let allowed = match operation {
			BulkCollectionOperation::Create => self.can_create(&membership, resource).await?,
			BulkCollectionOperation::Read | BulkCollectionOperation::ReadAccess => {
				self.can_read(&membership, resource).await?
			}
			BulkCollectionOperation::ReadWithAccess => {
				self.can_read_with_access(&membership, resource).await?
			}
			BulkCollectionOperation::Update
			| BulkCollectionOperation::ModifyAccess
			| BulkCollectionOperation::ImportCiphers => self.can_update(&membership, resource).await?,
			BulkCollectionOperation::Delete => self.can_delete(&membership, resource).await?,
		};

		let decision = Decision::succeed_if(allowed);
		debug!(role = %membership.role, decision = %decision, "member collection policy evaluated");
		Ok(decision)
	}

	async fn can_create(
		&self,
		membership: &MembershipContext,
		resource: &Collection,
	) -> Result<bool> {
		if membership.is_owner_or_admin() || membership.permissions.create_new_collections {
			return Ok(true);
		}

		let ability = self.organization_ability(resource).await?;
		Ok(ability.is_some_and(|a| !a.limit_collection_creation_deletion))
	}

	async fn can_read(&mut self, membership: &MembershipContext, resource: &Collection) -> Result<bool> {
		if membership.is_owner_or_admin()
			|| membership.permissions.edit_any_collection
			|| membership.permissions.delete_any_collection
		{
			return Ok(true);
		}

		self.manages(resource).await
	}

	async fn can_read_with_access(
		&mut self,
		membership: &MembershipContext,
		resource: &Collection,
	) -> Result<bool> {
		if membership.is_owner_or_admin()
			|| membership.permissions.edit_any_collection
			|| membership.permissions.delete_any_collection
			|| membership.permissions.manage_users
		{
			return Ok(true);
		}

		self.manages(resource).await
	}

	async fn can_update(
		&mut self,
		membership: &MembershipContext,
		resource: &Collection,
	) -> Result<bool> {
		if membership.permissions.edit_any_collection {
			return Ok(true);
		}

		if membership.is_owner_or_admin() {
			if !self.features.is_enabled(flags::FLEXIBLE_COLLECTIONS_V1) {
				return Ok(true);
			}
			let ability = self.organization_ability(resource).await?;
			if ability.is_some_and(|a| a.allow_admin_access_to_all_collection_items) {
				return Ok(true);
			}
		}

		self.manages(resource).await
	}

	async fn can_delete(
		&mut self,
		membership: &MembershipContext,
		resource: &Collection,
	) -> Result<bool> {
		if membership.is_owner_or_admin() || membership.permissions.delete_any_collection {
			return Ok(true);
		}

		let ability = self.organization_ability(resource).await?;
		if ability.is_some_and(|a| !a.limit_collection_creation_deletion) {
			return self.manages(resource).await;
		}

		Ok(false)
	}

	async fn organization_ability(
		&self,
		resource: &Collection,
	) -> Result<Option<OrganizationAbility>> {
		self.abilities
			.organization_ability(resource.org_id)
			.await
			.map_err(|source| {
				warn!(org_id = %resource.org_id, error = %source, "organization ability lookup failed");
				AuthzError::OrganizationAbility {
					org_id: resource.org_id,
					source,
				}
			})
	}

	/// Whether the acting user holds manage rights over the collection.
	async fn manages(&mut self, resource: &Collection) -> Result<bool> {
		if self.managed_collection_ids.is_none() {
			let ids = self
				.managed_collections
				.managed_collection_ids(self.user_id, self.include_extended_visibility)
				.await
				.map_err(|source| {
					warn!(user_id = %self.user_id, error = %source, "managed collection lookup failed");
					AuthzError::ManagedCollections {
						user_id: self.user_id,
						source,
					}
				})?;
			debug!(count = ids.len(), "loaded managed collections");
			self.managed_collection_ids = Some(ids);
		}

		Ok(self
			.managed_collection_ids
			.as_ref()
			.is_some_and(|ids| ids.contains(&resource.id)))
	}
}

#[async_trait]
impl CollectionAuthorizationHandler for MemberCollectionPolicy {
	fn name(&self) -> &'static str {
		"member"
	}

	async fn evaluate(
		&mut self,
		operation: BulkCollectionOperation,
		resource: Option<&Collection>,
	) -> Result<Decision> {
		MemberCollectionPolicy::evaluate(self, operation, resource).await
	}
}
