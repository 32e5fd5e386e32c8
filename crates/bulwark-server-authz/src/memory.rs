// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory collaborator implementations.
//!
//! These back the CLI's scenario runner and the test suites. The async ones
//! count their lookups so callers can assert how often the engines reach out.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bulwark_authz_core::{
	CollectionAccessDetails, CollectionId, MembershipContext, OrgId, OrganizationAbility, UserId,
};

use crate::collaborators::{
	FeatureFlagSource, ManagedCollectionResolver, MembershipContextProvider,
	OrganizationAbilityCache, ProviderVerifier,
};
use crate::error::BoxError;

/// Fixed memberships for one acting user.
#[derive(Debug, Clone, Default)]
pub struct StaticMemberships {
	memberships: HashMap<OrgId, MembershipContext>,
}

impl StaticMemberships {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder: add or replace the membership for its organization.
	pub fn with_membership(mut self, membership: MembershipContext) -> Self {
		self.memberships.insert(membership.org_id, membership);
		self
	}
}

impl FromIterator<MembershipContext> for StaticMemberships {
	fn from_iter<T: IntoIterator<Item = MembershipContext>>(iter: T) -> Self {
		Self {
			memberships: iter.into_iter().map(|m| (m.org_id, m)).collect(),
		}
	}
}

impl MembershipContextProvider for StaticMemberships {
	fn membership(&self, org_id: OrgId) -> Option<MembershipContext> {
		self.memberships.get(&org_id).copied()
	}
}

/// Organization abilities keyed by organization.
#[derive(Debug, Default)]
pub struct InMemoryOrganizationAbilities {
	abilities: HashMap<OrgId, OrganizationAbility>,
	lookups: AtomicUsize,
}

impl InMemoryOrganizationAbilities {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder: add or replace the ability for its organization.
	pub fn with_ability(mut self, ability: OrganizationAbility) -> Self {
		self.abilities.insert(ability.org_id, ability);
		self
	}

	/// Number of lookups served so far.
	pub fn lookup_count(&self) -> usize {
		self.lookups.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl OrganizationAbilityCache for InMemoryOrganizationAbilities {
	async fn organization_ability(
		&self,
		org_id: OrgId,
	) -> Result<Option<OrganizationAbility>, BoxError> {
		self.lookups.fetch_add(1, Ordering::SeqCst);
		Ok(self.abilities.get(&org_id).copied())
	}
}

/// Collection assignments keyed by user.
///
/// Assignments are stored already flattened (direct and group-inherited
/// alike), so `include_extended_visibility` does not change the result.
#[derive(Debug, Default)]
pub struct InMemoryCollectionAccess {
	assignments: HashMap<UserId, Vec<CollectionAccessDetails>>,
	lookups: AtomicUsize,
}

impl InMemoryCollectionAccess {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder: assign a collection to a user.
	pub fn with_assignment(mut self, user_id: UserId, details: CollectionAccessDetails) -> Self {
		self.assignments.entry(user_id).or_default().push(details);
		self
	}

	/// Builder: assign a collection to a user with manage rights.
	pub fn with_managed(self, user_id: UserId, collection_id: CollectionId, org_id: OrgId) -> Self {
		self.with_assignment(
			user_id,
			CollectionAccessDetails::new(collection_id, org_id).with_manage(true),
		)
	}

	/// Number of resolver calls served so far.
	pub fn lookup_count(&self) -> usize {
		self.lookups.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl ManagedCollectionResolver for InMemoryCollectionAccess {
	async fn managed_collection_ids(
		&self,
		user_id: UserId,
		_include_extended_visibility: bool,
	) -> Result<HashSet<CollectionId>, BoxError> {
		self.lookups.fetch_add(1, Ordering::SeqCst);
		Ok(self
			.assignments
			.get(&user_id)
			.into_iter()
			.flatten()
			.filter(|details| details.manage)
			.map(|details| details.collection_id)
			.collect())
	}
}

/// A fixed set of enabled feature flags.
#[derive(Debug, Clone, Default)]
pub struct StaticFeatureFlags {
	enabled: HashSet<String>,
}

impl StaticFeatureFlags {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder: turn a flag on.
	pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
		self.enabled.insert(flag.into());
		self
	}
}

impl<S: Into<String>> FromIterator<S> for StaticFeatureFlags {
	fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
		Self {
			enabled: iter.into_iter().map(Into::into).collect(),
		}
	}
}

impl FeatureFlagSource for StaticFeatureFlags {
	fn is_enabled(&self, flag: &str) -> bool {
		self.enabled.contains(flag)
	}
}

/// Provider users and the organizations they serve.
#[derive(Debug, Default)]
pub struct InMemoryProviderDirectory {
	links: HashSet<(UserId, OrgId)>,
	lookups: AtomicUsize,
}

impl InMemoryProviderDirectory {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder: mark a user as provider for an organization.
	pub fn with_provider_user(mut self, user_id: UserId, org_id: OrgId) -> Self {
		self.links.insert((user_id, org_id));
		self
	}

	/// Number of verifications served so far.
	pub fn lookup_count(&self) -> usize {
		self.lookups.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl ProviderVerifier for InMemoryProviderDirectory {
	async fn is_provider_for_org(&self, user_id: UserId, org_id: OrgId) -> Result<bool, BoxError> {
		self.lookups.fetch_add(1, Ordering::SeqCst);
		Ok(self.links.contains(&(user_id, org_id)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bulwark_authz_core::OrgRole;

	#[test]
	fn static_memberships_return_none_for_other_orgs() {
		let org_id = OrgId::generate();
		let memberships =
			StaticMemberships::new().with_membership(MembershipContext::new(org_id, OrgRole::User));
		assert!(memberships.membership(org_id).is_some());
		assert!(memberships.membership(OrgId::generate()).is_none());
	}

	#[tokio::test]
	async fn collection_access_returns_only_managed_ids() {
		let user_id = UserId::generate();
		let org_id = OrgId::generate();
		let managed = CollectionId::generate();
		let assigned = CollectionId::generate();
		let access = InMemoryCollectionAccess::new()
			.with_managed(user_id, managed, org_id)
			.with_assignment(user_id, CollectionAccessDetails::new(assigned, org_id));

		let ids = access.managed_collection_ids(user_id, true).await.unwrap();
		assert_eq!(ids, HashSet::from([managed]));
		assert_eq!(access.lookup_count(), 1);
	}

	#[tokio::test]
	async fn collection_access_is_empty_for_unknown_users() {
		let access = InMemoryCollectionAccess::new();
		let ids = access
			.managed_collection_ids(UserId::generate(), false)
			.await
			.unwrap();
		assert!(ids.is_empty());
	}

	#[test]
	fn feature_flags_collect_from_strings() {
		let flags: StaticFeatureFlags = ["a", "b"].into_iter().collect();
		assert!(flags.is_enabled("a"));
		assert!(!flags.is_enabled("c"));
	}

	#[tokio::test]
	async fn provider_directory_matches_user_and_org() {
		let user_id = UserId::generate();
		let org_id = OrgId::generate();
		let directory = InMemoryProviderDirectory::new().with_provider_user(user_id, org_id);

		assert!(directory.is_provider_for_org(user_id, org_id).await.unwrap());
		assert!(!directory
			.is_provider_for_org(user_id, OrgId::generate())
			.await
			.unwrap());
		assert!(!directory
			.is_provider_for_org(UserId::generate(), org_id)
			.await
			.unwrap());
		assert_eq!(directory.lookup_count(), 3);
	}
}
