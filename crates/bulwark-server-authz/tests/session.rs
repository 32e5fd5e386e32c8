// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end authorization scenarios through [`AuthorizationSession`].
//!
//! Key invariant: a bulk request is authorized only when every collection in
//! it is authorized by at least one handler.

use std::sync::Arc;

use async_trait::async_trait;

use bulwark_authz_core::{
	BulkCollectionOperation, Collection, CollectionId, Decision, MembershipContext, OrgId, OrgRole,
	OrganizationAbility, Permissions, UserId,
};
use bulwark_server_authz::memory::{
	InMemoryCollectionAccess, InMemoryOrganizationAbilities, InMemoryProviderDirectory,
	StaticFeatureFlags, StaticMemberships,
};
use bulwark_server_authz::{
	flags, AuthorizationSession, AuthzError, AuthzServices, BoxError, ProviderVerifier,
};

struct Org {
	id: OrgId,
	collections: Vec<Collection>,
}

impl Org {
	fn with_collections(count: usize) -> Self {
		let id = OrgId::generate();
		Self {
			id,
			collections: (0..count)
				.map(|_| Collection::new(CollectionId::generate(), id))
				.collect(),
		}
	}
}

struct World {
	memberships: StaticMemberships,
	abilities: InMemoryOrganizationAbilities,
	access: InMemoryCollectionAccess,
	providers: InMemoryProviderDirectory,
}

impl World {
	fn new() -> Self {
		Self {
			memberships: StaticMemberships::new(),
			abilities: InMemoryOrganizationAbilities::new(),
			access: InMemoryCollectionAccess::new(),
			providers: InMemoryProviderDirectory::new(),
		}
	}

	fn services(self) -> (AuthzServices, Arc<InMemoryCollectionAccess>) {
		let access = Arc::new(self.access);
		let services = AuthzServices::new(
			Arc::new(self.memberships),
			Arc::new(self.abilities),
			access.clone(),
			Arc::new(StaticFeatureFlags::new().with_flag(flags::FLEXIBLE_COLLECTIONS_V1)),
			Arc::new(self.providers),
		);
		(services, access)
	}
}

#[tokio::test]
async fn user_creates_when_org_does_not_limit_creation() {
	let org = Org::with_collections(1);
	let user_id = UserId::generate();

	for (limit, expected) in [(false, Decision::Succeeded), (true, Decision::NoDecision)] {
		let mut world = World::new();
		world.memberships = world
			.memberships
			.with_membership(MembershipContext::new(org.id, OrgRole::User));
		world.abilities = world.abilities.with_ability(
			OrganizationAbility::new(org.id).with_limit_collection_creation_deletion(limit),
		);
		let (services, _) = world.services();
		let mut session = AuthorizationSession::new(user_id, &services);

		let decision = session
			.authorize_one(BulkCollectionOperation::Create, Some(&org.collections[0]))
			.await
			.unwrap();
		assert_eq!(decision, expected, "limit = {limit}");
	}
}

#[tokio::test]
async fn custom_editor_updates_regardless_of_settings() {
	let org = Org::with_collections(3);
	let user_id = UserId::generate();
	let mut world = World::new();
	world.memberships = world.memberships.with_membership(
		MembershipContext::new(org.id, OrgRole::Custom)
			.with_permissions(Permissions::none().with_edit_any_collection(true)),
	);
	world.abilities = world.abilities.with_ability(
		OrganizationAbility::new(org.id)
			.with_admin_access_to_all_collection_items(false)
			.with_limit_collection_creation_deletion(true),
	);
	let (services, _) = world.services();
	let mut session = AuthorizationSession::new(user_id, &services);

	let outcome = session
		.authorize(BulkCollectionOperation::Update, &org.collections)
		.await
		.unwrap();
	assert!(outcome.is_authorized());
	assert!(outcome
		.decisions
		.iter()
		.all(|d| d.handler == Some("member")));
}

#[tokio::test]
async fn manager_deletes_only_when_org_does_not_limit_deletion() {
	let org = Org::with_collections(1);
	let user_id = UserId::generate();

	for (limit, expected) in [(false, true), (true, false)] {
		let mut world = World::new();
		world.memberships = world
			.memberships
			.with_membership(MembershipContext::new(org.id, OrgRole::User));
		world.abilities = world.abilities.with_ability(
			OrganizationAbility::new(org.id).with_limit_collection_creation_deletion(limit),
		);
		world.access = world
			.access
			.with_managed(user_id, org.collections[0].id, org.id);
		let (services, _) = world.services();
		let mut session = AuthorizationSession::new(user_id, &services);

		let outcome = session
			.authorize(BulkCollectionOperation::Delete, &org.collections)
			.await
			.unwrap();
		assert_eq!(outcome.is_authorized(), expected, "limit = {limit}");
	}
}

#[tokio::test]
async fn provider_deletes_without_membership() {
	let org = Org::with_collections(2);
	let user_id = UserId::generate();
	let mut world = World::new();
	world.providers = world.providers.with_provider_user(user_id, org.id);
	let (services, _) = world.services();
	let mut session = AuthorizationSession::new(user_id, &services);

	let outcome = session
		.authorize(BulkCollectionOperation::Delete, &org.collections)
		.await
		.unwrap();
	assert!(outcome.is_authorized());
	assert!(outcome
		.decisions
		.iter()
		.all(|d| d.handler == Some("provider")));
}

#[tokio::test]
async fn one_unmanaged_collection_denies_the_batch() {
	let org = Org::with_collections(3);
	let user_id = UserId::generate();
	let mut world = World::new();
	world.memberships = world
		.memberships
		.with_membership(MembershipContext::new(org.id, OrgRole::User));
	for collection in &org.collections[..2] {
		world.access = world.access.with_managed(user_id, collection.id, org.id);
	}
	let (services, access) = world.services();
	let mut session = AuthorizationSession::new(user_id, &services);

	let outcome = session
		.authorize(BulkCollectionOperation::ModifyAccess, &org.collections)
		.await
		.unwrap();

	assert!(!outcome.is_authorized());
	let denied: Vec<_> = outcome.denied().map(|d| d.collection_id).collect();
	assert_eq!(denied, vec![Some(org.collections[2].id)]);
	assert_eq!(access.lookup_count(), 1);
}

#[tokio::test]
async fn session_reuses_manage_lookup_across_operations() {
	let org = Org::with_collections(2);
	let user_id = UserId::generate();
	let mut world = World::new();
	world.memberships = world
		.memberships
		.with_membership(MembershipContext::new(org.id, OrgRole::User));
	for collection in &org.collections {
		world.access = world.access.with_managed(user_id, collection.id, org.id);
	}
	let (services, access) = world.services();
	let mut session = AuthorizationSession::new(user_id, &services);

	for op in [
		BulkCollectionOperation::Read,
		BulkCollectionOperation::ReadWithAccess,
		BulkCollectionOperation::Update,
	] {
		let outcome = session.authorize(op, &org.collections).await.unwrap();
		assert!(outcome.is_authorized(), "{op}");
	}
	assert_eq!(access.lookup_count(), 1);
}

#[tokio::test]
async fn stranger_is_denied_everything() {
	let org = Org::with_collections(1);
	let (services, _) = World::new().services();
	let mut session = AuthorizationSession::new(UserId::generate(), &services);

	for op in BulkCollectionOperation::all() {
		let outcome = session.authorize(*op, &org.collections).await.unwrap();
		assert!(!outcome.is_authorized(), "{op}");
	}
}

struct UnreachableProviders;

#[async_trait]
impl ProviderVerifier for UnreachableProviders {
	async fn is_provider_for_org(&self, _user_id: UserId, _org_id: OrgId) -> Result<bool, BoxError> {
		Err("provider directory unreachable".into())
	}
}

#[tokio::test]
async fn provider_fault_fails_the_whole_batch() {
	let org = Org::with_collections(2);
	let user_id = UserId::generate();
	let mut world = World::new();
	world.memberships = world
		.memberships
		.with_membership(MembershipContext::new(org.id, OrgRole::User));
	world.access = world
		.access
		.with_managed(user_id, org.collections[0].id, org.id);
	let (mut services, _) = world.services();
	services.providers = Arc::new(UnreachableProviders);
	let mut session = AuthorizationSession::new(user_id, &services);

	// The first collection is managed and never reaches the provider; the
	// second falls through to it and the fault surfaces.
	let err = session
		.authorize(BulkCollectionOperation::Update, &org.collections)
		.await
		.unwrap_err();
	assert!(matches!(
		err,
		AuthzError::ProviderVerification { user_id: failed, org_id, .. }
			if failed == user_id && org_id == org.id
	));
}
