// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Contracts for the external collaborators consulted during evaluation.
//!
//! The engines never reach storage directly. Everything they need is resolved
//! through these traits:
//!
//! | Trait                         | Cost                        |
//! |-------------------------------|-----------------------------|
//! | [`MembershipContextProvider`] | pre-loaded, synchronous     |
//! | [`FeatureFlagSource`]         | in-process, synchronous     |
//! | [`OrganizationAbilityCache`]  | async, may hit the network  |
//! | [`ManagedCollectionResolver`] | async, hits the database    |
//! | [`ProviderVerifier`]          | async, hits the database    |
//!
//! Async collaborators report faults as [`BoxError`]; the engines attach the
//! identifiers involved and propagate without retrying.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use bulwark_authz_core::{CollectionId, MembershipContext, OrgId, OrganizationAbility, UserId};

use crate::error::BoxError;

/// Feature flag keys consulted by the engines.
pub mod flags {
	/// Owners and admins lose implicit edit rights over every collection unless
	/// the organization opts back in.
	pub const FLEXIBLE_COLLECTIONS_V1: &str = "flexible-collections-v-1";
}

/// Resolves the acting user's membership in an organization.
///
/// An implementation is bound to one acting user, usually built from the
/// authenticated request. `None` means the user is not a member.
pub trait MembershipContextProvider: Send + Sync {
	fn membership(&self, org_id: OrgId) -> Option<MembershipContext>;
}

/// Cached organization-wide settings.
#[async_trait]
pub trait OrganizationAbilityCache: Send + Sync {
	async fn organization_ability(
		&self,
		org_id: OrgId,
	) -> Result<Option<OrganizationAbility>, BoxError>;
}

/// Computes which collections a user may administer.
#[async_trait]
pub trait ManagedCollectionResolver: Send + Sync {
	/// Returns every collection the user holds manage rights over, across all
	/// organizations.
	async fn managed_collection_ids(
		&self,
		user_id: UserId,
		include_extended_visibility: bool,
	) -> Result<HashSet<CollectionId>, BoxError>;
}

/// Boolean feature flag lookups.
pub trait FeatureFlagSource: Send + Sync {
	fn is_enabled(&self, flag: &str) -> bool;
}

/// Verifies provider users acting on behalf of an organization.
#[async_trait]
pub trait ProviderVerifier: Send + Sync {
	async fn is_provider_for_org(&self, user_id: UserId, org_id: OrgId) -> Result<bool, BoxError>;
}

/// Tunables for the engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthzOptions {
	/// Forwarded to [`ManagedCollectionResolver::managed_collection_ids`].
	pub include_extended_visibility: bool,
}

impl Default for AuthzOptions {
	fn default() -> Self {
		Self {
			include_extended_visibility: true,
		}
	}
}

/// The collaborators one authorization session draws on.
///
/// Cloning is cheap; every collaborator is shared behind an [`Arc`].
#[derive(Clone)]
pub struct AuthzServices {
	pub memberships: Arc<dyn MembershipContextProvider>,
	pub abilities: Arc<dyn OrganizationAbilityCache>,
	pub managed_collections: Arc<dyn ManagedCollectionResolver>,
	pub features: Arc<dyn FeatureFlagSource>,
	pub providers: Arc<dyn ProviderVerifier>,
	pub options: AuthzOptions,
}

impl AuthzServices {
	pub fn new(
		memberships: Arc<dyn MembershipContextProvider>,
		abilities: Arc<dyn OrganizationAbilityCache>,
		managed_collections: Arc<dyn ManagedCollectionResolver>,
		features: Arc<dyn FeatureFlagSource>,
		providers: Arc<dyn ProviderVerifier>,
	) -> Self {
		Self {
			memberships,
			abilities,
			managed_collections,
			features,
			providers,
			options: AuthzOptions::default(),
		}
	}

	/// Builder: set options.
	pub fn with_options(mut self, options: AuthzOptions) -> Self {
		self.options = options;
		self
	}
}

impl std::fmt::Debug for AuthzServices {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AuthzServices")
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}
