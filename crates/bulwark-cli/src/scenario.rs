// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scenario files for `bulwark evaluate`.
//!
//! A scenario describes one acting user, the state the collaborators should
//! report for them, and a list of bulk requests to authorize:
//!
//! ```toml
//! user_id = "6f1c..."                 # optional, generated when absent
//! flags = ["flexible-collections-v-1"]
//! provider_orgs = []
//!
//! [[memberships]]
//! org_id = "0b2e..."
//! role = "user"
//!
//! [[abilities]]
//! org_id = "0b2e..."
//! limit_collection_creation_deletion = false
//!
//! [[collection_access]]
//! collection_id = "9d41..."
//! org_id = "0b2e..."
//! manage = true
//!
//! [[requests]]
//! operation = "update"
//! collections = [{ id = "9d41...", org_id = "0b2e..." }]
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use bulwark_authz_core::{
	BulkCollectionOperation, Collection, CollectionAccessDetails, MembershipContext, OrgId,
	OrganizationAbility, UserId,
};
use bulwark_server_authz::memory::{
	InMemoryCollectionAccess, InMemoryOrganizationAbilities, InMemoryProviderDirectory,
	StaticFeatureFlags, StaticMemberships,
};
use bulwark_server_authz::{AuthorizationOutcome, AuthorizationSession, AuthzOptions, AuthzServices};
use bulwark_server_config::AuthzServerConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
	#[serde(default = "UserId::generate")]
	pub user_id: UserId,
	/// Flags enabled on top of those from configuration.
	#[serde(default)]
	pub flags: Vec<String>,
	#[serde(default)]
	pub memberships: Vec<MembershipContext>,
	#[serde(default)]
	pub abilities: Vec<OrganizationAbility>,
	#[serde(default)]
	pub collection_access: Vec<CollectionAccessDetails>,
	/// Organizations the user is a verified provider for.
	#[serde(default)]
	pub provider_orgs: Vec<OrgId>,
	#[serde(default)]
	pub requests: Vec<ScenarioRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioRequest {
	pub operation: BulkCollectionOperation,
	#[serde(default)]
	pub collections: Vec<Collection>,
}

/// Results of every request in a scenario, in order.
#[derive(Debug, Serialize)]
pub struct ScenarioReport {
	pub user_id: UserId,
	pub requests: Vec<RequestReport>,
}

#[derive(Debug, Serialize)]
pub struct RequestReport {
	pub authorized: bool,
	#[serde(flatten)]
	pub outcome: AuthorizationOutcome,
}

impl Scenario {
	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("failed to read scenario {}", path.display()))?;
		content
			.parse()
			.with_context(|| format!("failed to parse scenario {}", path.display()))
	}

	/// Builds in-memory collaborators holding this scenario's state.
	pub fn services(&self, config: &AuthzServerConfig) -> AuthzServices {
		let access = self
			.collection_access
			.iter()
			.fold(InMemoryCollectionAccess::new(), |access, details| {
				access.with_assignment(self.user_id, *details)
			});
		let providers = self
			.provider_orgs
			.iter()
			.fold(InMemoryProviderDirectory::new(), |dir, org_id| {
				dir.with_provider_user(self.user_id, *org_id)
			});
		let abilities = self
			.abilities
			.iter()
			.fold(InMemoryOrganizationAbilities::new(), |cache, ability| {
				cache.with_ability(*ability)
			});
		let flags: StaticFeatureFlags = config
			.flags
			.enabled
			.iter()
			.chain(&self.flags)
			.cloned()
			.collect();

		AuthzServices::new(
			Arc::new(self.memberships.iter().copied().collect::<StaticMemberships>()),
			Arc::new(abilities),
			Arc::new(access),
			Arc::new(flags),
			Arc::new(providers),
		)
		.with_options(AuthzOptions {
			include_extended_visibility: config.authz.include_extended_visibility,
		})
	}

	/// Runs every request through a single session.
	pub async fn run(&self, config: &AuthzServerConfig) -> anyhow::Result<ScenarioReport> {
		let services = self.services(config);
		let mut session = AuthorizationSession::new(self.user_id, &services);
		info!(user_id = %self.user_id, requests = self.requests.len(), "evaluating scenario");

		let mut requests = Vec::with_capacity(self.requests.len());
		for (index, request) in self.requests.iter().enumerate() {
			debug!(index, operation = %request.operation, "evaluating request");
			let outcome = session
				.authorize(request.operation, &request.collections)
				.await
				.with_context(|| format!("request {index} ({}) failed", request.operation))?;
			requests.push(RequestReport {
				authorized: outcome.is_authorized(),
				outcome,
			});
		}

		Ok(ScenarioReport {
			user_id: self.user_id,
			requests,
		})
	}
}

impl std::str::FromStr for Scenario {
	type Err = toml::de::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		toml::from_str(s)
	}
}
