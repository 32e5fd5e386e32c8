// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request-scoped aggregation of collection handlers.
//!
//! A resource is authorized when any handler succeeds for it; a bulk request
//! is authorized when it names at least one resource and every resource is
//! authorized.
//!
//! ```text
//! authorize(op, [c1, c2])
//!     c1 → member ✓                         → succeeded (member)
//!     c2 → member ∅ → provider ✓            → succeeded (provider)
//!                                           ⇒ authorized
//! ```

use bulwark_authz_core::{BulkCollectionOperation, Collection, CollectionId, Decision, UserId};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::collaborators::AuthzServices;
use crate::error::Result;
use crate::policies::{
	CollectionAuthorizationHandler, MemberCollectionPolicy, ProviderCollectionPolicy,
};

/// Every handler consulted for one acting user within one request.
///
/// Handlers keep per-session state (the member policy's managed collection
/// cache), so a session must not outlive the request it was created for.
pub struct AuthorizationSession {
	user_id: UserId,
	handlers: Vec<Box<dyn CollectionAuthorizationHandler>>,
}

impl AuthorizationSession {
	/// Creates a session with the member and provider policies.
	pub fn new(user_id: UserId, services: &AuthzServices) -> Self {
		Self::with_handlers(
			user_id,
			vec![
				Box::new(MemberCollectionPolicy::new(user_id, services)),
				Box::new(ProviderCollectionPolicy::new(user_id, services)),
			],
		)
	}

	/// Creates a session with an explicit handler list, consulted in order.
	pub fn with_handlers(
		user_id: UserId,
		handlers: Vec<Box<dyn CollectionAuthorizationHandler>>,
	) -> Self {
		Self { user_id, handlers }
	}

	/// Evaluates one resource, stopping at the first handler that succeeds.
	#[instrument(
		level = "debug",
		skip(self, resource),
		fields(user_id = %self.user_id, operation = %operation)
	)]
	pub async fn authorize_one(
		&mut self,
		operation: BulkCollectionOperation,
		resource: Option<&Collection>,
	) -> Result<Decision> {
		Ok(self.first_success(operation, resource).await?.decision)
	}

	/// Evaluates every resource of a bulk request.
	///
	/// Every resource is evaluated even after one fails so the outcome can
	/// report all of them. A collaborator fault aborts the whole request.
	#[instrument(
		level = "debug",
		skip(self, resources),
		fields(user_id = %self.user_id, operation = %operation, count = resources.len())
	)]
	pub async fn authorize(
		&mut self,
		operation: BulkCollectionOperation,
		resources: &[Collection],
	) -> Result<AuthorizationOutcome> {
		let mut decisions = Vec::with_capacity(resources.len());
		for resource in resources {
			decisions.push(self.first_success(operation, Some(resource)).await?);
		}

		let outcome = AuthorizationOutcome {
			operation,
			decisions,
		};
		info!(
			authorized = outcome.is_authorized(),
			denied = outcome.denied().count(),
			"bulk collection authorization evaluated"
		);
		Ok(outcome)
	}

	async fn first_success(
		&mut self,
		operation: BulkCollectionOperation,
		resource: Option<&Collection>,
	) -> Result<CollectionDecision> {
		let collection_id = resource.map(|c| c.id);
		for handler in &mut self.handlers {
			if handler.evaluate(operation, resource).await?.is_succeeded() {
				debug!(handler = handler.name(), collection_id = ?collection_id, "handler succeeded");
				return Ok(CollectionDecision {
					collection_id,
					decision: Decision::Succeeded,
					handler: Some(handler.name()),
				});
			}
		}

		debug!(collection_id = ?collection_id, "no handler succeeded");
		Ok(CollectionDecision {
			collection_id,
			decision: Decision::NoDecision,
			handler: None,
		})
	}
}

/// The decision reached for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionDecision {
	pub collection_id: Option<CollectionId>,
	pub decision: Decision,
	/// Name of the handler that succeeded, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub handler: Option<&'static str>,
}

/// Per-resource decisions for a bulk request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationOutcome {
	pub operation: BulkCollectionOperation,
	pub decisions: Vec<CollectionDecision>,
}

impl AuthorizationOutcome {
	/// True when the request named at least one resource and all succeeded.
	pub fn is_authorized(&self) -> bool {
		!self.decisions.is_empty() && self.decisions.iter().all(|d| d.decision.is_succeeded())
	}

	/// Resources no handler succeeded for.
	pub fn denied(&self) -> impl Iterator<Item = &CollectionDecision> {
		self.decisions
			.iter()
			.filter(|d| !d.decision.is_succeeded())
	}
}
