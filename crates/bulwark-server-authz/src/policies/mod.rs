// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Collection authorization handlers.
//!
//! Each handler is an independent voter: it either succeeds or reaches no
//! decision. [`AuthorizationSession`](crate::AuthorizationSession) combines
//! them.

pub mod member;
pub mod provider;

pub use member::MemberCollectionPolicy;
pub use provider::ProviderCollectionPolicy;

use async_trait::async_trait;
use bulwark_authz_core::{BulkCollectionOperation, Collection, Decision};

use crate::error::Result;

/// A voter on collection operations.
#[async_trait]
pub trait CollectionAuthorizationHandler: Send + Sync {
	/// Short name used in logs and outcomes.
	fn name(&self) -> &'static str;

	async fn evaluate(
		&mut self,
		operation: BulkCollectionOperation,
		resource: Option<&Collection>,
	) -> Result<Decision>;
}
