// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Collection authorization engines for Bulwark.
//!
//! This crate decides whether an acting user may perform a bulk collection
//! operation. It provides:
//!
//! - [`MemberCollectionPolicy`]: rules for organization members, combining
//!   role, permission flags, organization settings and per-collection manage
//!   rights
//! - [`ProviderCollectionPolicy`]: blanket access for verified provider users
//! - [`AuthorizationSession`]: runs both per resource and aggregates a bulk
//!   outcome
//! - [`collaborators`]: the traits through which membership, settings, manage
//!   rights, feature flags and provider links are resolved
//! - [`memory`]: in-memory implementations of those traits
//!
//! # Evaluation Flow
//!
//! ```text
//! authorize(op, collections)
//!     │
//!     ├── MemberCollectionPolicy
//!     │       membership? ── no ──→ no decision
//!     │       role / permission flags ──→ succeed
//!     │       organization ability gate ──→ succeed
//!     │       manage relation (fetched once per session) ──→ succeed
//!     │
//!     └── ProviderCollectionPolicy
//!             provider for org? ──→ succeed
//! ```
//!
//! Handlers never deny; a resource nobody succeeds for is denied by the
//! session.

pub mod collaborators;
pub mod error;
pub mod memory;
pub mod policies;
pub mod session;

pub use collaborators::{
	flags, AuthzOptions, AuthzServices, FeatureFlagSource, ManagedCollectionResolver,
	MembershipContextProvider, OrganizationAbilityCache, ProviderVerifier,
};
pub use error::{AuthzError, BoxError, Result};
pub use policies::{CollectionAuthorizationHandler, MemberCollectionPolicy, ProviderCollectionPolicy};
pub use session::{AuthorizationOutcome, AuthorizationSession, CollectionDecision};
