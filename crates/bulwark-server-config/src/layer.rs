// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration as produced by a single source.

use serde::{Deserialize, Serialize};

use crate::sections::{AuthzConfigLayer, FlagsConfigLayer, LoggingConfigLayer};

/// One source's view of the configuration; unset sections are `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerConfigLayer {
	pub authz: Option<AuthzConfigLayer>,
	pub flags: Option<FlagsConfigLayer>,
	pub logging: Option<LoggingConfigLayer>,
}

fn merge_section<T>(target: &mut Option<T>, other: Option<T>, merge: impl FnOnce(&mut T, T)) {
	if let Some(incoming) = other {
		match target {
			Some(existing) => merge(existing, incoming),
			None => *target = Some(incoming),
		}
	}
}

impl ServerConfigLayer {
	/// Overlays `other` on top of `self`; values set in `other` win.
	pub fn merge(&mut self, other: Self) {
		merge_section(&mut self.authz, other.authz, AuthzConfigLayer::merge);
		merge_section(&mut self.flags, other.flags, FlagsConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}
