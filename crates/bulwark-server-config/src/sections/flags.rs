// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Static feature flag configuration section.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlagsConfigLayer {
	pub enabled: Option<Vec<String>>,
}

impl FlagsConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
	}

	pub fn finalize(self) -> FlagsConfig {
		let mut enabled: Vec<String> = self
			.enabled
			.unwrap_or_default()
			.into_iter()
			.map(|flag| flag.trim().to_string())
			.collect();
		enabled.sort();
		enabled.dedup();
		FlagsConfig { enabled }
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlagsConfig {
	/// Feature flags that are turned on; anything absent is off.
	pub enabled: Vec<String>,
}

impl FlagsConfig {
	pub fn is_enabled(&self, flag: &str) -> bool {
		self.enabled.iter().any(|f| f == flag)
	}
}
