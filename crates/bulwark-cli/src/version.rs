// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Build information for the `bulwark` binary.

/// Format version info for display.
pub fn format_version_info() -> String {
	format!(
		"bulwark version: {}\n\
         Platform:        {}-{}",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::ARCH,
		std::env::consts::OS,
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn version_info_names_the_package_version() {
		assert!(format_version_info().contains(env!("CARGO_PKG_VERSION")));
	}
}
