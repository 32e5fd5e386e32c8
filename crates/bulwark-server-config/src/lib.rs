// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for the Bulwark authorization engines.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`BULWARK_AUTHZ_*`)
//!
//! # Usage
//!
//! ```ignore
//! use bulwark_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("extended visibility: {}", config.authz.include_extended_visibility);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, ENV_PREFIX};

use tracing::{debug, info};

/// Fully resolved authorization configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthzServerConfig {
	pub flags: FlagsConfig,
	pub authz: AuthzConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`BULWARK_AUTHZ_*`)
/// 2. Config file (`/etc/bulwark/authz.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<AuthzServerConfig, ConfigError> {
	load_config_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource::new()),
	])
}

/// Load configuration from environment variables only.
pub fn load_config_from_env() -> Result<AuthzServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource::new().load()?);
	finalize(merged)
}

/// Load configuration with a custom config file path.
///
/// Unlike the system file, an explicitly named file must exist.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<AuthzServerConfig, ConfigError> {
	load_config_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::required(config_path)),
		Box::new(EnvSource::new()),
	])
}

/// Merge the given sources in precedence order, then finalize.
pub fn load_config_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<AuthzServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

fn finalize(layer: ServerConfigLayer) -> Result<AuthzServerConfig, ConfigError> {
	let config = AuthzServerConfig {
		flags: layer.flags.unwrap_or_default().finalize(),
		authz: layer.authz.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	info!(
		flags_enabled = config.flags.enabled.len(),
		include_extended_visibility = config.authz.include_extended_visibility,
		log_level = %config.logging.level,
		"Authorization configuration loaded"
	);

	Ok(config)
}

fn validate_config(config: &AuthzServerConfig) -> Result<(), ConfigError> {
	if config.flags.enabled.iter().any(|flag| flag.is_empty()) {
		return Err(ConfigError::Validation(
			"flags.enabled contains an empty flag name".to_string(),
		));
	}

	if config.logging.level.trim().is_empty() {
		return Err(ConfigError::Validation(
			"logging.level must not be empty".to_string(),
		));
	}

	Ok(())
}
