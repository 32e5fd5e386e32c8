// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Bulwark authorization command-line driver.

use std::path::PathBuf;
use std::process::ExitCode;

use bulwark_server_config::AuthzServerConfig;
use clap::{Parser, Subcommand};

mod grants;
mod logging;
mod scenario;
mod version;

/// Bulwark - evaluate collection authorization and validate access grants.
#[derive(Parser, Debug)]
#[command(name = "bulwark", about = "Bulwark authorization tools", version)]
struct Args {
	/// Path to a TOML config file; it must exist (defaults to /etc/bulwark/authz.toml if present)
	#[arg(long, global = true, env = "BULWARK_AUTHZ_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Run the requests in a scenario file and print their outcomes as JSON
	Evaluate {
		/// Scenario TOML file
		scenario: PathBuf,
	},
	/// Validate a JSON batch of access policy grants
	CheckGrants {
		/// JSON array of access policies
		batch: PathBuf,
	},
	/// Show version and build information
	Version,
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<AuthzServerConfig> {
	let config = match path {
		Some(path) => bulwark_server_config::load_config_with_file(path)?,
		None => bulwark_server_config::load_config()?,
	};
	Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
	let args = Args::parse();

	if let Command::Version = args.command {
		println!("{}", version::format_version_info());
		return Ok(ExitCode::SUCCESS);
	}

	let config = load_config(args.config)?;
	logging::init(&config.logging);

	match args.command {
		Command::Evaluate { scenario } => {
			let scenario = scenario::Scenario::load(&scenario)?;
			let report = scenario.run(&config).await?;
			println!("{}", serde_json::to_string_pretty(&report)?);
			Ok(ExitCode::SUCCESS)
		}
		Command::CheckGrants { batch } => {
			let policies = grants::load_batch(&batch)?;
			match grants::check(&policies) {
				Ok(()) => {
					println!("ok");
					Ok(ExitCode::SUCCESS)
				}
				Err(e) => {
					eprintln!("error: {e}");
					Ok(ExitCode::FAILURE)
				}
			}
		}
		Command::Version => Ok(ExitCode::SUCCESS),
	}
}
