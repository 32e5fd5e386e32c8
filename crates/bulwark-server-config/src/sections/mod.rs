// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod authz;
mod flags;
mod logging;

pub use authz::{AuthzConfig, AuthzConfigLayer};
pub use flags::{FlagsConfig, FlagsConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
