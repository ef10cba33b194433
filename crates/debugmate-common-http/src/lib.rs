// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client construction for debugmate.
//!
//! All outbound requests identify themselves with the same User-Agent so the
//! collector can tell SDK versions apart.

use debugmate_common_version::BuildInfo;
use reqwest::{Client, ClientBuilder};

/// Creates a client builder preloaded with the debugmate User-Agent.
///
/// # Example
/// ```ignore
/// let client = debugmate_common_http::builder()
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Format: `debugmate-rust/{version} ({platform})`.
pub fn user_agent() -> String {
	let info = BuildInfo::current();
	format!("debugmate-rust/{} ({})", info.version, info.platform)
}
