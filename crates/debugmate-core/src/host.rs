// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Host introspection: platform identifier and runtime version.

use std::fmt;

/// What the reporter needs to know about the process it runs in.
///
/// Platform identifiers use the collector's vocabulary ("darwin", "win32",
/// "linux", "android", ...), not Rust's `std::env::consts::OS` names.
pub trait HostInfo: Send + Sync + fmt::Debug {
	fn platform_id(&self) -> String;

	fn runtime_version(&self) -> Option<String>;
}

/// Display name for a platform identifier. Unknown identifiers map to
/// "Unknown".
pub fn os_name(platform_id: &str) -> &'static str {
	match platform_id {
		"darwin" => "MacOS",
		"win32" => "Windows",
		"linux" => "Linux",
		"android" => "Android",
		_ => "Unknown",
	}
}

/// The current process.
#[derive(Debug, Clone, Default)]
pub struct ProcessHost {
	runtime_version: Option<String>,
}

impl ProcessHost {
	pub fn new(runtime_version: Option<String>) -> Self {
		Self { runtime_version }
	}
}

impl HostInfo for ProcessHost {
	fn platform_id(&self) -> String {
		match std::env::consts::OS {
			"macos" => "darwin".to_string(),
			"windows" => "win32".to_string(),
			other => other.to_string(),
		}
	}

	fn runtime_version(&self) -> Option<String> {
		self.runtime_version.clone()
	}
}

/// Fixed answers, for tests and for hosts that report on behalf of another
/// process.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
	pub platform: String,
	pub version: Option<String>,
}

impl StaticHost {
	pub fn new(platform: impl Into<String>, version: Option<&str>) -> Self {
		Self {
			platform: platform.into(),
			version: version.map(str::to_string),
		}
	}
}

impl HostInfo for StaticHost {
	fn platform_id(&self) -> String {
		self.platform.clone()
	}

	fn runtime_version(&self) -> Option<String> {
		self.version.clone()
	}
}
