// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Build information shared by the debugmate crates.
//!
//! Everything here is resolved at compile time: the crate version, the
//! `rustc` that built it and the `{os}-{arch}` target string. The reporter
//! uses it for its User-Agent and for the runtime group of the environment
//! section.

shadow_rs::shadow!(build);

/// Target platform in `{os}-{arch}` form, e.g. "linux-x86_64".
pub const PLATFORM: &str = env!("DEBUGMATE_PLATFORM");

/// Build information for the running binary.
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
	pub version: &'static str,
	pub rustc: &'static str,
	pub build_timestamp: &'static str,
	pub platform: &'static str,
}

impl BuildInfo {
	pub const fn current() -> Self {
		Self {
			version: build::PKG_VERSION,
			rustc: build::RUST_VERSION,
			build_timestamp: build::BUILD_TIME,
			platform: PLATFORM,
		}
	}

	/// The bare compiler version, e.g. "1.82.0" out of
	/// "rustc 1.82.0 (f6e511eec 2024-10-15)".
	pub fn rustc_version(&self) -> &'static str {
		parse_rustc_version(self.rustc)
	}
}

fn parse_rustc_version(raw: &'static str) -> &'static str {
	let mut parts = raw.split_whitespace();
	match (parts.next(), parts.next()) {
		(Some("rustc"), Some(version)) => version,
		_ => raw.trim(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn build_info_has_version() {
		assert!(!BuildInfo::current().version.is_empty());
	}

	#[test]
	fn platform_has_os_and_arch() {
		assert!(PLATFORM.contains('-'));
	}

	#[test]
	fn rustc_version_strips_prefix_and_commit() {
		assert_eq!(
			parse_rustc_version("rustc 1.82.0 (f6e511eec 2024-10-15)"),
			"1.82.0"
		);
	}

	#[test]
	fn rustc_version_passes_through_unknown_shapes() {
		assert_eq!(parse_rustc_version("1.82.0"), "1.82.0");
		assert_eq!(parse_rustc_version(""), "");
	}
}
