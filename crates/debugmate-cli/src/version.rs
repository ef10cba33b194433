// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Build information for the `version` subcommand.

use debugmate_common_version::BuildInfo;

/// Format version info for display.
pub fn format_version_info() -> String {
	let info = BuildInfo::current();

	format!(
		"debugmate version: {}\n\
         Built with:        rustc {}\n\
         Built at:          {}\n\
         Platform:          {}\n\
         User-Agent:        debugmate-rust/{} ({})",
		info.version,
		info.rustc_version(),
		info.build_timestamp,
		info.platform,
		info.version,
		info.platform,
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn version_info_lists_platform() {
		let output = format_version_info();
		assert!(output.starts_with("debugmate version: "));
		assert!(output.contains(debugmate_common_version::PLATFORM));
	}
}
