// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Which frames are worth showing.

use debugmate_core::SourceFrame;

/// Path fragments of third-party code. Matched anywhere in the frame path,
/// with `\` normalized to `/`.
pub const DEFAULT_EXCLUDED_PATHS: &[&str] = &[
	"/node_modules/",
	"/.cargo/registry/",
	"/.cargo/git/",
	"/.rustup/toolchains/",
];

/// Path prefixes that name runtime internals rather than files on disk.
const INTERNAL_PREFIXES: &[&str] = &["node:", "internal/", "/rustc/", "<anonymous>"];

/// True for runtime pseudo-paths (`node:internal/...`, `/rustc/<hash>/...`,
/// `<anonymous>`, `native`) and for frames with no path at all.
pub fn is_internal_path(file: &str) -> bool {
	let file = file.trim();
	file.is_empty()
		|| file == "native"
		|| INTERNAL_PREFIXES
			.iter()
			.any(|prefix| file.starts_with(prefix))
}

/// Drops frames that belong to dependencies, runtime internals or the
/// reporter itself before previews are generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFilter {
	excluded: Vec<String>,
}

impl Default for FrameFilter {
	fn default() -> Self {
		Self {
			excluded: DEFAULT_EXCLUDED_PATHS.iter().map(|p| p.to_string()).collect(),
		}
	}
}

impl FrameFilter {
	/// A filter that only drops runtime internals.
	pub fn empty() -> Self {
		Self {
			excluded: Vec::new(),
		}
	}

	/// Also drop frames whose path contains `fragment`.
	pub fn exclude(mut self, fragment: impl Into<String>) -> Self {
		let fragment = fragment.into().replace('\\', "/");
		if !fragment.is_empty() && !self.excluded.contains(&fragment) {
			self.excluded.push(fragment);
		}
		self
	}

	pub fn is_excluded(&self, file: &str) -> bool {
		if is_internal_path(file) {
			return true;
		}
		let file = file.replace('\\', "/");
		self.excluded
			.iter()
			.any(|fragment| file.contains(fragment.as_str()))
	}

	/// Keep the frames worth previewing, in their original order.
	pub fn retain(&self, frames: Vec<SourceFrame>) -> Vec<SourceFrame> {
		frames
			.into_iter()
			.filter(|frame| !self.is_excluded(&frame.file))
			.collect()
	}
}
