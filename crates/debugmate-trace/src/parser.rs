// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack trace text to structured frames.
//!
//! Frame lines follow a small grammar, tried in order:
//!
//! ```text
//! at <function> (<file>:<line>:<column>)
//! at <function> <file>:<line>:<column>
//! ```
//!
//! The function may be absent in both forms, in which case it is reported as
//! "anonymous". Lines matching neither form (the message line, `Caused by:`
//! lines, blank lines) contribute no frame.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use debugmate_core::SourceFrame;
use regex::{Captures, Regex};

use crate::filter::is_internal_path;

static PAREN_FRAME: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"at\s+(?:(.*)\s+)?\((.*):(\d+):(\d+)\)").expect("valid frame pattern")
});

static BARE_FRAME: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"at\s+(?:(.*)\s+)?(\S+):(\d+):(\d+)").expect("valid frame pattern")
});

/// Function name used when a frame has none.
pub const ANONYMOUS: &str = "anonymous";

/// Result of [`parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedStack {
	/// Frames in trace order, outermost call as emitted by the runtime.
	pub sources: Vec<SourceFrame>,
	/// The deduplicated trace text.
	pub stack: String,
}

/// Parse a stack trace, resolving relative frame paths against
/// `project_root`. Never fails; unparseable input yields no frames.
pub fn parse(stack_text: &str, project_root: impl AsRef<Path>) -> ParsedStack {
	let project_root = project_root.as_ref();
	let lines = distinct_lines(stack_text);

	let sources = lines
		.iter()
		.filter_map(|line| parse_frame_line(line, project_root))
		.collect();

	ParsedStack {
		sources,
		stack: lines.join("\n"),
	}
}

/// Non-empty lines, each distinct line kept at its first occurrence.
fn distinct_lines(stack_text: &str) -> Vec<&str> {
	let mut seen = HashSet::new();
	stack_text
		.split('\n')
		.map(|line| line.strip_suffix('\r').unwrap_or(line))
		.filter(|line| !line.is_empty())
		.filter(|line| seen.insert(*line))
		.collect()
}

fn parse_frame_line(line: &str, project_root: &Path) -> Option<SourceFrame> {
	[&*PAREN_FRAME, &*BARE_FRAME]
		.into_iter()
		.find_map(|pattern| pattern.captures(line).and_then(|caps| frame_from(&caps, project_root)))
}

fn frame_from(caps: &Captures<'_>, project_root: &Path) -> Option<SourceFrame> {
	let line: u32 = caps.get(3)?.as_str().parse().ok()?;
	let column: u32 = caps.get(4)?.as_str().parse().ok()?;

	let function = caps
		.get(1)
		.map(|m| m.as_str().trim())
		.filter(|name| !name.is_empty())
		.unwrap_or(ANONYMOUS)
		.to_string();

	Some(SourceFrame {
		function,
		file: resolve_path(project_root, caps.get(2)?.as_str()),
		line: (line > 0).then_some(line),
		column: (column > 0).then_some(column),
	})
}

/// Resolve a frame path to an absolute, lexically normalized path.
///
/// `file://` URLs are unwrapped. Runtime pseudo-paths such as
/// `node:internal/...` are returned untouched since they name no file.
pub fn resolve_path(project_root: &Path, file: &str) -> String {
	let file = file.trim();
	if file.is_empty() || is_internal_path(file) {
		return file.to_string();
	}

	let file = file.strip_prefix("file://").unwrap_or(file);
	let path = Path::new(file);
	let joined = if path.is_absolute() {
		path.to_path_buf()
	} else {
		project_root.join(path)
	};

	normalize(&joined).to_string_lossy().into_owned()
}

fn normalize(path: &Path) -> PathBuf {
	let mut out = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				out.pop();
			}
			other => out.push(other.as_os_str()),
		}
	}
	out
}
