// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Code previews around a faulting line.
//!
//! | input | preview |
//! |---|---|
//! | no file, or a runtime pseudo-path | `{1: INTERNAL_FILE_PREVIEW}` |
//! | file and line | lines `line-5 ..= line+5` clipped to the file |
//! | file, read fails | `{1: "(Unable to read file \"<file>\" - <reason>)"}` |
//! | file, no line | `{1: NO_LOCATION_PREVIEW}` |

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use debugmate_core::CodePreview;
use tracing::debug;

use crate::filter::is_internal_path;

/// Lines shown on each side of the faulting line.
pub const PREVIEW_CONTEXT_LINES: usize = 5;

pub const INTERNAL_FILE_PREVIEW: &str = "(Internal runtime file - no preview available)";

pub const NO_LOCATION_PREVIEW: &str = "(No file or line information available)";

/// Reads source files for previews.
pub trait SourceReader: Send + Sync {
	fn read_source(&self, path: &Path) -> io::Result<String>;
}

/// Reads from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSourceReader;

impl SourceReader for FsSourceReader {
	fn read_source(&self, path: &Path) -> io::Result<String> {
		std::fs::read_to_string(path)
	}
}

/// Source files held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct InMemorySources {
	files: HashMap<PathBuf, String>,
}

impl InMemorySources {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
		self.files.insert(path.into(), content.into());
	}
}

impl SourceReader for InMemorySources {
	fn read_source(&self, path: &Path) -> io::Result<String> {
		self.files
			.get(path)
			.cloned()
			.ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
	}
}

impl<R: SourceReader + ?Sized> SourceReader for std::sync::Arc<R> {
	fn read_source(&self, path: &Path) -> io::Result<String> {
		(**self).read_source(path)
	}
}

/// Builds [`CodePreview`]s from a [`SourceReader`].
#[derive(Debug, Clone, Default)]
pub struct SourcePreviewReader<R> {
	reader: R,
}

impl<R: SourceReader> SourcePreviewReader<R> {
	pub fn new(reader: R) -> Self {
		Self { reader }
	}

	/// Never fails: unreadable or unknown locations yield a one-line
	/// placeholder preview.
	pub fn preview(&self, file: Option<&str>, line: Option<u32>) -> CodePreview {
		let file = match file {
			Some(file) if !is_internal_path(file) => file,
			_ => return placeholder(INTERNAL_FILE_PREVIEW),
		};

		let Some(line) = line else {
			return placeholder(NO_LOCATION_PREVIEW);
		};

		match self.reader.read_source(Path::new(file)) {
			Ok(content) => extract_window(&content, line as usize, PREVIEW_CONTEXT_LINES),
			Err(e) => {
				debug!(file = %file, error = %e, "source preview unavailable");
				placeholder(&format!("(Unable to read file \"{file}\" - {e})"))
			}
		}
	}
}

/// Lines `line - context ..= line + context` (1-based) clipped to the
/// content, keyed by their 1-based line number. A window entirely past the
/// end of the content is empty.
pub fn extract_window(content: &str, line: usize, context: usize) -> CodePreview {
	let lines: Vec<&str> = content.lines().collect();
	let index = line.saturating_sub(1);
	let start = index.saturating_sub(context);
	let end = index.saturating_add(context).min(lines.len().saturating_sub(1));

	if lines.is_empty() || start > end {
		return CodePreview::new();
	}

	(start..=end)
		.map(|i| (i as u32 + 1, lines[i].to_string()))
		.collect()
}

fn placeholder(text: &str) -> CodePreview {
	CodePreview::from([(1, text.to_string())])
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	fn numbered(count: usize) -> String {
		(1..=count)
			.map(|i| format!("line {i}"))
			.collect::<Vec<_>>()
			.join("\n")
	}

	fn reader_with(path: &str, content: &str) -> SourcePreviewReader<InMemorySources> {
		let mut sources = InMemorySources::new();
		sources.add(path, content);
		SourcePreviewReader::new(sources)
	}

	#[test]
	fn window_in_the_middle() {
		let preview = extract_window(&numbered(30), 15, 5);
		assert_eq!(preview.keys().copied().collect::<Vec<_>>(), (10..=20).collect::<Vec<_>>());
		assert_eq!(preview[&15], "line 15");
	}

	#[test]
	fn window_clipped_at_start() {
		let preview = extract_window(&numbered(30), 2, 5);
		assert_eq!(preview.keys().copied().collect::<Vec<_>>(), (1..=7).collect::<Vec<_>>());
	}

	#[test]
	fn window_clipped_at_end() {
		let preview = extract_window(&numbered(12), 11, 5);
		assert_eq!(preview.keys().copied().collect::<Vec<_>>(), (6..=12).collect::<Vec<_>>());
	}

	#[test]
	fn window_past_end_is_empty() {
		assert!(extract_window(&numbered(3), 40, 5).is_empty());
		assert!(extract_window("", 1, 5).is_empty());
	}

	#[test]
	fn preview_reads_from_source() {
		let reader = reader_with("/app/a.js", &numbered(20));
		let preview = reader.preview(Some("/app/a.js"), Some(10));
		assert_eq!(preview.len(), 11);
		assert_eq!(preview[&5], "line 5");
		assert_eq!(preview[&15], "line 15");
	}

	#[test]
	fn preview_without_file_or_internal_file() {
		let reader = reader_with("/app/a.js", "x");
		assert_eq!(reader.preview(None, Some(1))[&1], INTERNAL_FILE_PREVIEW);
		assert_eq!(
			reader.preview(Some("node:internal/timers"), Some(1))[&1],
			INTERNAL_FILE_PREVIEW
		);
	}

	#[test]
	fn preview_without_line() {
		let reader = reader_with("/app/a.js", "x");
		let preview = reader.preview(Some("/app/a.js"), None);
		assert_eq!(preview, placeholder(NO_LOCATION_PREVIEW));
	}

	#[test]
	fn preview_of_unreadable_file() {
		let reader = SourcePreviewReader::new(InMemorySources::new());
		let preview = reader.preview(Some("/app/missing.js"), Some(3));

		assert_eq!(preview.len(), 1);
		assert!(preview[&1].starts_with("(Unable to read file \"/app/missing.js\" - "));
		assert!(preview[&1].ends_with(')'));
	}

	#[test]
	fn preview_from_disk() {
		let mut file = NamedTempFile::new().unwrap();
		write!(file, "{}", numbered(8)).unwrap();
		let path = file.path().to_string_lossy().into_owned();

		let preview = SourcePreviewReader::new(FsSourceReader).preview(Some(&path), Some(1));
		assert_eq!(preview.keys().copied().collect::<Vec<_>>(), (1..=6).collect::<Vec<_>>());
		assert_eq!(preview[&1], "line 1");
	}
}
