// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The raw error handed to the reporter and the frames derived from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An exception as produced by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawError {
	/// Exception class, e.g. "TypeError" or "panic".
	pub name: String,
	pub message: String,
	/// Free-text stack trace, one frame per line.
	#[serde(default)]
	pub stack_text: String,
	/// The SQL statement that failed, when the error came from a database
	/// driver. Shown to the collector in place of the request query.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sql_text: Option<String>,
}

impl RawError {
	pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			message: message.into(),
			stack_text: String::new(),
			sql_text: None,
		}
	}

	pub fn with_stack(mut self, stack_text: impl Into<String>) -> Self {
		self.stack_text = stack_text.into();
		self
	}

	pub fn with_sql(mut self, sql_text: impl Into<String>) -> Self {
		self.sql_text = Some(sql_text.into());
		self
	}
}

/// One call site parsed out of a stack trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFrame {
	/// Display name, or "anonymous".
	pub function: String,
	/// Absolute path, resolved against the project root.
	pub file: String,
	/// 1-based.
	pub line: Option<u32>,
	/// 1-based.
	pub column: Option<u32>,
}

/// 1-based line number to line text, or a single placeholder entry at `1`.
pub type CodePreview = BTreeMap<u32, String>;

/// A frame as emitted to the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
	pub file: String,
	pub line: Option<u32>,
	pub column: Option<u32>,
	pub function: String,
	/// Same as `file`; the collector groups frames by it.
	pub class: String,
	pub preview: CodePreview,
}

impl TraceEntry {
	pub fn new(frame: SourceFrame, preview: CodePreview) -> Self {
		Self {
			class: frame.file.clone(),
			file: frame.file,
			line: frame.line,
			column: frame.column,
			function: frame.function,
			preview,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn trace_entry_copies_file_into_class() {
		let frame = SourceFrame {
			function: "foo".to_string(),
			file: "/app/a.js".to_string(),
			line: Some(10),
			column: Some(5),
		};
		let entry = TraceEntry::new(frame, CodePreview::new());

		assert_eq!(entry.class, "/app/a.js");
		assert_eq!(entry.file, "/app/a.js");
		assert_eq!(entry.line, Some(10));
	}

	#[test]
	fn preview_keys_serialize_as_strings() {
		let mut preview = CodePreview::new();
		preview.insert(1, "let a = 1;".to_string());
		let json = serde_json::to_value(&preview).unwrap();
		assert_eq!(json, serde_json::json!({"1": "let a = 1;"}));
	}

	#[test]
	fn raw_error_builders() {
		let err = RawError::new("QueryError", "syntax error")
			.with_stack("QueryError: syntax error")
			.with_sql("select * from users where id = 3");

		assert_eq!(err.name, "QueryError");
		assert_eq!(err.stack_text, "QueryError: syntax error");
		assert_eq!(err.sql_text.as_deref(), Some("select * from users where id = 3"));
	}
}
