// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rendering Rust backtraces as stack text.
//!
//! Frames are written as `    at <function> (<file>:<line>:<column>)` so the
//! same parser handles host-runtime traces and Rust ones. Symbols without a
//! source location are skipped.

use std::error::Error;
use std::fmt::Write;

use backtrace::Backtrace;
use debugmate_core::RawError;

/// Capture the current backtrace and render it below `header`.
pub fn capture_stack_text(header: &str) -> String {
	render_backtrace(header, &Backtrace::new())
}

/// Render `backtrace` below a `header` line such as `"Error: boom"`.
pub fn render_backtrace(header: &str, backtrace: &Backtrace) -> String {
	let mut text = header.to_string();

	for frame in backtrace.frames() {
		for symbol in frame.symbols() {
			let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) else {
				continue;
			};
			let function = symbol
				.name()
				.map(|name| format!("{name:#}"))
				.unwrap_or_default();
			text.push('\n');
			text.push_str(&frame_line(
				&function,
				&file.to_string_lossy(),
				line,
				symbol.colno().unwrap_or(0),
			));
		}
	}

	text
}

/// One frame in the `at fn (file:line:col)` form.
pub fn frame_line(function: &str, file: &str, line: u32, column: u32) -> String {
	if function.is_empty() {
		format!("    at {file}:{line}:{column}")
	} else {
		format!("    at {function} ({file}:{line}:{column})")
	}
}

/// Build a [`RawError`] from any Rust error.
///
/// The name is the error's type name without its module path. The causes in
/// the `source()` chain follow the frames as `Caused by:` lines.
pub fn raw_error_from<E: Error + ?Sized>(error: &E) -> RawError {
	let name = short_type_name(std::any::type_name::<E>());
	let message = error.to_string();
	let mut stack_text = capture_stack_text(&format!("{name}: {message}"));

	let mut source = error.source();
	while let Some(cause) = source {
		let _ = write!(stack_text, "\nCaused by: {cause}");
		source = cause.source();
	}

	RawError::new(name, message).with_stack(stack_text)
}

/// `"std::io::error::Error"` to `"Error"`, `"my::Wrapper<u8>"` to `"Wrapper"`.
/// Trait objects become `"Error"`.
fn short_type_name(full: &str) -> String {
	if full.starts_with("dyn ") {
		return "Error".to_string();
	}
	let base = full.split('<').next().unwrap_or(full);
	base.rsplit("::").next().unwrap_or(base).to_string()
}
