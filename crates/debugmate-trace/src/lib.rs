// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack trace parsing and source preview extraction.
//!
//! This crate provides:
//! - [`parse`]: free-text stack trace to ordered [`SourceFrame`]s
//! - [`FrameFilter`]: drops frames from dependencies, runtime internals and
//!   the reporter itself
//! - [`SourcePreviewReader`]: a few lines of code around each frame
//!
//! # Example
//!
//! ```
//! use debugmate_trace::{parse, FrameFilter, InMemorySources, SourcePreviewReader};
//!
//! let stack = "Error: boom\n    at handler (/app/src/routes.js:3:9)\n    at Layer.handle (/app/node_modules/express/lib/router/layer.js:95:5)";
//! let parsed = parse(stack, "/app");
//! let frames = FrameFilter::default().retain(parsed.sources);
//! assert_eq!(frames.len(), 1);
//!
//! let mut sources = InMemorySources::new();
//! sources.add("/app/src/routes.js", "const a = 1;\nconst b = 2;\nthrow new Error('boom');\n");
//! let reader = SourcePreviewReader::new(sources);
//! let preview = reader.preview(Some(frames[0].file.as_str()), frames[0].line);
//! assert_eq!(preview[&3], "throw new Error('boom');");
//! ```
//!
//! [`SourceFrame`]: debugmate_core::SourceFrame

pub mod filter;
pub mod parser;
pub mod preview;

pub use filter::{is_internal_path, FrameFilter, DEFAULT_EXCLUDED_PATHS};
pub use parser::{parse, resolve_path, ParsedStack};
pub use preview::{
	extract_window, FsSourceReader, InMemorySources, SourcePreviewReader, SourceReader,
	INTERNAL_FILE_PREVIEW, NO_LOCATION_PREVIEW, PREVIEW_CONTEXT_LINES,
};
