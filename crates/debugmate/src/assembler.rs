// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Turns an error and its context into the collector payload.

use std::path::PathBuf;
use std::sync::Arc;

use debugmate_core::{Context, Payload, RawError, TraceEntry, PAYLOAD_TYPE, UNKNOWN_FILE};
use debugmate_trace::{parse, FrameFilter, FsSourceReader, SourcePreviewReader, SourceReader};

/// Parses, filters and previews the trace, then merges in the context.
#[derive(Clone)]
pub struct PayloadAssembler {
	project_root: PathBuf,
	filter: FrameFilter,
	previews: SourcePreviewReader<Arc<dyn SourceReader>>,
}

impl PayloadAssembler {
	/// Reads previews from disk and uses the default frame filter.
	pub fn new(project_root: impl Into<PathBuf>) -> Self {
		let sources: Arc<dyn SourceReader> = Arc::new(FsSourceReader);
		Self {
			project_root: project_root.into(),
			filter: FrameFilter::default(),
			previews: SourcePreviewReader::new(sources),
		}
	}

	pub fn with_filter(mut self, filter: FrameFilter) -> Self {
		self.filter = filter;
		self
	}

	pub fn with_sources(mut self, sources: Arc<dyn SourceReader>) -> Self {
		self.previews = SourcePreviewReader::new(sources);
		self
	}

	/// Frames of `error` that survive the filter, each with its preview.
	pub fn trace(&self, error: &RawError) -> Vec<TraceEntry> {
		let parsed = parse(&error.stack_text, &self.project_root);

		self.filter
			.retain(parsed.sources)
			.into_iter()
			.map(|frame| {
				let preview = self.previews.preview(Some(frame.file.as_str()), frame.line);
				TraceEntry::new(frame, preview)
			})
			.collect()
	}

	/// The full payload for `error`. The request query comes from the error
	/// stored in `context`, so callers set it there first.
	pub fn payload(&self, error: &RawError, context: &Context) -> Payload {
		let trace = self.trace(error);
		let file = trace
			.first()
			.map(|entry| entry.file.clone())
			.unwrap_or_else(|| UNKNOWN_FILE.to_string());

		Payload {
			exception: error.name.clone(),
			message: error.message.clone(),
			file,
			kind: PAYLOAD_TYPE.to_string(),
			trace,
			context: context.render(),
		}
	}
}
