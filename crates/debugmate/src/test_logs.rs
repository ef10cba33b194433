// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Captures formatted `tracing` output for assertions.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
pub(crate) struct CapturedLogs {
	output: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
	/// Route events on this thread into the buffer until the guard drops.
	pub(crate) fn install(&self) -> DefaultGuard {
		let subscriber = tracing_subscriber::fmt()
			.with_writer(self.clone())
			.with_ansi(false)
			.with_max_level(tracing::Level::DEBUG)
			.finish();
		tracing::subscriber::set_default(subscriber)
	}

	pub(crate) fn contents(&self) -> String {
		String::from_utf8_lossy(&self.output.lock().unwrap()).into_owned()
	}
}

impl<'a> MakeWriter<'a> for CapturedLogs {
	type Writer = CapturedWriter;

	fn make_writer(&'a self) -> Self::Writer {
		CapturedWriter {
			output: self.output.clone(),
		}
	}
}

pub(crate) struct CapturedWriter {
	output: Arc<Mutex<Vec<u8>>>,
}

impl Write for CapturedWriter {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.output.lock().unwrap().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}
