// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Panic hook integration for automatic error reporting.

use std::any::Any;
use std::panic::PanicHookInfo;
use std::sync::atomic::{AtomicBool, Ordering};

use backtrace::Backtrace;
use debugmate_core::RawError;

use crate::backtrace::render_backtrace;
use crate::client::{Overrides, Reporter};
use crate::delivery::DeliveryOutcome;

/// Set while a panic is being reported, so a panic inside the reporting
/// path is not reported again.
static REPORTING: AtomicBool = AtomicBool::new(false);

/// Install a panic hook that reports to the collector and then calls the
/// previously installed hook.
pub fn install_panic_hook(reporter: Reporter) {
	let previous = std::panic::take_hook();

	std::panic::set_hook(Box::new(move |info| {
		if !REPORTING.swap(true, Ordering::SeqCst) {
			report_panic(&reporter, info);
			REPORTING.store(false, Ordering::SeqCst);
		}
		previous(info);
	}));
}

fn report_panic(reporter: &Reporter, info: &PanicHookInfo<'_>) {
	let message = panic_message(info.payload());
	let location = info
		.location()
		.map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
	let error = panic_error(message, location.as_deref(), &Backtrace::new());

	// We're panicking; a background send may never complete.
	if let Some(DeliveryOutcome::Failed { reason, .. }) =
		reporter.publish_blocking(Some(error), Overrides::default())
	{
		eprintln!("Failed to report panic to Debugmate: {reason}");
	}
}

fn panic_error(message: String, location: Option<&str>, backtrace: &Backtrace) -> RawError {
	let header = match location {
		Some(location) => format!("panic: {message} at {location}"),
		None => format!("panic: {message}"),
	};
	RawError::new("panic", message).with_stack(render_backtrace(&header, backtrace))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		s.to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"Box<dyn Any>".to_string()
	}
}
