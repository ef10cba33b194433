// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error reporting client for the Debugmate collector.
//!
//! This crate provides:
//! - Manual reporting of [`RawError`]s and Rust errors
//! - Automatic panic capture via a panic hook
//! - Reporting of failed background tasks
//! - A per-reporter scope of user, request and environment facts
//! - Code previews around each reported frame
//!
//! Reporting never fails the host application: refusals and transport
//! errors are logged with `tracing`, and each send can be observed through
//! its [`Delivery`] handle.
//!
//! # Example
//!
//! ```ignore
//! use debugmate::{Reporter, RawError};
//!
//! let reporter = Reporter::builder()
//!     .domain("https://debugmate.example.com")
//!     .token("your_token")
//!     .build()?;
//!
//! reporter.install_panic_hook();
//!
//! reporter.report(RawError::new("Error", "boom"));
//! ```

mod assembler;
mod backtrace;
mod client;
mod config;
mod delivery;
mod error;
mod panic_hook;
mod transport;

#[cfg(test)]
mod test_logs;

pub use assembler::PayloadAssembler;
pub use crate::backtrace::{capture_stack_text, frame_line, raw_error_from, render_backtrace};
pub use client::{Overrides, Reporter, ReporterBuilder, TEST_MESSAGE};
pub use config::{normalize_domain, ReporterConfig, CAPTURE_PATH};
pub use delivery::{Delivery, DeliveryOutcome};
pub use error::{ReporterError, Result};
pub use transport::{CaptureRequest, HttpTransport, Transport, TOKEN_HEADER};

// Re-export core types for convenience
pub use debugmate_core::{
	Context, CoreError, EnvironmentInfo, HostInfo, Payload, ProcessHost, RawError, RequestInfo,
	StaticHost, UserInfo,
};
pub use debugmate_trace::{FrameFilter, InMemorySources, SourceReader};
