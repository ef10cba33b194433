// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the reporter.

use debugmate_common_config::SecretEnvError;
use thiserror::Error;

/// Result type alias for reporter operations.
pub type Result<T> = std::result::Result<T, ReporterError>;

/// Errors raised inside the reporting pipeline.
///
/// `publish` never returns these; they end up in logs and in
/// [`DeliveryOutcome::Failed`](crate::DeliveryOutcome::Failed).
#[derive(Debug, Error)]
pub enum ReporterError {
	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// The collector answered with a non-success status.
	#[error("server error (status {status}): {message}")]
	ServerError {
		/// HTTP status code.
		status: u16,
		/// Response body, if any.
		message: String,
	},

	/// Failed to serialize the payload.
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// Failed to load configuration from the environment.
	#[error("configuration error: {0}")]
	Config(#[from] SecretEnvError),

	/// No async runtime available and one could not be started.
	#[error("no async runtime available: {0}")]
	Runtime(#[from] std::io::Error),

	/// The call needs an ambient tokio runtime and none is running.
	#[error("no tokio runtime is running")]
	NoRuntime,
}

impl ReporterError {
	/// The HTTP status, when the collector answered at all.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::ServerError { status, .. } => Some(*status),
			Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
			_ => None,
		}
	}
}
