// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outbound delivery of payloads to the collector.

use std::time::Duration;

use async_trait::async_trait;
use debugmate_common_config::SecretString;
use debugmate_core::Payload;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;

use crate::error::{ReporterError, Result};

/// Header carrying the collector token.
pub const TOKEN_HEADER: &str = "X-DEBUGMATE-TOKEN";

const JSON: &str = "application/json";

/// One payload addressed to one collector.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
	/// Full capture endpoint, `{domain}/api/capture`.
	pub url: String,
	pub token: SecretString,
	pub payload: Payload,
}

/// Sends capture requests.
///
/// Implementations return the HTTP status on success and
/// [`ReporterError::ServerError`] for non-success statuses.
#[async_trait]
pub trait Transport: Send + Sync {
	async fn send(&self, request: &CaptureRequest) -> Result<u16>;
}

/// Transport over reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: Client,
}

impl HttpTransport {
	pub fn new(request_timeout: Duration) -> Result<Self> {
		// Sends may run on short-lived runtimes, so connections are not pooled.
		let client = debugmate_common_http::builder()
			.timeout(request_timeout)
			.pool_max_idle_per_host(0)
			.build()?;
		Ok(Self { client })
	}
}

#[async_trait]
impl Transport for HttpTransport {
	async fn send(&self, request: &CaptureRequest) -> Result<u16> {
		let body = serde_json::to_vec(&request.payload)?;

		debug!(url = %request.url, bytes = body.len(), "Sending error report");

		let response = self
			.client
			.post(&request.url)
			.header(TOKEN_HEADER, request.token.expose().as_str())
			.header(CONTENT_TYPE, JSON)
			.header(ACCEPT, JSON)
			.body(body)
			.send()
			.await?;

		let status = response.status().as_u16();
		if !response.status().is_success() {
			let message = response.text().await.unwrap_or_default();
			return Err(ReporterError::ServerError { status, message });
		}

		Ok(status)
	}
}
