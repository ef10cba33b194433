// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The reporter: gating, scope handling and dispatch.

use std::error::Error;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use debugmate_common_config::SecretString;
use debugmate_common_version::BuildInfo;
use debugmate_core::{
	Context, EnvironmentInfo, HostInfo, ProcessHost, RawError, RequestInfo, UserInfo,
};
use debugmate_trace::{FrameFilter, SourceReader};
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::assembler::PayloadAssembler;
use crate::backtrace::{capture_stack_text, raw_error_from};
use crate::config::{normalize_domain, ReporterConfig};
use crate::delivery::{dispatch, dispatch_blocking, Delivery, DeliveryOutcome};
use crate::error::{ReporterError, Result};
use crate::panic_hook;
use crate::transport::{CaptureRequest, HttpTransport, Transport};

/// Message of the error sent by the connectivity self-test.
pub const TEST_MESSAGE: &str = "Test generated by the Debugmate test command";

/// Frames from this crate's own sources are never reported.
const OWN_SOURCES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src/");

/// Per-call replacements for the reporter's scope.
///
/// Each set field replaces the scope's slot for one publish only.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
	pub user: Option<UserInfo>,
	pub environment: Option<EnvironmentInfo>,
	pub request: Option<RequestInfo>,
}

impl Overrides {
	pub fn user(mut self, user: UserInfo) -> Self {
		self.user = Some(user);
		self
	}

	pub fn environment(mut self, environment: EnvironmentInfo) -> Self {
		self.environment = Some(environment);
		self
	}

	pub fn request(mut self, request: RequestInfo) -> Self {
		self.request = Some(request);
		self
	}
}

/// Builder for constructing a [`Reporter`].
pub struct ReporterBuilder {
	config: ReporterConfig,
	host: Option<Arc<dyn HostInfo>>,
	transport: Option<Arc<dyn Transport>>,
	sources: Option<Arc<dyn SourceReader>>,
	filter: FrameFilter,
}

impl ReporterBuilder {
	/// Creates a builder with default settings and nothing configured.
	pub fn new() -> Self {
		Self::with_config(ReporterConfig::default())
	}

	/// Creates a builder seeded from `DEBUGMATE_*` environment variables.
	/// Values set on the builder afterwards win.
	pub fn from_env() -> Result<Self> {
		Ok(Self::with_config(ReporterConfig::from_env()?))
	}

	pub fn with_config(config: ReporterConfig) -> Self {
		Self {
			config,
			host: None,
			transport: None,
			sources: None,
			filter: FrameFilter::default().exclude(OWN_SOURCES),
		}
	}

	/// Sets the collector base URL, e.g. `https://debugmate.example.com`.
	pub fn domain(mut self, domain: impl Into<String>) -> Self {
		self.config.domain = Some(domain.into());
		self
	}

	pub fn token(mut self, token: impl Into<String>) -> Self {
		self.config.token = Some(SecretString::new(token.into()));
		self
	}

	pub fn enabled(mut self, enabled: bool) -> Self {
		self.config.enabled = enabled;
		self
	}

	pub fn project_root(mut self, root: impl Into<PathBuf>) -> Self {
		self.config.project_root = root.into();
		self
	}

	/// Sets the HTTP request timeout.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = timeout;
		self
	}

	/// Drop frames whose path contains `fragment`, in addition to the
	/// defaults.
	pub fn exclude_path(mut self, fragment: impl Into<String>) -> Self {
		self.filter = self.filter.exclude(fragment);
		self
	}

	/// Replaces the host introspection used for the environment section.
	pub fn host(mut self, host: Arc<dyn HostInfo>) -> Self {
		self.host = Some(host);
		self
	}

	/// Replaces the HTTP transport.
	pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	/// Replaces the filesystem as the source of code previews.
	pub fn sources(mut self, sources: Arc<dyn SourceReader>) -> Self {
		self.sources = Some(sources);
		self
	}

	/// Builds the reporter. A missing domain or token is not an error here;
	/// such a reporter refuses to publish.
	pub fn build(self) -> Result<Reporter> {
		let mut config = self.config;
		config.domain = config.domain.as_deref().and_then(normalize_domain);

		let transport = match self.transport {
			Some(transport) => transport,
			None => Arc::new(HttpTransport::new(config.request_timeout)?),
		};

		let host = self.host.unwrap_or_else(|| {
			let version = BuildInfo::current().rustc_version().to_string();
			Arc::new(ProcessHost::new(Some(version)))
		});

		let mut assembler =
			PayloadAssembler::new(config.project_root.clone()).with_filter(self.filter);
		if let Some(sources) = self.sources {
			assembler = assembler.with_sources(sources);
		}

		info!(
			domain = config.domain.as_deref().unwrap_or("<unset>"),
			enabled = config.enabled,
			"Debugmate reporter initialized"
		);

		Ok(Reporter {
			inner: Arc::new(ReporterInner {
				config,
				transport,
				assembler,
				scope: RwLock::new(Context::new(host)),
			}),
		})
	}
}

impl Default for ReporterBuilder {
	fn default() -> Self {
		Self::new()
	}
}

struct ReporterInner {
	config: ReporterConfig,
	transport: Arc<dyn Transport>,
	assembler: PayloadAssembler,
	scope: RwLock<Context>,
}

/// Reports errors to the Debugmate collector.
///
/// Cheap to clone; clones share configuration and scope. The scope holds the
/// user, request and environment attached to every report. `publish` works
/// on a snapshot of it, so per-call overrides never leak into other reports.
///
/// # Example
///
/// ```ignore
/// use debugmate::{Overrides, RawError, Reporter};
///
/// let reporter = Reporter::builder()
///     .domain("https://debugmate.example.com")
///     .token("token")
///     .build()?;
///
/// reporter.install_panic_hook();
/// reporter.set_user(serde_json::json!({"id": 7, "name": "Ada"}))?;
///
/// if let Err(e) = do_something() {
///     reporter.capture_error(&e);
/// }
/// ```
#[derive(Clone)]
pub struct Reporter {
	inner: Arc<ReporterInner>,
}

impl fmt::Debug for Reporter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Reporter")
			.field("config", &self.inner.config)
			.finish_non_exhaustive()
	}
}

impl Reporter {
	pub fn builder() -> ReporterBuilder {
		ReporterBuilder::new()
	}

	/// A reporter configured purely from the environment.
	pub fn from_env() -> Result<Self> {
		ReporterBuilder::from_env()?.build()
	}

	pub fn config(&self) -> &ReporterConfig {
		&self.inner.config
	}

	/// Validate and store the user for subsequent reports.
	///
	/// `user` is serialized before the scope is locked, so its `Serialize`
	/// impl may itself report or panic.
	pub fn set_user<U: Serialize>(&self, user: U) -> debugmate_core::Result<()> {
		let user = UserInfo::from_serializable(user)?;
		self.inner
			.scope
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.set_valid_user(user);
		Ok(())
	}

	pub fn set_request(&self, request: RequestInfo) {
		self.inner
			.scope
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.set_request(request);
	}

	pub fn set_environment(&self, environment: EnvironmentInfo) {
		self.inner
			.scope
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.set_environment(environment);
	}

	/// A copy of the current scope.
	pub fn scope(&self) -> Context {
		self.inner
			.scope
			.read()
			.unwrap_or_else(PoisonError::into_inner)
			.clone()
	}

	/// Report `error` without waiting for the collector.
	///
	/// Returns `None` when publishing is refused (no error, disabled, or no
	/// domain or token); the refusal is logged and nothing is sent. Never
	/// fails: transport errors are logged and surface only through the
	/// returned [`Delivery`].
	pub fn publish(&self, error: Option<RawError>, overrides: Overrides) -> Option<Delivery> {
		let (request, self_test) = self.prepare(error, overrides)?;
		Some(dispatch(self.inner.transport.clone(), request, self_test))
	}

	/// Like [`publish`](Self::publish) but waits for the send to finish.
	/// Usable where no runtime can drive a background send, such as a panic
	/// hook.
	pub fn publish_blocking(
		&self,
		error: Option<RawError>,
		overrides: Overrides,
	) -> Option<DeliveryOutcome> {
		let (request, self_test) = self.prepare(error, overrides)?;
		Some(dispatch_blocking(self.inner.transport.clone(), request, self_test))
	}

	/// Shorthand for publishing `error` with no overrides.
	pub fn report(&self, error: RawError) -> Option<Delivery> {
		self.publish(Some(error), Overrides::default())
	}

	/// Report a Rust error, with its backtrace and cause chain.
	pub fn capture_error<E: Error + ?Sized>(&self, error: &E) -> Option<Delivery> {
		self.report(raw_error_from(error))
	}

	/// Send the self-test error. The outcome is logged at `info` or `error`.
	pub fn send_test(&self) -> Option<Delivery> {
		let header = format!("Error: {TEST_MESSAGE}");
		self.report(RawError::new("Error", TEST_MESSAGE).with_stack(capture_stack_text(&header)))
	}

	/// Spawn `future` on the current runtime, reporting it if it resolves to
	/// `Err`. The result is passed through unchanged.
	///
	/// Fails with [`ReporterError::NoRuntime`] when called outside a tokio
	/// runtime; `future` is dropped unpolled.
	pub fn spawn_monitored<F, T, E>(
		&self,
		future: F,
	) -> Result<JoinHandle<std::result::Result<T, E>>>
	where
		F: Future<Output = std::result::Result<T, E>> + Send + 'static,
		T: Send + 'static,
		E: fmt::Display + Send + 'static,
	{
		let handle = Handle::try_current().map_err(|e| {
			warn!(error = %e, "Monitored task not spawned: no tokio runtime");
			ReporterError::NoRuntime
		})?;

		let reporter = self.clone();
		Ok(handle.spawn(async move {
			let result = future.await;
			if let Err(reason) = &result {
				reporter.report(unhandled_rejection(reason));
			}
			result
		}))
	}

	/// Report panics before handing them to the previously installed hook.
	pub fn install_panic_hook(&self) {
		panic_hook::install_panic_hook(self.clone());
		info!("Panic hook installed");
	}

	fn prepare(
		&self,
		error: Option<RawError>,
		overrides: Overrides,
	) -> Option<(CaptureRequest, bool)> {
		let config = &self.inner.config;
		let refusal = match &error {
			None => Some("no error supplied"),
			Some(_) => config.refusal(),
		};
		if let Some(reason) = refusal {
			warn!(
				reason,
				"Error not published to Debugmate. Check configuration or the error."
			);
			return None;
		}
		let error = error?;
		let url = config.capture_url()?;
		let token = config.token.clone()?;

		let mut context = self.scope();
		if let Some(user) = overrides.user {
			context.set_valid_user(user);
		}
		if let Some(environment) = overrides.environment {
			context.set_environment(environment);
		}
		if let Some(request) = overrides.request {
			context.set_request(request);
		}
		context.set_error(error.clone());

		let self_test = error.message == TEST_MESSAGE;
		let payload = self.inner.assembler.payload(&error, &context);

		Some((CaptureRequest { url, token, payload }, self_test))
	}
}

fn unhandled_rejection(reason: &dyn fmt::Display) -> RawError {
	let message = format!("Unhandled rejection: \"{reason}\"");
	let stack_text = capture_stack_text(&format!("Error: {message}"));
	RawError::new("Error", message).with_stack(stack_text)
}
