// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fire-and-forget sends and the handle for observing them.

use std::future::Future;
use std::sync::Arc;
use std::thread;

use tokio::runtime::{Builder, Handle};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::transport::{CaptureRequest, Transport};

/// How a send ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
	Delivered {
		status: u16,
	},
	Failed {
		/// Set when the collector answered with a non-success status.
		status: Option<u16>,
		reason: String,
	},
}

impl DeliveryOutcome {
	pub fn is_delivered(&self) -> bool {
		matches!(self, Self::Delivered { .. })
	}
}

/// Handle to an in-flight send. Dropping it does not cancel the send.
#[derive(Debug)]
pub struct Delivery {
	receiver: oneshot::Receiver<DeliveryOutcome>,
}

impl Delivery {
	/// Wait for the send to finish.
	pub async fn outcome(self) -> DeliveryOutcome {
		self.receiver
			.await
			.unwrap_or_else(|_| DeliveryOutcome::Failed {
				status: None,
				reason: "delivery task ended without an outcome".to_string(),
			})
	}
}

/// Spawn the send of `request` and return a handle to it.
///
/// Runs on the current tokio runtime when there is one, otherwise on a
/// background thread with its own runtime.
pub(crate) fn dispatch(
	transport: Arc<dyn Transport>,
	request: CaptureRequest,
	self_test: bool,
) -> Delivery {
	let (sender, receiver) = oneshot::channel();
	let task = async move {
		let outcome = deliver(transport.as_ref(), &request, self_test).await;
		let _ = sender.send(outcome);
	};

	match Handle::try_current() {
		Ok(handle) => {
			handle.spawn(task);
		}
		Err(_) => {
			if let Err(e) = spawn_on_thread(task) {
				error!(error = %e, "Failed to start delivery thread");
			}
		}
	}

	Delivery { receiver }
}

/// Send `request` and block until it finishes. Safe to call from inside a
/// runtime and from a panic hook.
pub(crate) fn dispatch_blocking(
	transport: Arc<dyn Transport>,
	request: CaptureRequest,
	self_test: bool,
) -> DeliveryOutcome {
	let (sender, receiver) = std::sync::mpsc::channel();
	let task = async move {
		let outcome = deliver(transport.as_ref(), &request, self_test).await;
		let _ = sender.send(outcome);
	};

	let joined = spawn_on_thread(task).map(|handle| handle.join());
	match (joined, receiver.try_recv()) {
		(_, Ok(outcome)) => outcome,
		(Err(e), _) => DeliveryOutcome::Failed {
			status: None,
			reason: e.to_string(),
		},
		(Ok(_), Err(_)) => DeliveryOutcome::Failed {
			status: None,
			reason: "delivery thread ended without an outcome".to_string(),
		},
	}
}

fn spawn_on_thread<F>(task: F) -> Result<thread::JoinHandle<()>>
where
	F: Future<Output = ()> + Send + 'static,
{
	let runtime = Builder::new_current_thread().enable_all().build()?;
	let handle = thread::Builder::new()
		.name("debugmate-delivery".to_string())
		.spawn(move || runtime.block_on(task))?;
	Ok(handle)
}

async fn deliver(
	transport: &dyn Transport,
	request: &CaptureRequest,
	self_test: bool,
) -> DeliveryOutcome {
	let outcome = match transport.send(request).await {
		Ok(status) => {
			debug!(status, url = %request.url, "Error report delivered");
			DeliveryOutcome::Delivered { status }
		}
		Err(e) => {
			error!(error = %e, url = %request.url, "Debugmate error: failed to deliver report");
			DeliveryOutcome::Failed {
				status: e.status(),
				reason: e.to_string(),
			}
		}
	};

	if self_test {
		report_self_test(&outcome);
	}

	outcome
}

fn report_self_test(outcome: &DeliveryOutcome) {
	match outcome {
		DeliveryOutcome::Delivered { status } => {
			info!(status, "Debugmate test succeeded: the collector accepted the test error");
		}
		DeliveryOutcome::Failed { status, reason } => {
			error!(
				status = ?status,
				reason = %reason,
				"Debugmate test failed: check the domain and token"
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ReporterError;
	use crate::test_logs::CapturedLogs;
	use async_trait::async_trait;
	use debugmate_common_config::SecretString;
	use debugmate_core::{ContextFragment, Payload, RequestSection};
	use std::sync::atomic::{AtomicUsize, Ordering};

	struct FixedTransport {
		status: u16,
		calls: AtomicUsize,
	}

	impl FixedTransport {
		fn new(status: u16) -> Arc<Self> {
			Arc::new(Self {
				status,
				calls: AtomicUsize::new(0),
			})
		}
	}

	#[async_trait]
	impl Transport for FixedTransport {
		async fn send(&self, _request: &CaptureRequest) -> Result<u16> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			if self.status < 300 {
				Ok(self.status)
			} else {
				Err(ReporterError::ServerError {
					status: self.status,
					message: String::new(),
				})
			}
		}
	}

	fn request() -> CaptureRequest {
		CaptureRequest {
			url: "http://collector/api/capture".to_string(),
			token: SecretString::from("t"),
			payload: Payload {
				exception: "Error".to_string(),
				message: "boom".to_string(),
				file: "unknown".to_string(),
				kind: "web".to_string(),
				trace: Vec::new(),
				context: ContextFragment {
					user: None,
					request: RequestSection::default(),
					environment: Vec::new(),
				},
			},
		}
	}

	#[tokio::test]
	async fn dispatch_on_current_runtime() {
		let transport = FixedTransport::new(200);
		let delivery = dispatch(transport.clone(), request(), false);

		assert_eq!(delivery.outcome().await, DeliveryOutcome::Delivered { status: 200 });
		assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn dispatch_without_runtime_uses_thread() {
		let transport = FixedTransport::new(500);
		let delivery = dispatch(transport.clone(), request(), true);

		let runtime = Builder::new_current_thread().build().unwrap();
		let outcome = runtime.block_on(delivery.outcome());

		assert_eq!(
			outcome,
			DeliveryOutcome::Failed {
				status: Some(500),
				reason: "server error (status 500): ".to_string(),
			}
		);
	}

	#[tokio::test]
	async fn dispatch_blocking_inside_runtime() {
		let transport = FixedTransport::new(202);
		let outcome = dispatch_blocking(transport.clone(), request(), false);

		assert!(outcome.is_delivered());
		assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn self_test_success_is_logged() {
		let logs = CapturedLogs::default();
		let _guard = logs.install();

		dispatch(FixedTransport::new(200), request(), true).outcome().await;

		let output = logs.contents();
		assert!(output.contains("INFO"));
		assert!(output.contains("Debugmate test succeeded"));
		assert!(output.contains("status=200"));
	}

	#[tokio::test]
	async fn self_test_failure_is_logged() {
		let logs = CapturedLogs::default();
		let _guard = logs.install();

		dispatch(FixedTransport::new(401), request(), true).outcome().await;

		let output = logs.contents();
		assert!(output.contains("ERROR"));
		assert!(output.contains("Debugmate test failed: check the domain and token"));
		assert!(output.contains("status=Some(401)"));
		assert!(!output.contains("Debugmate test succeeded"));
	}

	#[tokio::test]
	async fn ordinary_sends_do_not_log_self_test_lines() {
		let logs = CapturedLogs::default();
		let _guard = logs.install();

		dispatch(FixedTransport::new(200), request(), false).outcome().await;
		dispatch(FixedTransport::new(500), request(), false).outcome().await;

		let output = logs.contents();
		assert!(!output.contains("Debugmate test"));
		assert!(output.contains("Debugmate error: failed to deliver report"));
	}
}
