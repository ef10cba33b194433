// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: report an error to a Debugmate collector.
//!
//! Run with:
//!   DEBUGMATE_DOMAIN=https://debugmate.example.com DEBUGMATE_TOKEN=... \
//!   cargo run --example capture -p debugmate

use debugmate::{EnvironmentInfo, Overrides, RawError, Reporter, RequestInfo};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let reporter = Reporter::from_env()?;

	println!("Initializing reporter...");
	println!("  Domain: {:?}", reporter.config().domain);
	println!("  Enabled: {}", reporter.config().enabled);

	reporter.install_panic_hook();

	reporter.set_user(serde_json::json!({
		"id": 123,
		"name": "Example User",
		"email": "example@example.com"
	}))?;
	reporter.set_environment(EnvironmentInfo {
		environment: Some("development".to_string()),
		debug: Some(true),
		..Default::default()
	});

	let error = RawError::new("QueryError", "relation \"users\" does not exist")
		.with_stack(debugmate::capture_stack_text(
			"QueryError: relation \"users\" does not exist",
		))
		.with_sql("select * from users where id = 3");

	let overrides = Overrides::default().request(RequestInfo {
		url: Some("/users/3?expand=orders".to_string()),
		method: Some("GET".to_string()),
		..Default::default()
	});

	match reporter.publish(Some(error), overrides) {
		Some(delivery) => println!("Outcome: {:?}", delivery.outcome().await),
		None => println!("Not published; set DEBUGMATE_DOMAIN and DEBUGMATE_TOKEN"),
	}

	let io_error = std::fs::read_to_string("/nonexistent/config.toml").unwrap_err();
	if let Some(delivery) = reporter.capture_error(&io_error) {
		println!("io error outcome: {:?}", delivery.outcome().await);
	}

	Ok(())
}
