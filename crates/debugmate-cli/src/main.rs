// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `debugmate` command line tool.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use debugmate::{DeliveryOutcome, FrameFilter, PayloadAssembler, RawError, ReporterBuilder};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod version;

/// Debugmate - error reporting for your applications.
#[derive(Parser, Debug)]
#[command(name = "debugmate", about = "Debugmate error reporting tools", version)]
struct Args {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Send a test error to check the domain and token
	Test {
		/// Collector URL; overrides DEBUGMATE_DOMAIN
		#[arg(long)]
		domain: Option<String>,

		/// Collector token; overrides DEBUGMATE_TOKEN
		#[arg(long)]
		token: Option<String>,
	},

	/// Parse a saved stack trace and print the trace entries as JSON
	Trace {
		/// File holding the stack trace text
		file: PathBuf,

		/// Directory relative frame paths are resolved against
		#[arg(long, env = "DEBUGMATE_PROJECT_ROOT")]
		project_root: Option<PathBuf>,

		/// Keep frames from dependency directories
		#[arg(long)]
		keep_dependencies: bool,
	},

	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| "info".into()),
		)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	match args.command {
		Command::Test { domain, token } => run_test(domain, token).await,
		Command::Trace {
			file,
			project_root,
			keep_dependencies,
		} => {
			let root = match project_root {
				Some(root) => root,
				None => std::env::current_dir().context("resolving current directory")?,
			};
			println!("{}", trace_json(&file, &root, keep_dependencies)?);
			Ok(())
		}
		Command::Version => {
			println!("{}", version::format_version_info());
			Ok(())
		}
	}
}

async fn run_test(domain: Option<String>, token: Option<String>) -> anyhow::Result<()> {
	let mut builder = ReporterBuilder::from_env().context("loading DEBUGMATE_* configuration")?;
	if let Some(domain) = domain {
		builder = builder.domain(domain);
	}
	if let Some(token) = token {
		builder = builder.token(token);
	}
	let reporter = builder.build()?;

	let Some(delivery) = reporter.send_test() else {
		bail!("test error not sent: set DEBUGMATE_DOMAIN and DEBUGMATE_TOKEN (or pass --domain and --token)");
	};

	match delivery.outcome().await {
		DeliveryOutcome::Delivered { status } => {
			println!("Test error delivered to Debugmate (HTTP {status}).");
			Ok(())
		}
		DeliveryOutcome::Failed { status, reason } => {
			let status = status.map(|s| format!(" (HTTP {s})")).unwrap_or_default();
			bail!("test error was not accepted{status}: {reason}")
		}
	}
}

fn trace_json(file: &Path, project_root: &Path, keep_dependencies: bool) -> anyhow::Result<String> {
	let stack_text = std::fs::read_to_string(file)
		.with_context(|| format!("reading stack trace from {}", file.display()))?;

	let mut assembler = PayloadAssembler::new(project_root);
	if keep_dependencies {
		assembler = assembler.with_filter(FrameFilter::empty());
	}
	let trace = assembler.trace(&RawError::new("Error", "").with_stack(stack_text));

	tracing::debug!(frames = trace.len(), file = %file.display(), "parsed stack trace");
	Ok(serde_json::to_string_pretty(&trace)?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;
	use std::io::Write;

	#[test]
	fn cli_definition_is_valid() {
		Args::command().debug_assert();
	}

	#[test]
	fn parses_trace_command() {
		let args = Args::try_parse_from([
			"debugmate",
			"trace",
			"stack.txt",
			"--project-root",
			"/app",
			"--keep-dependencies",
		])
		.unwrap();

		match args.command {
			Command::Trace {
				file,
				project_root,
				keep_dependencies,
			} => {
				assert_eq!(file, PathBuf::from("stack.txt"));
				assert_eq!(project_root, Some(PathBuf::from("/app")));
				assert!(keep_dependencies);
			}
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn parses_test_command_flags() {
		let args = Args::try_parse_from([
			"debugmate",
			"test",
			"--domain",
			"collector.test",
			"--token",
			"abc",
		])
		.unwrap();

		assert!(matches!(
			args.command,
			Command::Test { domain: Some(ref d), token: Some(ref t) } if d == "collector.test" && t == "abc"
		));
	}

	#[test]
	fn trace_json_lists_project_frames() {
		let dir = tempfile::tempdir().unwrap();
		let source = dir.path().join("app.js");
		std::fs::write(&source, "function run() {\n  throw new Error('boom');\n}\n").unwrap();

		let stack_path = dir.path().join("stack.txt");
		let mut stack = std::fs::File::create(&stack_path).unwrap();
		write!(
			stack,
			"Error: boom\n    at run (app.js:2:9)\n    at Module._compile (node:internal/modules/cjs/loader:1105:14)\n    at Object.<anonymous> ({}/node_modules/lib/index.js:1:1)\n",
			dir.path().display()
		)
		.unwrap();

		let json: serde_json::Value =
			serde_json::from_str(&trace_json(&stack_path, dir.path(), false).unwrap()).unwrap();
		let entries = json.as_array().unwrap();

		assert_eq!(entries.len(), 1);
		assert_eq!(entries[0]["function"], "run");
		assert_eq!(entries[0]["file"], source.to_str().unwrap());
		assert_eq!(entries[0]["preview"]["2"], "  throw new Error('boom');");

		let all: serde_json::Value =
			serde_json::from_str(&trace_json(&stack_path, dir.path(), true).unwrap()).unwrap();
		assert_eq!(all.as_array().unwrap().len(), 2);
	}

	#[test]
	fn trace_json_reports_missing_file() {
		let err = trace_json(Path::new("/nonexistent/stack.txt"), Path::new("/"), false).unwrap_err();
		assert!(err.to_string().contains("reading stack trace"));
	}
}
