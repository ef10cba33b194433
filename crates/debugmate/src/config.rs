// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reporter configuration.
//!
//! | variable | meaning |
//! |---|---|
//! | `DEBUGMATE_DOMAIN` | collector base URL; `https://` is assumed without a scheme |
//! | `DEBUGMATE_TOKEN` / `DEBUGMATE_TOKEN_FILE` | auth token, the file wins |
//! | `DEBUGMATE_ENABLED` | `false`, `0`, `no` or `off` disable reporting |
//! | `DEBUGMATE_PROJECT_ROOT` | base for relative frame paths, default current dir |

use std::path::PathBuf;
use std::time::Duration;

use debugmate_common_config::{env_flag, env_string, load_secret_env, SecretString};

use crate::error::Result;

pub const DOMAIN_ENV: &str = "DEBUGMATE_DOMAIN";
pub const TOKEN_ENV: &str = "DEBUGMATE_TOKEN";
pub const ENABLED_ENV: &str = "DEBUGMATE_ENABLED";
pub const PROJECT_ROOT_ENV: &str = "DEBUGMATE_PROJECT_ROOT";

/// Path of the capture endpoint below the domain.
pub const CAPTURE_PATH: &str = "/api/capture";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a [`Reporter`](crate::Reporter).
#[derive(Debug, Clone)]
pub struct ReporterConfig {
	/// Collector base URL, normalized by [`normalize_domain`].
	pub domain: Option<String>,
	pub token: Option<SecretString>,
	pub enabled: bool,
	/// Relative frame paths are resolved against this directory.
	pub project_root: PathBuf,
	/// Timeout for HTTP requests.
	pub request_timeout: Duration,
}

impl Default for ReporterConfig {
	fn default() -> Self {
		Self {
			domain: None,
			token: None,
			enabled: true,
			project_root: current_dir(),
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
		}
	}
}

impl ReporterConfig {
	/// Load from `DEBUGMATE_*` variables. Unset variables keep their
	/// defaults; only an unreadable `DEBUGMATE_TOKEN_FILE` is an error.
	pub fn from_env() -> Result<Self> {
		let token = load_secret_env(TOKEN_ENV)?.filter(|token| !token.is_empty());

		Ok(Self {
			domain: env_string(DOMAIN_ENV).and_then(|d| normalize_domain(&d)),
			token,
			enabled: env_flag(ENABLED_ENV, true),
			project_root: env_string(PROJECT_ROOT_ENV)
				.map(PathBuf::from)
				.unwrap_or_else(current_dir),
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
		})
	}

	/// Why publishing is refused, or `None` when it is allowed.
	pub fn refusal(&self) -> Option<&'static str> {
		if !self.enabled {
			Some("reporting disabled")
		} else if self.domain.is_none() {
			Some("no domain configured")
		} else if self.token.as_ref().map_or(true, |t| t.is_empty()) {
			Some("no token configured")
		} else {
			None
		}
	}

	/// `{domain}/api/capture`, when a domain is configured.
	pub fn capture_url(&self) -> Option<String> {
		self.domain
			.as_deref()
			.map(|domain| format!("{domain}{CAPTURE_PATH}"))
	}
}

/// Trim whitespace and trailing slashes and default the scheme to
/// `https://`. Blank input yields `None`.
pub fn normalize_domain(raw: &str) -> Option<String> {
	let domain = raw.trim().trim_end_matches('/');
	if domain.is_empty() {
		return None;
	}

	if domain.starts_with("http://") || domain.starts_with("https://") {
		Some(domain.to_string())
	} else {
		Some(format!("https://{domain}"))
	}
}

fn current_dir() -> PathBuf {
	std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use std::io::Write;
	use std::sync::Mutex;

	static ENV_LOCK: Mutex<()> = Mutex::new(());

	fn clear_env() {
		for var in [DOMAIN_ENV, TOKEN_ENV, ENABLED_ENV, PROJECT_ROOT_ENV] {
			std::env::remove_var(var);
		}
		std::env::remove_var(format!("{TOKEN_ENV}_FILE"));
	}

	#[test]
	fn normalize_domain_adds_scheme_and_trims() {
		assert_eq!(
			normalize_domain("debugmate.example.com/"),
			Some("https://debugmate.example.com".to_string())
		);
		assert_eq!(
			normalize_domain(" http://localhost:8000// "),
			Some("http://localhost:8000".to_string())
		);
		assert_eq!(normalize_domain("   "), None);
		assert_eq!(normalize_domain("/"), None);
	}

	#[test]
	fn refusal_reasons() {
		let mut config = ReporterConfig::default();
		assert_eq!(config.refusal(), Some("no domain configured"));

		config.domain = Some("https://collector".to_string());
		assert_eq!(config.refusal(), Some("no token configured"));

		config.token = Some(SecretString::from(""));
		assert_eq!(config.refusal(), Some("no token configured"));

		config.token = Some(SecretString::from("abc"));
		assert_eq!(config.refusal(), None);

		config.enabled = false;
		assert_eq!(config.refusal(), Some("reporting disabled"));
	}

	#[test]
	fn capture_url_appends_path() {
		let config = ReporterConfig {
			domain: Some("https://collector".to_string()),
			..Default::default()
		};
		assert_eq!(
			config.capture_url().as_deref(),
			Some("https://collector/api/capture")
		);
		assert_eq!(ReporterConfig::default().capture_url(), None);
	}

	#[test]
	fn from_env_reads_variables() {
		let _guard = ENV_LOCK.lock().unwrap();
		clear_env();
		std::env::set_var(DOMAIN_ENV, "collector.example.com");
		std::env::set_var(TOKEN_ENV, "secret-token");
		std::env::set_var(ENABLED_ENV, "off");
		std::env::set_var(PROJECT_ROOT_ENV, "/srv/app");

		let config = ReporterConfig::from_env().unwrap();
		clear_env();

		assert_eq!(config.domain.as_deref(), Some("https://collector.example.com"));
		assert_eq!(config.token.unwrap().expose(), "secret-token");
		assert!(!config.enabled);
		assert_eq!(config.project_root, PathBuf::from("/srv/app"));
	}

	#[test]
	fn from_env_prefers_token_file() {
		let _guard = ENV_LOCK.lock().unwrap();
		clear_env();

		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "file-token").unwrap();
		std::env::set_var(TOKEN_ENV, "env-token");
		std::env::set_var(format!("{TOKEN_ENV}_FILE"), file.path());

		let config = ReporterConfig::from_env().unwrap();
		clear_env();

		assert_eq!(config.token.unwrap().expose(), "file-token");
		assert!(config.enabled);
		assert!(config.domain.is_none());
	}

	#[test]
	fn from_env_fails_on_missing_token_file() {
		let _guard = ENV_LOCK.lock().unwrap();
		clear_env();
		std::env::set_var(format!("{TOKEN_ENV}_FILE"), "/nonexistent/debugmate-token");

		let result = ReporterConfig::from_env();
		clear_env();

		assert!(matches!(
			result,
			Err(crate::ReporterError::Config(_))
		));
	}

	proptest! {
		#[test]
		fn normalize_domain_is_idempotent(host in "[a-z][a-z0-9.-]{0,30}", slashes in 0usize..3) {
			let raw = format!("{host}{}", "/".repeat(slashes));
			let once = normalize_domain(&raw).unwrap();

			prop_assert!(once.starts_with("https://"));
			prop_assert!(!once.ends_with('/'));
			prop_assert_eq!(normalize_domain(&once), Some(once.clone()));
		}
	}
}
