// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Environment variable helpers.
//!
//! Secrets follow the `VAR` / `VAR_FILE` convention used by Docker and
//! Kubernetes secret mounts: when `VAR_FILE` is set its file content wins
//! over `VAR`.

use std::path::PathBuf;
use std::{env, fs};

use thiserror::Error;

use crate::secret::Secret;

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load a secret from `{var}_FILE` (preferred) or `{var}`.
///
/// A single trailing newline is stripped from file content. Returns
/// `Ok(None)` when neither variable is set.
pub fn load_secret_env(var: &str) -> Result<Option<Secret<String>>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path) = env::var(&file_var) {
		if path.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(path);
		let content = fs::read_to_string(&path).map_err(|source| SecretEnvError::Io {
			path: path.clone(),
			source,
		})?;
		let value = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(Secret::new(value)));
	}

	Ok(env::var(var).ok().map(Secret::new))
}

/// Read a non-empty string variable.
pub fn env_string(var: &str) -> Option<String> {
	env::var(var)
		.ok()
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
}

/// Read a boolean flag, falling back to `default` when unset.
///
/// `false`, `0`, `no` and `off` (any case) disable; every other value enables.
pub fn env_flag(var: &str, default: bool) -> bool {
	match env_string(var) {
		Some(value) => parse_flag(&value),
		None => default,
	}
}

fn parse_flag(value: &str) -> bool {
	!matches!(
		value.to_ascii_lowercase().as_str(),
		"false" | "0" | "no" | "off"
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[test]
	fn secret_is_none_when_unset() {
		let var = "DEBUGMATE_TEST_UNSET_SECRET_4711";
		env::remove_var(var);
		env::remove_var(format!("{var}_FILE"));

		assert!(load_secret_env(var).unwrap().is_none());
	}

	#[test]
	fn secret_reads_direct_value() {
		let var = "DEBUGMATE_TEST_DIRECT_SECRET_4711";
		env::set_var(var, "direct");
		env::remove_var(format!("{var}_FILE"));

		let secret = load_secret_env(var).unwrap().unwrap();
		assert_eq!(secret.expose(), "direct");

		env::remove_var(var);
	}

	#[test]
	fn secret_file_wins_and_drops_trailing_newline() {
		let var = "DEBUGMATE_TEST_FILE_SECRET_4711";
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "from-file").unwrap();

		env::set_var(var, "direct");
		env::set_var(format!("{var}_FILE"), file.path());

		let secret = load_secret_env(var).unwrap().unwrap();
		assert_eq!(secret.expose(), "from-file");

		env::remove_var(var);
		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn secret_file_missing_is_an_error() {
		let var = "DEBUGMATE_TEST_MISSING_FILE_SECRET_4711";
		env::set_var(format!("{var}_FILE"), "/nonexistent/debugmate/secret");

		let err = load_secret_env(var).unwrap_err();
		assert!(matches!(err, SecretEnvError::Io { .. }));

		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn secret_file_empty_path_is_an_error() {
		let var = "DEBUGMATE_TEST_EMPTY_PATH_SECRET_4711";
		env::set_var(format!("{var}_FILE"), "");

		let err = load_secret_env(var).unwrap_err();
		assert!(matches!(err, SecretEnvError::EmptyPath { .. }));

		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn flag_values() {
		for off in ["false", "FALSE", "0", "no", "off"] {
			assert!(!parse_flag(off), "{off} should disable");
		}
		for on in ["true", "1", "yes", "on", "anything"] {
			assert!(parse_flag(on), "{on} should enable");
		}
	}

	#[test]
	fn flag_uses_default_when_unset_or_blank() {
		let var = "DEBUGMATE_TEST_FLAG_4711";
		env::remove_var(var);
		assert!(env_flag(var, true));
		assert!(!env_flag(var, false));

		env::set_var(var, "  ");
		assert!(env_flag(var, true));
		env::remove_var(var);
	}
}
