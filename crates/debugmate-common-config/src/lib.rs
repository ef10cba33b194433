// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration primitives for debugmate.
//!
//! - [`Secret<T>`]: keeps the collector token out of logs and config dumps
//! - [`load_secret_env`] / [`env_flag`] / [`env_string`]: environment loading
//!   with `*_FILE` support for secrets

pub mod env;
pub mod secret;

pub use env::{env_flag, env_string, load_secret_env, SecretEnvError};
pub use secret::{Secret, SecretString, REDACTED};
