// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the core crate.

use thiserror::Error;

/// Errors surfaced by explicit caller input.
///
/// Everything else in the reporting pipeline recovers locally; a malformed
/// user is the one thing handed back to the caller.
#[derive(Debug, Error)]
pub enum CoreError {
	#[error("invalid user: {0}")]
	InvalidUser(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
