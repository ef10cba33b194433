// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the debugmate error reporter.
//!
//! This crate holds the data that flows through a report and the rules for
//! turning partially-known user/request/environment facts into the collector's
//! fixed JSON schema. It performs no I/O; file reads, host introspection and
//! HTTP are supplied by `debugmate-trace` and `debugmate`.
//!
//! # Overview
//!
//! - [`RawError`]: an exception as handed to the reporter (name, message,
//!   raw stack text and an optional failing SQL statement)
//! - [`SourceFrame`] / [`TraceEntry`] / [`CodePreview`]: structured frames
//! - [`Context`]: user, request, environment and host facts for one report
//! - [`Payload`]: the document POSTed to the collector

pub mod context;
pub mod error;
pub mod event;
pub mod host;
pub mod payload;
pub mod query;

pub use context::{Context, EnvironmentInfo, QueryInput, RequestInfo, UserInfo};
pub use error::{CoreError, Result};
pub use event::{CodePreview, RawError, SourceFrame, TraceEntry};
pub use host::{os_name, HostInfo, ProcessHost, StaticHost};
pub use payload::{
	ContextFragment, EnvironmentGroup, Payload, RequestLine, RequestSection, PAYLOAD_TYPE,
	UNKNOWN_FILE,
};
pub use query::parse_query_string;
