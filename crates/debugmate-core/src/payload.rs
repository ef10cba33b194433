// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The document POSTed to the collector.
//!
//! Shape (keys always present unless noted):
//!
//! ```text
//! { exception, message, file, type: "web", trace: [...],
//!   user?: {...},
//!   request: { request: { url, method, params }, headers, query_string, body },
//!   environment: [ { group, variables }, ... ] }
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::context::UserInfo;
use crate::event::TraceEntry;

/// Value of the `type` key.
pub const PAYLOAD_TYPE: &str = "web";

/// `file` when no frame survived parsing and filtering.
pub const UNKNOWN_FILE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
	pub exception: String,
	pub message: String,
	pub file: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub trace: Vec<TraceEntry>,
	#[serde(flatten)]
	pub context: ContextFragment,
}

/// The context-derived half of the payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextFragment {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user: Option<UserInfo>,
	pub request: RequestSection,
	pub environment: Vec<EnvironmentGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestSection {
	pub request: RequestLine,
	pub headers: BTreeMap<String, String>,
	pub query_string: Map<String, Value>,
	pub body: Value,
}

impl Default for RequestSection {
	/// The block sent when no request was supplied.
	fn default() -> Self {
		Self {
			request: RequestLine::default(),
			headers: BTreeMap::new(),
			query_string: Map::new(),
			body: Value::String(String::new()),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestLine {
	pub url: String,
	pub method: String,
	pub params: Map<String, Value>,
}

impl Default for RequestLine {
	fn default() -> Self {
		Self {
			url: "unknown".to_string(),
			method: "GET".to_string(),
			params: Map::new(),
		}
	}
}

/// One named group of the environment section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentGroup {
	pub group: String,
	pub variables: Map<String, Value>,
}

impl EnvironmentGroup {
	pub fn new(group: impl Into<String>, variables: Map<String, Value>) -> Self {
		Self {
			group: group.into(),
			variables,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn default_request_section_shape() {
		let json = serde_json::to_value(RequestSection::default()).unwrap();
		assert_eq!(
			json,
			json!({
				"request": {"url": "unknown", "method": "GET", "params": {}},
				"headers": {},
				"query_string": {},
				"body": ""
			})
		);
	}

	#[test]
	fn payload_flattens_context_and_omits_missing_user() {
		let payload = Payload {
			exception: "Error".to_string(),
			message: "boom".to_string(),
			file: UNKNOWN_FILE.to_string(),
			kind: PAYLOAD_TYPE.to_string(),
			trace: Vec::new(),
			context: ContextFragment {
				user: None,
				request: RequestSection::default(),
				environment: Vec::new(),
			},
		};

		let json = serde_json::to_value(&payload).unwrap();
		let object = json.as_object().unwrap();
		assert_eq!(object["type"], "web");
		assert_eq!(object["trace"], json!([]));
		assert_eq!(object["environment"], json!([]));
		assert!(object.contains_key("request"));
		assert!(!object.contains_key("user"));
		assert!(!object.contains_key("context"));
	}
}
