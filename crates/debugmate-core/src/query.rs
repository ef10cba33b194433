// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Query-string parsing for the request section.

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Parse `application/x-www-form-urlencoded` text into a JSON object.
///
/// Pairs split on `&`, key and value on the first `=`. A key seen more than
/// once collects its values into an array in the order they appear.
pub fn parse_query_string(input: &str) -> Map<String, Value> {
	let mut params = Map::new();

	for (key, value) in form_urlencoded::parse(input.as_bytes()) {
		let value = Value::String(value.into_owned());
		match params.get_mut(&*key) {
			Some(Value::Array(values)) => values.push(value),
			Some(existing) => {
				let first = existing.take();
				*existing = Value::Array(vec![first, value]);
			}
			None => {
				params.insert(key.into_owned(), value);
			}
		}
	}

	params
}

/// The query component of a URL or path: the text after `?` and before `#`.
pub fn query_component(url: &str) -> Option<&str> {
	let (_, rest) = url.split_once('?')?;
	let query = rest.split_once('#').map_or(rest, |(query, _)| query);
	Some(query)
}
