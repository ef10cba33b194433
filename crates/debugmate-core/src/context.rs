// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Context attached to a report: user, request, environment and host facts.
//!
//! Every setter replaces its slot wholesale; nothing is merged field by field
//! across calls. [`Context::render`] turns whatever is present into the
//! collector's fixed schema:
//!
//! - `user` only when a user was set
//! - `request` always, with defaults for anything missing
//! - `environment` as up to three groups (`Node`, `App`, `System`, in that
//!   order), each omitted when it has no variables

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{CoreError, Result};
use crate::event::RawError;
use crate::host::{os_name, HostInfo, ProcessHost};
use crate::payload::{ContextFragment, EnvironmentGroup, RequestLine, RequestSection};
use crate::query::{parse_query_string, query_component};

/// Group carrying the runtime version.
pub const RUNTIME_GROUP: &str = "Node";
/// Group carrying application settings.
pub const APP_GROUP: &str = "App";
/// Group carrying OS, server, database and browser facts.
pub const SYSTEM_GROUP: &str = "System";

/// The user affected by an error.
///
/// `id` must be numeric and `name` a string; any other fields ride along
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserInfo {
	pub id: Number,
	pub name: String,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl UserInfo {
	pub fn new(id: impl Into<Number>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			extra: Map::new(),
		}
	}

	/// Attach an additional field. `id` and `name` are reserved and ignored.
	pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		let key = key.into();
		if key != "id" && key != "name" {
			self.extra.insert(key, value.into());
		}
		self
	}

	/// Convert anything that serializes to a user object, validating the
	/// `id` and `name` fields.
	pub fn from_serializable<U: Serialize>(user: U) -> Result<Self> {
		let value =
			serde_json::to_value(user).map_err(|e| CoreError::InvalidUser(e.to_string()))?;
		Self::try_from(value)
	}

	pub fn email(&self) -> Option<&str> {
		self.extra.get("email").and_then(Value::as_str)
	}
}

impl TryFrom<Value> for UserInfo {
	type Error = CoreError;

	fn try_from(value: Value) -> Result<Self> {
		let Value::Object(mut fields) = value else {
			return Err(CoreError::InvalidUser("expected an object".to_string()));
		};

		let id = match fields.remove("id") {
			Some(Value::Number(id)) => id,
			Some(other) => {
				return Err(CoreError::InvalidUser(format!(
					"id must be a number, got {other}"
				)))
			}
			None => return Err(CoreError::InvalidUser("missing id".to_string())),
		};

		let name = match fields.remove("name") {
			Some(Value::String(name)) => name,
			Some(other) => {
				return Err(CoreError::InvalidUser(format!(
					"name must be a string, got {other}"
				)))
			}
			None => return Err(CoreError::InvalidUser("missing name".to_string())),
		};

		Ok(Self {
			id,
			name,
			extra: fields,
		})
	}
}

/// Application and system facts. Absent fields are omitted from the
/// environment section, never sent as null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub environment: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub debug: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timezone: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub server: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub database: Option<String>,
	#[serde(
		default,
		alias = "npm",
		alias = "npmVersion",
		skip_serializing_if = "Option::is_none"
	)]
	pub npm_version: Option<String>,
}

/// A request query as the host has it: the raw string or already parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryInput {
	Raw(String),
	Map(Map<String, Value>),
}

/// The HTTP request being served when the error happened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInfo {
	/// Full request URL or path, including any query string.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	/// Mount path of the handling router; preferred over `url` for display.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub base_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub method: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub params: Option<Map<String, Value>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub headers: Option<BTreeMap<String, String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub query: Option<QueryInput>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub body: Option<Value>,
}

impl RequestInfo {
	/// Header value by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.as_ref()?
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}

/// Facts for one report.
#[derive(Debug, Clone)]
pub struct Context {
	error: Option<RawError>,
	user: Option<UserInfo>,
	request: Option<RequestInfo>,
	environment: Option<EnvironmentInfo>,
	host: Arc<dyn HostInfo>,
}

impl Default for Context {
	fn default() -> Self {
		Self::new(Arc::new(ProcessHost::default()))
	}
}

impl Context {
	pub fn new(host: Arc<dyn HostInfo>) -> Self {
		Self {
			error: None,
			user: None,
			request: None,
			environment: None,
			host,
		}
	}

	pub fn set_error(&mut self, error: RawError) {
		self.error = Some(error);
	}

	/// Validate and store the user.
	///
	/// Accepts anything that serializes to an object with a numeric `id` and
	/// a string `name` ([`UserInfo`], `serde_json::json!({...})`, a host
	/// struct). On failure the previous user is kept.
	pub fn set_user<U: Serialize>(&mut self, user: U) -> Result<()> {
		self.set_valid_user(UserInfo::from_serializable(user)?);
		Ok(())
	}

	/// Store a user that has already been validated.
	pub fn set_valid_user(&mut self, user: UserInfo) {
		self.user = Some(user);
	}

	pub fn set_request(&mut self, request: RequestInfo) {
		self.request = Some(request);
	}

	pub fn set_environment(&mut self, environment: EnvironmentInfo) {
		self.environment = Some(environment);
	}

	pub fn error(&self) -> Option<&RawError> {
		self.error.as_ref()
	}

	pub fn user(&self) -> Option<&UserInfo> {
		self.user.as_ref()
	}

	pub fn request(&self) -> Option<&RequestInfo> {
		self.request.as_ref()
	}

	pub fn environment(&self) -> Option<&EnvironmentInfo> {
		self.environment.as_ref()
	}

	pub fn host(&self) -> &Arc<dyn HostInfo> {
		&self.host
	}

	/// The operating system display name for the current host.
	pub fn operating_system(&self) -> &'static str {
		os_name(&self.host.platform_id())
	}

	/// Render the user, request and environment sections.
	pub fn render(&self) -> ContextFragment {
		ContextFragment {
			user: self.user.clone(),
			request: self.render_request(),
			environment: self.render_environment(),
		}
	}

	fn render_request(&self) -> RequestSection {
		let Some(request) = &self.request else {
			return RequestSection::default();
		};
		let defaults = RequestLine::default();

		RequestSection {
			request: RequestLine {
				url: non_empty(request.base_url.as_deref())
					.or_else(|| non_empty(request.url.as_deref()))
					.map_or(defaults.url, str::to_string),
				method: non_empty(request.method.as_deref()).map_or(defaults.method, str::to_string),
				params: request.params.clone().unwrap_or_default(),
			},
			headers: request.headers.clone().unwrap_or_default(),
			query_string: self.query_params(request),
			body: match &request.body {
				Some(Value::Null) | None => Value::String(String::new()),
				Some(body) => body.clone(),
			},
		}
	}

	/// A failing SQL statement on the error takes the place of the request
	/// query, then the explicit `query` field, then the URL's own query.
	fn query_params(&self, request: &RequestInfo) -> Map<String, Value> {
		if let Some(sql) = self.error.as_ref().and_then(|e| e.sql_text.as_deref()) {
			return parse_query_string(sql);
		}

		match &request.query {
			Some(QueryInput::Raw(raw)) => parse_query_string(raw),
			Some(QueryInput::Map(map)) => map.clone(),
			None => request
				.url
				.as_deref()
				.and_then(query_component)
				.map(parse_query_string)
				.unwrap_or_default(),
		}
	}

	fn render_environment(&self) -> Vec<EnvironmentGroup> {
		[self.runtime_group(), self.app_group(), self.system_group()]
			.into_iter()
			.filter(|group| !group.variables.is_empty())
			.collect()
	}

	fn runtime_group(&self) -> EnvironmentGroup {
		let mut variables = Map::new();
		insert_some(&mut variables, "version", self.host.runtime_version());
		EnvironmentGroup::new(RUNTIME_GROUP, variables)
	}

	fn app_group(&self) -> EnvironmentGroup {
		let mut variables = Map::new();
		if let Some(env) = &self.environment {
			insert_some(&mut variables, "environment", env.environment.clone());
			insert_some(&mut variables, "debug", env.debug);
			insert_some(&mut variables, "timezone", env.timezone.clone());
		}
		EnvironmentGroup::new(APP_GROUP, variables)
	}

	/// `os` is always present, even as "Unknown".
	fn system_group(&self) -> EnvironmentGroup {
		let mut variables = Map::new();
		variables.insert("os".to_string(), Value::from(self.operating_system()));
		if let Some(env) = &self.environment {
			insert_some(&mut variables, "server", env.server.clone());
			insert_some(&mut variables, "database", env.database.clone());
			insert_some(&mut variables, "npm", env.npm_version.clone());
		}
		let browser = self
			.request
			.as_ref()
			.and_then(|request| request.header("user-agent"));
		insert_some(&mut variables, "browser", browser);
		EnvironmentGroup::new(SYSTEM_GROUP, variables)
	}
}

fn insert_some<T: Into<Value>>(map: &mut Map<String, Value>, key: &str, value: Option<T>) {
	if let Some(value) = value {
		map.insert(key.to_string(), value.into());
	}
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|v| !v.is_empty())
}
