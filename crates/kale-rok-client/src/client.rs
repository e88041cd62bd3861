// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP implementation of [`RokApi`].

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, instrument, trace};

use crate::api::RokApi;
use crate::config::{RokClientConfig, ROK_GW_URL_ENV};
use crate::error::{RokError, RokInitError, RokResult};
use crate::secret::SecretString;
use crate::types::{ObjectKind, Suggestion, VersionInfo, VersionParams};

const API_PREFIX: [&str; 2] = ["api", "v1"];
const USER_AGENT: &str = concat!("kale-rok-bridge/", env!("CARGO_PKG_VERSION"));

/// Client for the Rok gateway REST API.
#[derive(Clone)]
pub struct RokClient {
	http_client: Client,
	base_url: Url,
	token: Option<SecretString>,
}

#[derive(Debug, Serialize)]
struct VersionRegisterRequest<'a> {
	#[serde(rename = "type")]
	kind: &'a str,
	params: &'a VersionParams,
}

#[derive(Debug, Serialize)]
struct SuggestRequest<'a> {
	#[serde(rename = "type")]
	kind: &'a str,
	query: &'a str,
	params: &'a VersionParams,
	ignore_env: bool,
}

impl RokClient {
	/// Build a client from configuration.
	///
	/// Fails with [`RokInitError::NotConfigured`] when no gateway URL is set.
	pub fn new(config: RokClientConfig) -> Result<Self, RokInitError> {
		let url = config.url.ok_or_else(|| RokInitError::NotConfigured {
			var: ROK_GW_URL_ENV.to_string(),
		})?;

		let base_url = Url::parse(&url)
			.map_err(|e| RokInitError::Configuration(format!("invalid gateway URL '{url}': {e}")))?;
		if base_url.cannot_be_a_base() {
			return Err(RokInitError::Configuration(format!(
				"gateway URL '{url}' cannot be used as a base"
			)));
		}

		let http_client = Client::builder()
			.user_agent(USER_AGENT)
			.timeout(config.timeout)
			.build()
			.map_err(|e| RokInitError::Configuration(format!("failed to create HTTP client: {e}")))?;

		debug!(base_url = %base_url, "Rok client initialized");

		Ok(Self {
			http_client,
			base_url,
			token: config.token,
		})
	}

	fn endpoint(&self, segments: &[&str]) -> RokResult<Url> {
		let mut url = self.base_url.clone();
		url.path_segments_mut()
			.map_err(|_| RokError::InvalidResponse(format!("cannot extend base URL {}", self.base_url)))?
			.pop_if_empty()
			.extend(API_PREFIX)
			.extend(segments);
		Ok(url)
	}

	fn request(&self, method: Method, url: Url) -> RequestBuilder {
		let builder = self.http_client.request(method, url);
		match &self.token {
			Some(token) => builder.bearer_auth(token.expose()),
			None => builder,
		}
	}

	async fn execute<T: DeserializeOwned>(
		&self,
		builder: RequestBuilder,
		resource: &str,
	) -> RokResult<T> {
		let response = builder.send().await.map_err(|e| {
			if e.is_timeout() {
				error!(resource = %resource, "Request timed out");
				return RokError::Timeout;
			}
			error!(resource = %resource, error = %e, "Network error during Rok request");
			RokError::Network(e)
		})?;

		let status = response.status();
		debug!(status = %status, resource = %resource, "Received response from Rok");

		if !status.is_success() {
			let status_code = status.as_u16();
			let body = response.text().await.unwrap_or_default();

			return Err(match status_code {
				401 | 403 => {
					error!(status = status_code, "Unauthorized request");
					RokError::Unauthorized
				}
				404 => RokError::NotFound {
					resource: resource.to_string(),
				},
				409 => RokError::Conflict {
					resource: resource.to_string(),
				},
				_ => {
					let message = sanitize_body_for_error(&body, 200);
					error!(status = status_code, body = %message, "Rok API error");
					RokError::ApiError {
						status: status_code,
						message,
					}
				}
			});
		}

		let body = response.text().await.map_err(|e| {
			error!(error = %e, "Failed to read response body");
			RokError::Network(e)
		})?;
		trace!(body = %body, "Response body");

		let body = if body.trim().is_empty() { "null" } else { &body };
		serde_json::from_str(body).map_err(|e| {
			error!(error = %e, resource = %resource, "Failed to parse Rok response");
			RokError::InvalidResponse(format!("JSON parse error: {e}"))
		})
	}
}

#[async_trait]
impl RokApi for RokClient {
	#[instrument(skip(self))]
	async fn task_get(&self, bucket: &str, task_id: &str) -> RokResult<Value> {
		let url = self.endpoint(&["buckets", bucket, "tasks", task_id])?;
		self
			.execute(self.request(Method::GET, url), &format!("task {bucket}/{task_id}"))
			.await
	}

	#[instrument(skip(self, params), fields(kind = %kind))]
	async fn version_register(
		&self,
		bucket: &str,
		object: &str,
		kind: ObjectKind,
		params: &VersionParams,
	) -> RokResult<Value> {
		let url = self.endpoint(&["buckets", bucket, "objects", object, "versions"])?;
		let body = VersionRegisterRequest {
			kind: kind.as_str(),
			params,
		};
		self
			.execute(
				self.request(Method::POST, url).json(&body),
				&format!("object {bucket}/{object}"),
			)
			.await
	}

	#[instrument(skip(self))]
	async fn version_info(
		&self,
		bucket: &str,
		object: &str,
		version: &str,
	) -> RokResult<VersionInfo> {
		let url = self.endpoint(&["buckets", bucket, "objects", object, "versions", version])?;
		self
			.execute(
				self.request(Method::GET, url),
				&format!("version {bucket}/{object}/{version}"),
			)
			.await
	}

	#[instrument(skip(self))]
	async fn account_info(&self) -> RokResult<Value> {
		let url = self.endpoint(&["account"])?;
		self.execute(self.request(Method::GET, url), "account").await
	}

	#[instrument(skip(self, params), fields(kind = %kind))]
	async fn version_register_suggest(
		&self,
		bucket: &str,
		object: &str,
		kind: ObjectKind,
		query: &str,
		params: &VersionParams,
		ignore_env: bool,
	) -> RokResult<Vec<Suggestion>> {
		let url = self.endpoint(&[
			"buckets",
			bucket,
			"objects",
			object,
			"versions",
			"suggestions",
		])?;
		let body = SuggestRequest {
			kind: kind.as_str(),
			query,
			params,
			ignore_env,
		};
		self
			.execute(
				self.request(Method::POST, url).json(&body),
				&format!("suggestions {bucket}/{object}"),
			)
			.await
	}

	#[instrument(skip(self))]
	async fn bucket_info(&self, bucket: &str) -> RokResult<Value> {
		let url = self.endpoint(&["buckets", bucket])?;
		self
			.execute(self.request(Method::GET, url), &format!("bucket {bucket}"))
			.await
	}

	#[instrument(skip(self))]
	async fn bucket_create(&self, bucket: &str) -> RokResult<Value> {
		let url = self.endpoint(&["buckets", bucket])?;
		self
			.execute(self.request(Method::PUT, url), &format!("bucket {bucket}"))
			.await
	}
}

impl std::fmt::Debug for RokClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RokClient")
			.field("base_url", &self.base_url.as_str())
			.field("has_token", &self.token.is_some())
			.finish()
	}
}

fn sanitize_body_for_error(body: &str, max_len: usize) -> String {
	let sanitized: String = body
		.chars()
		.filter(|c| !c.is_control() || *c == ' ')
		.take(max_len)
		.collect();
	if body.chars().count() > max_len {
		format!("{sanitized}...")
	} else {
		sanitized
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use wiremock::matchers::{body_json, header, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn client_for(server: &MockServer) -> RokClient {
		RokClient::new(
			RokClientConfig::default()
				.with_url(server.uri())
				.with_token("secret-token"),
		)
		.unwrap()
	}

	#[test]
	fn missing_url_is_not_configured() {
		let err = RokClient::new(RokClientConfig::default()).unwrap_err();
		assert!(err.is_not_configured());
	}

	#[test]
	fn invalid_url_is_a_configuration_error() {
		let err = RokClient::new(RokClientConfig::default().with_url("not a url")).unwrap_err();
		assert!(matches!(err, RokInitError::Configuration(_)));
		assert!(!err.is_not_configured());
	}

	#[test]
	fn endpoint_escapes_segments_and_keeps_base_path() {
		let client = RokClient::new(RokClientConfig::default().with_url("http://rok.local/gw/")).unwrap();
		let url = client
			.endpoint(&["buckets", "notebooks", "objects", "my nb/1"])
			.unwrap();
		assert_eq!(
			url.as_str(),
			"http://rok.local/gw/api/v1/buckets/notebooks/objects/my%20nb%2F1"
		);
	}

	#[test]
	fn debug_does_not_leak_token() {
		let client = RokClient::new(
			RokClientConfig::default()
				.with_url("http://rok.local")
				.with_token("super-secret"),
		)
		.unwrap();
		let debug = format!("{client:?}");
		assert!(!debug.contains("super-secret"));
		assert!(debug.contains("has_token: true"));
	}

	#[tokio::test]
	async fn version_info_sends_bearer_token() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/api/v1/buckets/notebooks/objects/nb/versions/v1"))
			.and(header("authorization", "Bearer secret-token"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"content_length": "2048",
				"rok_url": "rok://nb/v1",
			})))
			.expect(1)
			.mount(&server)
			.await;

		let info = client_for(&server)
			.version_info("notebooks", "nb", "v1")
			.await
			.unwrap();
		assert_eq!(info.get_u64("content_length").unwrap(), 2048);
		assert_eq!(info.get_str("rok_url").unwrap(), "rok://nb/v1");
	}

	#[tokio::test]
	async fn version_register_posts_kind_and_params() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/api/v1/buckets/notebooks/objects/nb-0/versions"))
			.and(body_json(json!({
				"type": "jupyter",
				"params": {"namespace": "team-a"},
			})))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({"task": {"id": "t-1"}})))
			.expect(1)
			.mount(&server)
			.await;

		let mut params = VersionParams::new();
		params.insert("namespace".into(), "team-a".into());
		let response = client_for(&server)
			.version_register("notebooks", "nb-0", ObjectKind::Jupyter, &params)
			.await
			.unwrap();
		assert_eq!(response, json!({"task": {"id": "t-1"}}));
	}

	#[tokio::test]
	async fn suggestions_are_parsed() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path(
				"/api/v1/buckets/notebooks/objects/nb-0/versions/suggestions",
			))
			.and(body_json(json!({
				"type": "jupyter",
				"query": "params:lab",
				"params": {},
				"ignore_env": true,
			})))
			.respond_with(
				ResponseTemplate::new(200).set_body_json(json!([{"value": "nb-0"}, {"value": "nb-1"}])),
			)
			.mount(&server)
			.await;

		let suggestions = client_for(&server)
			.version_register_suggest(
				"notebooks",
				"nb-0",
				ObjectKind::Jupyter,
				"params:lab",
				&VersionParams::new(),
				true,
			)
			.await
			.unwrap();
		let values: Vec<_> = suggestions.iter().map(|s| s.value.as_str()).collect();
		assert_eq!(values, vec!["nb-0", "nb-1"]);
	}

	#[tokio::test]
	async fn status_codes_map_to_errors() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/api/v1/buckets/missing"))
			.respond_with(ResponseTemplate::new(404))
			.mount(&server)
			.await;
		Mock::given(method("PUT"))
			.and(path("/api/v1/buckets/taken"))
			.respond_with(ResponseTemplate::new(409))
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/api/v1/account"))
			.respond_with(ResponseTemplate::new(401))
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/api/v1/buckets/b/tasks/t"))
			.respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
			.mount(&server)
			.await;

		let client = client_for(&server);
		assert!(matches!(
			client.bucket_info("missing").await.unwrap_err(),
			RokError::NotFound { .. }
		));
		assert!(matches!(
			client.bucket_create("taken").await.unwrap_err(),
			RokError::Conflict { .. }
		));
		assert!(matches!(
			client.account_info().await.unwrap_err(),
			RokError::Unauthorized
		));
		match client.task_get("b", "t").await.unwrap_err() {
			RokError::ApiError { status, message } => {
				assert_eq!(status, 503);
				assert_eq!(message, "maintenance");
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[tokio::test]
	async fn invalid_json_is_reported() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/api/v1/account"))
			.respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
			.mount(&server)
			.await;

		assert!(matches!(
			client_for(&server).account_info().await.unwrap_err(),
			RokError::InvalidResponse(_)
		));
	}

	#[tokio::test]
	async fn empty_body_is_null() {
		let server = MockServer::start().await;
		Mock::given(method("PUT"))
			.and(path("/api/v1/buckets/notebooks"))
			.respond_with(ResponseTemplate::new(201))
			.mount(&server)
			.await;

		let value = client_for(&server).bucket_create("notebooks").await.unwrap();
		assert_eq!(value, Value::Null);
	}

	#[test]
	fn sanitize_truncates_and_strips_control_chars() {
		assert_eq!(sanitize_body_for_error("a\nb", 10), "ab");
		assert_eq!(sanitize_body_for_error("abcdef", 3), "abc...");
	}
}
