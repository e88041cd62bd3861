// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RokResult;
use crate::types::{ObjectKind, Suggestion, VersionInfo, VersionParams};

/// Operations of the Rok gateway used by the bridge.
///
/// Responses the bridge only hands back to its caller are kept as raw JSON.
#[async_trait]
pub trait RokApi: Send + Sync {
	/// Get a task by id.
	async fn task_get(&self, bucket: &str, task_id: &str) -> RokResult<Value>;

	/// Register (snapshot) a new version of `object`.
	async fn version_register(
		&self,
		bucket: &str,
		object: &str,
		kind: ObjectKind,
		params: &VersionParams,
	) -> RokResult<Value>;

	/// Fetch the metadata of one version.
	async fn version_info(&self, bucket: &str, object: &str, version: &str)
		-> RokResult<VersionInfo>;

	/// Fetch the account the client is authenticated as.
	async fn account_info(&self) -> RokResult<Value>;

	/// List the values the gateway suggests for registering a version of
	/// `object`. With `ignore_env` the gateway does not use the caller's
	/// environment to narrow the query.
	async fn version_register_suggest(
		&self,
		bucket: &str,
		object: &str,
		kind: ObjectKind,
		query: &str,
		params: &VersionParams,
		ignore_env: bool,
	) -> RokResult<Vec<Suggestion>>;

	/// Fetch bucket metadata. Fails with `NotFound` if the bucket is missing.
	async fn bucket_info(&self, bucket: &str) -> RokResult<Value>;

	/// Create a bucket.
	async fn bucket_create(&self, bucket: &str) -> RokResult<Value>;
}
