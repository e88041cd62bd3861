// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-memory Rok gateway for tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api::RokApi;
use crate::error::{RokError, RokResult};
use crate::types::{ObjectKind, Suggestion, VersionInfo, VersionParams};

/// Recorded call to the mock Rok client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockCall {
	TaskGet {
		bucket: String,
		task_id: String,
	},
	VersionRegister {
		bucket: String,
		object: String,
		kind: ObjectKind,
		params: VersionParams,
	},
	VersionInfo {
		bucket: String,
		object: String,
		version: String,
	},
	AccountInfo,
	VersionRegisterSuggest {
		bucket: String,
		object: String,
		kind: ObjectKind,
		query: String,
		params: VersionParams,
		ignore_env: bool,
	},
	BucketInfo(String),
	BucketCreate(String),
}

/// Mock Rok client.
///
/// Errors configured with the `with_*_error` builders are returned as a
/// `500` [`RokError::ApiError`].
#[derive(Clone, Default)]
pub struct MockRokClient {
	/// Tasks returned by task_get, keyed by task id.
	pub tasks: HashMap<String, Value>,
	/// Version metadata keyed by (bucket, object, version).
	pub versions: HashMap<(String, String, String), VersionInfo>,
	/// Buckets that exist. bucket_create adds to this set.
	pub buckets: Arc<Mutex<HashSet<String>>>,
	/// Suggestions returned by version_register_suggest.
	pub suggestions: Vec<Suggestion>,
	/// Value returned by account_info.
	pub account: Value,
	pub account_error: Option<String>,
	pub suggest_error: Option<String>,
	pub register_error: Option<String>,
	pub bucket_error: Option<String>,
	/// Track calls for verification.
	pub calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockRokClient {
	pub fn new() -> Self {
		Self {
			account: json!({"username": "kale"}),
			..Default::default()
		}
	}

	pub fn with_task(mut self, task_id: impl Into<String>, task: Value) -> Self {
		self.tasks.insert(task_id.into(), task);
		self
	}

	pub fn with_version(
		mut self,
		bucket: impl Into<String>,
		object: impl Into<String>,
		version: impl Into<String>,
		info: VersionInfo,
	) -> Self {
		self
			.versions
			.insert((bucket.into(), object.into(), version.into()), info);
		self
	}

	pub fn with_bucket(self, bucket: impl Into<String>) -> Self {
		self.buckets.lock().unwrap().insert(bucket.into());
		self
	}

	pub fn with_suggestions<I, S>(mut self, values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.suggestions = values.into_iter().map(Suggestion::new).collect();
		self
	}

	pub fn with_account_error(mut self, error: impl Into<String>) -> Self {
		self.account_error = Some(error.into());
		self
	}

	pub fn with_suggest_error(mut self, error: impl Into<String>) -> Self {
		self.suggest_error = Some(error.into());
		self
	}

	pub fn with_register_error(mut self, error: impl Into<String>) -> Self {
		self.register_error = Some(error.into());
		self
	}

	pub fn with_bucket_error(mut self, error: impl Into<String>) -> Self {
		self.bucket_error = Some(error.into());
		self
	}

	/// Returns the recorded calls.
	pub fn get_calls(&self) -> Vec<MockCall> {
		self.calls.lock().unwrap().clone()
	}

	fn record(&self, call: MockCall) {
		self.calls.lock().unwrap().push(call);
	}

	fn fail_with(error: &Option<String>) -> RokResult<()> {
		match error {
			Some(message) => Err(RokError::ApiError {
				status: 500,
				message: message.clone(),
			}),
			None => Ok(()),
		}
	}
}

#[async_trait]
impl RokApi for MockRokClient {
	async fn task_get(&self, bucket: &str, task_id: &str) -> RokResult<Value> {
		self.record(MockCall::TaskGet {
			bucket: bucket.to_string(),
			task_id: task_id.to_string(),
		});
		self
			.tasks
			.get(task_id)
			.cloned()
			.ok_or_else(|| RokError::NotFound {
				resource: format!("task {bucket}/{task_id}"),
			})
	}

	async fn version_register(
		&self,
		bucket: &str,
		object: &str,
		kind: ObjectKind,
		params: &VersionParams,
	) -> RokResult<Value> {
		self.record(MockCall::VersionRegister {
			bucket: bucket.to_string(),
			object: object.to_string(),
			kind,
			params: params.clone(),
		});
		Self::fail_with(&self.register_error)?;
		Ok(json!({
			"bucket": bucket,
			"object": object,
			"task": {"id": format!("task-{object}")},
		}))
	}

	async fn version_info(
		&self,
		bucket: &str,
		object: &str,
		version: &str,
	) -> RokResult<VersionInfo> {
		self.record(MockCall::VersionInfo {
			bucket: bucket.to_string(),
			object: object.to_string(),
			version: version.to_string(),
		});
		self
			.versions
			.get(&(bucket.to_string(), object.to_string(), version.to_string()))
			.cloned()
			.ok_or_else(|| RokError::NotFound {
				resource: format!("version {bucket}/{object}/{version}"),
			})
	}

	async fn account_info(&self) -> RokResult<Value> {
		self.record(MockCall::AccountInfo);
		Self::fail_with(&self.account_error)?;
		Ok(self.account.clone())
	}

	async fn version_register_suggest(
		&self,
		bucket: &str,
		object: &str,
		kind: ObjectKind,
		query: &str,
		params: &VersionParams,
		ignore_env: bool,
	) -> RokResult<Vec<Suggestion>> {
		self.record(MockCall::VersionRegisterSuggest {
			bucket: bucket.to_string(),
			object: object.to_string(),
			kind,
			query: query.to_string(),
			params: params.clone(),
			ignore_env,
		});
		Self::fail_with(&self.suggest_error)?;
		Ok(self.suggestions.clone())
	}

	async fn bucket_info(&self, bucket: &str) -> RokResult<Value> {
		self.record(MockCall::BucketInfo(bucket.to_string()));
		Self::fail_with(&self.bucket_error)?;
		if self.buckets.lock().unwrap().contains(bucket) {
			Ok(json!({"name": bucket}))
		} else {
			Err(RokError::NotFound {
				resource: format!("bucket {bucket}"),
			})
		}
	}

	async fn bucket_create(&self, bucket: &str) -> RokResult<Value> {
		self.record(MockCall::BucketCreate(bucket.to_string()));
		Self::fail_with(&self.bucket_error)?;
		if !self.buckets.lock().unwrap().insert(bucket.to_string()) {
			return Err(RokError::Conflict {
				resource: format!("bucket {bucket}"),
			});
		}
		Ok(json!({"name": bucket}))
	}
}
