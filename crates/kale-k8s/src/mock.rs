// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-memory stand-ins for the cluster and the pod environment.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::K8sClient;
use crate::error::K8sError;
use crate::pod::{PodEnvError, PodEnvironment};
use crate::types::PersistentVolumeClaim;

/// Fixed pod identity for tests and local runs.
#[derive(Debug, Clone)]
pub struct StaticPodEnvironment {
	pub hostname: String,
	pub namespace: String,
}

impl StaticPodEnvironment {
	pub fn new(hostname: impl Into<String>, namespace: impl Into<String>) -> Self {
		Self {
			hostname: hostname.into(),
			namespace: namespace.into(),
		}
	}
}

impl PodEnvironment for StaticPodEnvironment {
	fn hostname(&self) -> Result<String, PodEnvError> {
		Ok(self.hostname.clone())
	}

	fn namespace(&self) -> Result<String, PodEnvError> {
		Ok(self.namespace.clone())
	}
}

/// Mock K8s client that records created claims.
#[derive(Clone, Default)]
pub struct MockK8sClient {
	/// If set, create_pvc fails with an API error carrying this message.
	pub create_error: Option<String>,
	/// Claims passed to create_pvc, with their namespace.
	pub created: Arc<Mutex<Vec<(String, PersistentVolumeClaim)>>>,
}

impl MockK8sClient {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_create_error(mut self, message: impl Into<String>) -> Self {
		self.create_error = Some(message.into());
		self
	}

	/// Returns the recorded (namespace, claim) pairs.
	pub fn created_pvcs(&self) -> Vec<(String, PersistentVolumeClaim)> {
		self.created.lock().unwrap().clone()
	}
}

#[async_trait]
impl K8sClient for MockK8sClient {
	async fn create_pvc(
		&self,
		namespace: &str,
		pvc: PersistentVolumeClaim,
	) -> Result<PersistentVolumeClaim, K8sError> {
		if let Some(message) = &self.create_error {
			return Err(K8sError::ApiError {
				message: message.clone(),
			});
		}
		self.created
			.lock()
			.unwrap()
			.push((namespace.to_string(), pvc.clone()));
		Ok(pvc)
	}
}
