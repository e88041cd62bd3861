// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Identity of the pod this process runs in.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default path of the namespace file mounted with the service account.
pub const SA_NAMESPACE_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/namespace";

/// Errors raised while looking up the pod's identity.
#[derive(Debug, Error)]
pub enum PodEnvError {
	#[error("failed to determine hostname: {0}")]
	Hostname(String),

	#[error("failed to read namespace from {path}: {source}")]
	Namespace {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("namespace file {path} is empty")]
	EmptyNamespace { path: PathBuf },
}

/// Read-only view of the runtime environment of a notebook pod.
pub trait PodEnvironment: Send + Sync {
	/// Host name of the container. Inside K8s this is the pod name.
	fn hostname(&self) -> Result<String, PodEnvError>;

	/// Name of the pod.
	fn pod_name(&self) -> Result<String, PodEnvError> {
		self.hostname()
	}

	/// Namespace the pod runs in.
	fn namespace(&self) -> Result<String, PodEnvError>;
}

/// Looks identity up the way a container scheduled by K8s sees it:
/// `HOSTNAME` for the pod name and the service account mount for the
/// namespace.
#[derive(Debug, Clone)]
pub struct InClusterEnvironment {
	namespace_path: PathBuf,
}

impl Default for InClusterEnvironment {
	fn default() -> Self {
		Self {
			namespace_path: PathBuf::from(SA_NAMESPACE_PATH),
		}
	}
}

impl InClusterEnvironment {
	pub fn new() -> Self {
		Self::default()
	}

	/// Read the namespace from a different file.
	pub fn with_namespace_path(mut self, path: impl AsRef<Path>) -> Self {
		self.namespace_path = path.as_ref().to_path_buf();
		self
	}
}

impl PodEnvironment for InClusterEnvironment {
	fn hostname(&self) -> Result<String, PodEnvError> {
		if let Ok(name) = std::env::var("HOSTNAME") {
			if !name.is_empty() {
				return Ok(name);
			}
		}
		hostname::get()
			.map(|h| h.to_string_lossy().to_string())
			.map_err(|e| PodEnvError::Hostname(e.to_string()))
	}

	fn namespace(&self) -> Result<String, PodEnvError> {
		let content =
			std::fs::read_to_string(&self.namespace_path).map_err(|e| PodEnvError::Namespace {
				path: self.namespace_path.clone(),
				source: e,
			})?;
		let namespace = content.trim();
		if namespace.is_empty() {
			return Err(PodEnvError::EmptyNamespace {
				path: self.namespace_path.clone(),
			});
		}
		Ok(namespace.to_string())
	}
}
