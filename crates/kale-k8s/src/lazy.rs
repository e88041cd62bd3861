// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::client::K8sClient;
use crate::error::K8sError;
use crate::kube_client::KubeClient;
use crate::types::PersistentVolumeClaim;

/// A [`KubeClient`] that is only built on first use.
///
/// Lets a process start (and answer availability checks) outside a cluster;
/// only the calls that actually need the API server pay for and fail on
/// cluster discovery. A failed initialization is retried on the next call.
#[derive(Default)]
pub struct LazyKubeClient {
	cell: OnceCell<KubeClient>,
}

impl LazyKubeClient {
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether the underlying client has been built.
	pub fn is_initialized(&self) -> bool {
		self.cell.initialized()
	}

	async fn client(&self) -> Result<&KubeClient, K8sError> {
		self.cell.get_or_try_init(KubeClient::new).await
	}
}

#[async_trait]
impl K8sClient for LazyKubeClient {
	async fn create_pvc(
		&self,
		namespace: &str,
		pvc: PersistentVolumeClaim,
	) -> Result<PersistentVolumeClaim, K8sError> {
		self.client().await?.create_pvc(namespace, pvc).await
	}
}
