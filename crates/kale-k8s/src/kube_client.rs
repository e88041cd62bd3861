// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use kube::{
	api::{Api, PostParams},
	Client,
};
use tracing::{debug, instrument};

use crate::client::K8sClient;
use crate::error::K8sError;
use crate::types::PersistentVolumeClaim;

/// Production K8s client implementation using the kube crate.
#[derive(Clone)]
pub struct KubeClient {
	client: Client,
}

impl KubeClient {
	/// Create a new KubeClient that auto-discovers cluster configuration.
	///
	/// This will attempt to load config from:
	/// 1. In-cluster service account (when running in K8s)
	/// 2. KUBECONFIG environment variable
	/// 3. ~/.kube/config
	pub async fn new() -> Result<Self, K8sError> {
		let client = Client::try_default()
			.await
			.map_err(|e| K8sError::ClientInit {
				message: e.to_string(),
			})?;
		debug!("K8s client initialized");
		Ok(Self { client })
	}
}

#[async_trait]
impl K8sClient for KubeClient {
	#[instrument(skip(self, pvc), fields(name = ?pvc.metadata.name))]
	async fn create_pvc(
		&self,
		namespace: &str,
		pvc: PersistentVolumeClaim,
	) -> Result<PersistentVolumeClaim, K8sError> {
		let pvcs: Api<PersistentVolumeClaim> = Api::namespaced(self.client.clone(), namespace);
		let name = pvc.metadata.name.clone().unwrap_or_default();
		match pvcs.create(&PostParams::default(), &pvc).await {
			Ok(created) => {
				debug!(namespace = %namespace, name = %name, "PVC created");
				Ok(created)
			}
			Err(kube::Error::Api(err)) if err.code == 409 => Err(K8sError::PvcAlreadyExists { name }),
			Err(kube::Error::Api(err)) if err.code == 404 => Err(K8sError::NamespaceNotFound {
				name: namespace.into(),
			}),
			Err(e) => Err(e.into()),
		}
	}
}
