// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::K8sError;
use crate::types::PersistentVolumeClaim;

/// Trait for K8s client operations.
///
/// The Rok bridge only ever creates claims; everything else about a PVC's
/// lifecycle is left to the cluster and the Rok CSI driver.
#[async_trait]
pub trait K8sClient: Send + Sync {
	/// Create a PersistentVolumeClaim in the specified namespace and return
	/// the object as stored by the API server.
	async fn create_pvc(
		&self,
		namespace: &str,
		pvc: PersistentVolumeClaim,
	) -> Result<PersistentVolumeClaim, K8sError>;
}
