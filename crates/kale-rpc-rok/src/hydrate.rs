// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use kale_k8s::{
	ObjectMeta, PersistentVolumeClaim, PersistentVolumeClaimSpec, Quantity,
	VolumeResourceRequirements,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::context::RequestContext;
use crate::error::RpcError;
use crate::service::RokRpc;
use crate::volumes::ROK_ORIGIN_ANNOTATION;

/// Secret holding the Rok credentials the storage driver uses.
pub const ROK_CREDS_SECRET_NAME: &str = "rok-secret-user";

const ROK_CREDS_ANNOTATION: &str = "rok/creds-secret-name";
const ROK_STORAGE_CLASS: &str = "rok";
const GIB: u64 = 1 << 30;

/// Size of a snapshot in whole GiB, rounded up.
pub fn snapshot_size_gib(content_length: u64) -> u64 {
	content_length.div_ceil(GIB)
}

/// A claim that the Rok storage class fills from `rok_url`.
pub fn rok_pvc(name: &str, size_gib: u64, rok_url: &str) -> PersistentVolumeClaim {
	PersistentVolumeClaim {
		metadata: ObjectMeta {
			name: Some(name.to_string()),
			annotations: Some(BTreeMap::from([
				(
					ROK_CREDS_ANNOTATION.to_string(),
					ROK_CREDS_SECRET_NAME.to_string(),
				),
				(ROK_ORIGIN_ANNOTATION.to_string(), rok_url.to_string()),
			])),
			..Default::default()
		},
		spec: Some(PersistentVolumeClaimSpec {
			storage_class_name: Some(ROK_STORAGE_CLASS.to_string()),
			access_modes: Some(vec!["ReadWriteOnce".to_string()]),
			resources: Some(VolumeResourceRequirements {
				requests: Some(BTreeMap::from([(
					"storage".to_string(),
					Quantity(format!("{size_gib}Gi")),
				)])),
				..Default::default()
			}),
			..Default::default()
		}),
		..Default::default()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydrateResult {
	pub name: String,
}

impl RokRpc {
	/// Create a PVC in the pod's namespace whose contents come from the
	/// snapshot `bucket/object/version`.
	pub async fn hydrate_pvc_from_snapshot(
		&self,
		ctx: &RequestContext,
		object: &str,
		version: &str,
		new_pvc_name: &str,
		bucket: &str,
	) -> Result<HydrateResult, RpcError> {
		let span = ctx.span();
		let rok = self.client(ctx).await?;

		let info = rok
			.version_info(bucket, object, version)
			.await
			.map_err(|e| {
				error!(parent: &span, error = %e, bucket, object, version, "Failed to get version info");
				RpcError::internal(ctx, "Failed to retrieve snapshot information")
					.with_message(e.to_string())
			})?;

		let (content_length, rok_url) = info
			.get_u64("content_length")
			.and_then(|len| Ok((len, info.get_str("rok_url")?)))
			.map_err(|e| {
				error!(parent: &span, error = %e, object, version, "Malformed snapshot metadata");
				RpcError::invalid_value(ctx, e.to_string())
			})?;
		let size_gib = snapshot_size_gib(content_length);

		let namespace = self.namespace(ctx)?;
		let created = self
			.k8s
			.create_pvc(&namespace, rok_pvc(new_pvc_name, size_gib, &rok_url))
			.await
			.map_err(|e| {
				error!(parent: &span, error = %e, namespace = %namespace, pvc = new_pvc_name, "Failed to create PVC");
				RpcError::internal(ctx, format!("Failed to create PVC '{new_pvc_name}'"))
					.with_message(e.to_string())
			})?;

		let name = created
			.metadata
			.name
			.unwrap_or_else(|| new_pvc_name.to_string());
		info!(parent: &span, pvc = %name, namespace = %namespace, size_gib, "Hydrated PVC from snapshot");
		Ok(HydrateResult { name })
	}
}
