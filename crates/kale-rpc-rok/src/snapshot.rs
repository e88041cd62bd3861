// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use kale_rok_client::{ensure_bucket, ObjectKind, RokHandle, VersionParams};
use serde_json::Value;
use tracing::{error, info};

use crate::context::RequestContext;
use crate::error::RpcError;
use crate::service::RokRpc;

/// Commit message recorded on a notebook snapshot.
pub fn notebook_commit_message(hostname: &str, namespace: &str) -> String {
	format!(
		"This is a snapshot of notebook {hostname} in namespace {namespace}.\n\
		 \n\
		 This snapshot was created by Kale in order to clone the volumes of the notebook\n\
		 and use them to spawn a Kubeflow pipeline."
	)
}

impl RokRpc {
	/// Snapshot the notebook's pod and all of its volumes.
	///
	/// `object` defaults to the pod name.
	pub async fn snapshot_notebook(
		&self,
		ctx: &RequestContext,
		bucket: &str,
		object: Option<&str>,
	) -> Result<Value, RpcError> {
		let rok = self.client(ctx).await?;
		let hostname = self.hostname(ctx)?;
		let namespace = self.namespace(ctx)?;
		let object = match object {
			Some(object) => object.to_string(),
			None => self.pod_name(ctx)?,
		};

		let params = VersionParams::from([
			("namespace".to_string(), namespace.clone()),
			(
				"commit_title".to_string(),
				format!("Snapshot of notebook {hostname}"),
			),
			(
				"commit_message".to_string(),
				notebook_commit_message(&hostname, &namespace),
			),
		]);

		self.register(ctx, &rok, bucket, &object, ObjectKind::Jupyter, &params)
			.await
	}

	/// Snapshot a single PVC of the notebook's namespace.
	pub async fn snapshot_pvc(
		&self,
		ctx: &RequestContext,
		pvc_name: &str,
		bucket: &str,
	) -> Result<Value, RpcError> {
		let rok = self.client(ctx).await?;
		let namespace = self.namespace(ctx)?;

		let params = VersionParams::from([
			("dataset".to_string(), pvc_name.to_string()),
			("namespace".to_string(), namespace),
			(
				"commit_title".to_string(),
				format!("Snapshot of PVC {pvc_name}"),
			),
			(
				"commit_message".to_string(),
				format!("Snapshot of PVC {pvc_name} for an InferenceServer"),
			),
		]);

		self.register(ctx, &rok, bucket, pvc_name, ObjectKind::Dataset, &params)
			.await
	}

	async fn register(
		&self,
		ctx: &RequestContext,
		rok: &RokHandle,
		bucket: &str,
		object: &str,
		kind: ObjectKind,
		params: &VersionParams,
	) -> Result<Value, RpcError> {
		let span = ctx.span();

		ensure_bucket(rok.as_ref(), bucket).await.map_err(|e| {
			error!(parent: &span, error = %e, bucket, "Failed to ensure bucket exists");
			RpcError::internal(ctx, format!("Failed to create bucket '{bucket}'"))
				.with_message(e.to_string())
		})?;

		let response = rok
			.version_register(bucket, object, kind, params)
			.await
			.map_err(|e| {
				error!(parent: &span, error = %e, bucket, object, %kind, "Failed to register version");
				RpcError::internal(ctx, format!("Failed to snapshot '{object}'"))
					.with_message(e.to_string())
			})?;

		info!(parent: &span, bucket, object, %kind, "Registered snapshot");
		Ok(response)
	}
}
