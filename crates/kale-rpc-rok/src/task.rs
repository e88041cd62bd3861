// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use kale_rok_client::RokError;
use serde_json::Value;
use tracing::error;

use crate::context::RequestContext;
use crate::error::RpcError;
use crate::service::RokRpc;

impl RokRpc {
	/// Fetch a Rok task, e.g. the one started by a snapshot.
	pub async fn get_task(
		&self,
		ctx: &RequestContext,
		task_id: &str,
		bucket: &str,
	) -> Result<Value, RpcError> {
		let rok = self.client(ctx).await?;
		rok.task_get(bucket, task_id).await.map_err(|e| {
			error!(parent: &ctx.span(), error = %e, bucket, task_id, "Failed to get task");
			match e {
				RokError::NotFound { .. } => {
					RpcError::not_found(ctx, format!("Task '{task_id}' not found"))
				}
				e => RpcError::internal(ctx, "Failed to retrieve task").with_message(e.to_string()),
			}
		})
	}
}
