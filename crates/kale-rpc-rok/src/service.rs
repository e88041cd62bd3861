// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use kale_k8s::{K8sClient, PodEnvironment};
use kale_rok_client::{RokClientCell, RokHandle};
use tracing::error;

use crate::context::RequestContext;
use crate::error::RpcError;

/// Entry point for the Rok RPC handlers.
///
/// Handlers live in their own modules as `impl RokRpc` blocks.
#[derive(Clone)]
pub struct RokRpc {
	rok: Arc<RokClientCell>,
	pub(crate) k8s: Arc<dyn K8sClient>,
	pod: Arc<dyn PodEnvironment>,
}

impl RokRpc {
	pub fn new(
		rok: Arc<RokClientCell>,
		k8s: Arc<dyn K8sClient>,
		pod: Arc<dyn PodEnvironment>,
	) -> Self {
		Self { rok, k8s, pod }
	}

	/// Return the shared Rok client, building it on first use.
	pub(crate) async fn client(&self, ctx: &RequestContext) -> Result<RokHandle, RpcError> {
		self.rok.get().await.map_err(|e| {
			error!(parent: &ctx.span(), error = %e, "Failed to initialize Rok client");
			if e.is_not_configured() {
				RpcError::not_found(ctx, "Rok gateway client not configured")
					.with_message(e.to_string())
			} else {
				RpcError::service_unavailable(ctx, "Failed to initialize Rok client")
					.with_message(e.to_string())
			}
		})
	}

	pub(crate) fn namespace(&self, ctx: &RequestContext) -> Result<String, RpcError> {
		self.pod.namespace().map_err(|e| {
			error!(parent: &ctx.span(), error = %e, "Failed to read pod namespace");
			RpcError::internal(ctx, "Failed to read pod namespace").with_message(e.to_string())
		})
	}

	pub(crate) fn hostname(&self, ctx: &RequestContext) -> Result<String, RpcError> {
		self.pod.hostname().map_err(|e| {
			error!(parent: &ctx.span(), error = %e, "Failed to read pod hostname");
			RpcError::internal(ctx, "Failed to read pod hostname").with_message(e.to_string())
		})
	}

	pub(crate) fn pod_name(&self, ctx: &RequestContext) -> Result<String, RpcError> {
		self.pod.pod_name().map_err(|e| {
			error!(parent: &ctx.span(), error = %e, "Failed to read pod name");
			RpcError::internal(ctx, "Failed to read pod name").with_message(e.to_string())
		})
	}
}

impl std::fmt::Debug for RokRpc {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RokRpc").field("rok", &self.rok).finish_non_exhaustive()
	}
}
