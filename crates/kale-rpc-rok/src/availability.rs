// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use kale_rok_client::{ObjectKind, VersionParams};
use tracing::{debug, error};

use crate::context::RequestContext;
use crate::error::RpcError;
use crate::service::RokRpc;
use crate::DEFAULT_BUCKET;

const LAB_QUERY: &str = "params:lab";

impl RokRpc {
	/// Check that Rok can be used from this notebook.
	///
	/// Succeeds only when the client can be built, the account is reachable,
	/// and Rok lists this notebook among the labs of its namespace.
	pub async fn check_rok_availability(&self, ctx: &RequestContext) -> Result<(), RpcError> {
		let span = ctx.span();
		let rok = self.client(ctx).await?;

		rok.account_info().await.map_err(|e| {
			error!(parent: &span, error = %e, "Failed to retrieve account information");
			RpcError::service_unavailable(ctx, "Failed to access Rok")
		})?;

		let name = self.pod_name(ctx)?;
		let namespace = self.namespace(ctx)?;
		let params = VersionParams::from([("namespace".to_string(), namespace)]);

		let suggestions = rok
			.version_register_suggest(
				DEFAULT_BUCKET,
				&name,
				ObjectKind::Jupyter,
				LAB_QUERY,
				&params,
				true,
			)
			.await
			.map_err(|e| {
				error!(parent: &span, error = %e, "Failed to list lab suggestions");
				RpcError::service_unavailable(ctx, "Rok cannot list notebooks in this namespace")
					.with_message(e.to_string())
			})?;

		if !suggestions.iter().any(|s| s.value == name) {
			error!(parent: &span, notebook = %name, "Could not find notebook in list of suggestions");
			return Err(RpcError::not_found(
				ctx,
				"Could not find this notebook in notebooks listed by Rok",
			));
		}

		debug!(parent: &span, notebook = %name, "Rok is available");
		Ok(())
	}
}
