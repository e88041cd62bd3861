// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use tracing::{debug, info};

use crate::api::RokApi;
use crate::error::{RokError, RokResult};

/// Create `bucket` unless it already exists.
///
/// Returns `true` if this call created the bucket. Losing a creation race to
/// another caller counts as "already exists".
pub async fn ensure_bucket(rok: &dyn RokApi, bucket: &str) -> RokResult<bool> {
	match rok.bucket_info(bucket).await {
		Ok(_) => {
			debug!(bucket = %bucket, "Bucket already exists");
			Ok(false)
		}
		Err(RokError::NotFound { .. }) => match rok.bucket_create(bucket).await {
			Ok(_) => {
				info!(bucket = %bucket, "Created bucket");
				Ok(true)
			}
			Err(RokError::Conflict { .. }) => Ok(false),
			Err(e) => Err(e),
		},
		Err(e) => Err(e),
	}
}
