// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Group snapshot members and clone-volume resolution.
//!
//! Snapshotting a notebook produces a *group* version whose metadata lists
//! one member per volume of the pod, named `<group object>_<volume name>`.
//! A pipeline step that wants a copy of one of those volumes asks for a
//! `clone` volume; resolving it turns the request into a `new_pvc` volume
//! annotated with the member's `rok/origin` URL.

use kale_rok_client::{VersionInfo, VersionInfoError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, error};

use crate::context::RequestContext;
use crate::error::RpcError;
use crate::service::RokRpc;

pub const VOLUME_TYPE_CLONE: &str = "clone";
pub const VOLUME_TYPE_NEW_PVC: &str = "new_pvc";
pub const ROK_ORIGIN_ANNOTATION: &str = "rok/origin";

const GROUP_MEMBER_COUNT: &str = "group_member_count";

/// A volume as requested by a pipeline.
///
/// Only `name` and `type` are interpreted, and only for clone volumes.
/// Everything else, annotations included, is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volume(pub Map<String, Value>);

impl Volume {
	pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
		let mut fields = Map::new();
		fields.insert("name".into(), Value::String(name.into()));
		fields.insert("type".into(), Value::String(kind.into()));
		Self(fields)
	}

	pub fn fields(&self) -> &Map<String, Value> {
		&self.0
	}

	pub fn name(&self) -> Option<&str> {
		self.0.get("name").and_then(Value::as_str)
	}

	pub fn kind(&self) -> Option<&str> {
		self.0.get("type").and_then(Value::as_str)
	}

	pub fn annotations(&self) -> Option<&Value> {
		self.0.get("annotations")
	}

	pub fn is_clone(&self) -> bool {
		self.kind() == Some(VOLUME_TYPE_CLONE)
	}
}

/// One member of a group version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescriptor {
	pub object: String,
	pub version: String,
	pub rok_url: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
	#[error("Volume '{volume}' not found in group '{group}'")]
	MemberNotFound { volume: String, group: String },

	#[error("Clone volume has no name: {volume}")]
	MissingName { volume: String },

	#[error(transparent)]
	Metadata(#[from] VersionInfoError),
}

/// List the members of a group version in index order.
pub fn extract_members(info: &VersionInfo) -> Result<Vec<MemberDescriptor>, VersionInfoError> {
	let count = info.get_u64(GROUP_MEMBER_COUNT)?;
	(0..count)
		.map(|i| {
			Ok(MemberDescriptor {
				object: info.get_str(&format!("group_member_{i}_object"))?,
				version: info.get_str(&format!("group_member_{i}_version"))?,
				rok_url: info.get_str(&format!("group_member_{i}_url"))?,
			})
		})
		.collect()
}

/// Turn a clone request into a `new_pvc` volume pointing at the matching
/// member of `group`. The first member named `<group>_<volume name>` wins.
pub fn resolve_clone(
	volume: &Volume,
	group: &str,
	members: &[MemberDescriptor],
) -> Result<Volume, ResolveError> {
	let name = volume.name().ok_or_else(|| ResolveError::MissingName {
		volume: Value::Object(volume.0.clone()).to_string(),
	})?;
	let member_name = format!("{group}_{name}");
	let member = members
		.iter()
		.find(|m| m.object == member_name)
		.ok_or_else(|| ResolveError::MemberNotFound {
			volume: name.to_string(),
			group: group.to_string(),
		})?;

	let mut resolved = volume.clone();
	resolved
		.0
		.insert("type".into(), Value::String(VOLUME_TYPE_NEW_PVC.into()));
	resolved.0.insert(
		"annotations".into(),
		json!([{"key": ROK_ORIGIN_ANNOTATION, "value": member.rok_url}]),
	);
	Ok(resolved)
}

/// Resolve every clone volume; other volumes are copied as they are.
/// Output is positionally aligned with the input.
pub fn resolve_volumes(
	volumes: &[Volume],
	group: &str,
	members: &[MemberDescriptor],
) -> Result<Vec<Volume>, ResolveError> {
	volumes
		.iter()
		.map(|volume| {
			if volume.is_clone() {
				resolve_clone(volume, group, members)
			} else {
				Ok(volume.clone())
			}
		})
		.collect()
}

impl RokRpc {
	/// Replace the volumes to be cloned with references to the members of
	/// the group snapshot `bucket/object/version`.
	pub async fn replace_cloned_volumes(
		&self,
		ctx: &RequestContext,
		bucket: &str,
		object: &str,
		version: &str,
		volumes: &[Volume],
	) -> Result<Vec<Volume>, RpcError> {
		let span = ctx.span();
		let rok = self.client(ctx).await?;

		let info = rok
			.version_info(bucket, object, version)
			.await
			.map_err(|e| {
				error!(parent: &span, error = %e, bucket, object, version, "Failed to get version info");
				RpcError::internal(ctx, "Failed to retrieve snapshot information").with_message(e.to_string())
			})?;

		let members = extract_members(&info).map_err(|e| {
			error!(parent: &span, error = %e, object, "Malformed group metadata");
			RpcError::invalid_value(ctx, e.to_string())
		})?;
		debug!(parent: &span, members = members.len(), object, "Resolved group members");

		resolve_volumes(volumes, object, &members).map_err(|e| {
			error!(parent: &span, error = %e, "Failed to resolve cloned volume");
			match e {
				ResolveError::MemberNotFound { .. } => RpcError::not_found(ctx, e.to_string()),
				ResolveError::MissingName { .. } | ResolveError::Metadata(_) => {
					RpcError::invalid_value(ctx, e.to_string())
				}
			}
		})
	}
}
