// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Rok snapshot RPC handlers for Kale notebooks.
//!
//! These handlers let a notebook snapshot itself or one of its volumes,
//! hydrate a new PVC from a snapshot, rewrite "clone" volume requests of a
//! pipeline into concrete snapshot references, and check whether Rok is
//! usable from the current pod.
//!
//! # Architecture
//!
//! [`RokRpc`] owns its collaborators and is shared by the RPC dispatch layer:
//!
//! - a [`RokClientCell`] holding the lazily built Rok gateway client
//! - a [`K8sClient`] used to create PVCs
//! - a [`PodEnvironment`] describing the pod the notebook runs in
//!
//! Every handler takes a [`RequestContext`] and returns either a plain
//! serializable result or an [`RpcError`] whose kind the caller can act on.

mod availability;
mod context;
mod error;
mod hydrate;
mod service;
mod snapshot;
mod task;
pub mod volumes;

pub use context::RequestContext;
pub use error::{RpcError, RpcErrorKind};
pub use hydrate::{rok_pvc, snapshot_size_gib, HydrateResult, ROK_CREDS_SECRET_NAME};
pub use service::RokRpc;
pub use snapshot::notebook_commit_message;
pub use volumes::{
	extract_members, resolve_clone, resolve_volumes, MemberDescriptor, ResolveError,
	Volume, ROK_ORIGIN_ANNOTATION, VOLUME_TYPE_CLONE, VOLUME_TYPE_NEW_PVC,
};

pub use kale_k8s::{K8sClient, PodEnvironment};
pub use kale_rok_client::RokClientCell;

/// Bucket used when the caller does not name one.
pub const DEFAULT_BUCKET: &str = "notebooks";
