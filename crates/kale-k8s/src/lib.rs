// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! K8s client abstraction for the Kale Rok bridge.
//!
//! This crate provides:
//! - A trait-based K8s client abstraction for testability
//! - Production implementation using the kube crate, eagerly or lazily
//!   initialized
//! - Lookups of the notebook pod's own identity (pod name, namespace)
//! - Mock implementations for handler tests

mod client;
mod error;
mod kube_client;
mod lazy;
pub mod mock;
mod pod;
mod types;

pub use client::K8sClient;
pub use error::K8sError;
pub use kube_client::KubeClient;
pub use lazy::LazyKubeClient;
pub use pod::{InClusterEnvironment, PodEnvError, PodEnvironment, SA_NAMESPACE_PATH};
pub use types::{
	ObjectMeta, PersistentVolumeClaim, PersistentVolumeClaimSpec, Quantity,
	VolumeResourceRequirements,
};
