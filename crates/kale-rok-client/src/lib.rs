// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Rok gateway client for the Kale Rok bridge.
//!
//! This crate provides a typed Rust client for the Rok gateway API, the
//! lazily-initialized handle the RPC handlers share, and helpers built on
//! top of the raw API (such as creating a bucket only when it is missing).
//!
//! # Example
//!
//! ```ignore
//! use kale_rok_client::{RokClientCell, RokClientConfig};
//!
//! let rok = RokClientCell::from_config(RokClientConfig::from_env()?);
//! let client = rok.get().await?;
//! let info = client.version_info("notebooks", "my-notebook", "v1").await?;
//! println!("{}", info.get_str("rok_url")?);
//! ```

mod api;
mod bucket;
mod cell;
mod client;
mod config;
mod error;
pub mod mock;
mod secret;
mod types;

pub use api::RokApi;
pub use bucket::ensure_bucket;
pub use cell::{RokClientCell, RokClientFactory, RokHandle};
pub use client::RokClient;
pub use config::{
	load_secret_env, RokClientConfig, SecretEnvError, DEFAULT_REQUEST_TIMEOUT, ROK_GW_TOKEN_ENV,
	ROK_GW_URL_ENV,
};
pub use error::{RokError, RokInitError, RokResult};
pub use secret::{SecretString, REDACTED};
pub use types::{ObjectKind, Suggestion, VersionInfo, VersionInfoError, VersionParams};
