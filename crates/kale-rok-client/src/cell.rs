// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Lazily-initialized, shared Rok client handle.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::api::RokApi;
use crate::client::RokClient;
use crate::config::RokClientConfig;
use crate::error::RokInitError;

/// Shared handle to a Rok client.
pub type RokHandle = Arc<dyn RokApi>;

/// Builds the client the first time it is needed.
pub trait RokClientFactory: Send + Sync {
	fn create(&self) -> Result<RokHandle, RokInitError>;
}

impl<F> RokClientFactory for F
where
	F: Fn() -> Result<RokHandle, RokInitError> + Send + Sync,
{
	fn create(&self) -> Result<RokHandle, RokInitError> {
		self()
	}
}

/// Owns the process's Rok client.
///
/// The client is built by the factory on the first [`RokClientCell::get`]
/// and reused afterwards. Concurrent first calls wait on a single
/// construction. A failed construction is not cached, so the next call tries
/// again.
pub struct RokClientCell {
	factory: Box<dyn RokClientFactory>,
	client: OnceCell<RokHandle>,
}

impl RokClientCell {
	pub fn new(factory: impl RokClientFactory + 'static) -> Self {
		Self {
			factory: Box::new(factory),
			client: OnceCell::new(),
		}
	}

	/// A cell whose factory builds a [`RokClient`] from `config`.
	pub fn from_config(config: RokClientConfig) -> Self {
		Self::new(move || RokClient::new(config.clone()).map(|c| Arc::new(c) as RokHandle))
	}

	/// A cell that already holds `client`.
	pub fn with_client(client: RokHandle) -> Self {
		Self {
			factory: Box::new(|| -> Result<RokHandle, RokInitError> {
				Err(RokInitError::Configuration(
					"pre-initialized cell has no factory".to_string(),
				))
			}),
			client: OnceCell::new_with(Some(client)),
		}
	}

	/// Return the client, building it on first use.
	pub async fn get(&self) -> Result<RokHandle, RokInitError> {
		self
			.client
			.get_or_try_init(|| async {
				debug!("Initializing Rok client");
				self.factory.create().map_err(|e| {
					warn!(error = %e, "Rok client initialization failed");
					e
				})
			})
			.await
			.map(Arc::clone)
	}

	pub fn is_initialized(&self) -> bool {
		self.client.initialized()
	}
}

impl std::fmt::Debug for RokClientCell {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RokClientCell")
			.field("initialized", &self.is_initialized())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mock::MockRokClient;
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn counting_factory(
		calls: Arc<AtomicUsize>,
	) -> impl Fn() -> Result<RokHandle, RokInitError> + Send + Sync {
		move || {
			calls.fetch_add(1, Ordering::SeqCst);
			Ok(Arc::new(MockRokClient::new()) as RokHandle)
		}
	}

	#[tokio::test]
	async fn builds_once_and_reuses() {
		let calls = Arc::new(AtomicUsize::new(0));
		let cell = RokClientCell::new(counting_factory(calls.clone()));
		assert!(!cell.is_initialized());

		let first = cell.get().await.unwrap();
		let second = cell.get().await.unwrap();

		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert!(cell.is_initialized());
	}

	#[tokio::test]
	async fn concurrent_first_use_builds_once() {
		let calls = Arc::new(AtomicUsize::new(0));
		let cell = Arc::new(RokClientCell::new(counting_factory(calls.clone())));

		let tasks: Vec<_> = (0..8)
			.map(|_| {
				let cell = cell.clone();
				tokio::spawn(async move { cell.get().await.map(|_| ()) })
			})
			.collect();
		for task in tasks {
			task.await.unwrap().unwrap();
		}

		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn failures_are_not_cached() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		let cell = RokClientCell::new(move || {
			if counter.fetch_add(1, Ordering::SeqCst) == 0 {
				Err(RokInitError::Configuration("boom".into()))
			} else {
				Ok(Arc::new(MockRokClient::new()) as RokHandle)
			}
		});

		assert!(cell.get().await.is_err());
		assert!(!cell.is_initialized());
		assert!(cell.get().await.is_ok());
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn unconfigured_config_reports_not_configured() {
		let cell = RokClientCell::from_config(RokClientConfig::default());
		assert!(cell.get().await.err().unwrap().is_not_configured());
	}

	#[tokio::test]
	async fn pre_initialized_cell_returns_client() {
		let client: RokHandle = Arc::new(MockRokClient::new());
		let cell = RokClientCell::with_client(client.clone());
		assert!(cell.is_initialized());
		assert!(Arc::ptr_eq(&cell.get().await.unwrap(), &client));
	}
}
