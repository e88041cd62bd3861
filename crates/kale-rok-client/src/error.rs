// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the Rok gateway client.

use thiserror::Error;

use crate::config::SecretEnvError;

/// Errors that can occur when calling the Rok gateway.
#[derive(Debug, Error)]
pub enum RokError {
	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	/// Request timed out.
	#[error("Request timed out")]
	Timeout,

	/// Missing or rejected credentials.
	#[error("Unauthorized")]
	Unauthorized,

	/// The addressed bucket, object, version or task does not exist.
	#[error("Not found: {resource}")]
	NotFound { resource: String },

	/// The resource already exists.
	#[error("Conflict: {resource}")]
	Conflict { resource: String },

	/// Invalid or unparseable response from the gateway.
	#[error("Invalid response from Rok: {0}")]
	InvalidResponse(String),

	/// The gateway returned an error status.
	#[error("Rok API error: {status} - {message}")]
	ApiError { status: u16, message: String },
}

/// Result type for Rok gateway calls.
pub type RokResult<T> = Result<T, RokError>;

/// Errors that can occur while building a client.
#[derive(Debug, Error)]
pub enum RokInitError {
	/// No gateway is configured for this process.
	#[error("Rok gateway is not configured: set {var}")]
	NotConfigured { var: String },

	/// The configuration is present but unusable.
	#[error("invalid Rok client configuration: {0}")]
	Configuration(String),

	/// The access token could not be loaded.
	#[error(transparent)]
	Secret(#[from] SecretEnvError),
}

impl RokInitError {
	/// Whether the client is absent altogether, as opposed to present but
	/// failing to initialize.
	pub fn is_not_configured(&self) -> bool {
		matches!(self, RokInitError::NotConfigured { .. })
	}
}
