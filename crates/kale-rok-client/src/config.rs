// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Client configuration loaded from the notebook's environment.
//!
//! Notebook pods get the gateway address in `ROK_GW_URL` and the access
//! token either directly in `ROK_GW_TOKEN` or as a mounted file referenced
//! by `ROK_GW_TOKEN_FILE`.

use std::path::PathBuf;
use std::time::Duration;
use std::{env, fs};

use thiserror::Error;

use crate::secret::SecretString;

/// Environment variable holding the gateway base URL.
pub const ROK_GW_URL_ENV: &str = "ROK_GW_URL";

/// Environment variable holding the gateway access token.
pub const ROK_GW_TOKEN_ENV: &str = "ROK_GW_TOKEN";

/// Request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when loading secrets from environment variables.
#[derive(Debug, Error)]
pub enum SecretEnvError {
	/// Failed to read the secret file.
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The secret file path was empty.
	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load a secret using the `VAR` / `VAR_FILE` convention.
///
/// `{var}_FILE` wins over `{var}`. A single trailing newline is stripped
/// from file content. Returns `Ok(None)` when neither is set.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content);
		return Ok(Some(SecretString::new(secret)));
	}

	if let Ok(value) = env::var(var) {
		return Ok(Some(SecretString::new(value)));
	}

	Ok(None)
}

/// Settings for [`crate::RokClient`].
#[derive(Debug, Clone)]
pub struct RokClientConfig {
	/// Gateway base URL. `None` means no gateway is available to this process.
	pub url: Option<String>,
	/// Bearer token sent with every request.
	pub token: Option<SecretString>,
	/// Per-request timeout.
	pub timeout: Duration,
}

impl Default for RokClientConfig {
	fn default() -> Self {
		Self {
			url: None,
			token: None,
			timeout: DEFAULT_REQUEST_TIMEOUT,
		}
	}
}

impl RokClientConfig {
	/// Read `ROK_GW_URL` and `ROK_GW_TOKEN` / `ROK_GW_TOKEN_FILE`.
	pub fn from_env() -> Result<Self, SecretEnvError> {
		let url = env::var(ROK_GW_URL_ENV).ok().filter(|u| !u.is_empty());
		let token = load_secret_env(ROK_GW_TOKEN_ENV)?;
		Ok(Self {
			url,
			token,
			..Self::default()
		})
	}

	pub fn with_url(mut self, url: impl Into<String>) -> Self {
		self.url = Some(url.into());
		self
	}

	pub fn with_token(mut self, token: impl Into<String>) -> Self {
		self.token = Some(SecretString::new(token));
		self
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[test]
	fn returns_none_when_not_set() {
		let var = "KALE_TEST_ROK_UNSET_12345";
		env::remove_var(var);
		env::remove_var(format!("{var}_FILE"));

		assert!(load_secret_env(var).unwrap().is_none());
	}

	#[test]
	fn reads_from_direct_env_var() {
		let var = "KALE_TEST_ROK_DIRECT_12345";
		env::set_var(var, "direct-token");
		env::remove_var(format!("{var}_FILE"));

		let secret = load_secret_env(var).unwrap().unwrap();
		assert_eq!(secret.expose(), "direct-token");

		env::remove_var(var);
	}

	#[test]
	fn file_var_takes_precedence_and_strips_newline() {
		let var = "KALE_TEST_ROK_FILE_12345";
		let mut file = NamedTempFile::new().unwrap();
		writeln!(file, "file-token").unwrap();

		env::set_var(var, "direct-token");
		env::set_var(format!("{var}_FILE"), file.path().to_str().unwrap());

		let secret = load_secret_env(var).unwrap().unwrap();
		assert_eq!(secret.expose(), "file-token");

		env::remove_var(var);
		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn missing_file_is_an_error() {
		let var = "KALE_TEST_ROK_MISSING_FILE_12345";
		env::set_var(format!("{var}_FILE"), "/nonexistent/kale/token");

		assert!(matches!(
			load_secret_env(var).unwrap_err(),
			SecretEnvError::Io { .. }
		));

		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn empty_file_path_is_an_error() {
		let var = "KALE_TEST_ROK_EMPTY_PATH_12345";
		env::set_var(format!("{var}_FILE"), "");

		assert!(matches!(
			load_secret_env(var).unwrap_err(),
			SecretEnvError::EmptyPath { .. }
		));

		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn builder_sets_fields() {
		let config = RokClientConfig::default()
			.with_url("http://rok.example")
			.with_token("t")
			.with_timeout(Duration::from_secs(5));
		assert_eq!(config.url.as_deref(), Some("http://rok.example"));
		assert_eq!(config.token.unwrap().expose(), "t");
		assert_eq!(config.timeout, Duration::from_secs(5));
	}
}
