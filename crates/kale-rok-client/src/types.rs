// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Parameters attached to a version registration.
pub type VersionParams = BTreeMap<String, String>;

/// Kind of object a version is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
	/// A notebook server pod and all of its volumes.
	Jupyter,
	/// A single PVC.
	Dataset,
}

impl ObjectKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ObjectKind::Jupyter => "jupyter",
			ObjectKind::Dataset => "dataset",
		}
	}
}

impl fmt::Display for ObjectKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Errors raised while reading fields out of [`VersionInfo`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionInfoError {
	#[error("version info has no field '{key}'")]
	MissingField { key: String },

	#[error("version info field '{key}' is not an integer: {value}")]
	InvalidInteger { key: String, value: String },

	#[error("version info field '{key}' is not a scalar: {value}")]
	NotScalar { key: String, value: String },
}

/// Metadata of one stored version, as returned by the gateway.
///
/// This is a flat mapping; values are strings or numbers depending on the
/// gateway release, so accessors accept either.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionInfo(pub Map<String, Value>);

impl VersionInfo {
	pub fn new(fields: Map<String, Value>) -> Self {
		Self(fields)
	}

	pub fn fields(&self) -> &Map<String, Value> {
		&self.0
	}

	/// Read a field as a string. Numbers and booleans are rendered.
	pub fn get_str(&self, key: &str) -> Result<String, VersionInfoError> {
		match self.0.get(key) {
			None | Some(Value::Null) => Err(VersionInfoError::MissingField {
				key: key.to_string(),
			}),
			Some(Value::String(s)) => Ok(s.clone()),
			Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(v.to_string()),
			Some(v) => Err(VersionInfoError::NotScalar {
				key: key.to_string(),
				value: v.to_string(),
			}),
		}
	}

	/// Read a field as an unsigned integer, parsing strings.
	pub fn get_u64(&self, key: &str) -> Result<u64, VersionInfoError> {
		let invalid = |value: String| VersionInfoError::InvalidInteger {
			key: key.to_string(),
			value,
		};
		match self.0.get(key) {
			None | Some(Value::Null) => Err(VersionInfoError::MissingField {
				key: key.to_string(),
			}),
			Some(Value::Number(n)) => n.as_u64().ok_or_else(|| invalid(n.to_string())),
			Some(Value::String(s)) => s.trim().parse::<u64>().map_err(|_| invalid(s.clone())),
			Some(v) => Err(invalid(v.to_string())),
		}
	}
}

impl From<Map<String, Value>> for VersionInfo {
	fn from(fields: Map<String, Value>) -> Self {
		Self(fields)
	}
}

/// One entry of a version-register suggestion listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
	pub value: String,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Suggestion {
	pub fn new(value: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			extra: Map::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn info(value: Value) -> VersionInfo {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn get_str_accepts_strings_and_numbers() {
		let info = info(json!({"rok_url": "rok://a/b", "count": 3}));
		assert_eq!(info.get_str("rok_url").unwrap(), "rok://a/b");
		assert_eq!(info.get_str("count").unwrap(), "3");
	}

	#[test]
	fn get_str_reports_missing_field() {
		let info = info(json!({}));
		assert_eq!(
			info.get_str("rok_url").unwrap_err(),
			VersionInfoError::MissingField {
				key: "rok_url".to_string()
			}
		);
	}

	#[test]
	fn get_u64_parses_strings() {
		let info = info(json!({"content_length": "1073741825", "n": 2}));
		assert_eq!(info.get_u64("content_length").unwrap(), 1_073_741_825);
		assert_eq!(info.get_u64("n").unwrap(), 2);
	}

	#[test]
	fn get_u64_rejects_garbage() {
		let info = info(json!({"n": "two", "neg": -1}));
		assert!(matches!(
			info.get_u64("n").unwrap_err(),
			VersionInfoError::InvalidInteger { .. }
		));
		assert!(matches!(
			info.get_u64("neg").unwrap_err(),
			VersionInfoError::InvalidInteger { .. }
		));
	}

	#[test]
	fn suggestion_keeps_extra_fields() {
		let s: Suggestion = serde_json::from_value(json!({"value": "nb-0", "label": "Notebook"})).unwrap();
		assert_eq!(s.value, "nb-0");
		assert_eq!(s.extra.get("label"), Some(&json!("Notebook")));
	}

	#[test]
	fn object_kind_tags() {
		assert_eq!(ObjectKind::Jupyter.as_str(), "jupyter");
		assert_eq!(ObjectKind::Dataset.to_string(), "dataset");
	}
}
