// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! RPC error taxonomy.

use std::fmt;

use thiserror::Error;

use crate::context::RequestContext;

/// What went wrong, at the granularity callers act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcErrorKind {
	/// Something the caller asked about does not exist: the Rok client, a
	/// group member, the notebook in Rok's listing.
	NotFound,
	/// Rok exists but cannot be reached or used right now.
	ServiceUnavailable,
	/// Data returned by Rok does not have the expected shape.
	InvalidValue,
	/// Any other failure of a collaborator.
	Internal,
}

impl RpcErrorKind {
	/// Stable wire code.
	pub fn code(&self) -> &'static str {
		match self {
			RpcErrorKind::NotFound => "not_found",
			RpcErrorKind::ServiceUnavailable => "service_unavailable",
			RpcErrorKind::InvalidValue => "value_error",
			RpcErrorKind::Internal => "internal_error",
		}
	}
}

impl fmt::Display for RpcErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code())
	}
}

/// Error returned by every handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {details}")]
pub struct RpcError {
	pub kind: RpcErrorKind,
	/// Short, user-facing description.
	pub details: String,
	/// Underlying error text, when there is one worth showing.
	pub message: Option<String>,
	pub trans_id: String,
}

impl RpcError {
	pub fn new(kind: RpcErrorKind, ctx: &RequestContext, details: impl Into<String>) -> Self {
		Self {
			kind,
			details: details.into(),
			message: None,
			trans_id: ctx.trans_id().to_string(),
		}
	}

	pub fn not_found(ctx: &RequestContext, details: impl Into<String>) -> Self {
		Self::new(RpcErrorKind::NotFound, ctx, details)
	}

	pub fn service_unavailable(ctx: &RequestContext, details: impl Into<String>) -> Self {
		Self::new(RpcErrorKind::ServiceUnavailable, ctx, details)
	}

	pub fn invalid_value(ctx: &RequestContext, details: impl Into<String>) -> Self {
		Self::new(RpcErrorKind::InvalidValue, ctx, details)
	}

	pub fn internal(ctx: &RequestContext, details: impl Into<String>) -> Self {
		Self::new(RpcErrorKind::Internal, ctx, details)
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}
}
