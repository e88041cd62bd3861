// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use tracing::Span;

/// Per-request state handed to every handler.
#[derive(Debug, Clone)]
pub struct RequestContext {
	trans_id: String,
	span: Option<Span>,
}

impl RequestContext {
	pub fn new(trans_id: impl Into<String>) -> Self {
		Self {
			trans_id: trans_id.into(),
			span: None,
		}
	}

	/// Log under a span owned by the caller (usually the dispatch layer's
	/// per-request span).
	pub fn with_span(mut self, span: Span) -> Self {
		self.span = Some(span);
		self
	}

	/// Correlation id echoed back in every error.
	pub fn trans_id(&self) -> &str {
		&self.trans_id
	}

	/// Span handler logs are attached to. Without a caller span a fresh
	/// `rok_rpc` span carrying the transaction id is used.
	pub fn span(&self) -> Span {
		match &self.span {
			Some(span) => span.clone(),
			None => tracing::info_span!("rok_rpc", trans_id = %self.trans_id),
		}
	}
}
