// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the core tracking types.

use thiserror::Error;

/// Errors that can occur when parsing or validating core types.
#[derive(Debug, Error)]
pub enum CoreError {
	/// Invalid session ID string
	#[error("invalid session ID: {0}")]
	InvalidSessionId(String),

	/// Invalid session state string
	#[error("invalid session state: {0}")]
	InvalidState(String),

	/// Fix carried a timestamp outside the representable range
	#[error("invalid fix timestamp: {0} ms")]
	InvalidTimestamp(i64),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
