// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the tracker SDK.

use thiserror::Error;

/// Tracker SDK errors.
#[derive(Debug, Error)]
pub enum TrackerError {
	/// Base URL is missing or invalid.
	#[error("invalid base URL")]
	InvalidBaseUrl,

	/// Auth token is missing.
	#[error("missing auth token")]
	MissingAuthToken,

	/// HTTP transport failed: network unreachable, DNS, or timeout.
	#[error("transport error: {0}")]
	Transport(#[from] reqwest::Error),

	/// The service returned a non-success response.
	#[error("server error ({status}): {message}")]
	Server { status: u16, message: String },

	/// The device location capability denied or failed the request.
	#[error("location permission error: {0}")]
	Permission(String),

	/// Operation is invalid for the current session state.
	#[error("invalid session state: {0}")]
	State(String),

	/// Failed to read or write persisted tracker state.
	#[error("state storage error: {0}")]
	Storage(String),

	/// A fix could not be normalized into a point.
	#[error(transparent)]
	Normalize(#[from] atlas_tracker_core::CoreError),

	/// Client has been shut down.
	#[error("tracker has been shut down")]
	ClientShutdown,
}

impl From<std::io::Error> for TrackerError {
	fn from(err: std::io::Error) -> Self {
		TrackerError::Storage(err.to_string())
	}
}

impl From<serde_json::Error> for TrackerError {
	fn from(err: serde_json::Error) -> Self {
		TrackerError::Storage(err.to_string())
	}
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
