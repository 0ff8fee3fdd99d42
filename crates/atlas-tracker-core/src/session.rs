// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracking session identity and lifecycle state.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Unique identifier for a tracking session, assigned by the location
/// service when the session is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub i64);

impl SessionId {
	#[must_use]
	pub fn as_i64(&self) -> i64 {
		self.0
	}
}

impl std::fmt::Display for SessionId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for SessionId {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		s.parse::<i64>()
			.map(Self)
			.map_err(|_| CoreError::InvalidSessionId(s.to_string()))
	}
}

/// Lifecycle state of a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
	/// No session exists yet
	Inactive,
	/// Session registration with the service is in progress
	Starting,
	/// Session is active and accepting points
	Active,
	/// Session is winding down; buffered points may still drain
	Stopping,
	/// Session ended
	Stopped,
}

impl std::fmt::Display for SessionState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			SessionState::Inactive => "inactive",
			SessionState::Starting => "starting",
			SessionState::Active => "active",
			SessionState::Stopping => "stopping",
			SessionState::Stopped => "stopped",
		};
		write!(f, "{s}")
	}
}

impl std::str::FromStr for SessionState {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"inactive" => Ok(SessionState::Inactive),
			"starting" => Ok(SessionState::Starting),
			"active" => Ok(SessionState::Active),
			"stopping" => Ok(SessionState::Stopping),
			"stopped" => Ok(SessionState::Stopped),
			other => Err(CoreError::InvalidState(other.to_string())),
		}
	}
}

/// A bounded period of active tracking.
///
/// At most one session is active at a time. A session started while the
/// location service was unreachable carries `is_offline_fallback = true` and
/// no id; the sync engine re-attempts registration until an id is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingSession {
	/// Service-assigned identifier; `None` until registration succeeds.
	pub id: Option<SessionId>,
	pub state: SessionState,
	/// Whether tracking runs in background mode (continuous fix stream).
	pub is_background: bool,
	/// True when the session started without reaching the service.
	pub is_offline_fallback: bool,
}

impl TrackingSession {
	/// A session that has not been started.
	#[must_use]
	pub fn inactive() -> Self {
		Self {
			id: None,
			state: SessionState::Inactive,
			is_background: false,
			is_offline_fallback: false,
		}
	}

	/// Whether the session currently accepts captured points.
	///
	/// Points may be submitted while Active, or while Stopping so the final
	/// drain can complete.
	#[must_use]
	pub fn accepts_points(&self) -> bool {
		matches!(self.state, SessionState::Active | SessionState::Stopping)
	}

	#[must_use]
	pub fn is_active(&self) -> bool {
		self.state == SessionState::Active
	}
}
