// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The network boundary: session registration and point delivery.

use atlas_tracker_core::{SessionId, TrackPoint};

use crate::error::Result;

/// Remote location service operations consumed by the tracker.
///
/// One implementation talks HTTP to the Atlas service; tests substitute
/// their own. Delivery is at-least-once: the service deduplicates on its
/// side, this client only guarantees no point is lost or sent twice within
/// a single process lifetime.
#[async_trait::async_trait]
pub trait SyncGateway: Send + Sync {
	/// Registers a new tracking session and returns its identifier.
	async fn create_session(&self, is_background: bool, is_offline: bool) -> Result<SessionId>;

	/// Submits one point into an active session. Bounded by the single-point
	/// timeout; any transport or server failure means the point must be
	/// buffered by the caller.
	async fn submit_point(&self, session_id: SessionId, point: &TrackPoint) -> Result<()>;

	/// Submits buffered points in one request, preserving order. The service
	/// materializes an offline session for the batch, so no session id is
	/// required.
	async fn submit_batch(&self, points: &[TrackPoint]) -> Result<()>;

	/// Ends a session. Best effort: the tracker logs failures and moves on.
	async fn stop_session(&self, session_id: SessionId) -> Result<()>;
}
