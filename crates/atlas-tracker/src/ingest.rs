// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Routing of captured fixes: send now, buffer, or discard.

use std::sync::Arc;

use atlas_tracker_core::{RawFix, TrackPoint};
use tracing::{debug, warn};

use crate::buffer::OfflineBuffer;
use crate::connectivity::ConnectivityState;
use crate::gateway::SyncGateway;
use crate::session::SessionManager;

/// Receives raw fixes and routes the normalized point.
///
/// Every ingested point either reaches the gateway or lands in the buffer,
/// never both and never neither. Delivery failures are absorbed here; the
/// capture path is never interrupted by sync problems.
pub struct IngestPipeline {
	buffer: Arc<OfflineBuffer>,
	connectivity: Arc<ConnectivityState>,
	sessions: Arc<SessionManager>,
	gateway: Arc<dyn SyncGateway>,
}

impl IngestPipeline {
	pub fn new(
		buffer: Arc<OfflineBuffer>,
		connectivity: Arc<ConnectivityState>,
		sessions: Arc<SessionManager>,
		gateway: Arc<dyn SyncGateway>,
	) -> Self {
		Self {
			buffer,
			connectivity,
			sessions,
			gateway,
		}
	}

	/// Ingests one captured fix.
	///
	/// Blocks the caller for at most one bounded single-point send. Fixes
	/// captured with no active session are discarded by design: points must
	/// belong to a session, and none exists to attach them to.
	pub async fn ingest(&self, fix: RawFix) {
		let point = match TrackPoint::normalize(fix) {
			Ok(point) => point,
			Err(e) => {
				warn!(error = %e, "Dropping fix that failed normalization");
				return;
			}
		};

		if !self.sessions.accepts_points().await {
			debug!("No active session; discarding point");
			return;
		}

		// A session without an id cannot take single-point submits; its
		// points ride along with the next offline batch.
		let session_id = match self.sessions.session_id().await {
			Some(id) if self.connectivity.is_online() => id,
			_ => {
				self.buffer.enqueue(point).await;
				return;
			}
		};

		match self.gateway.submit_point(session_id, &point).await {
			Ok(()) => {
				debug!(session_id = %session_id, "Point delivered");
			}
			Err(e) => {
				warn!(session_id = %session_id, error = %e, "Point send failed; buffering");
				self.buffer.enqueue(point).await;
				self.connectivity.mark_offline();
			}
		}
	}
}
