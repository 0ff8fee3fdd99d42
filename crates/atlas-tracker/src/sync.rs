// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Periodic background drain of the offline buffer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{info, warn};

use crate::buffer::OfflineBuffer;
use crate::connectivity::ConnectivityState;
use crate::gateway::SyncGateway;
use crate::session::SessionManager;

/// Default interval between sync attempts.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(60);

/// Drains the offline buffer through batch submissions on a fixed interval.
///
/// The whole loop is one task, so at most one batch attempt is ever in
/// flight; a tick that would overlap a running attempt simply waits its
/// turn. The attempt is made regardless of the last observed connectivity:
/// an Offline flag may be stale, and the batch call itself is the probe.
pub struct SyncScheduler {
	buffer: Arc<OfflineBuffer>,
	connectivity: Arc<ConnectivityState>,
	sessions: Arc<SessionManager>,
	gateway: Arc<dyn SyncGateway>,
	interval: Duration,
	shutdown: AtomicBool,
	shutdown_notify: Notify,
}

impl SyncScheduler {
	pub fn new(
		buffer: Arc<OfflineBuffer>,
		connectivity: Arc<ConnectivityState>,
		sessions: Arc<SessionManager>,
		gateway: Arc<dyn SyncGateway>,
		interval: Duration,
	) -> Self {
		Self {
			buffer,
			connectivity,
			sessions,
			gateway,
			interval,
			shutdown: AtomicBool::new(false),
			shutdown_notify: Notify::new(),
		}
	}

	/// Runs the scheduler loop until shutdown.
	pub async fn run(&self) {
		info!(
			interval_secs = self.interval.as_secs(),
			"Starting offline sync scheduler"
		);

		loop {
			tokio::select! {
				_ = tokio::time::sleep(self.interval) => {
					if self.is_shutdown() {
						break;
					}
					self.sync_once().await;
				}
				_ = self.shutdown_notify.notified() => {
					// Final drain so a stopping session flushes what it can.
					self.sync_once().await;
					break;
				}
			}
		}

		info!("Offline sync scheduler stopped");
	}

	/// Signals the loop to perform a final drain and stop.
	pub fn shutdown(&self) {
		self.shutdown.store(true, Ordering::SeqCst);
		self.shutdown_notify.notify_one();
	}

	pub fn is_shutdown(&self) -> bool {
		self.shutdown.load(Ordering::SeqCst)
	}

	/// One sync attempt. Returns true when a batch was delivered.
	///
	/// The batch leaves the buffer before the network call, so no point is
	/// in flight twice; on failure it returns to the front, ahead of points
	/// ingested while the attempt ran.
	pub async fn sync_once(&self) -> bool {
		// An offline-fallback session gets another shot at registration on
		// every tick, so live ingestion can resume single-point sends.
		self.sessions.ensure_registered().await;

		if self.buffer.is_empty().await {
			return false;
		}

		let batch = self.buffer.drain_all().await;
		let count = batch.len();

		match self.gateway.submit_batch(&batch).await {
			Ok(()) => {
				self.connectivity.mark_online();
				info!(count, "Offline batch delivered");
				true
			}
			Err(e) => {
				warn!(count, error = %e, "Batch sync failed; points requeued");
				self.connectivity.mark_offline();
				self.buffer.enqueue_front(batch).await;
				false
			}
		}
	}
}
