// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The tracker facade: one explicitly constructed component owning the
//! buffer, the session, and the background sync loop.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use atlas_tracker_core::{RawFix, TrackPoint, TrackingSession};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::buffer::OfflineBuffer;
use crate::connectivity::{Connectivity, ConnectivityState};
use crate::error::{Result, TrackerError};
use crate::gateway::SyncGateway;
use crate::http::{GatewayConfig, HttpSyncGateway};
use crate::ingest::IngestPipeline;
use crate::session::SessionManager;
use crate::source::LocationSource;
use crate::store::SessionStore;
use crate::sync::{SyncScheduler, DEFAULT_SYNC_INTERVAL};

/// Configuration for the tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
	/// Interval between scheduled sync attempts.
	pub sync_interval: Duration,
	/// Gateway call timeouts.
	pub gateway: GatewayConfig,
}

impl Default for TrackerConfig {
	fn default() -> Self {
		Self {
			sync_interval: DEFAULT_SYNC_INTERVAL,
			gateway: GatewayConfig::default(),
		}
	}
}

/// Builder for constructing a [`Tracker`].
pub struct TrackerBuilder {
	base_url: Option<String>,
	auth_token: Option<String>,
	state_path: Option<PathBuf>,
	config: TrackerConfig,
}

impl TrackerBuilder {
	pub fn new() -> Self {
		Self {
			base_url: None,
			auth_token: None,
			state_path: None,
			config: TrackerConfig::default(),
		}
	}

	/// Sets the base URL of the Atlas location service.
	///
	/// Example: `https://atlas.example.com`
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());
		self
	}

	/// Sets the bearer token used for every gateway call.
	pub fn auth_token(mut self, token: impl Into<String>) -> Self {
		self.auth_token = Some(token.into());
		self
	}

	/// Sets where the current session id is persisted across restarts.
	pub fn state_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.state_path = Some(path.into());
		self
	}

	/// Sets the interval between scheduled sync attempts.
	pub fn sync_interval(mut self, interval: Duration) -> Self {
		self.config.sync_interval = interval;
		self
	}

	/// Sets the timeout for single-point sends (the capture path bound).
	pub fn point_timeout(mut self, timeout: Duration) -> Self {
		self.config.gateway.point_timeout = timeout;
		self
	}

	/// Sets the timeout for batch sync submissions.
	pub fn batch_timeout(mut self, timeout: Duration) -> Self {
		self.config.gateway.batch_timeout = timeout;
		self
	}

	/// Builds a tracker talking HTTP to the configured service.
	pub fn build(self) -> Result<Tracker> {
		let base_url = self.base_url.clone().ok_or(TrackerError::InvalidBaseUrl)?;
		let auth_token = self
			.auth_token
			.clone()
			.ok_or(TrackerError::MissingAuthToken)?;

		let gateway = Arc::new(HttpSyncGateway::new(
			base_url,
			auth_token,
			self.config.gateway.clone(),
		)?);
		Ok(self.build_with_gateway(gateway))
	}

	/// Builds a tracker over a custom gateway implementation.
	pub fn build_with_gateway(self, gateway: Arc<dyn SyncGateway>) -> Tracker {
		let store = SessionStore::new(
			self.state_path.unwrap_or_else(SessionStore::default_path),
		);

		let buffer = Arc::new(OfflineBuffer::new());
		let connectivity = Arc::new(ConnectivityState::new());
		let sessions = Arc::new(SessionManager::new(gateway.clone(), store));
		let pipeline = IngestPipeline::new(
			buffer.clone(),
			connectivity.clone(),
			sessions.clone(),
			gateway.clone(),
		);

		info!("Tracker initialized");

		Tracker {
			inner: Arc::new(TrackerInner {
				buffer,
				connectivity,
				sessions,
				pipeline,
				gateway,
				config: self.config,
				scheduler: Mutex::new(None),
				sync_task: Mutex::new(None),
				pump_task: Mutex::new(None),
				closed: AtomicBool::new(false),
			}),
		}
	}
}

impl Default for TrackerBuilder {
	fn default() -> Self {
		Self::new()
	}
}

struct TrackerInner {
	buffer: Arc<OfflineBuffer>,
	connectivity: Arc<ConnectivityState>,
	sessions: Arc<SessionManager>,
	pipeline: IngestPipeline,
	gateway: Arc<dyn SyncGateway>,
	config: TrackerConfig,
	scheduler: Mutex<Option<Arc<SyncScheduler>>>,
	sync_task: Mutex<Option<JoinHandle<()>>>,
	pump_task: Mutex<Option<JoinHandle<()>>>,
	closed: AtomicBool,
}

/// Location tracker with offline buffering and background sync.
///
/// # Example
///
/// ```ignore
/// use atlas_tracker::Tracker;
///
/// let tracker = Tracker::builder()
///     .base_url("https://atlas.example.com")
///     .auth_token(token)
///     .build()?;
///
/// let session = tracker.start_tracking(true).await?;
///
/// let (fixes, rx) = atlas_tracker::fix_channel();
/// tracker.pump_fixes(rx).await;
/// // platform layer pushes RawFix values into `fixes`
///
/// tracker.stop_tracking().await?;
/// ```
#[derive(Clone)]
pub struct Tracker {
	inner: Arc<TrackerInner>,
}

impl Tracker {
	/// Creates a new builder for constructing a Tracker.
	pub fn builder() -> TrackerBuilder {
		TrackerBuilder::new()
	}

	/// Starts a tracking session and the background sync scheduler.
	///
	/// Returns the existing session when one is already active, and a
	/// [`TrackerError::State`] when a stop is still in flight.
	pub async fn start_tracking(&self, background: bool) -> Result<TrackingSession> {
		self.check_closed()?;

		let session = self.inner.sessions.start(background).await?;

		let mut scheduler_slot = self.inner.scheduler.lock().await;
		if scheduler_slot.is_none() {
			let scheduler = Arc::new(SyncScheduler::new(
				self.inner.buffer.clone(),
				self.inner.connectivity.clone(),
				self.inner.sessions.clone(),
				self.inner.gateway.clone(),
				self.inner.config.sync_interval,
			));
			let task = tokio::spawn({
				let scheduler = scheduler.clone();
				async move { scheduler.run().await }
			});
			*scheduler_slot = Some(scheduler);
			*self.inner.sync_task.lock().await = Some(task);
		}

		Ok(session)
	}

	/// Stops tracking: drains what it can, ends the session, and cancels
	/// the background tasks. Idempotent.
	pub async fn stop_tracking(&self) -> Result<()> {
		// New fixes stop flowing first so the final drain sees a settled
		// buffer.
		if let Some(pump) = self.inner.pump_task.lock().await.take() {
			pump.abort();
		}

		let scheduler = self.inner.scheduler.lock().await.take();
		if let Some(scheduler) = scheduler {
			scheduler.shutdown();
		}
		if let Some(task) = self.inner.sync_task.lock().await.take() {
			// The loop exits after its final drain; a stale in-flight send
			// cannot touch session state once stop() below has run.
			let _ = task.await;
		}

		self.inner.sessions.stop().await
	}

	/// Shuts the tracker down permanently: stops tracking and rejects any
	/// further `start_tracking`. Idempotent.
	pub async fn shutdown(&self) -> Result<()> {
		if self.inner.closed.swap(true, Ordering::SeqCst) {
			return Ok(());
		}
		self.stop_tracking().await?;
		info!("Tracker shut down");
		Ok(())
	}

	/// Returns true if the tracker has been shut down.
	pub fn is_closed(&self) -> bool {
		self.inner.closed.load(Ordering::SeqCst)
	}

	/// Ingests one captured fix through the pipeline.
	pub async fn ingest(&self, fix: RawFix) {
		if self.is_closed() {
			debug!("Tracker closed; ignoring fix");
			return;
		}
		self.inner.pipeline.ingest(fix).await;
	}

	/// Spawns the pump that feeds continuously emitted fixes into ingestion.
	///
	/// The pump stops when the sender side closes or tracking stops.
	pub async fn pump_fixes(&self, mut rx: mpsc::Receiver<RawFix>) {
		let tracker = self.clone();
		let task = tokio::spawn(async move {
			while let Some(fix) = rx.recv().await {
				tracker.ingest(fix).await;
			}
			debug!("Fix channel closed; pump exiting");
		});

		if let Some(previous) = self.inner.pump_task.lock().await.replace(task) {
			previous.abort();
		}
	}

	/// Requests the current position from the device capability.
	///
	/// The normalized point is returned directly to the caller: no session
	/// association, no buffering. Permission and transport errors propagate.
	pub async fn current_location(&self, source: &dyn LocationSource) -> Result<TrackPoint> {
		let fix = source.current_fix().await?;
		Ok(TrackPoint::normalize(fix)?)
	}

	/// Snapshot of the current session.
	pub async fn session(&self) -> TrackingSession {
		self.inner.sessions.current().await
	}

	/// Number of points waiting in the offline buffer.
	pub async fn buffered_points(&self) -> usize {
		self.inner.buffer.len().await
	}

	/// Last observed connectivity.
	pub fn connectivity(&self) -> Connectivity {
		self.inner.connectivity.get()
	}

	fn check_closed(&self) -> Result<()> {
		if self.is_closed() {
			return Err(TrackerError::ClientShutdown);
		}
		Ok(())
	}
}
