// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory gateway double shared by the unit tests in this crate.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use atlas_tracker_core::{RawFix, SessionId, TrackPoint};
use tokio::sync::Mutex;

use crate::error::{Result, TrackerError};
use crate::gateway::SyncGateway;

/// Builds a normalized point with a distinguishing latitude.
pub(crate) fn point_at(lat: f64) -> TrackPoint {
	TrackPoint::normalize(fix_at(lat)).unwrap()
}

/// Builds a raw fix with a distinguishing latitude.
pub(crate) fn fix_at(lat: f64) -> RawFix {
	RawFix {
		latitude: lat,
		longitude: 37.61,
		accuracy: 5.0,
		altitude: None,
		speed: -1.0,
		heading: -1.0,
		epoch_ms: 1_700_000_000_000,
	}
}

fn server_error() -> TrackerError {
	TrackerError::Server {
		status: 503,
		message: "mock failure".to_string(),
	}
}

/// Scriptable gateway: failures are toggled per operation, every accepted
/// call is recorded for assertions.
#[derive(Default)]
pub(crate) struct MockGateway {
	/// Scripted results for `create_session`; empty script means success.
	create_script: Mutex<VecDeque<bool>>,
	next_session_id: AtomicUsize,
	point_should_fail: AtomicBool,
	batch_should_fail: AtomicBool,
	stop_should_fail: AtomicBool,
	pub(crate) submitted_points: Mutex<Vec<(SessionId, TrackPoint)>>,
	pub(crate) submitted_batches: Mutex<Vec<Vec<TrackPoint>>>,
	pub(crate) stopped_sessions: Mutex<Vec<SessionId>>,
	pub(crate) created_sessions: AtomicUsize,
}

impl MockGateway {
	pub(crate) fn new() -> Self {
		Self {
			next_session_id: AtomicUsize::new(91),
			..Self::default()
		}
	}

	/// Queues outcomes for upcoming `create_session` calls; `false` fails.
	pub(crate) async fn script_create(&self, outcomes: &[bool]) {
		self.create_script.lock().await.extend(outcomes.iter().copied());
	}

	pub(crate) fn fail_points(&self, fail: bool) {
		self.point_should_fail.store(fail, Ordering::SeqCst);
	}

	pub(crate) fn fail_batches(&self, fail: bool) {
		self.batch_should_fail.store(fail, Ordering::SeqCst);
	}

	pub(crate) fn fail_stop(&self, fail: bool) {
		self.stop_should_fail.store(fail, Ordering::SeqCst);
	}

	pub(crate) async fn point_count(&self) -> usize {
		self.submitted_points.lock().await.len()
	}
}

#[async_trait::async_trait]
impl SyncGateway for MockGateway {
	async fn create_session(&self, _is_background: bool, _is_offline: bool) -> Result<SessionId> {
		let ok = self.create_script.lock().await.pop_front().unwrap_or(true);
		if !ok {
			return Err(server_error());
		}
		self.created_sessions.fetch_add(1, Ordering::SeqCst);
		let id = self.next_session_id.fetch_add(1, Ordering::SeqCst);
		Ok(SessionId(id as i64))
	}

	async fn submit_point(&self, session_id: SessionId, point: &TrackPoint) -> Result<()> {
		if self.point_should_fail.load(Ordering::SeqCst) {
			return Err(server_error());
		}
		self.submitted_points
			.lock()
			.await
			.push((session_id, point.clone()));
		Ok(())
	}

	async fn submit_batch(&self, points: &[TrackPoint]) -> Result<()> {
		if self.batch_should_fail.load(Ordering::SeqCst) {
			return Err(server_error());
		}
		self.submitted_batches.lock().await.push(points.to_vec());
		Ok(())
	}

	async fn stop_session(&self, session_id: SessionId) -> Result<()> {
		if self.stop_should_fail.load(Ordering::SeqCst) {
			return Err(server_error());
		}
		self.stopped_sessions.lock().await.push(session_id);
		Ok(())
	}
}
