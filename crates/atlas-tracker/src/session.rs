// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracking session lifecycle.

use std::sync::Arc;

use atlas_tracker_core::{SessionId, SessionState, TrackingSession};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{Result, TrackerError};
use crate::gateway::SyncGateway;
use crate::store::SessionStore;

/// Owns the lifecycle of the one tracking session.
///
/// State machine: Inactive → Starting → Active (with an id when the service
/// was reachable, as offline fallback otherwise) → Stopping → Stopped.
/// Stopping from any state is safe and idempotent.
///
/// The session lock is never held across a gateway call: lifecycle methods
/// snapshot state, release the lock for the network round-trip, then
/// re-acquire and commit only if the session is still in the state the call
/// was made for. The capture path (which takes this lock on every fix) is
/// therefore never stalled behind a registration or stop in flight.
pub struct SessionManager {
	session: Mutex<TrackingSession>,
	gateway: Arc<dyn SyncGateway>,
	store: SessionStore,
}

impl SessionManager {
	/// Creates a manager, resuming a persisted session id if one survives
	/// from a previous process.
	pub fn new(gateway: Arc<dyn SyncGateway>, store: SessionStore) -> Self {
		let mut session = TrackingSession::inactive();
		match store.load() {
			Ok(Some(id)) => {
				info!(session_id = %id, "Resuming persisted tracking session");
				session.id = Some(id);
				session.state = SessionState::Active;
			}
			Ok(None) => {}
			Err(e) => warn!(error = %e, "Failed to read persisted session state"),
		}

		Self {
			session: Mutex::new(session),
			gateway,
			store,
		}
	}

	/// Starts a tracking session.
	///
	/// No-op when a session is already Active or Starting: the existing
	/// session is returned. Fails with [`TrackerError::State`] while a stop
	/// is in flight. When the service cannot be reached the session still
	/// becomes Active, with no id and `is_offline_fallback = true`; every
	/// point buffers until the sync engine obtains an id.
	pub async fn start(&self, background: bool) -> Result<TrackingSession> {
		{
			let mut session = self.session.lock().await;
			match session.state {
				SessionState::Starting | SessionState::Active => {
					return Ok(session.clone());
				}
				SessionState::Stopping => {
					return Err(TrackerError::State(
						"cannot start while a stop is in flight".to_string(),
					));
				}
				SessionState::Inactive | SessionState::Stopped => {}
			}
			session.state = SessionState::Starting;
			session.is_background = background;
			session.is_offline_fallback = false;
			session.id = None;
		}

		let created = self.gateway.create_session(background, false).await;

		let mut session = self.session.lock().await;
		if session.state != SessionState::Starting {
			// stop() won the race while registration was in flight; the
			// local session must not be resurrected by a stale completion.
			let snapshot = session.clone();
			drop(session);
			if let Ok(id) = created {
				warn!(session_id = %id, "Session stopped during registration; releasing it");
				if let Err(e) = self.gateway.stop_session(id).await {
					warn!(session_id = %id, error = %e, "Failed to release abandoned session");
				}
			}
			return Ok(snapshot);
		}

		match created {
			Ok(id) => {
				session.id = Some(id);
				session.state = SessionState::Active;
				info!(session_id = %id, background, "Tracking session started");
				if let Err(e) = self.store.save(id) {
					warn!(error = %e, "Failed to persist session id");
				}
			}
			Err(e) => {
				session.state = SessionState::Active;
				session.is_offline_fallback = true;
				warn!(error = %e, "Session registration failed; tracking in offline fallback");
			}
		}

		Ok(session.clone())
	}

	/// Stops the session: Active → Stopping → Stopped.
	///
	/// The service is informed best-effort; a failed stop call is logged and
	/// the session still ends locally. Stopping an already-Stopped (or never
	/// started) session is a no-op.
	pub async fn stop(&self) -> Result<()> {
		let id = {
			let mut session = self.session.lock().await;
			if !matches!(
				session.state,
				SessionState::Starting | SessionState::Active | SessionState::Stopping
			) {
				return Ok(());
			}
			session.state = SessionState::Stopping;
			// Taking the id here means a concurrent stop cannot end the
			// remote session twice.
			session.id.take()
		};

		if let Some(id) = id {
			if let Err(e) = self.gateway.stop_session(id).await {
				warn!(session_id = %id, error = %e, "Failed to end session on the service");
			}
		}

		let mut session = self.session.lock().await;
		if session.state == SessionState::Stopping {
			session.state = SessionState::Stopped;
			session.is_offline_fallback = false;
			info!("Tracking session stopped");
		}
		drop(session);

		if let Err(e) = self.store.clear() {
			warn!(error = %e, "Failed to clear persisted session state");
		}
		Ok(())
	}

	/// Re-attempts registration for an active offline-fallback session.
	///
	/// Called by the sync scheduler on each tick until an id is assigned.
	/// Returns true when the session holds an id afterwards.
	pub async fn ensure_registered(&self) -> bool {
		let background = {
			let session = self.session.lock().await;
			if !session.is_active() {
				return false;
			}
			if session.id.is_some() {
				return true;
			}
			session.is_background
		};

		// Lock released for the round-trip so ingestion keeps moving.
		let created = self.gateway.create_session(background, true).await;

		let id = match created {
			Ok(id) => id,
			Err(e) => {
				warn!(error = %e, "Session registration still failing");
				return false;
			}
		};

		let mut session = self.session.lock().await;
		if session.is_active() && session.id.is_none() {
			session.id = Some(id);
			info!(session_id = %id, "Offline-fallback session registered");
			if let Err(e) = self.store.save(id) {
				warn!(error = %e, "Failed to persist session id");
			}
			return true;
		}

		// The session ended (or was replaced) while registration was in
		// flight. Release the freshly created remote session instead of
		// stamping a session the user already stopped.
		let registered = session.id.is_some();
		drop(session);
		warn!(session_id = %id, "Session changed during registration; releasing it");
		if let Err(e) = self.gateway.stop_session(id).await {
			warn!(session_id = %id, error = %e, "Failed to release abandoned session");
		}
		registered
	}

	/// Snapshot of the current session.
	pub async fn current(&self) -> TrackingSession {
		self.session.lock().await.clone()
	}

	pub async fn session_id(&self) -> Option<SessionId> {
		self.session.lock().await.id
	}

	/// Whether ingestion may submit or buffer points right now.
	pub async fn accepts_points(&self) -> bool {
		self.session.lock().await.accepts_points()
	}
}
