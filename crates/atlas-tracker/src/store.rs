// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Persistence for the current session identifier.
//!
//! Only the session id survives a process restart; buffer durability is a
//! deployment choice outside this crate.

use std::path::{Path, PathBuf};

use atlas_tracker_core::SessionId;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// On-disk tracker state.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedState {
	session_id: i64,
}

/// Stores the current session id in a small JSON state file.
#[derive(Debug, Clone)]
pub struct SessionStore {
	path: PathBuf,
}

impl SessionStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Default location under the platform data directory.
	pub fn default_path() -> PathBuf {
		dirs::data_dir()
			.unwrap_or_else(std::env::temp_dir)
			.join("atlas")
			.join("tracker-state.json")
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Loads the persisted session id, if any.
	///
	/// A missing file means no session; a corrupt file is treated the same
	/// way (logged, not fatal) since the service remains the source of truth.
	pub fn load(&self) -> Result<Option<SessionId>> {
		let raw = match std::fs::read_to_string(&self.path) {
			Ok(raw) => raw,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(e.into()),
		};

		match serde_json::from_str::<PersistedState>(&raw) {
			Ok(state) => Ok(Some(SessionId(state.session_id))),
			Err(e) => {
				warn!(path = %self.path.display(), error = %e, "Ignoring corrupt tracker state file");
				Ok(None)
			}
		}
	}

	/// Persists the session id, creating parent directories as needed.
	pub fn save(&self, session_id: SessionId) -> Result<()> {
		if let Some(parent) = self.path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		let state = PersistedState {
			session_id: session_id.as_i64(),
		};
		std::fs::write(&self.path, serde_json::to_vec(&state)?)?;
		Ok(())
	}

	/// Removes the persisted session id. Missing file is fine.
	pub fn clear(&self) -> Result<()> {
		match std::fs::remove_file(&self.path) {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(e.into()),
		}
	}
}
