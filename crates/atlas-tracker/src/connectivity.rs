// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Last-known network reachability, as observed by send outcomes.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

/// Network reachability as of the most recent send or sync attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
	Online,
	Offline,
}

/// Shared connectivity flag.
///
/// Mutated exclusively by the outcome of send/sync attempts, never by a
/// speculative probe. Starts Online so the first point gets a real attempt.
#[derive(Debug)]
pub struct ConnectivityState {
	online: AtomicBool,
}

impl ConnectivityState {
	pub fn new() -> Self {
		Self {
			online: AtomicBool::new(true),
		}
	}

	pub fn get(&self) -> Connectivity {
		if self.online.load(Ordering::SeqCst) {
			Connectivity::Online
		} else {
			Connectivity::Offline
		}
	}

	pub fn is_online(&self) -> bool {
		self.online.load(Ordering::SeqCst)
	}

	/// Records a successful send or sync.
	pub fn mark_online(&self) {
		if !self.online.swap(true, Ordering::SeqCst) {
			debug!("Connectivity restored");
		}
	}

	/// Records a failed send or sync.
	pub fn mark_offline(&self) {
		if self.online.swap(false, Ordering::SeqCst) {
			debug!("Connectivity lost");
		}
	}
}

impl Default for ConnectivityState {
	fn default() -> Self {
		Self::new()
	}
}
