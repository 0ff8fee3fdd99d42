// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rust SDK for Atlas location tracking with offline sync.
//!
//! The tracker records a user's position during an active session and
//! reliably delivers every captured point to the Atlas location service,
//! through network outages included. Each fix is normalized and either sent
//! immediately, or buffered and replayed by a background scheduler; partial
//! failures are recovered without losing or duplicating points.
//!
//! # Overview
//!
//! - [`Tracker`] — the facade: construct once with [`Tracker::builder`],
//!   start/stop tracking sessions, feed fixes.
//! - [`OfflineBuffer`] — ordered queue of points pending delivery, with
//!   requeue-at-front on failed resends.
//! - [`SyncScheduler`] — cancellable background loop draining the buffer
//!   through batch submissions.
//! - [`SyncGateway`] — the network boundary; HTTP implementation included,
//!   substitutable in tests.
//! - [`LocationSource`] — the device capability, implemented by the
//!   embedding application.
//!
//! Delivery is at-least-once: the service deduplicates across crash and
//! restart; within one process lifetime no point is ever sent twice.

pub mod buffer;
pub mod connectivity;
pub mod error;
pub mod gateway;
pub mod http;
pub mod ingest;
pub mod session;
pub mod source;
pub mod store;
pub mod sync;
pub mod tracker;

#[cfg(test)]
mod testing;

pub use buffer::OfflineBuffer;
pub use connectivity::{Connectivity, ConnectivityState};
pub use error::{Result, TrackerError};
pub use gateway::SyncGateway;
pub use http::{GatewayConfig, HttpSyncGateway};
pub use ingest::IngestPipeline;
pub use session::SessionManager;
pub use source::{fix_channel, LocationSource, FIX_CHANNEL_CAPACITY};
pub use store::SessionStore;
pub use sync::{SyncScheduler, DEFAULT_SYNC_INTERVAL};
pub use tracker::{Tracker, TrackerBuilder, TrackerConfig};

pub use atlas_tracker_core::{
	RawFix, SessionId, SessionState, TrackPoint, TrackingSession,
};
