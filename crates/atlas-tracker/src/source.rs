// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The device location capability consumed by the tracker.

use atlas_tracker_core::RawFix;
use tokio::sync::mpsc;

use crate::error::Result;

/// Capacity of the inbound fix channel.
///
/// Ingestion keeps up with any realistic sampling rate; the bound only
/// protects against a wedged consumer.
pub const FIX_CHANNEL_CAPACITY: usize = 64;

/// On-demand access to the device's position.
///
/// Implemented by the embedding application over its platform location API.
/// Continuous (background) emission is not a callback: the platform side
/// pushes fixes into the channel from [`fix_channel`] and the tracker pumps
/// the receiving end into ingestion.
#[async_trait::async_trait]
pub trait LocationSource: Send + Sync {
	/// Requests a single fix.
	///
	/// Fails with [`crate::TrackerError::Permission`] when the capability is
	/// denied, or a transport error on timeout. Errors propagate to the
	/// caller; this path never touches the offline buffer.
	async fn current_fix(&self) -> Result<RawFix>;
}

/// Creates the channel that carries continuously emitted fixes into the
/// tracker. Hand the sender to the platform layer and the receiver to
/// [`crate::Tracker::pump_fixes`].
pub fn fix_channel() -> (mpsc::Sender<RawFix>, mpsc::Receiver<RawFix>) {
	mpsc::channel(FIX_CHANNEL_CAPACITY)
}
