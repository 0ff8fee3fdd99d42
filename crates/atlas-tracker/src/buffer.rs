// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ordered queue of points awaiting delivery.

use std::collections::VecDeque;

use atlas_tracker_core::TrackPoint;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// FIFO queue of points that could not be delivered immediately.
///
/// Draining removes the whole queue atomically before the network attempt;
/// a failed batch is reinserted at the front so the oldest points are always
/// retried before anything captured since. Unbounded here; a bounding or
/// eviction policy is a deployment concern layered on top.
#[derive(Debug, Default)]
pub struct OfflineBuffer {
	points: Mutex<VecDeque<TrackPoint>>,
}

impl OfflineBuffer {
	pub fn new() -> Self {
		Self {
			points: Mutex::new(VecDeque::new()),
		}
	}

	/// Appends a point at the tail.
	pub async fn enqueue(&self, point: TrackPoint) {
		let mut points = self.points.lock().await;
		points.push_back(point);
		debug!(queued = points.len(), "Point buffered");
	}

	/// Reinserts a failed batch at the head, preserving its relative order
	/// and placing it ahead of anything enqueued during the attempt.
	pub async fn enqueue_front(&self, batch: Vec<TrackPoint>) {
		if batch.is_empty() {
			return;
		}

		let mut points = self.points.lock().await;
		for point in batch.into_iter().rev() {
			points.push_front(point);
		}
		warn!(queued = points.len(), "Batch returned to buffer after failed sync");
	}

	/// Atomically removes and returns everything currently queued.
	pub async fn drain_all(&self) -> Vec<TrackPoint> {
		let mut points = self.points.lock().await;
		points.drain(..).collect()
	}

	pub async fn is_empty(&self) -> bool {
		self.points.lock().await.is_empty()
	}

	pub async fn len(&self) -> usize {
		self.points.lock().await.len()
	}
}
