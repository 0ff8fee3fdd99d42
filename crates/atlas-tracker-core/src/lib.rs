// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Atlas location tracking system.
//!
//! This crate provides the shared value types used by the tracker SDK:
//! raw device fixes, normalized track points, and tracking session state.
//! It performs no I/O; the SDK crate (`atlas-tracker`) owns delivery,
//! buffering, and synchronization.

pub mod error;
pub mod point;
pub mod session;

pub use error::{CoreError, Result};
pub use point::{RawFix, TrackPoint};
pub use session::{SessionId, SessionState, TrackingSession};
