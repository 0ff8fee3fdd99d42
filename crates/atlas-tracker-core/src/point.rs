// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Raw device fixes and the normalized track point model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A single raw position reading from the device's location capability.
///
/// Fields follow platform location APIs: `accuracy`, `speed`, and `heading`
/// use a negative value to mean "not available", while `altitude` is absent
/// entirely when the device could not determine it (a negative altitude is a
/// valid reading below sea level). The timestamp is capture time in
/// milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFix {
	pub latitude: f64,
	pub longitude: f64,
	/// Horizontal accuracy in meters; negative when unavailable.
	pub accuracy: f64,
	/// Altitude in meters above the WGS-84 ellipsoid, if known.
	pub altitude: Option<f64>,
	/// Ground speed in meters per second; negative when unavailable.
	pub speed: f64,
	/// Course over ground in degrees from true north; negative when unavailable.
	pub heading: f64,
	/// Capture time, milliseconds since the Unix epoch.
	pub epoch_ms: i64,
}

/// The normalized, immutable representation of a fix.
///
/// Built once per captured fix and never mutated afterwards. The wire form
/// matches the location service's point schema: optional fields are omitted
/// when absent and the timestamp is an RFC 3339 UTC string, so a serialized
/// point deserializes back to an identical value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
	pub latitude: f64,
	pub longitude: f64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub accuracy_meters: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub altitude_meters: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub speed_ms: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub heading_degrees: Option<f64>,
	pub timestamp: DateTime<Utc>,
}

impl TrackPoint {
	/// Normalizes a raw fix into a track point.
	///
	/// Negative accuracy/speed/heading sentinels become `None` and the epoch
	/// timestamp becomes a UTC instant. Fails only when the timestamp falls
	/// outside the representable range.
	pub fn normalize(fix: RawFix) -> Result<Self> {
		let timestamp = DateTime::<Utc>::from_timestamp_millis(fix.epoch_ms)
			.ok_or(CoreError::InvalidTimestamp(fix.epoch_ms))?;

		Ok(Self {
			latitude: fix.latitude,
			longitude: fix.longitude,
			accuracy_meters: non_negative(fix.accuracy),
			altitude_meters: fix.altitude,
			speed_ms: non_negative(fix.speed),
			heading_degrees: non_negative(fix.heading),
			timestamp,
		})
	}
}

fn non_negative(value: f64) -> Option<f64> {
	if value >= 0.0 && value.is_finite() {
		Some(value)
	} else {
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	fn sample_fix() -> RawFix {
		RawFix {
			latitude: 55.75,
			longitude: 37.61,
			accuracy: 5.0,
			altitude: Some(142.0),
			speed: 1.4,
			heading: 270.0,
			epoch_ms: 1_700_000_000_000,
		}
	}

	#[test]
	fn test_normalize_keeps_valid_fields() {
		let point = TrackPoint::normalize(sample_fix()).unwrap();

		assert_eq!(point.latitude, 55.75);
		assert_eq!(point.longitude, 37.61);
		assert_eq!(point.accuracy_meters, Some(5.0));
		assert_eq!(point.altitude_meters, Some(142.0));
		assert_eq!(point.speed_ms, Some(1.4));
		assert_eq!(point.heading_degrees, Some(270.0));
		assert_eq!(point.timestamp.timestamp_millis(), 1_700_000_000_000);
	}

	#[test]
	fn test_normalize_maps_sentinels_to_none() {
		let fix = RawFix {
			accuracy: -1.0,
			altitude: None,
			speed: -1.0,
			heading: -1.0,
			..sample_fix()
		};

		let point = TrackPoint::normalize(fix).unwrap();
		assert_eq!(point.accuracy_meters, None);
		assert_eq!(point.altitude_meters, None);
		assert_eq!(point.speed_ms, None);
		assert_eq!(point.heading_degrees, None);
	}

	#[test]
	fn test_normalize_rejects_unrepresentable_timestamp() {
		let fix = RawFix {
			epoch_ms: i64::MAX,
			..sample_fix()
		};

		let result = TrackPoint::normalize(fix);
		assert!(matches!(result, Err(CoreError::InvalidTimestamp(_))));
	}

	#[test]
	fn test_normalize_rejects_nan_sentinels() {
		let fix = RawFix {
			accuracy: f64::NAN,
			heading: f64::INFINITY,
			..sample_fix()
		};

		let point = TrackPoint::normalize(fix).unwrap();
		assert_eq!(point.accuracy_meters, None);
		assert_eq!(point.heading_degrees, None);
	}

	#[test]
	fn test_serialization_round_trip() {
		let ts = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
		let point = TrackPoint {
			latitude: 55.75,
			longitude: 37.61,
			accuracy_meters: Some(5.0),
			altitude_meters: None,
			speed_ms: None,
			heading_degrees: None,
			timestamp: ts,
		};

		let json = serde_json::to_string(&point).unwrap();
		let restored: TrackPoint = serde_json::from_str(&json).unwrap();

		assert_eq!(restored, point);
		assert_eq!(restored.latitude, 55.75);
		assert_eq!(restored.longitude, 37.61);
		assert_eq!(restored.accuracy_meters, Some(5.0));
		assert_eq!(restored.timestamp, ts);
	}

	#[test]
	fn test_absent_fields_are_omitted_from_wire_form() {
		let point = TrackPoint::normalize(RawFix {
			accuracy: -1.0,
			altitude: None,
			speed: -1.0,
			heading: -1.0,
			..sample_fix()
		})
		.unwrap();

		let json = serde_json::to_string(&point).unwrap();
		assert!(!json.contains("accuracy_meters"));
		assert!(!json.contains("altitude_meters"));
		assert!(json.contains("latitude"));
		assert!(json.contains("timestamp"));
	}
}
