// Copyright (c) 2025 Atlas Maps Pty Ltd. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP implementation of the sync gateway.

use std::time::Duration;

use atlas_tracker_core::{SessionId, TrackPoint};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::gateway::SyncGateway;

/// Timeouts for gateway calls.
///
/// Single-point sends sit on the capture path and stay short; batch syncs
/// run from the background scheduler and get a longer bound.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
	pub point_timeout: Duration,
	pub batch_timeout: Duration,
}

impl Default for GatewayConfig {
	fn default() -> Self {
		Self {
			point_timeout: Duration::from_secs(15),
			batch_timeout: Duration::from_secs(30),
		}
	}
}

/// Gateway speaking the Atlas location service HTTP API.
pub struct HttpSyncGateway {
	http: Client,
	base_url: String,
	auth_token: String,
	config: GatewayConfig,
}

impl HttpSyncGateway {
	/// Creates a gateway for the service at `base_url`.
	///
	/// The URL is normalized (no trailing slash) and requests carry a bearer
	/// token plus the standard Atlas User-Agent.
	pub fn new(
		base_url: impl Into<String>,
		auth_token: impl Into<String>,
		config: GatewayConfig,
	) -> Result<Self> {
		let base_url = base_url.into();
		if base_url.is_empty() || !base_url.starts_with("http") {
			return Err(TrackerError::InvalidBaseUrl);
		}
		let base_url = base_url.trim_end_matches('/').to_string();

		let http = atlas_common_http::builder()
			.build()
			.map_err(TrackerError::Transport)?;

		Ok(Self {
			http,
			base_url,
			auth_token: auth_token.into(),
			config,
		})
	}

	async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
		if response.status().is_success() {
			Ok(response)
		} else {
			let status = response.status().as_u16();
			let message = response.text().await.unwrap_or_default();
			Err(TrackerError::Server { status, message })
		}
	}
}

/// Session payload returned by the service on registration.
#[derive(Debug, Deserialize)]
struct SessionResponse {
	id: i64,
}

/// Request payload for the offline batch sync endpoint.
#[derive(Debug, Serialize)]
struct BatchSyncRequest<'a> {
	points: &'a [TrackPoint],
}

#[async_trait::async_trait]
impl SyncGateway for HttpSyncGateway {
	async fn create_session(&self, is_background: bool, is_offline: bool) -> Result<SessionId> {
		let url = format!(
			"{}/api/v1/location/session?is_background={}&is_offline={}",
			self.base_url, is_background, is_offline
		);
		debug!(url = %url, "Registering tracking session");

		let response = self
			.http
			.post(&url)
			.bearer_auth(&self.auth_token)
			.timeout(self.config.point_timeout)
			.send()
			.await?;

		let session: SessionResponse = Self::check_status(response).await?.json().await?;
		Ok(SessionId(session.id))
	}

	async fn submit_point(&self, session_id: SessionId, point: &TrackPoint) -> Result<()> {
		let url = format!(
			"{}/api/v1/location/session/{}/point",
			self.base_url, session_id
		);

		let response = self
			.http
			.post(&url)
			.bearer_auth(&self.auth_token)
			.timeout(self.config.point_timeout)
			.json(point)
			.send()
			.await?;

		Self::check_status(response).await?;
		Ok(())
	}

	async fn submit_batch(&self, points: &[TrackPoint]) -> Result<()> {
		let url = format!("{}/api/v1/location/offline/sync", self.base_url);
		debug!(url = %url, count = points.len(), "Submitting offline batch");

		let response = self
			.http
			.post(&url)
			.bearer_auth(&self.auth_token)
			.timeout(self.config.batch_timeout)
			.json(&BatchSyncRequest { points })
			.send()
			.await?;

		Self::check_status(response).await?;
		Ok(())
	}

	async fn stop_session(&self, session_id: SessionId) -> Result<()> {
		let url = format!(
			"{}/api/v1/location/session/{}/end",
			self.base_url, session_id
		);

		let response = self
			.http
			.post(&url)
			.bearer_auth(&self.auth_token)
			.timeout(self.config.point_timeout)
			.send()
			.await?;

		Self::check_status(response).await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use atlas_tracker_core::RawFix;
	use wiremock::matchers::{body_partial_json, header, method, path, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn sample_point() -> TrackPoint {
		TrackPoint::normalize(RawFix {
			latitude: 55.75,
			longitude: 37.61,
			accuracy: 5.0,
			altitude: None,
			speed: -1.0,
			heading: -1.0,
			epoch_ms: 1_700_000_000_000,
		})
		.unwrap()
	}

	fn gateway_for(server: &MockServer) -> HttpSyncGateway {
		HttpSyncGateway::new(server.uri(), "token_123", GatewayConfig::default()).unwrap()
	}

	#[test]
	fn test_rejects_invalid_base_url() {
		let result = HttpSyncGateway::new("", "token", GatewayConfig::default());
		assert!(matches!(result, Err(TrackerError::InvalidBaseUrl)));

		let result = HttpSyncGateway::new("ftp://example.com", "token", GatewayConfig::default());
		assert!(matches!(result, Err(TrackerError::InvalidBaseUrl)));
	}

	#[test]
	fn test_normalizes_trailing_slash() {
		let gateway =
			HttpSyncGateway::new("https://example.com/", "token", GatewayConfig::default())
				.unwrap();
		assert_eq!(gateway.base_url, "https://example.com");
	}

	#[tokio::test]
	async fn test_create_session_returns_assigned_id() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/api/v1/location/session"))
			.and(query_param("is_background", "true"))
			.and(query_param("is_offline", "false"))
			.and(header("authorization", "Bearer token_123"))
			.respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
				"id": 91,
				"is_background": true,
				"is_offline": false,
			})))
			.mount(&server)
			.await;

		let gateway = gateway_for(&server);
		let id = gateway.create_session(true, false).await.unwrap();
		assert_eq!(id, SessionId(91));
	}

	#[tokio::test]
	async fn test_submit_point_posts_to_session_path() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/api/v1/location/session/91/point"))
			.and(body_partial_json(serde_json::json!({
				"latitude": 55.75,
				"longitude": 37.61,
				"accuracy_meters": 5.0,
			})))
			.respond_with(ResponseTemplate::new(201))
			.expect(1)
			.mount(&server)
			.await;

		let gateway = gateway_for(&server);
		gateway
			.submit_point(SessionId(91), &sample_point())
			.await
			.unwrap();
	}

	#[tokio::test]
	async fn test_submit_batch_wraps_points() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/api/v1/location/offline/sync"))
			.respond_with(ResponseTemplate::new(201))
			.expect(1)
			.mount(&server)
			.await;

		let gateway = gateway_for(&server);
		gateway
			.submit_batch(&[sample_point(), sample_point()])
			.await
			.unwrap();
	}

	#[tokio::test]
	async fn test_server_failure_maps_to_server_error() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/api/v1/location/session/91/point"))
			.respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
			.mount(&server)
			.await;

		let gateway = gateway_for(&server);
		let err = gateway
			.submit_point(SessionId(91), &sample_point())
			.await
			.unwrap_err();

		match err {
			TrackerError::Server { status, message } => {
				assert_eq!(status, 503);
				assert_eq!(message, "maintenance");
			}
			other => panic!("expected server error, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn test_stop_session_hits_end_endpoint() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/api/v1/location/session/91/end"))
			.respond_with(ResponseTemplate::new(200))
			.expect(1)
			.mount(&server)
			.await;

		let gateway = gateway_for(&server);
		gateway.stop_session(SessionId(91)).await.unwrap();
	}
}
