//! Google Directions HTTP adapter.
//!
//! Implements [`DirectionsProvider`] on top of the Directions web service.
//! Waypoints are sent as plain stopovers without `optimize:true`, so the
//! provider keeps the solver's visiting order.
//!
//! See: <https://developers.google.com/maps/documentation/directions/get-directions>

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::polyline::Polyline;
use crate::traits::{
    ConfigError, DirectionsProvider, ProviderLeg, ProviderRoute, RoutingRequest, RoutingResponse,
    TransportError,
};

pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";
pub const BASE_URL_ENV: &str = "GOOGLE_MAPS_BASE_URL";

/// Connection settings shared by the Google Maps adapters.
#[derive(Debug, Clone)]
pub struct GoogleMapsConfig {
    pub base_url: String,
    pub api_key: String,
    /// Request timeout; `None` waits for the service indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for GoogleMapsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
            api_key: String::new(),
            timeout_secs: None,
        }
    }
}

impl GoogleMapsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Reads `GOOGLE_MAPS_API_KEY` (required) and `GOOGLE_MAPS_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingEnv(API_KEY_ENV))?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                config.base_url = base_url;
            }
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub(crate) fn service_url(&self, service: &str) -> String {
        format!("{}/{}/json", self.base_url.trim_end_matches('/'), service)
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::blocking::Client, ConfigError> {
        Ok(reqwest::blocking::Client::builder()
            .timeout(self.timeout_secs.map(Duration::from_secs))
            .build()?)
    }
}

#[derive(Debug, Clone)]
pub struct GoogleDirections {
    config: GoogleMapsConfig,
    client: reqwest::blocking::Client,
}

impl GoogleDirections {
    pub fn new(config: GoogleMapsConfig) -> Result<Self, ConfigError> {
        let client = config.http_client()?;
        Ok(Self { config, client })
    }

    /// Query parameters for a directions request, in wire order.
    fn query(&self, request: &RoutingRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("origin", request.origin.clone()),
            ("destination", request.destination.clone()),
        ];
        if !request.waypoints.is_empty() {
            query.push(("waypoints", request.waypoints.join("|")));
        }
        query.push(("mode", request.travel_mode.as_str().to_string()));
        query.push(("key", self.config.api_key.clone()));
        query
    }
}

impl DirectionsProvider for GoogleDirections {
    fn route(&self, request: &RoutingRequest) -> Result<RoutingResponse, TransportError> {
        let url = self.config.service_url("directions");
        debug!(%url, waypoints = request.waypoints.len(), "requesting directions");

        let response = self
            .client
            .get(&url)
            .query(&self.query(request))
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| TransportError::from_reqwest(&err, &url))?;

        let body: DirectionsResponse = response
            .json()
            .map_err(|err| TransportError::Malformed {
                url: url.clone(),
                message: err.to_string(),
            })?;

        Ok(body.into_routing_response(&url))
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
    overview_polyline: Option<EncodedPolyline>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    start_address: String,
    end_address: String,
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct EncodedPolyline {
    points: String,
}

/// `{ "text": "1.2 km", "value": 1234 }` pairs used for distance and duration.
#[derive(Debug, Deserialize)]
struct TextValue {
    value: f64,
}

impl DirectionsResponse {
    /// Undecodable overview geometry is dropped; the legs still come through.
    fn into_routing_response(self, url: &str) -> RoutingResponse {
        let routes = self
            .routes
            .into_iter()
            .map(|route| {
                let overview = route
                    .overview_polyline
                    .map(|encoded| {
                        Polyline::decode(&encoded.points).unwrap_or_else(|err| {
                            warn!(%url, error = %err, "discarding undecodable overview polyline");
                            Polyline::default()
                        })
                    })
                    .unwrap_or_default();
                let legs = route
                    .legs
                    .into_iter()
                    .map(|leg| ProviderLeg {
                        start_address: leg.start_address,
                        end_address: leg.end_address,
                        distance_meters: leg.distance.map_or(0.0, |d| d.value),
                        duration_seconds: leg.duration.map_or(0.0, |d| d.value),
                    })
                    .collect();
                ProviderRoute { legs, overview }
            })
            .collect();

        RoutingResponse {
            status: self.status,
            routes,
        }
    }
}
