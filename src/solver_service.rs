//! HTTP adapter for the remote route solver.
//!
//! Each heuristic has its own endpoint (`/greedy`, `/kruskal`, `/prim`) that
//! accepts `{"locations": [...]}` and answers with either an ordering plus
//! totals or a failure message.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::traits::{ConfigError, HeuristicKind, RouteSolver, SolverReply, TransportError};

pub const SOLVER_URL_ENV: &str = "ROUTE_SOLVER_URL";

#[derive(Debug, Clone)]
pub struct SolverServiceConfig {
    pub base_url: String,
    /// Request timeout; `None` waits for the solver indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for SolverServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001".to_string(),
            timeout_secs: None,
        }
    }
}

impl SolverServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Reads the base URL from `ROUTE_SOLVER_URL`, falling back to the default.
    pub fn from_env() -> Self {
        match std::env::var(SOLVER_URL_ENV) {
            Ok(base_url) if !base_url.trim().is_empty() => Self::new(base_url),
            _ => Self::default(),
        }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn endpoint_url(&self, heuristic: HeuristicKind) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            heuristic.endpoint()
        )
    }
}

#[derive(Debug, Clone)]
pub struct SolverServiceClient {
    config: SolverServiceConfig,
    client: reqwest::blocking::Client,
}

impl SolverServiceClient {
    pub fn new(config: SolverServiceConfig) -> Result<Self, ConfigError> {
        // `None` also lifts the blocking client's built-in 30s default.
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SolverServiceConfig {
        &self.config
    }
}

impl RouteSolver for SolverServiceClient {
    fn solve(
        &self,
        heuristic: HeuristicKind,
        locations: &[String],
    ) -> Result<SolverReply, TransportError> {
        let url = self.config.endpoint_url(heuristic);
        debug!(%url, stops = locations.len(), "posting locations to solver");

        let response = self
            .client
            .post(&url)
            .json(&SolveRequest { locations })
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| TransportError::from_reqwest(&err, &url))?;

        let body: SolveResponse = response
            .json()
            .map_err(|err| TransportError::Malformed {
                url: url.clone(),
                message: err.to_string(),
            })?;

        body.into_reply(&url)
    }
}

#[derive(Debug, Serialize)]
struct SolveRequest<'a> {
    locations: &'a [String],
}

/// Solver wire reply. Totals are optional because not every endpoint
/// reports both.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolveResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    ordered_locations: Option<Vec<String>>,
    #[serde(default)]
    total_distance: Option<f64>,
    #[serde(default)]
    total_duration: Option<f64>,
}

impl SolveResponse {
    fn into_reply(self, url: &str) -> Result<SolverReply, TransportError> {
        if !self.success {
            return Ok(SolverReply::Rejected {
                message: self.message.unwrap_or_default(),
            });
        }

        let ordered_locations = self
            .ordered_locations
            .ok_or_else(|| TransportError::Malformed {
                url: url.to_string(),
                message: "successful reply without orderedLocations".to_string(),
            })?;

        Ok(SolverReply::Solved {
            ordered_locations,
            total_distance_meters: self.total_distance.unwrap_or(0.0),
            total_duration_seconds: self.total_duration.unwrap_or(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://localhost:5001/greedy";

    #[test]
    fn test_endpoint_urls() {
        let config = SolverServiceConfig::new("http://solver.local/");
        assert_eq!(
            config.endpoint_url(HeuristicKind::GreedyNearestNeighbor),
            "http://solver.local/greedy"
        );
        assert_eq!(config.endpoint_url(HeuristicKind::KruskalMst), "http://solver.local/kruskal");
        assert_eq!(config.endpoint_url(HeuristicKind::PrimMst), "http://solver.local/prim");
    }

    #[test]
    fn test_default_has_no_timeout() {
        let config = SolverServiceConfig::default();
        assert_eq!(config.base_url, "http://localhost:5001");
        assert_eq!(config.timeout_secs, None);
        assert_eq!(config.with_timeout_secs(5).timeout_secs, Some(5));
    }

    #[test]
    fn test_request_body_shape() {
        let locations = vec!["A".to_string(), "B".to_string()];
        let body = serde_json::to_value(SolveRequest { locations: &locations }).expect("serialize");
        assert_eq!(body, serde_json::json!({ "locations": ["A", "B"] }));
    }

    #[test]
    fn test_parse_success() {
        let json = r#"{
            "success": true,
            "orderedLocations": ["S", "A"],
            "totalDistance": 12000,
            "totalDuration": 900
        }"#;
        let response: SolveResponse = serde_json::from_str(json).expect("deserialize");
        let reply = response.into_reply(URL).expect("reply");
        assert_eq!(
            reply,
            SolverReply::Solved {
                ordered_locations: vec!["S".to_string(), "A".to_string()],
                total_distance_meters: 12000.0,
                total_duration_seconds: 900.0,
            }
        );
    }

    #[test]
    fn test_parse_success_without_totals() {
        let json = r#"{"success": true, "orderedLocations": ["S", "A", "S"]}"#;
        let response: SolveResponse = serde_json::from_str(json).expect("deserialize");
        match response.into_reply(URL).expect("reply") {
            SolverReply::Solved {
                total_distance_meters,
                total_duration_seconds,
                ..
            } => {
                assert_eq!(total_distance_meters, 0.0);
                assert_eq!(total_duration_seconds, 0.0);
            }
            other => panic!("expected Solved, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_failure() {
        let json = r#"{"success": false, "message": "no route"}"#;
        let response: SolveResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            response.into_reply(URL).expect("reply"),
            SolverReply::Rejected {
                message: "no route".to_string()
            }
        );
    }

    #[test]
    fn test_success_without_ordering_is_malformed() {
        let json = r#"{"success": true}"#;
        let response: SolveResponse = serde_json::from_str(json).expect("deserialize");
        let err = response.into_reply(URL).expect_err("malformed");
        assert!(matches!(err, TransportError::Malformed { .. }));
    }
}
