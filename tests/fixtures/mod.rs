//! Test fixtures for route-planner.
//!
//! Provides:
//! - Downtown San Jose preset addresses
//! - Scripted solver and directions provider that record what they were asked
//! - A renderer that keeps every route it was handed

#![allow(dead_code)]

pub mod san_jose_addresses;

pub use san_jose_addresses::*;

use std::cell::RefCell;
use std::collections::VecDeque;

use route_planner::destinations::PresetCatalogue;
use route_planner::plan::Planner;
use route_planner::polyline::Polyline;
use route_planner::traits::{
    DirectionsProvider, HeuristicKind, ProviderLeg, ProviderRoute, RouteRenderer, RouteSolver,
    RoutingRequest, RoutingResponse, SolverReply, TransportError,
};

pub const METERS_PER_HOP: f64 = 1000.0;
pub const SECONDS_PER_HOP: f64 = 60.0;

// ============================================================================
// Solver
// ============================================================================

/// Answers queued replies first, then keeps the requested order with fixed
/// per-hop totals.
#[derive(Debug, Default)]
pub struct ScriptedSolver {
    replies: RefCell<VecDeque<Result<SolverReply, TransportError>>>,
    calls: RefCell<Vec<(HeuristicKind, Vec<String>)>>,
}

impl ScriptedSolver {
    pub fn in_order() -> Self {
        Self::default()
    }

    pub fn then_reply(self, reply: Result<SolverReply, TransportError>) -> Self {
        self.replies.borrow_mut().push_back(reply);
        self
    }

    pub fn then_solve(self, ordered: &[&str], distance: f64, duration: f64) -> Self {
        self.then_reply(Ok(SolverReply::Solved {
            ordered_locations: ordered.iter().map(|s| s.to_string()).collect(),
            total_distance_meters: distance,
            total_duration_seconds: duration,
        }))
    }

    pub fn then_reject(self, message: &str) -> Self {
        self.then_reply(Ok(SolverReply::Rejected {
            message: message.to_string(),
        }))
    }

    pub fn calls(&self) -> Vec<(HeuristicKind, Vec<String>)> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl RouteSolver for ScriptedSolver {
    fn solve(
        &self,
        heuristic: HeuristicKind,
        locations: &[String],
    ) -> Result<SolverReply, TransportError> {
        self.calls.borrow_mut().push((heuristic, locations.to_vec()));
        if let Some(reply) = self.replies.borrow_mut().pop_front() {
            return reply;
        }
        let hops = locations.len().saturating_sub(1) as f64;
        Ok(SolverReply::Solved {
            ordered_locations: locations.to_vec(),
            total_distance_meters: hops * METERS_PER_HOP,
            total_duration_seconds: hops * SECONDS_PER_HOP,
        })
    }
}

// ============================================================================
// Directions
// ============================================================================

/// Routes the request hop by hop, one leg per consecutive pair of stops.
///
/// Leg addresses get a `", USA"` suffix, the way the provider normalises
/// what it geocodes.
#[derive(Debug)]
pub struct ScriptedDirections {
    status: String,
    transport_failure: bool,
    /// Number of requests answered normally before the failure kicks in.
    healthy_requests: usize,
    requests: RefCell<Vec<RoutingRequest>>,
}

impl Default for ScriptedDirections {
    fn default() -> Self {
        Self {
            status: RoutingResponse::OK.to_string(),
            transport_failure: false,
            healthy_requests: 0,
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl ScriptedDirections {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failing_with(status: &str) -> Self {
        Self {
            status: status.to_string(),
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            transport_failure: true,
            ..Self::default()
        }
    }

    /// Answers the first `count` requests normally, then fails as configured.
    pub fn after(mut self, count: usize) -> Self {
        self.healthy_requests = count;
        self
    }

    pub fn requests(&self) -> Vec<RoutingRequest> {
        self.requests.borrow().clone()
    }
}

pub fn normalised(address: &str) -> String {
    format!("{address}, USA")
}

impl DirectionsProvider for ScriptedDirections {
    fn route(&self, request: &RoutingRequest) -> Result<RoutingResponse, TransportError> {
        let healthy = self.requests.borrow().len() < self.healthy_requests;
        self.requests.borrow_mut().push(request.clone());
        if healthy {
            return Ok(hop_by_hop(request));
        }
        if self.transport_failure {
            return Err(TransportError::Network {
                url: "http://directions.test".to_string(),
                message: "connection refused".to_string(),
            });
        }
        if self.status != RoutingResponse::OK {
            return Ok(RoutingResponse {
                status: self.status.clone(),
                routes: Vec::new(),
            });
        }
        Ok(hop_by_hop(request))
    }
}

fn hop_by_hop(request: &RoutingRequest) -> RoutingResponse {
    let mut stops = vec![request.origin.as_str()];
    stops.extend(request.waypoints.iter().map(String::as_str));
    stops.push(request.destination.as_str());

    let legs = stops
        .windows(2)
        .map(|pair| ProviderLeg {
            start_address: normalised(pair[0]),
            end_address: normalised(pair[1]),
            distance_meters: METERS_PER_HOP,
            duration_seconds: SECONDS_PER_HOP,
        })
        .collect();

    RoutingResponse {
        status: RoutingResponse::OK.to_string(),
        routes: vec![ProviderRoute {
            legs,
            overview: Polyline::default(),
        }],
    }
}

// ============================================================================
// Renderer
// ============================================================================

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub routes: Vec<ProviderRoute>,
}

impl RouteRenderer for RecordingRenderer {
    fn render(&mut self, route: &ProviderRoute) {
        self.routes.push(route.clone());
    }
}

// ============================================================================
// Builders
// ============================================================================

pub type TestPlanner = Planner<ScriptedSolver, ScriptedDirections, RecordingRenderer>;

pub fn catalogue() -> PresetCatalogue {
    PresetCatalogue::from_json_str(&presets_json()).expect("fixture catalogue should parse")
}

pub fn planner(solver: ScriptedSolver, directions: ScriptedDirections) -> TestPlanner {
    Planner::new(solver, directions, RecordingRenderer::default())
        .with_fixed_start(FIXED_START)
        .with_catalogue(catalogue())
}
