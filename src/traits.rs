//! Collaborator seams for the route planner.
//!
//! The planner never talks to a network service directly. Solvers, routing
//! providers and the map display are injected through these traits so that
//! apps can wire in HTTP adapters, in-process implementations or test doubles.

use std::fmt;

use thiserror::Error;

use crate::polyline::Polyline;

/// Route-ordering heuristic offered by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeuristicKind {
    GreedyNearestNeighbor,
    KruskalMst,
    PrimMst,
}

impl HeuristicKind {
    pub const ALL: [HeuristicKind; 3] = [
        HeuristicKind::GreedyNearestNeighbor,
        HeuristicKind::KruskalMst,
        HeuristicKind::PrimMst,
    ];

    /// Human-readable label attached to a plan built with this heuristic.
    pub fn label(self) -> &'static str {
        match self {
            HeuristicKind::GreedyNearestNeighbor => "Greedy TSP",
            HeuristicKind::KruskalMst => "Kruskal TSP",
            HeuristicKind::PrimMst => "Prim's TSP",
        }
    }

    /// Path segment of the solver endpoint serving this heuristic.
    pub fn endpoint(self) -> &'static str {
        match self {
            HeuristicKind::GreedyNearestNeighbor => "greedy",
            HeuristicKind::KruskalMst => "kruskal",
            HeuristicKind::PrimMst => "prim",
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failure to reach a remote collaborator or to read its reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {message}")]
    Malformed { url: String, message: String },
}

impl TransportError {
    pub(crate) fn from_reqwest(error: &reqwest::Error, url: &str) -> Self {
        if let Some(status) = error.status() {
            return TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            };
        }

        if error.is_decode() {
            return TransportError::Malformed {
                url: url.to_string(),
                message: error.to_string(),
            };
        }

        TransportError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// Failure to set up an adapter.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// A solver reply that made it across the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverReply {
    Solved {
        ordered_locations: Vec<String>,
        total_distance_meters: f64,
        total_duration_seconds: f64,
    },
    /// The solver ran but declared a logical failure.
    Rejected { message: String },
}

/// Computes a visiting order for a set of addresses.
///
/// `locations[0]` is the fixed start; implementations must keep it first.
pub trait RouteSolver {
    fn solve(
        &self,
        heuristic: HeuristicKind,
        locations: &[String],
    ) -> Result<SolverReply, TransportError>;
}

/// Travel mode requested from the routing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Driving,
}

impl TravelMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
        }
    }
}

/// A multi-stop routing request.
///
/// Waypoints are stopovers visited in the given order; providers must not
/// reorder them.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingRequest {
    pub origin: String,
    pub destination: String,
    pub waypoints: Vec<String>,
    pub travel_mode: TravelMode,
}

/// One origin-to-next-stop segment of a provider route.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderLeg {
    pub start_address: String,
    pub end_address: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// A candidate route returned by the routing provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRoute {
    pub legs: Vec<ProviderLeg>,
    pub overview: Polyline,
}

/// Status plus candidate routes, as reported by the routing provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingResponse {
    pub status: String,
    pub routes: Vec<ProviderRoute>,
}

impl RoutingResponse {
    pub const OK: &'static str = "OK";

    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }
}

/// Turns an origin, destination and ordered waypoints into a driving route.
pub trait DirectionsProvider {
    fn route(&self, request: &RoutingRequest) -> Result<RoutingResponse, TransportError>;
}

/// Map display surface. Rendering is fire-and-forget.
pub trait RouteRenderer {
    fn render(&mut self, route: &ProviderRoute);
}

/// Renderer for headless use; drops every route.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl RouteRenderer for NullRenderer {
    fn render(&mut self, _route: &ProviderRoute) {}
}

/// Pairwise distances (meters) and durations (seconds) between addresses.
///
/// Both matrices are indexed by the order of the requested addresses. `None`
/// marks a pair the provider could not route.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DistanceMatrix {
    pub distances: Vec<Vec<Option<f64>>>,
    pub durations: Vec<Vec<Option<f64>>>,
}

impl DistanceMatrix {
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered but refused to build the matrix.
    #[error("distance matrix request failed due to {0}")]
    Service(String),
}

/// Provides a distance/time matrix for a set of addresses.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, addresses: &[String]) -> Result<DistanceMatrix, MatrixError>;
}
