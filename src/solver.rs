//! Solver dispatch.
//!
//! Sends the fixed start plus the user's destinations to a [`RouteSolver`]
//! and normalises the reply into an ordered stop sequence and route metrics.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::traits::{HeuristicKind, RouteSolver, SolverReply, TransportError};

/// Smallest number of stops (fixed start included) worth dispatching.
pub const MIN_STOPS: usize = 2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("at least two stops are required, got {stops}")]
    InsufficientStops { stops: usize },

    #[error("solver unreachable: {0}")]
    TransportFailure(#[from] TransportError),

    #[error("solver rejected the request: {0}")]
    SolverRejected(String),

    #[error("solver returned an invalid ordering: {0}")]
    InvalidOrdering(String),

    #[error("solver returned invalid totals (distance {distance}, duration {duration})")]
    InvalidMetrics { distance: f64, duration: f64 },
}

/// Stops handed to the solver, fixed start first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    locations: Vec<String>,
}

impl DispatchRequest {
    /// Prepends the fixed start to the non-blank destinations.
    pub fn new(fixed_start: &str, destinations: &[String]) -> Result<Self, DispatchError> {
        let mut locations = Vec::with_capacity(destinations.len() + 1);
        locations.push(fixed_start.to_string());
        locations.extend(
            destinations
                .iter()
                .map(|address| address.trim())
                .filter(|address| !address.is_empty())
                .map(str::to_string),
        );

        if locations.len() < MIN_STOPS {
            return Err(DispatchError::InsufficientStops {
                stops: locations.len(),
            });
        }

        Ok(Self { locations })
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn fixed_start(&self) -> &str {
        &self.locations[0]
    }
}

/// Visiting order produced by a solver. Position 0 is the fixed start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedStopSequence {
    stops: Vec<String>,
}

impl OrderedStopSequence {
    pub fn new(stops: Vec<String>) -> Self {
        Self { stops }
    }

    /// Validates a solver ordering against the stops that were sent.
    ///
    /// A closed tour that returns to the fixed start is cut back to the open
    /// path. Anything else must be a permutation of the request that keeps
    /// the fixed start first.
    fn from_solver(
        request: &DispatchRequest,
        mut ordered: Vec<String>,
    ) -> Result<Self, DispatchError> {
        let expected = request.locations().len();

        if ordered.len() == expected + 1
            && ordered.first() == ordered.last()
            && ordered.first().map(String::as_str) == Some(request.fixed_start())
        {
            debug!("dropping closing return to the fixed start from solver ordering");
            ordered.pop();
        }

        if ordered.len() != expected {
            return Err(DispatchError::InvalidOrdering(format!(
                "expected {} stops, got {}",
                expected,
                ordered.len()
            )));
        }

        if ordered.first().map(String::as_str) != Some(request.fixed_start()) {
            return Err(DispatchError::InvalidOrdering(
                "ordering does not begin at the fixed start".to_string(),
            ));
        }

        let mut counts: HashMap<&str, isize> = HashMap::new();
        for address in request.locations() {
            *counts.entry(address.as_str()).or_default() += 1;
        }
        for address in &ordered {
            *counts.entry(address.as_str()).or_default() -= 1;
        }
        if let Some((address, _)) = counts.iter().find(|(_, count)| **count != 0) {
            return Err(DispatchError::InvalidOrdering(format!(
                "ordering does not visit {address:?} exactly as requested"
            )));
        }

        Ok(Self { stops: ordered })
    }

    pub fn stops(&self) -> &[String] {
        &self.stops
    }

    pub fn into_stops(self) -> Vec<String> {
        self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Totals reported by the solver for a whole ordering.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteMetrics {
    pub total_distance_meters: f64,
    pub total_duration_seconds: f64,
}

impl RouteMetrics {
    pub const ZERO: RouteMetrics = RouteMetrics {
        total_distance_meters: 0.0,
        total_duration_seconds: 0.0,
    };

    pub fn new(
        total_distance_meters: f64,
        total_duration_seconds: f64,
    ) -> Result<Self, DispatchError> {
        let valid = |value: f64| value.is_finite() && value >= 0.0;
        if !valid(total_distance_meters) || !valid(total_duration_seconds) {
            return Err(DispatchError::InvalidMetrics {
                distance: total_distance_meters,
                duration: total_duration_seconds,
            });
        }
        Ok(Self {
            total_distance_meters,
            total_duration_seconds,
        })
    }

    pub fn distance_km(&self) -> f64 {
        self.total_distance_meters / 1000.0
    }

    pub fn duration_minutes(&self) -> f64 {
        self.total_duration_seconds / 60.0
    }
}

impl fmt::Display for RouteMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km, {:.2} mins", self.distance_km(), self.duration_minutes())
    }
}

/// Asks `solver` to order the request's stops with `heuristic`.
pub fn dispatch<S>(
    solver: &S,
    heuristic: HeuristicKind,
    request: &DispatchRequest,
) -> Result<(OrderedStopSequence, RouteMetrics), DispatchError>
where
    S: RouteSolver + ?Sized,
{
    debug!(
        heuristic = heuristic.endpoint(),
        stops = request.locations().len(),
        "dispatching to solver"
    );

    match solver.solve(heuristic, request.locations())? {
        SolverReply::Solved {
            ordered_locations,
            total_distance_meters,
            total_duration_seconds,
        } => {
            let metrics = RouteMetrics::new(total_distance_meters, total_duration_seconds)?;
            let ordering = OrderedStopSequence::from_solver(request, ordered_locations)?;
            Ok((ordering, metrics))
        }
        SolverReply::Rejected { message } => {
            warn!(heuristic = heuristic.endpoint(), %message, "solver rejected request");
            Err(DispatchError::SolverRejected(message))
        }
    }
}
