//! Itinerary construction.
//!
//! Turns a solver ordering into a routing request, asks the routing
//! provider for a driving route and reads back one labelled step per leg.

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::solver::OrderedStopSequence;
use crate::traits::{DirectionsProvider, RouteRenderer, RoutingRequest, TransportError, TravelMode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("an itinerary needs at least two stops, got {stops}")]
    InsufficientStops { stops: usize },

    #[error("routing provider unreachable: {0}")]
    TransportFailure(#[from] TransportError),

    #[error("directions request failed due to {0}")]
    RoutingFailed(String),

    #[error("routing provider returned no route")]
    MissingRoute,

    #[error("routing provider returned {actual} legs for {expected} hops")]
    LegCountMismatch { expected: usize, actual: usize },
}

/// One leg of the rendered itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryStep {
    /// 1-based position in the itinerary.
    pub step_index: usize,
    pub start_label: String,
    pub end_label: String,
}

impl fmt::Display for ItineraryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Step {}: {} \u{2192} {}",
            self.step_index, self.start_label, self.end_label
        )
    }
}

/// Origin is the first stop, destination the last, and every stop in
/// between becomes an ordered stopover.
pub fn routing_request(stops: &OrderedStopSequence) -> Result<RoutingRequest, BuildError> {
    match stops.stops() {
        [origin, waypoints @ .., destination] => Ok(RoutingRequest {
            origin: origin.clone(),
            destination: destination.clone(),
            waypoints: waypoints.to_vec(),
            travel_mode: TravelMode::Driving,
        }),
        other => Err(BuildError::InsufficientStops { stops: other.len() }),
    }
}

/// Routes `stops` through `provider`, hands the route to `renderer` and
/// returns the per-leg steps.
pub fn build<P, R>(
    stops: &OrderedStopSequence,
    provider: &P,
    renderer: &mut R,
) -> Result<Vec<ItineraryStep>, BuildError>
where
    P: DirectionsProvider + ?Sized,
    R: RouteRenderer + ?Sized,
{
    let request = routing_request(stops)?;
    debug!(
        origin = %request.origin,
        destination = %request.destination,
        waypoints = request.waypoints.len(),
        "requesting directions"
    );

    let response = provider.route(&request)?;
    if !response.is_ok() {
        warn!(status = %response.status, "directions request failed");
        return Err(BuildError::RoutingFailed(response.status));
    }

    let route = response.routes.first().ok_or(BuildError::MissingRoute)?;
    let expected = stops.len() - 1;
    if route.legs.len() != expected {
        return Err(BuildError::LegCountMismatch {
            expected,
            actual: route.legs.len(),
        });
    }

    renderer.render(route);

    Ok(route
        .legs
        .iter()
        .enumerate()
        .map(|(i, leg)| ItineraryStep {
            step_index: i + 1,
            start_label: leg.start_address.clone(),
            end_label: leg.end_address.clone(),
        })
        .collect())
}
