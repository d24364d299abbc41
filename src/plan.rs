//! Plan state and the dispatch cycle that drives it.
//!
//! A cycle has two commit points. Solver totals and the heuristic label are
//! committed as soon as the solver answers; itinerary steps are committed
//! only once the routing provider has produced them. Each cycle carries an
//! [`AttemptId`], and commits from any attempt but the latest are refused.

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::destinations::{DestinationList, PresetCatalogue, PresetId};
use crate::itinerary::{self, BuildError, ItineraryStep};
use crate::solver::{self, DispatchError, DispatchRequest, RouteMetrics};
use crate::traits::{DirectionsProvider, HeuristicKind, NullRenderer, RouteRenderer, RouteSolver};

pub const DEFAULT_FIXED_START: &str = "4 N 2nd St Suite 150, San Jose, CA 95113";

/// Monotonically increasing identifier of a dispatch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptId(u64);

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("attempt {attempt} was superseded by attempt {latest}")]
    Superseded { attempt: AttemptId, latest: AttemptId },

    #[error("unknown preset id {0}")]
    UnknownPreset(PresetId),
}

impl PlanError {
    /// Notification shown to the user when a cycle run with `heuristic` fails.
    pub fn user_message(&self, heuristic: HeuristicKind) -> String {
        let label = heuristic.label();
        match self {
            PlanError::Dispatch(DispatchError::InsufficientStops { .. })
            | PlanError::Build(BuildError::InsufficientStops { .. }) => {
                "Please enter at least two locations.".to_string()
            }
            PlanError::Dispatch(DispatchError::SolverRejected(message)) => {
                format!("{label} calculation failed: {message}")
            }
            PlanError::Dispatch(_) => format!("Error fetching {label} route. Please try again."),
            PlanError::Build(BuildError::RoutingFailed(status)) => {
                format!("Directions request failed due to {status}")
            }
            PlanError::Build(err) => format!("Directions request failed: {err}"),
            PlanError::Superseded { .. } => {
                format!("{label} result arrived after a newer request.")
            }
            PlanError::UnknownPreset(id) => format!("Unknown preset {id}."),
        }
    }
}

/// A dispatch cycle in flight: the stops it sent and the heuristic it used.
#[derive(Debug, Clone)]
pub struct Attempt {
    id: AttemptId,
    heuristic: HeuristicKind,
    request: DispatchRequest,
}

impl Attempt {
    pub fn id(&self) -> AttemptId {
        self.id
    }

    pub fn heuristic(&self) -> HeuristicKind {
        self.heuristic
    }

    pub fn request(&self) -> &DispatchRequest {
        &self.request
    }
}

/// Everything the user sees about the current plan.
#[derive(Debug, Clone, Default)]
pub struct PlanState {
    destinations: DestinationList,
    heuristic_label: Option<&'static str>,
    itinerary: Vec<ItineraryStep>,
    metrics: RouteMetrics,
    notice: Option<String>,
    attempts: u64,
}

impl PlanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destinations(&self) -> &DestinationList {
        &self.destinations
    }

    /// Direct edits to the list take effect immediately.
    pub fn destinations_mut(&mut self) -> &mut DestinationList {
        &mut self.destinations
    }

    pub fn heuristic_label(&self) -> Option<&'static str> {
        self.heuristic_label
    }

    pub fn itinerary(&self) -> &[ItineraryStep] {
        &self.itinerary
    }

    pub fn metrics(&self) -> RouteMetrics {
        self.metrics
    }

    pub fn total_distance_meters(&self) -> f64 {
        self.metrics.total_distance_meters
    }

    pub fn total_duration_seconds(&self) -> f64 {
        self.metrics.total_duration_seconds
    }

    /// Last user-facing failure message, cleared when a new cycle starts.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn latest_attempt(&self) -> Option<AttemptId> {
        (self.attempts > 0).then_some(AttemptId(self.attempts))
    }

    pub fn route_heading(&self) -> String {
        match self.heuristic_label {
            Some(label) => format!("Route Order: ({label})"),
            None => "Route Order:".to_string(),
        }
    }

    /// Opens a new cycle for the filled destinations.
    ///
    /// Fails without touching state when fewer than two stops would be
    /// sent. Otherwise clears the label and totals and supersedes every
    /// earlier attempt. The itinerary is left as it is.
    pub fn begin_attempt(
        &mut self,
        heuristic: HeuristicKind,
        fixed_start: &str,
    ) -> Result<Attempt, DispatchError> {
        let request = DispatchRequest::new(fixed_start, &self.destinations.filled())?;

        self.attempts += 1;
        self.heuristic_label = None;
        self.metrics = RouteMetrics::ZERO;
        self.notice = None;

        Ok(Attempt {
            id: AttemptId(self.attempts),
            heuristic,
            request,
        })
    }

    pub fn is_current(&self, attempt: &Attempt) -> bool {
        attempt.id.0 == self.attempts
    }

    fn ensure_current(&self, attempt: &Attempt) -> Result<(), PlanError> {
        if self.is_current(attempt) {
            return Ok(());
        }
        Err(PlanError::Superseded {
            attempt: attempt.id,
            latest: AttemptId(self.attempts),
        })
    }

    /// First commit point: solver totals and the heuristic label.
    pub fn commit_metrics(
        &mut self,
        attempt: &Attempt,
        metrics: RouteMetrics,
    ) -> Result<(), PlanError> {
        self.ensure_current(attempt)?;
        self.heuristic_label = Some(attempt.heuristic.label());
        self.metrics = metrics;
        Ok(())
    }

    /// Second commit point: the itinerary steps.
    pub fn commit_itinerary(
        &mut self,
        attempt: &Attempt,
        steps: Vec<ItineraryStep>,
    ) -> Result<(), PlanError> {
        self.ensure_current(attempt)?;
        self.itinerary = steps;
        Ok(())
    }

    /// Surfaces `error` to the user if `attempt` is still the latest.
    pub fn record_failure(&mut self, attempt: &Attempt, error: &PlanError) -> bool {
        if !self.is_current(attempt) {
            return false;
        }
        self.notice = Some(error.user_message(attempt.heuristic));
        true
    }
}

/// Owns the collaborators and the plan state for one session.
///
/// The solver, routing provider and renderer are created by the caller and
/// handed over here; the planner holds no global handles.
#[derive(Debug)]
pub struct Planner<S, D, R = NullRenderer> {
    solver: S,
    directions: D,
    renderer: R,
    catalogue: PresetCatalogue,
    fixed_start: String,
    state: PlanState,
}

impl<S, D, R> Planner<S, D, R>
where
    S: RouteSolver,
    D: DirectionsProvider,
    R: RouteRenderer,
{
    pub fn new(solver: S, directions: D, renderer: R) -> Self {
        Self {
            solver,
            directions,
            renderer,
            catalogue: PresetCatalogue::default(),
            fixed_start: DEFAULT_FIXED_START.to_string(),
            state: PlanState::new(),
        }
    }

    pub fn with_fixed_start(mut self, fixed_start: impl Into<String>) -> Self {
        self.fixed_start = fixed_start.into();
        self
    }

    pub fn with_catalogue(mut self, catalogue: PresetCatalogue) -> Self {
        self.catalogue = catalogue;
        self
    }

    pub fn fixed_start(&self) -> &str {
        &self.fixed_start
    }

    pub fn state(&self) -> &PlanState {
        &self.state
    }

    pub fn catalogue(&self) -> &PresetCatalogue {
        &self.catalogue
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn directions(&self) -> &D {
        &self.directions
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn set_address(&mut self, index: usize, text: impl Into<String>) -> bool {
        self.state.destinations_mut().set_address(index, text)
    }

    pub fn append_slot(&mut self) {
        self.state.destinations_mut().append_slot();
    }

    pub fn remove_slot(&mut self, index: usize) -> bool {
        self.state.destinations_mut().remove_slot(index)
    }

    /// Fills the next preset slot from the catalogue entry `id`.
    pub fn select_preset(&mut self, id: PresetId) -> Result<bool, PlanError> {
        let preset = self.catalogue.get(id).ok_or(PlanError::UnknownPreset(id))?;
        Ok(self.state.destinations.select_preset(preset))
    }

    /// Runs a full cycle: dispatch, commit totals, build, commit steps.
    pub fn run(&mut self, heuristic: HeuristicKind) -> Result<&[ItineraryStep], PlanError> {
        let attempt = match self.state.begin_attempt(heuristic, &self.fixed_start) {
            Ok(attempt) => attempt,
            Err(err) => {
                let err = PlanError::from(err);
                warn!(heuristic = heuristic.endpoint(), error = %err, "not dispatching");
                self.state.notice = Some(err.user_message(heuristic));
                return Err(err);
            }
        };

        if let Err(err) = self.cycle(&attempt) {
            warn!(attempt = %attempt.id, error = %err, "plan cycle failed");
            self.state.record_failure(&attempt, &err);
            return Err(err);
        }

        info!(
            attempt = %attempt.id,
            heuristic = heuristic.label(),
            steps = self.state.itinerary.len(),
            metrics = %self.state.metrics,
            "plan updated"
        );
        Ok(self.state.itinerary())
    }

    fn cycle(&mut self, attempt: &Attempt) -> Result<(), PlanError> {
        let (ordering, metrics) =
            solver::dispatch(&self.solver, attempt.heuristic, &attempt.request)?;
        self.state.commit_metrics(attempt, metrics)?;

        let steps = itinerary::build(&ordering, &self.directions, &mut self.renderer)?;
        self.state.commit_itinerary(attempt, steps)
    }
}
