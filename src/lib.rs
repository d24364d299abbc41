//! route-planner core
//!
//! Orders a user's destination list behind a fixed start with one of three
//! heuristics, then turns the ordering into a step-by-step driving itinerary.
//! Solvers and routing providers sit behind the traits in [`traits`]; HTTP
//! adapters for a remote solver service and Google Maps are included.

pub mod traits;
pub mod destinations;
pub mod solver;
pub mod solver_service;
pub mod heuristics;
pub mod local_solver;
pub mod distance_matrix;
pub mod directions;
pub mod itinerary;
pub mod polyline;
pub mod plan;
