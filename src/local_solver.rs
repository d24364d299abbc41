//! In-process route solver.
//!
//! Answers the same contract as the remote solver service: it fetches a
//! distance matrix for the requested addresses, orders them with the chosen
//! heuristic and reports the distance and duration along that order.

use tracing::debug;

use crate::heuristics;
use crate::traits::{
    DistanceMatrix, DistanceMatrixProvider, HeuristicKind, MatrixError, RouteSolver, SolverReply,
    TransportError,
};

#[derive(Debug, Clone)]
pub struct LocalSolver<M> {
    matrix_provider: M,
}

impl<M: DistanceMatrixProvider> LocalSolver<M> {
    pub fn new(matrix_provider: M) -> Self {
        Self { matrix_provider }
    }
}

impl<M: DistanceMatrixProvider> RouteSolver for LocalSolver<M> {
    fn solve(
        &self,
        heuristic: HeuristicKind,
        locations: &[String],
    ) -> Result<SolverReply, TransportError> {
        if locations.len() < 2 {
            return Ok(SolverReply::Rejected {
                message: "At least two locations are required".to_string(),
            });
        }

        let matrix = match self.matrix_provider.matrix_for(locations) {
            Ok(matrix) => matrix,
            Err(MatrixError::Transport(err)) => return Err(err),
            Err(MatrixError::Service(status)) => {
                return Ok(SolverReply::Rejected {
                    message: format!("Distance matrix request failed due to {status}"),
                });
            }
        };

        let (distances, durations) = match complete(&matrix, locations) {
            Ok(weights) => weights,
            Err(message) => return Ok(SolverReply::Rejected { message }),
        };

        let path = heuristics::order(heuristic, &distances);
        debug!(heuristic = heuristic.endpoint(), ?path, "ordered stops locally");

        Ok(SolverReply::Solved {
            ordered_locations: path.iter().map(|&i| locations[i].clone()).collect(),
            total_distance_meters: heuristics::path_total(&path, &distances),
            total_duration_seconds: heuristics::path_total(&path, &durations),
        })
    }
}

/// Unwraps a matrix with every pair routed, naming the first pair that is not.
fn complete(
    matrix: &DistanceMatrix,
    locations: &[String],
) -> Result<(Vec<Vec<f64>>, Vec<Vec<f64>>), String> {
    let n = locations.len();
    if matrix.distances.len() != n || matrix.durations.len() != n {
        return Err(format!("distance matrix does not cover {n} locations"));
    }

    let dense = |rows: &[Vec<Option<f64>>]| -> Result<Vec<Vec<f64>>, String> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                if row.len() != n {
                    return Err(format!("distance matrix does not cover {n} locations"));
                }
                row.iter()
                    .enumerate()
                    .map(|(j, cell)| {
                        cell.ok_or_else(|| {
                            format!("No route between {} and {}", locations[i], locations[j])
                        })
                    })
                    .collect()
            })
            .collect()
    };

    Ok((dense(&matrix.distances)?, dense(&matrix.durations)?))
}
