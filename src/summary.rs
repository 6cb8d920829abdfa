//! Route totals.

use crate::error::{Result, RouteError};
use crate::model::{DistanceMatrix, RouteSummary, Tour};

/// Sums distance and duration over consecutive tour edges.
pub fn summarize(matrix: &DistanceMatrix, tour: &Tour) -> Result<RouteSummary> {
    let n = matrix.len();
    if let Some(bad) = tour.indices().iter().find(|&&index| index >= n) {
        return Err(RouteError::validation(format!(
            "tour index {bad} is outside a matrix of size {n}"
        )));
    }

    let summary = tour
        .indices()
        .windows(2)
        .fold(RouteSummary::default(), |mut acc, edge| {
            acc.total_distance += matrix.distance(edge[0], edge[1]);
            acc.total_duration += matrix.duration(edge[0], edge[1]);
            acc
        });

    Ok(summary)
}
