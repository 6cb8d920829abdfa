//! Tour construction (greedy nearest neighbor).
//!
//! A single pass: from the current stop, go to the closest unvisited stop
//! that the routing mode allows to move. No local search is applied, so the
//! result is a heuristic tour, not an optimal one.

use tracing::debug;

use crate::error::{Result, RouteError};
use crate::model::{DistanceMatrix, RoutingMode, Tour};

/// Builds a visiting order over `matrix` starting at index 0.
///
/// - `Open`: every index after 0 is reordered.
/// - `FixedEnd`: index `n-1` is kept last.
/// - `Loop`: index `n-1` is the closing copy of 0; the tour ends back at 0.
///
/// Ties on distance go to the lowest index.
pub fn construct(matrix: &DistanceMatrix, mode: RoutingMode) -> Result<Tour> {
    let n = matrix.len();
    if n == 0 {
        return Err(RouteError::validation("cannot build a tour over an empty matrix"));
    }
    if n <= 2 {
        return Ok(Tour::new((0..n).collect()));
    }

    let (free_end, suffix) = match mode {
        RoutingMode::Open => (n, None),
        RoutingMode::FixedEnd => (n - 1, Some(n - 1)),
        RoutingMode::Loop => (n - 1, Some(0)),
    };

    let mut path = Vec::with_capacity(n);
    path.push(0);
    path.extend(nearest_neighbor_path(matrix, 1..free_end));
    if let Some(last) = suffix {
        path.push(last);
    }

    debug!(%mode, size = n, tour = ?path, "tour constructed");
    Ok(Tour::new(path))
}

/// Visits every index in `free` once, starting from index 0.
fn nearest_neighbor_path(matrix: &DistanceMatrix, free: std::ops::Range<usize>) -> Vec<usize> {
    let offset = free.start;
    let mut visited = vec![false; free.len()];
    let mut path = Vec::with_capacity(free.len());
    let mut current = 0;

    for _ in 0..free.len() {
        let mut best: Option<(usize, f64)> = None;
        for (slot, seen) in visited.iter().enumerate() {
            if *seen {
                continue;
            }
            let candidate = offset + slot;
            let cost = matrix.distance(current, candidate);
            // Strict comparison keeps the lowest index on ties.
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((candidate, cost));
            }
        }

        let Some((next, _)) = best else { break };
        visited[next - offset] = true;
        path.push(next);
        current = next;
    }

    path
}
