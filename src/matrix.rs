//! Distance-matrix assembly, one provider call per origin row.

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::config::PlannerConfig;
use crate::error::{Result, RouteError};
use crate::fanout::FanOut;
use crate::model::{Coordinate, DistanceMatrix};
use crate::traits::{DistanceMatrixProvider, MatrixElement};

#[derive(Debug)]
pub struct DistanceMatrixBuilder<'a, M> {
    provider: &'a M,
    config: &'a PlannerConfig,
}

impl<'a, M: DistanceMatrixProvider> DistanceMatrixBuilder<'a, M> {
    pub fn new(provider: &'a M, config: &'a PlannerConfig) -> Self {
        Self { provider, config }
    }

    pub fn build(&self, coordinates: &[Coordinate]) -> Result<DistanceMatrix> {
        self.build_with_cancellation(coordinates, &CancellationToken::new())
    }

    /// Issues `n` row lookups for `n` coordinates. Any pair the provider
    /// cannot serve fails the build with `RouteError::Matrix`.
    #[instrument(skip_all, fields(size = coordinates.len()))]
    pub fn build_with_cancellation(
        &self,
        coordinates: &[Coordinate],
        cancel: &CancellationToken,
    ) -> Result<DistanceMatrix> {
        self.provider.check_credentials()?;

        let n = coordinates.len();
        let rows = FanOut::new(self.config, cancel).run(coordinates, |origin_index, origin| {
            debug!(origin_index, %origin, "requesting matrix row");
            let row = self.provider.matrix_row(*origin, coordinates)?;
            check_row(origin_index, n, row)
        })?;

        let mut distance = Vec::with_capacity(n);
        let mut duration = Vec::with_capacity(n);
        for row in rows {
            let (d, t): (Vec<f64>, Vec<f64>) = row.into_iter().unzip();
            distance.push(d);
            duration.push(t);
        }

        debug!(size = n, "distance matrix assembled");
        DistanceMatrix::new(distance, duration)
    }
}

/// Validates one provider row and returns its (distance, duration) cells.
fn check_row(origin_index: usize, n: usize, row: Vec<MatrixElement>) -> Result<Vec<(f64, f64)>> {
    if row.len() != n {
        return Err(RouteError::Service {
            status: "MALFORMED_ROW".to_string(),
            message: format!("row {origin_index} has {} elements, expected {n}", row.len()),
        });
    }

    row.into_iter()
        .enumerate()
        .map(|(destination_index, element)| {
            if !element.status.is_ok() {
                warn!(
                    origin_index,
                    destination_index,
                    status = %element.status,
                    "matrix element unavailable"
                );
                return Err(RouteError::Matrix {
                    origin_index,
                    destination_index,
                    status: element.status,
                });
            }
            if destination_index == origin_index {
                Ok((0.0, 0.0))
            } else {
                Ok((element.distance, element.duration))
            }
        })
        .collect()
}
