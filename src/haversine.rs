//! Offline matrix provider: great-circle meters, seconds from a fixed speed.
//!
//! Needs no credentials or network.

use crate::error::Result;
use crate::model::Coordinate;
use crate::traits::{DistanceMatrixProvider, MatrixElement};

/// Urban driving average.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Great-circle distance between two points in meters.
    pub fn haversine_m(from: Coordinate, to: Coordinate) -> f64 {
        let lat1_rad = from.lat.to_radians();
        let lat2_rad = to.lat.to_radians();
        let delta_lat = (to.lat - from.lat).to_radians();
        let delta_lng = (to.lng - from.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }

    /// Convert a distance in meters to travel time in seconds.
    fn meters_to_seconds(&self, meters: f64) -> f64 {
        let hours = meters / 1000.0 / self.speed_kmh;
        (hours * 3600.0).round()
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_row(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<MatrixElement>> {
        Ok(destinations
            .iter()
            .map(|to| {
                let meters = Self::haversine_m(origin, *to);
                MatrixElement::ok(meters, self.meters_to_seconds(meters))
            })
            .collect())
    }
}
