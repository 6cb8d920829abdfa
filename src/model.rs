//! Value types passed between pipeline stages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// A resolved address. Its position in the resolved list is its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub raw_address: String,
    pub formatted_address: String,
    pub coordinate: Coordinate,
}

/// Pairwise travel distance (meters) and duration (seconds).
///
/// Always square, diagonal zero, entries finite and non-negative. Not
/// necessarily symmetric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMatrix {
    distance: Vec<Vec<f64>>,
    duration: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn new(distance: Vec<Vec<f64>>, duration: Vec<Vec<f64>>) -> Result<Self> {
        let n = distance.len();
        if duration.len() != n {
            return Err(RouteError::validation(format!(
                "distance matrix has {} rows but duration matrix has {}",
                n,
                duration.len()
            )));
        }
        check_square("distance", &distance)?;
        check_square("duration", &duration)?;

        Ok(Self { distance, duration })
    }

    /// Builds a matrix with every duration set to zero.
    pub fn from_distances(distance: Vec<Vec<f64>>) -> Result<Self> {
        let duration = distance.iter().map(|row| vec![0.0; row.len()]).collect();
        Self::new(distance, duration)
    }

    pub fn len(&self) -> usize {
        self.distance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distance.is_empty()
    }

    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distance[from][to]
    }

    pub fn duration(&self, from: usize, to: usize) -> f64 {
        self.duration[from][to]
    }
}

fn check_square(name: &str, rows: &[Vec<f64>]) -> Result<()> {
    let n = rows.len();
    for (i, row) in rows.iter().enumerate() {
        if row.len() != n {
            return Err(RouteError::validation(format!(
                "{name} row {i} has {} entries, expected {n}",
                row.len()
            )));
        }
        for (j, value) in row.iter().enumerate() {
            if !value.is_finite() || *value < 0.0 {
                return Err(RouteError::validation(format!(
                    "{name}[{i}][{j}] = {value} is not a finite non-negative value"
                )));
            }
            if i == j && *value != 0.0 {
                return Err(RouteError::validation(format!(
                    "{name}[{i}][{i}] must be 0, got {value}"
                )));
            }
        }
    }
    Ok(())
}

/// How the end of the route is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    /// Free end.
    #[default]
    Open,
    /// Last waypoint is a caller-chosen terminus and is never reordered.
    FixedEnd,
    /// Route returns to the first waypoint.
    Loop,
}

impl fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RoutingMode::Open => "open",
            RoutingMode::FixedEnd => "fixed_end",
            RoutingMode::Loop => "loop",
        })
    }
}

impl FromStr for RoutingMode {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(RoutingMode::Open),
            "fixed_end" | "fixed-end" | "fixed" => Ok(RoutingMode::FixedEnd),
            "loop" => Ok(RoutingMode::Loop),
            other => Err(RouteError::validation(format!("unknown routing mode {other:?}"))),
        }
    }
}

/// Visiting order as indices into the resolved waypoint list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tour(Vec<usize>);

impl Tour {
    pub fn new(order: Vec<usize>) -> Self {
        Self(order)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.0
    }
}

impl From<Vec<usize>> for Tour {
    fn from(order: Vec<usize>) -> Self {
        Self(order)
    }
}

/// Totals along a tour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Meters.
    pub total_distance: f64,
    /// Seconds.
    pub total_duration: f64,
}

impl RouteSummary {
    pub fn distance_km(&self) -> f64 {
        self.total_distance / 1000.0
    }

    pub fn duration_minutes(&self) -> f64 {
        self.total_duration / 60.0
    }
}

/// Result handed to the caller for display and persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedRoute {
    pub schema_version: u32,
    /// Formatted addresses in visiting order.
    pub addresses: Vec<String>,
    pub tour: Tour,
    pub total_distance: f64,
    pub total_duration: f64,
}

impl OptimizedRoute {
    pub const SCHEMA_VERSION: u32 = 1;

    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            total_distance: self.total_distance,
            total_duration: self.total_duration,
        }
    }
}
