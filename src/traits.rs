//! Service seams for the route planner.
//!
//! The pipeline only talks to the outside world through these two traits.
//! Concrete back-ends live in `google`, `osrm` and `haversine`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};
use crate::model::Coordinate;

/// Per-lookup status, using the Google web-service vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LookupStatus {
    Ok,
    ZeroResults,
    NotFound,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    MaxElementsExceeded,
    MaxRouteLengthExceeded,
    UnknownError,
    #[serde(other)]
    Unrecognized,
}

impl LookupStatus {
    pub fn is_ok(self) -> bool {
        self == LookupStatus::Ok
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LookupStatus::Ok => "OK",
            LookupStatus::ZeroResults => "ZERO_RESULTS",
            LookupStatus::NotFound => "NOT_FOUND",
            LookupStatus::OverQueryLimit => "OVER_QUERY_LIMIT",
            LookupStatus::RequestDenied => "REQUEST_DENIED",
            LookupStatus::InvalidRequest => "INVALID_REQUEST",
            LookupStatus::MaxElementsExceeded => "MAX_ELEMENTS_EXCEEDED",
            LookupStatus::MaxRouteLengthExceeded => "MAX_ROUTE_LENGTH_EXCEEDED",
            LookupStatus::UnknownError => "UNKNOWN_ERROR",
            LookupStatus::Unrecognized => "UNRECOGNIZED",
        }
    }
}

impl fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One match returned by a geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    pub formatted_address: String,
    pub coordinate: Coordinate,
}

/// Geocoder answer for a single address. Candidates are ordered best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeReply {
    pub status: LookupStatus,
    pub candidates: Vec<GeocodeCandidate>,
}

impl GeocodeReply {
    pub fn found(candidates: Vec<GeocodeCandidate>) -> Self {
        Self {
            status: LookupStatus::Ok,
            candidates,
        }
    }

    pub fn failed(status: LookupStatus) -> Self {
        Self {
            status,
            candidates: Vec::new(),
        }
    }
}

/// Travel cost for one (origin, destination) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatrixElement {
    pub status: LookupStatus,
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
}

impl MatrixElement {
    pub fn ok(distance: f64, duration: f64) -> Self {
        Self {
            status: LookupStatus::Ok,
            distance,
            duration,
        }
    }

    pub fn failed(status: LookupStatus) -> Self {
        Self {
            status,
            distance: 0.0,
            duration: 0.0,
        }
    }
}

/// Turns free-text addresses into coordinates.
///
/// Transport failures are returned as `Err`; a lookup the service answered
/// but could not satisfy comes back as a reply with a non-OK status.
pub trait Geocoder: Sync {
    fn geocode(&self, address: &str) -> Result<GeocodeReply>;
}

/// Provides one row of a distance/duration matrix per call.
///
/// The returned row is indexed by the order of `destinations`.
pub trait DistanceMatrixProvider: Sync {
    fn matrix_row(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<MatrixElement>>;

    /// Fails with `RouteError::Config` when the provider cannot authenticate.
    fn check_credentials(&self) -> Result<()> {
        Ok(())
    }
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn geocode(&self, address: &str) -> Result<GeocodeReply> {
        (**self).geocode(address)
    }
}

impl<T: DistanceMatrixProvider + ?Sized> DistanceMatrixProvider for &T {
    fn matrix_row(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<MatrixElement>> {
        (**self).matrix_row(origin, destinations)
    }

    fn check_credentials(&self) -> Result<()> {
        (**self).check_credentials()
    }
}

pub(crate) fn missing_credential(service: &str, variable: &str) -> RouteError {
    RouteError::config(format!("{service} credential missing (set {variable})"))
}
