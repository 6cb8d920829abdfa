//! OSRM HTTP adapter for distance/duration rows.

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, RouteError};
use crate::model::Coordinate;
use crate::traits::{DistanceMatrixProvider, LookupStatus, MatrixElement};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self> {
        if config.timeout_secs == 0 {
            return Err(RouteError::config("timeout_secs must be greater than 0"));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| RouteError::config(format!("cannot build HTTP client: {err}")))?;

        Ok(Self { config, client })
    }

    fn table_url(&self, origin: Coordinate, destinations: &[Coordinate]) -> String {
        // OSRM wants lng,lat; the origin goes first and is the only source.
        let coords = std::iter::once(&origin)
            .chain(destinations)
            .map(|c| format!("{:.6},{:.6}", c.lng, c.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?sources=0&annotations=distance,duration",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }
}

impl DistanceMatrixProvider for OsrmClient {
    fn matrix_row(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<MatrixElement>> {
        if destinations.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(self.table_url(origin, destinations))
            .send()
            .map_err(|err| {
                if err.is_timeout() {
                    RouteError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    RouteError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(RouteError::Transport(format!("OSRM returned HTTP {status}")));
        }

        // OSRM reports request errors as a JSON body with a 4xx status.
        let body: OsrmTableResponse = response.json().map_err(|err| RouteError::Service {
            status: "INVALID_RESPONSE".to_string(),
            message: err.to_string(),
        })?;
        if body.code != "Ok" {
            return Err(RouteError::Service {
                status: body.code,
                message: body.message.unwrap_or_default(),
            });
        }

        let distances = first_row(body.distances);
        let durations = first_row(body.durations);
        debug!(%origin, cells = distances.len(), "OSRM table row");

        // Skip column 0, the origin's own slot.
        Ok((1..=destinations.len())
            .map(|column| {
                match (
                    distances.get(column).copied().flatten(),
                    durations.get(column).copied().flatten(),
                ) {
                    (Some(distance), Some(duration)) => MatrixElement::ok(distance, duration),
                    _ => MatrixElement::failed(LookupStatus::ZeroResults),
                }
            })
            .collect())
    }
}

fn first_row(rows: Option<Vec<Vec<Option<f64>>>>) -> Vec<Option<f64>> {
    rows.unwrap_or_default().into_iter().next().unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    message: Option<String>,
    distances: Option<Vec<Vec<Option<f64>>>>,
    durations: Option<Vec<Vec<Option<f64>>>>,
}
