//! Google Maps Platform adapter (Geocoding + Distance Matrix web services).

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::env_var;
use crate::error::{Result, RouteError};
use crate::model::Coordinate;
use crate::traits::{
    missing_credential, DistanceMatrixProvider, GeocodeCandidate, GeocodeReply, Geocoder,
    LookupStatus, MatrixElement,
};

pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";
pub const BASE_URL_VAR: &str = "GOOGLE_MAPS_BASE_URL";

/// Distance Matrix API limit on destinations per request.
const MAX_DESTINATIONS_PER_REQUEST: usize = 25;

#[derive(Clone, Serialize, Deserialize)]
pub struct GoogleMapsConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// ccTLD region bias for geocoding, e.g. "us".
    #[serde(default)]
    pub region: Option<String>,
}

fn default_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for GoogleMapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            region: None,
        }
    }
}

// Hand-written so the key never reaches logs.
impl std::fmt::Debug for GoogleMapsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMapsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("region", &self.region)
            .finish()
    }
}

impl GoogleMapsConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env_var)
    }

    pub(crate) fn from_vars(lookup: impl Fn(&str) -> Result<Option<String>>) -> Result<Self> {
        let mut config = Self {
            api_key: lookup(API_KEY_VAR)?,
            ..Self::default()
        };
        if let Some(base_url) = lookup(BASE_URL_VAR)? {
            config.base_url = base_url;
        }
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    config: GoogleMapsConfig,
    client: reqwest::blocking::Client,
}

impl GoogleMapsClient {
    pub fn new(config: GoogleMapsConfig) -> Result<Self> {
        if config.timeout_secs == 0 {
            return Err(RouteError::config("timeout_secs must be greater than 0"));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| {
                RouteError::config(format!("cannot build HTTP client: {}", err.without_url()))
            })?;

        Ok(Self { config, client })
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| missing_credential("Google Maps", API_KEY_VAR))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|err| self.request_error(err))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(RouteError::Transport(format!("HTTP {status} from {path}")));
        }
        if !status.is_success() {
            return Err(RouteError::Service {
                status: format!("HTTP {}", status.as_u16()),
                message: format!("{path} rejected the request"),
            });
        }

        response.json::<T>().map_err(|err| RouteError::Service {
            status: "INVALID_RESPONSE".to_string(),
            message: err.without_url().to_string(),
        })
    }

    fn request_error(&self, err: reqwest::Error) -> RouteError {
        if err.is_timeout() {
            RouteError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            RouteError::Transport(err.without_url().to_string())
        }
    }

    fn matrix_chunk(
        &self,
        key: &str,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<MatrixElement>> {
        let origins = origin.to_string();
        let destinations_param = destinations
            .iter()
            .map(Coordinate::to_string)
            .collect::<Vec<_>>()
            .join("|");

        let body: DistanceMatrixResponse = self.get_json(
            "/maps/api/distancematrix/json",
            &[
                ("origins", origins.as_str()),
                ("destinations", destinations_param.as_str()),
                ("units", "metric"),
                ("key", key),
            ],
        )?;

        if !body.status.is_ok() {
            return Err(RouteError::Service {
                status: body.status.to_string(),
                message: body.error_message.unwrap_or_default(),
            });
        }

        let row = body.rows.into_iter().next().ok_or_else(|| RouteError::Service {
            status: "MALFORMED_ROW".to_string(),
            message: "distance matrix response has no rows".to_string(),
        })?;

        Ok(row.elements.into_iter().map(MatrixElement::from).collect())
    }
}

impl Geocoder for GoogleMapsClient {
    fn geocode(&self, address: &str) -> Result<GeocodeReply> {
        let key = self.api_key()?;
        let mut query = vec![("address", address), ("key", key)];
        if let Some(region) = self.config.region.as_deref() {
            query.push(("region", region));
        }

        let body: GeocodeResponse = self.get_json("/maps/api/geocode/json", &query)?;
        debug!(%address, status = %body.status, results = body.results.len(), "geocode response");

        match body.status {
            LookupStatus::Ok => {}
            // Request-level throttling is not a verdict on the address.
            LookupStatus::OverQueryLimit | LookupStatus::UnknownError => {
                return Err(RouteError::Service {
                    status: body.status.to_string(),
                    message: body.error_message.unwrap_or_default(),
                });
            }
            status => return Ok(GeocodeReply::failed(status)),
        }

        Ok(GeocodeReply::found(
            body.results
                .into_iter()
                .map(|result| GeocodeCandidate {
                    formatted_address: result.formatted_address,
                    coordinate: Coordinate::new(
                        result.geometry.location.lat,
                        result.geometry.location.lng,
                    ),
                })
                .collect(),
        ))
    }
}

impl DistanceMatrixProvider for GoogleMapsClient {
    /// Rows wider than the per-request destination limit are fetched in
    /// several requests and stitched back together.
    fn matrix_row(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<MatrixElement>> {
        let key = self.api_key()?;
        let mut row = Vec::with_capacity(destinations.len());
        for chunk in destinations.chunks(MAX_DESTINATIONS_PER_REQUEST) {
            let elements = self.matrix_chunk(key, origin, chunk)?;
            if elements.len() != chunk.len() {
                return Err(RouteError::Service {
                    status: "MALFORMED_ROW".to_string(),
                    message: format!("expected {} elements, got {}", chunk.len(), elements.len()),
                });
            }
            row.extend(elements);
        }
        debug!(%origin, elements = row.len(), "distance matrix row");
        Ok(row)
    }

    fn check_credentials(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: LookupStatus,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: LookupStatus,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<DistanceMatrixRow>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixRow {
    elements: Vec<DistanceMatrixElement>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixElement {
    status: LookupStatus,
    distance: Option<ValueField>,
    duration: Option<ValueField>,
}

#[derive(Debug, Deserialize)]
struct ValueField {
    value: f64,
}

impl From<DistanceMatrixElement> for MatrixElement {
    fn from(element: DistanceMatrixElement) -> Self {
        match (element.status, element.distance, element.duration) {
            (LookupStatus::Ok, Some(distance), Some(duration)) => {
                MatrixElement::ok(distance.value, duration.value)
            }
            // OK without values is as unusable as a failed element.
            (LookupStatus::Ok, _, _) => MatrixElement::failed(LookupStatus::ZeroResults),
            (status, _, _) => MatrixElement::failed(status),
        }
    }
}
