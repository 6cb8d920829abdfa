//! End-to-end route optimization.
//!
//! addresses -> [`AddressResolver`] -> [`DistanceMatrixBuilder`] ->
//! [`construct`] -> [`summarize`] -> [`OptimizedRoute`].

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::config::PlannerConfig;
use crate::error::{Result, RouteError};
use crate::matrix::DistanceMatrixBuilder;
use crate::model::{Coordinate, OptimizedRoute, RoutingMode};
use crate::resolver::AddressResolver;
use crate::solver::construct;
use crate::summary::summarize;
use crate::traits::{DistanceMatrixProvider, Geocoder};

/// Runs the optimization pipeline against a geocoder and a matrix provider.
///
/// Both services are borrowed so one client can serve many planners.
#[derive(Debug)]
pub struct RoutePlanner<'a, G, M> {
    geocoder: &'a G,
    matrix_provider: &'a M,
    config: PlannerConfig,
}

impl<'a, G, M> RoutePlanner<'a, G, M>
where
    G: Geocoder,
    M: DistanceMatrixProvider,
{
    pub fn new(geocoder: &'a G, matrix_provider: &'a M, config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            geocoder,
            matrix_provider,
            config,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn optimize<S: AsRef<str>>(
        &self,
        addresses: &[S],
        mode: RoutingMode,
        fixed_end_address: Option<&str>,
    ) -> Result<OptimizedRoute> {
        self.optimize_with_cancellation(
            addresses,
            mode,
            fixed_end_address,
            &CancellationToken::new(),
        )
    }

    /// Like [`optimize`](Self::optimize), but stops issuing external calls
    /// once `cancel` fires and returns `RouteError::Cancelled`.
    #[instrument(skip_all, fields(%mode, addresses = addresses.len()))]
    pub fn optimize_with_cancellation<S: AsRef<str>>(
        &self,
        addresses: &[S],
        mode: RoutingMode,
        fixed_end_address: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<OptimizedRoute> {
        let stops = prepare_addresses(addresses, mode, fixed_end_address)?;
        debug!(stops = stops.len(), "addresses prepared");

        let waypoints = AddressResolver::new(self.geocoder, &self.config)
            .resolve_with_cancellation(&stops, cancel)?;

        let coordinates: Vec<Coordinate> = waypoints.iter().map(|w| w.coordinate).collect();
        let matrix = DistanceMatrixBuilder::new(self.matrix_provider, &self.config)
            .build_with_cancellation(&coordinates, cancel)?;

        if cancel.is_cancelled() {
            return Err(RouteError::Cancelled);
        }

        let tour = construct(&matrix, mode)?;
        let summary = summarize(&matrix, &tour)?;

        let ordered = tour
            .indices()
            .iter()
            .map(|&index| waypoints[index].formatted_address.clone())
            .collect();

        info!(
            stops = tour.len(),
            total_distance = summary.total_distance,
            total_duration = summary.total_duration,
            "route optimized"
        );

        Ok(OptimizedRoute {
            schema_version: OptimizedRoute::SCHEMA_VERSION,
            addresses: ordered,
            tour,
            total_distance: summary.total_distance,
            total_duration: summary.total_duration,
        })
    }
}

/// Trims the input, drops blank entries and applies the mode's terminus rule.
///
/// `FixedEnd` appends `fixed_end_address` and `Loop` appends a copy of the
/// first address, unless the list already ends with it.
pub fn prepare_addresses<S: AsRef<str>>(
    addresses: &[S],
    mode: RoutingMode,
    fixed_end_address: Option<&str>,
) -> Result<Vec<String>> {
    let mut stops: Vec<String> = addresses
        .iter()
        .map(|address| address.as_ref().trim())
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .collect();

    if stops.len() < 2 {
        return Err(RouteError::validation(format!(
            "at least 2 addresses are required, got {}",
            stops.len()
        )));
    }

    let fixed_end = fixed_end_address
        .map(str::trim)
        .filter(|address| !address.is_empty());

    let terminus = match (mode, fixed_end) {
        (RoutingMode::FixedEnd, Some(end)) => Some(end.to_string()),
        (RoutingMode::FixedEnd, None) => {
            return Err(RouteError::validation("fixed_end mode requires an end address"));
        }
        (_, Some(_)) => {
            return Err(RouteError::validation(format!(
                "an end address is only accepted in fixed_end mode, not {mode}"
            )));
        }
        (RoutingMode::Loop, None) => Some(stops[0].clone()),
        (RoutingMode::Open, None) => None,
    };

    if let Some(terminus) = terminus {
        if stops.last() != Some(&terminus) {
            stops.push(terminus);
        }
    }

    Ok(stops)
}
