//! Address resolution: free text in, waypoints out.

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::config::PlannerConfig;
use crate::error::{Result, RouteError};
use crate::fanout::FanOut;
use crate::model::Waypoint;
use crate::traits::{GeocodeReply, Geocoder, LookupStatus};

/// Resolves addresses through a [`Geocoder`], all or nothing.
#[derive(Debug)]
pub struct AddressResolver<'a, G> {
    geocoder: &'a G,
    config: &'a PlannerConfig,
}

impl<'a, G: Geocoder> AddressResolver<'a, G> {
    pub fn new(geocoder: &'a G, config: &'a PlannerConfig) -> Self {
        Self { geocoder, config }
    }

    pub fn resolve<S>(&self, addresses: &[S]) -> Result<Vec<Waypoint>>
    where
        S: AsRef<str> + Sync,
    {
        self.resolve_with_cancellation(addresses, &CancellationToken::new())
    }

    /// One geocoding call per address. The first address that cannot be
    /// resolved fails the whole batch with `RouteError::Resolution`.
    #[instrument(skip_all, fields(addresses = addresses.len()))]
    pub fn resolve_with_cancellation<S>(
        &self,
        addresses: &[S],
        cancel: &CancellationToken,
    ) -> Result<Vec<Waypoint>>
    where
        S: AsRef<str> + Sync,
    {
        if addresses.len() < 2 {
            return Err(RouteError::validation(format!(
                "at least 2 addresses are required, got {}",
                addresses.len()
            )));
        }

        let waypoints = FanOut::new(self.config, cancel).run(addresses, |index, address| {
            let address = address.as_ref();
            debug!(index, %address, "geocoding address");
            let reply = self.geocoder.geocode(address)?;
            first_candidate(address, reply)
        })?;

        debug!(resolved = waypoints.len(), "all addresses resolved");
        Ok(waypoints)
    }
}

fn first_candidate(address: &str, reply: GeocodeReply) -> Result<Waypoint> {
    if !reply.status.is_ok() {
        warn!(%address, status = %reply.status, "geocoder rejected address");
        return Err(RouteError::Resolution {
            address: address.to_string(),
            status: reply.status,
        });
    }

    match reply.candidates.into_iter().next() {
        Some(candidate) => Ok(Waypoint {
            raw_address: address.to_string(),
            formatted_address: candidate.formatted_address,
            coordinate: candidate.coordinate,
        }),
        None => {
            warn!(%address, "geocoder returned no candidates");
            Err(RouteError::Resolution {
                address: address.to_string(),
                status: LookupStatus::ZeroResults,
            })
        }
    }
}
