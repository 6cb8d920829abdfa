//! Service doubles for the geocoder and matrix seams.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use route_planner::traits::{
    DistanceMatrixProvider, GeocodeCandidate, GeocodeReply, Geocoder, LookupStatus, MatrixElement,
};
use route_planner::{Coordinate, Result};

use super::las_vegas_locations::{all_places, Place};

/// Geocoder backed by a fixed address book; unknown addresses get
/// ZERO_RESULTS.
#[derive(Debug, Default)]
pub struct AddressBook {
    entries: HashMap<String, GeocodeCandidate>,
    pub calls: AtomicUsize,
}

impl AddressBook {
    pub fn las_vegas() -> Self {
        let mut book = Self::default();
        for place in all_places() {
            book = book.with_place(place);
        }
        book
    }

    pub fn with_place(self, place: Place) -> Self {
        self.with(place.query, place.formatted, place.lat, place.lng)
    }

    pub fn with(mut self, query: &str, formatted: &str, lat: f64, lng: f64) -> Self {
        self.entries.insert(
            query.to_string(),
            GeocodeCandidate {
                formatted_address: formatted.to_string(),
                coordinate: Coordinate::new(lat, lng),
            },
        );
        self
    }

    pub fn formatted(&self, query: &str) -> String {
        self.entries[query].formatted_address.clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for AddressBook {
    fn geocode(&self, address: &str) -> Result<GeocodeReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match self.entries.get(address) {
            Some(candidate) => GeocodeReply::found(vec![candidate.clone()]),
            None => GeocodeReply::failed(LookupStatus::ZeroResults),
        })
    }
}

/// Manhattan distance on raw coordinates: 1 degree = 1000 m, 1 m = 1 s.
#[derive(Debug, Default)]
pub struct ManhattanMatrix {
    pub rows: AtomicUsize,
}

impl ManhattanMatrix {
    pub fn row_count(&self) -> usize {
        self.rows.load(Ordering::SeqCst)
    }
}

impl DistanceMatrixProvider for ManhattanMatrix {
    fn matrix_row(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<MatrixElement>> {
        self.rows.fetch_add(1, Ordering::SeqCst);
        Ok(destinations
            .iter()
            .map(|to| {
                let meters = ((origin.lat - to.lat).abs() + (origin.lng - to.lng).abs()) * 1000.0;
                MatrixElement::ok(meters, meters)
            })
            .collect())
    }
}
