//! Test fixtures for route-planner.
//!
//! Provides:
//! - Real Las Vegas / Henderson addresses with coordinates
//! - An address-book geocoder and a planar matrix provider

pub mod las_vegas_locations;
pub mod services;

#[allow(unused_imports)]
pub use las_vegas_locations::*;
#[allow(unused_imports)]
pub use services::*;
