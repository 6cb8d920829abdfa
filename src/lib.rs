//! route-planner core
//!
//! Turns an ordered list of free-text addresses into a visiting order using a
//! geocoder, a distance-matrix service and a nearest-neighbor tour heuristic.

pub mod config;
pub mod error;
pub mod fanout;
pub mod google;
pub mod haversine;
pub mod matrix;
pub mod model;
pub mod osrm;
pub mod planner;
pub mod resolver;
pub mod solver;
pub mod summary;
pub mod traits;

pub use config::PlannerConfig;
pub use error::{Result, RouteError};
pub use model::{
    Coordinate, DistanceMatrix, OptimizedRoute, RouteSummary, RoutingMode, Tour, Waypoint,
};
pub use planner::RoutePlanner;
pub use tokio_util::sync::CancellationToken;
