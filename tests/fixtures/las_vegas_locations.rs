//! Real Las Vegas / Henderson places for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. `query` is what a user would type,
//! `formatted` what a geocoder would answer with.

#![allow(dead_code)]

/// A geocodable place.
#[derive(Debug, Clone, Copy)]
pub struct Place {
    pub query: &'static str,
    pub formatted: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    pub const fn new(query: &'static str, formatted: &'static str, lat: f64, lng: f64) -> Self {
        Self {
            query,
            formatted,
            lat,
            lng,
        }
    }
}

// ============================================================================
// Strip
// ============================================================================

pub const STRIP: &[Place] = &[
    Place::new(
        "Wynn Las Vegas",
        "3131 Las Vegas Blvd S, Las Vegas, NV 89109",
        36.1263781,
        -115.1658180,
    ),
    Place::new("Bellagio", "3600 Las Vegas Blvd S, Las Vegas, NV 89109", 36.1126, -115.1767),
    Place::new("Caesars Palace", "3570 Las Vegas Blvd S, Las Vegas, NV 89109", 36.1162, -115.1745),
    Place::new("MGM Grand", "3799 Las Vegas Blvd S, Las Vegas, NV 89109", 36.1023654, -115.1688720),
    Place::new(
        "Hard Rock Cafe",
        "3771 Las Vegas Blvd S, Las Vegas, NV 89109",
        36.1041592,
        -115.1722166,
    ),
    Place::new(
        "Bootlegger Bistro",
        "7700 Las Vegas Blvd S, Las Vegas, NV 89123",
        36.0492047,
        -115.1715744,
    ),
];

// ============================================================================
// Henderson / East
// ============================================================================

pub const EAST: &[Place] = &[
    Place::new(
        "Longhorn Casino",
        "5288 Boulder Hwy, Las Vegas, NV 89122",
        36.1070664,
        -115.0591256,
    ),
    Place::new("Sunset Station", "1301 W Sunset Rd, Henderson, NV 89014", 36.0614, -115.0631),
    Place::new(
        "Green Valley Ranch",
        "2300 Paseo Verde Pkwy, Henderson, NV 89052",
        36.0308,
        -115.0825,
    ),
    Place::new(
        "Islander's Grill",
        "1020 W Sunset Rd, Henderson, NV 89014",
        36.0335058,
        -114.9856162,
    ),
];

// ============================================================================
// North
// ============================================================================

pub const NORTH: &[Place] = &[
    Place::new(
        "Beers and Bets",
        "1 E Charleston Blvd, Las Vegas, NV 89104",
        36.1428945,
        -115.1573836,
    ),
    Place::new(
        "Rivas Mexican Grill",
        "4825 E Charleston Blvd, Las Vegas, NV 89104",
        36.1450055,
        -115.0482587,
    ),
];

/// Every fixture place.
pub fn all_places() -> Vec<Place> {
    let mut all = Vec::with_capacity(STRIP.len() + EAST.len() + NORTH.len());
    all.extend_from_slice(STRIP);
    all.extend_from_slice(EAST);
    all.extend_from_slice(NORTH);
    all
}

/// User-typed queries for the first `count` places.
pub fn queries(count: usize) -> Vec<String> {
    all_places()
        .into_iter()
        .take(count)
        .map(|place| place.query.to_string())
        .collect()
}

/// A stop list that alternates across the valley so the input order is a
/// poor route.
pub fn zigzag_queries() -> Vec<String> {
    [
        "Wynn Las Vegas",
        "Islander's Grill",
        "Bellagio",
        "Rivas Mexican Grill",
        "MGM Grand",
        "Green Valley Ranch",
    ]
    .iter()
        .map(|q| q.to_string())
        .collect()
}
