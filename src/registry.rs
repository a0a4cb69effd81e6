//! Static route and destination registry with the day-of-week rotation.
//!
//! Every run processes only the subset of origins, destinations and hotel
//! cities selected for the current weekday. The tables are plain constants;
//! nothing here is mutable at runtime.

use chrono::{Datelike, Local};
use std::fmt;

/// An origin airport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Airport {
    pub code: &'static str,
    pub city: &'static str,
}

/// A flight destination with the round-trip fare considered normal for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    pub code: &'static str,
    pub city: &'static str,
    pub typical_price: u32,
}

/// A hotel search city with its normal nightly rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotelDestination {
    pub city: &'static str,
    pub typical_price: u32,
}

pub const ORIGINS: [Airport; 10] = [
    Airport { code: "JFK", city: "New York" },
    Airport { code: "LAX", city: "Los Angeles" },
    Airport { code: "ORD", city: "Chicago" },
    Airport { code: "ATL", city: "Atlanta" },
    Airport { code: "DFW", city: "Dallas" },
    Airport { code: "SFO", city: "San Francisco" },
    Airport { code: "MIA", city: "Miami" },
    Airport { code: "SEA", city: "Seattle" },
    Airport { code: "BOS", city: "Boston" },
    Airport { code: "DEN", city: "Denver" },
];

pub const DESTINATIONS: [Destination; 12] = [
    Destination { code: "LHR", city: "London", typical_price: 750 },
    Destination { code: "CDG", city: "Paris", typical_price: 780 },
    Destination { code: "FCO", city: "Rome", typical_price: 850 },
    Destination { code: "BCN", city: "Barcelona", typical_price: 800 },
    Destination { code: "NRT", city: "Tokyo", typical_price: 1200 },
    Destination { code: "CUN", city: "Cancun", typical_price: 450 },
    Destination { code: "HNL", city: "Honolulu", typical_price: 650 },
    Destination { code: "LIS", city: "Lisbon", typical_price: 720 },
    Destination { code: "DUB", city: "Dublin", typical_price: 700 },
    Destination { code: "AMS", city: "Amsterdam", typical_price: 760 },
    Destination { code: "MEX", city: "Mexico City", typical_price: 420 },
    Destination { code: "SJU", city: "San Juan", typical_price: 380 },
];

pub const HOTEL_DESTINATIONS: [HotelDestination; 12] = [
    HotelDestination { city: "New York", typical_price: 280 },
    HotelDestination { city: "Las Vegas", typical_price: 160 },
    HotelDestination { city: "Orlando", typical_price: 170 },
    HotelDestination { city: "Miami", typical_price: 230 },
    HotelDestination { city: "Chicago", typical_price: 200 },
    HotelDestination { city: "San Diego", typical_price: 210 },
    HotelDestination { city: "Nashville", typical_price: 220 },
    HotelDestination { city: "New Orleans", typical_price: 190 },
    HotelDestination { city: "Cancun", typical_price: 180 },
    HotelDestination { city: "Honolulu", typical_price: 320 },
    HotelDestination { city: "London", typical_price: 260 },
    HotelDestination { city: "Paris", typical_price: 250 },
];

/// Indices into [`ORIGINS`] and [`DESTINATIONS`] for one weekday.
struct FlightSlot {
    origins: [usize; 3],
    destinations: [usize; 4],
}

/// Sunday = 0 through Saturday = 6.
const FLIGHT_ROTATION: [FlightSlot; 7] = [
    FlightSlot { origins: [0, 1, 2], destinations: [0, 1, 5, 6] },
    FlightSlot { origins: [3, 4, 5], destinations: [2, 3, 4, 10] },
    FlightSlot { origins: [6, 7, 8], destinations: [7, 8, 9, 11] },
    FlightSlot { origins: [9, 0, 3], destinations: [0, 2, 5, 10] },
    FlightSlot { origins: [1, 5, 7], destinations: [4, 6, 1, 11] },
    FlightSlot { origins: [2, 8, 6], destinations: [3, 7, 8, 5] },
    FlightSlot { origins: [4, 9, 0], destinations: [9, 1, 6, 11] },
];

const HOTEL_ROTATION: [[usize; 4]; 7] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [8, 9, 10, 11],
    [0, 3, 6, 9],
    [1, 4, 7, 10],
    [2, 5, 8, 11],
    [0, 1, 10, 11],
];

/// Error returned when a day index has no rotation entry.
#[derive(Debug, PartialEq)]
pub enum RegistryError {
    DayOutOfRange(usize),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DayOutOfRange(day) => {
                write!(f, "day index {} is outside the weekly rotation (0-6)", day)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// The origins and destinations scheduled for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightRotation {
    pub day: usize,
    pub origins: Vec<Airport>,
    pub destinations: Vec<Destination>,
}

impl FlightRotation {
    /// Every origin paired with every destination, origin-major.
    pub fn routes(&self) -> Vec<(Airport, Destination)> {
        self.origins
            .iter()
            .flat_map(|o| self.destinations.iter().map(move |d| (*o, *d)))
            .collect()
    }
}

/// Look up the flight rotation for `day` (Sunday = 0).
pub fn flight_rotation(day: usize) -> Result<FlightRotation, RegistryError> {
    let slot = FLIGHT_ROTATION
        .get(day)
        .ok_or(RegistryError::DayOutOfRange(day))?;
    Ok(FlightRotation {
        day,
        origins: slot.origins.iter().map(|&i| ORIGINS[i]).collect(),
        destinations: slot.destinations.iter().map(|&i| DESTINATIONS[i]).collect(),
    })
}

/// Look up the hotel cities for `day` (Sunday = 0).
pub fn hotel_rotation(day: usize) -> Result<Vec<HotelDestination>, RegistryError> {
    let slot = HOTEL_ROTATION
        .get(day)
        .ok_or(RegistryError::DayOutOfRange(day))?;
    Ok(slot.iter().map(|&i| HOTEL_DESTINATIONS[i]).collect())
}

/// Today's rotation index in local time, Sunday = 0.
pub fn today_index() -> usize {
    Local::now().weekday().num_days_from_sunday() as usize
}
