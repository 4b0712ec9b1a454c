//! Field validators
//!
//! Each validator checks a single CSV field in isolation and either
//! returns the parsed value or the [`FieldIssue`] describing why the
//! field was rejected. The `Display` text of an issue is exactly what
//! ends up in the diagnostics file.

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;
use thiserror::Error;

/// Timestamp format used for both CSV input and stored records
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Airport codes accepted for origin and destination
pub const VALID_AIRPORTS: [&str; 14] = [
    "LHR", "JFK", "FRA", "RIX", "OSL", "HEL", "ARN",
    "CDG", "DXB", "DOH", "SYD", "AMS", "BRU", "LAX",
];

const FLIGHT_ID_MIN: usize = 2;
const FLIGHT_ID_MAX: usize = 8;

/// Which end of the flight an airport code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirportRole {
    Origin,
    Destination,
}

impl fmt::Display for AirportRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Origin => write!(f, "origin"),
            Self::Destination => write!(f, "destination"),
        }
    }
}

/// Which timestamp of the flight is being validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRole {
    Departure,
    Arrival,
}

impl fmt::Display for TimeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Departure => write!(f, "departure"),
            Self::Arrival => write!(f, "arrival"),
        }
    }
}

/// A single problem found on a data line
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIssue {
    #[error("missing required fields")]
    MissingFields,

    #[error("flight_id too long (more than 8 characters)")]
    FlightIdTooLong,

    #[error("flight_id too short (less than 2 characters)")]
    FlightIdTooShort,

    #[error("invalid flight_id")]
    FlightIdFormat,

    #[error("invalid {0} code")]
    InvalidCode(AirportRole),

    #[error("invalid {0} datetime")]
    InvalidTimestamp(TimeRole),

    #[error("invalid price value")]
    InvalidPrice,

    #[error("negative price value")]
    NegativePrice,

    #[error("non-positive price value")]
    ZeroPrice,

    #[error("arrival before departure")]
    ArrivalBeforeDeparture,
}

/// Check a flight id: 2 to 8 alphanumeric characters
pub fn validate_flight_id(value: &str) -> Result<&str, FieldIssue> {
    let len = value.chars().count();
    if len > FLIGHT_ID_MAX {
        return Err(FieldIssue::FlightIdTooLong);
    }
    if len < FLIGHT_ID_MIN {
        return Err(FieldIssue::FlightIdTooShort);
    }
    if !value.chars().all(char::is_alphanumeric) {
        return Err(FieldIssue::FlightIdFormat);
    }
    Ok(value)
}

/// Check an airport code against shape and the whitelist.
///
/// A malformed code and a well-formed but unknown code produce the
/// same issue.
pub fn validate_airport_code(value: &str, role: AirportRole) -> Result<&str, FieldIssue> {
    let well_formed = value.len() == 3 && value.chars().all(|c| c.is_ascii_uppercase());
    if well_formed && is_known_airport(value) {
        Ok(value)
    } else {
        Err(FieldIssue::InvalidCode(role))
    }
}

/// Whether `code` is in [`VALID_AIRPORTS`]
pub fn is_known_airport(code: &str) -> bool {
    VALID_AIRPORTS.contains(&code)
}

/// Parse a `YYYY-MM-DD HH:MM` timestamp
pub fn validate_timestamp(value: &str, role: TimeRole) -> Result<NaiveDateTime, FieldIssue> {
    parse_timestamp(value).ok_or(FieldIssue::InvalidTimestamp(role))
}

/// Strict timestamp parser shared by records and queries.
///
/// chrono alone accepts unpadded fields, so the shape is checked first.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    let shape = SHAPE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}$").expect("timestamp pattern is valid")
    });

    if !shape.is_match(value) {
        return None;
    }
    NaiveDateTime::parse_from_str(value, DATE_FORMAT).ok()
}

/// Parse a strictly positive price
pub fn validate_price(value: &str) -> Result<f64, FieldIssue> {
    let price: f64 = value.parse().map_err(|_| FieldIssue::InvalidPrice)?;
    if !price.is_finite() {
        return Err(FieldIssue::InvalidPrice);
    }
    if price < 0.0 {
        return Err(FieldIssue::NegativePrice);
    }
    if price == 0.0 {
        return Err(FieldIssue::ZeroPrice);
    }
    Ok(price)
}
