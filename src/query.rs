//! Filter queries over flight records
//!
//! A query is read from a JSON object. Each recognised key switches on
//! one filter; keys the matcher does not know are ignored.
//!
//! | key | filter |
//! |---|---|
//! | `flight_id`, `origin`, `destination` | exact match |
//! | `departure_datetime` | departure at or after |
//! | `arrival_datetime` | arrival at or before |
//! | `price` | price at or below |
//!
//! `departure_time` and `arrival_time` are accepted in place of the
//! `*_datetime` keys; giving both spellings of one filter is an error.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use crate::error::{FlightError, Result};
use crate::record::FlightRecord;
use crate::validate::parse_timestamp;

/// A partial predicate over record fields
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// The object the query was read from, echoed back in responses
    raw: Value,
    pub flight_id: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// Lower bound on departure
    pub departed_after: Option<NaiveDateTime>,
    /// Upper bound on arrival
    pub arrives_before: Option<NaiveDateTime>,
    /// Upper bound on price
    pub max_price: Option<f64>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            raw: Value::Object(Map::new()),
            flight_id: None,
            origin: None,
            destination: None,
            departed_after: None,
            arrives_before: None,
            max_price: None,
        }
    }
}

impl Query {
    /// Build a query from one JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| FlightError::QueryFormat(format!("query must be an object, got {}", value)))?;

        let query = Self {
            flight_id: string_field(obj, "flight_id")?,
            origin: string_field(obj, "origin")?,
            destination: string_field(obj, "destination")?,
            departed_after: timestamp_field(obj, &["departure_datetime", "departure_time"])?,
            arrives_before: timestamp_field(obj, &["arrival_datetime", "arrival_time"])?,
            max_price: price_field(obj)?,
            raw: Value::Null,
        };

        Ok(Self { raw: value, ..query })
    }

    /// The original query object
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// True when no filter is active
    pub fn is_unfiltered(&self) -> bool {
        self.flight_id.is_none()
            && self.origin.is_none()
            && self.destination.is_none()
            && self.departed_after.is_none()
            && self.arrives_before.is_none()
            && self.max_price.is_none()
    }

    /// Whether `record` satisfies every active filter
    pub fn matches(&self, record: &FlightRecord) -> bool {
        fn eq(filter: &Option<String>, value: &str) -> bool {
            filter.as_deref().map_or(true, |f| f == value)
        }

        eq(&self.flight_id, record.flight_id())
            && eq(&self.origin, record.origin())
            && eq(&self.destination, record.destination())
            && self.departed_after.map_or(true, |t| record.departure() >= t)
            && self.arrives_before.map_or(true, |t| record.arrival() <= t)
            && self.max_price.map_or(true, |p| record.price() <= p)
    }

    /// Matching records, in their original order
    pub fn filter<'a>(&self, records: &'a [FlightRecord]) -> Vec<&'a FlightRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(FlightError::QueryFormat(format!(
            "'{}' must be a string, got {}",
            key, other
        ))),
    }
}

fn timestamp_field(obj: &Map<String, Value>, keys: &[&str]) -> Result<Option<NaiveDateTime>> {
    let mut present = keys.iter().filter_map(|k| obj.get(*k).map(|v| (*k, v)));
    let Some((key, value)) = present.next() else {
        return Ok(None);
    };
    if let Some((other, _)) = present.next() {
        return Err(FlightError::QueryFormat(format!(
            "'{}' and '{}' are the same filter; give only one",
            key, other
        )));
    }

    value
        .as_str()
        .and_then(parse_timestamp)
        .map(Some)
        .ok_or_else(|| {
            FlightError::QueryFormat(format!(
                "'{}' must be a 'YYYY-MM-DD HH:MM' timestamp, got {}",
                key, value
            ))
        })
}

fn price_field(obj: &Map<String, Value>) -> Result<Option<f64>> {
    let Some(value) = obj.get("price") else {
        return Ok(None);
    };

    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    price
        .filter(|p| !p.is_nan())
        .map(Some)
        .ok_or_else(|| FlightError::QueryFormat(format!("'price' must be a number, got {}", value)))
}
