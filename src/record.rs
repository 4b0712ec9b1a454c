//! Flight records and the per-line record validator

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};

use crate::validate::{
    validate_airport_code, validate_flight_id, validate_price, validate_timestamp,
    AirportRole, FieldIssue, TimeRole, DATE_FORMAT,
};

/// Number of comma-separated fields on a data line
pub const FIELD_COUNT: usize = 6;

/// A validated flight.
///
/// Only constructed through validation, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredRecord")]
pub struct FlightRecord {
    flight_id: String,
    origin: String,
    destination: String,
    #[serde(rename = "departure_datetime", serialize_with = "serialize_timestamp")]
    departure: NaiveDateTime,
    #[serde(rename = "arrival_datetime", serialize_with = "serialize_timestamp")]
    arrival: NaiveDateTime,
    price: f64,
}

impl FlightRecord {
    /// Validate the six trimmed fields of a data line.
    ///
    /// Every field is checked; all issues are returned together.
    pub fn from_fields(fields: [&str; FIELD_COUNT]) -> Result<Self, Vec<FieldIssue>> {
        let [flight_id, origin, destination, departure, arrival, price] = fields;
        let mut issues = Vec::new();

        let flight_id = validate_flight_id(flight_id).map_err(|e| issues.push(e)).ok();
        let origin = validate_airport_code(origin, AirportRole::Origin)
            .map_err(|e| issues.push(e))
            .ok();
        let destination = validate_airport_code(destination, AirportRole::Destination)
            .map_err(|e| issues.push(e))
            .ok();
        let departure = validate_timestamp(departure, TimeRole::Departure)
            .map_err(|e| issues.push(e))
            .ok();
        let arrival = validate_timestamp(arrival, TimeRole::Arrival)
            .map_err(|e| issues.push(e))
            .ok();
        let price = validate_price(price).map_err(|e| issues.push(e)).ok();

        if let (Some(dep), Some(arr)) = (departure, arrival) {
            if arr <= dep {
                issues.push(FieldIssue::ArrivalBeforeDeparture);
            }
        }

        match (flight_id, origin, destination, departure, arrival, price) {
            (Some(flight_id), Some(origin), Some(destination), Some(departure), Some(arrival), Some(price))
                if issues.is_empty() =>
            {
                Ok(Self {
                    flight_id: flight_id.to_string(),
                    origin: origin.to_string(),
                    destination: destination.to_string(),
                    departure,
                    arrival,
                    price,
                })
            }
            _ => Err(issues),
        }
    }

    /// Validate one raw data line.
    ///
    /// A line that does not split into exactly six fields is rejected
    /// with [`FieldIssue::MissingFields`] alone.
    pub fn parse_line(line: &str, line_number: usize) -> Result<Self, Rejection> {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        let result = match <[&str; FIELD_COUNT]>::try_from(parts.as_slice()) {
            Ok(fields) => Self::from_fields(fields),
            Err(_) => Err(vec![FieldIssue::MissingFields]),
        };

        result.map_err(|issues| Rejection {
            line_number,
            line: line.to_string(),
            issues,
        })
    }

    pub fn flight_id(&self) -> &str {
        &self.flight_id
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn departure(&self) -> NaiveDateTime {
        self.departure
    }

    pub fn arrival(&self) -> NaiveDateTime {
        self.arrival
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// A data line that failed validation
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// 1-based line number within its source
    pub line_number: usize,
    /// The line as read, without its terminator
    pub line: String,
    /// Issues in the order they were found; never empty
    pub issues: Vec<FieldIssue>,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {} \u{2192} ", self.line_number, self.line)?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

fn serialize_timestamp<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(DATE_FORMAT))
}

/// On-disk shape of a record; re-validated when loaded.
#[derive(Deserialize)]
struct StoredRecord {
    flight_id: String,
    origin: String,
    destination: String,
    departure_datetime: String,
    arrival_datetime: String,
    price: f64,
}

impl TryFrom<StoredRecord> for FlightRecord {
    type Error = String;

    fn try_from(stored: StoredRecord) -> Result<Self, Self::Error> {
        let price = stored.price.to_string();
        FlightRecord::from_fields([
            &stored.flight_id,
            &stored.origin,
            &stored.destination,
            &stored.departure_datetime,
            &stored.arrival_datetime,
            &price,
        ])
        .map_err(|issues| {
            let issues: Vec<String> = issues.iter().map(ToString::to_string).collect();
            format!("flight {}: {}", stored.flight_id, issues.join(", "))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "BA2490,LHR,JFK,2024-03-10 08:00,2024-03-10 16:30,450.00";

    #[test]
    fn test_valid_line() {
        let record = FlightRecord::parse_line(VALID, 2).unwrap();
        assert_eq!(record.flight_id(), "BA2490");
        assert_eq!(record.origin(), "LHR");
        assert_eq!(record.destination(), "JFK");
        assert_eq!(record.price(), 450.0);
        assert!(record.arrival() > record.departure());
    }

    #[test]
    fn test_fields_are_trimmed() {
        let record =
            FlightRecord::parse_line(" AY101 , HEL ,OSL, 2024-03-10 08:00 ,2024-03-10 09:15 , 12.5 ", 3)
                .unwrap();
        assert_eq!(record.flight_id(), "AY101");
        assert_eq!(record.origin(), "HEL");
        assert_eq!(record.price(), 12.5);
    }

    #[test]
    fn test_wrong_field_count_short_circuits() {
        for line in [
            "A,lhr,xxx,bad,bad",
            "BA2490,LHR,JFK,2024-03-10 08:00,2024-03-10 16:30,450.00,extra",
            "just one field",
        ] {
            let rejection = FlightRecord::parse_line(line, 4).unwrap_err();
            assert_eq!(rejection.issues, vec![FieldIssue::MissingFields]);
            assert_eq!(
                rejection.to_string(),
                format!("Line 4: {} \u{2192} missing required fields", line)
            );
        }
    }

    #[test]
    fn test_issues_accumulate() {
        let rejection =
            FlightRecord::parse_line("A,lhr,JFK,2024-03-10 08:00,2024-03-10 16:30,100", 5).unwrap_err();
        assert_eq!(
            rejection.issues,
            vec![
                FieldIssue::FlightIdTooShort,
                FieldIssue::InvalidCode(AirportRole::Origin),
            ]
        );
        assert_eq!(
            rejection.to_string(),
            "Line 5: A,lhr,JFK,2024-03-10 08:00,2024-03-10 16:30,100 \u{2192} \
             flight_id too short (less than 2 characters), invalid origin code"
        );
    }

    #[test]
    fn test_arrival_must_follow_departure() {
        let earlier =
            FlightRecord::parse_line("BA1,LHR,JFK,2024-03-10 08:00,2024-03-10 07:00,100", 1).unwrap_err();
        assert_eq!(earlier.issues, vec![FieldIssue::ArrivalBeforeDeparture]);

        let equal =
            FlightRecord::parse_line("BA1,LHR,JFK,2024-03-10 08:00,2024-03-10 08:00,100", 1).unwrap_err();
        assert_eq!(equal.issues, vec![FieldIssue::ArrivalBeforeDeparture]);
    }

    #[test]
    fn test_cross_field_check_needs_both_timestamps() {
        let rejection =
            FlightRecord::parse_line("BA1,LHR,JFK,2024-03-10 08:00,not a date,100", 1).unwrap_err();
        assert_eq!(rejection.issues, vec![FieldIssue::InvalidTimestamp(TimeRole::Arrival)]);
    }

    #[test]
    fn test_serialized_shape() {
        let record = FlightRecord::parse_line(VALID, 2).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "flight_id": "BA2490",
                "origin": "LHR",
                "destination": "JFK",
                "departure_datetime": "2024-03-10 08:00",
                "arrival_datetime": "2024-03-10 16:30",
                "price": 450.0
            })
        );
    }

    #[test]
    fn test_stored_record_is_revalidated() {
        let bad = serde_json::json!({
            "flight_id": "BA2490",
            "origin": "ZZZ",
            "destination": "JFK",
            "departure_datetime": "2024-03-10 08:00",
            "arrival_datetime": "2024-03-10 16:30",
            "price": 450.0
        });
        let err = serde_json::from_value::<FlightRecord>(bad).unwrap_err();
        assert!(err.to_string().contains("invalid origin code"));
    }
}
