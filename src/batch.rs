//! Batch query runner and response naming

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::IdentityConfig;
use crate::query::Query;
use crate::record::FlightRecord;

/// One query paired with the records it matched
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse<'a> {
    pub query: &'a Value,
    pub matches: Vec<&'a FlightRecord>,
}

/// Run every query against the same record set, preserving query order
pub fn run_batch<'a>(records: &'a [FlightRecord], queries: &'a [Query]) -> Vec<QueryResponse<'a>> {
    queries
        .iter()
        .enumerate()
        .map(|(idx, query)| {
            let matches = query.filter(records);
            debug!(query = idx, matches = matches.len(), "query evaluated");
            QueryResponse {
                query: query.raw(),
                matches,
            }
        })
        .collect()
}

/// Builds timestamped response file names from an explicit identity
#[derive(Debug, Clone)]
pub struct ResponseNaming {
    identity: IdentityConfig,
}

impl ResponseNaming {
    pub fn new(identity: IdentityConfig) -> Self {
        Self { identity }
    }

    /// `response_<id>_<first>_<last>_<YYYYMMDD_HHMM>.json`
    pub fn file_name(&self, at: NaiveDateTime) -> String {
        let squash = |s: &str| s.split_whitespace().collect::<String>();
        format!(
            "response_{}_{}_{}_{}.json",
            squash(&self.identity.student_id),
            squash(&self.identity.first_name),
            squash(&self.identity.last_name),
            at.format("%Y%m%d_%H%M")
        )
    }

    pub fn path_in(&self, dir: &Path, at: NaiveDateTime) -> PathBuf {
        dir.join(self.file_name(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<FlightRecord> {
        [
            "BA2490,LHR,JFK,2024-03-10 08:00,2024-03-10 16:30,450.00",
            "AY101,HEL,OSL,2024-03-11 06:00,2024-03-11 07:15,120",
        ]
        .iter()
        .map(|line| FlightRecord::parse_line(line, 1).unwrap())
        .collect()
    }

    #[test]
    fn test_batch_preserves_order_and_pairs() {
        let records = records();
        let queries = vec![
            Query::from_value(json!({"origin": "HEL"})).unwrap(),
            Query::from_value(json!({})).unwrap(),
            Query::from_value(json!({"origin": "HEL"})).unwrap(),
            Query::from_value(json!({"origin": "SYD"})).unwrap(),
        ];

        let responses = run_batch(&records, &queries);
        let counts: Vec<_> = responses.iter().map(|r| r.matches.len()).collect();
        assert_eq!(counts, vec![1, 2, 1, 0]);
        assert_eq!(responses[0].matches[0].flight_id(), "AY101");
        assert_eq!(responses[3].query, &json!({"origin": "SYD"}));
    }

    #[test]
    fn test_response_serialization() {
        let records = records();
        let queries = vec![Query::from_value(json!({"flight_id": "BA2490", "note": "x"})).unwrap()];
        let value = serde_json::to_value(run_batch(&records, &queries)).unwrap();
        assert_eq!(value[0]["query"], json!({"flight_id": "BA2490", "note": "x"}));
        assert_eq!(value[0]["matches"][0]["departure_datetime"], "2024-03-10 08:00");
    }

    #[test]
    fn test_response_file_name() {
        let naming = ResponseNaming::new(IdentityConfig {
            student_id: "241ADB008".to_string(),
            first_name: "Anna Maria".to_string(),
            last_name: "Ozola".to_string(),
        });
        let at = NaiveDateTime::parse_from_str("2024-03-10 08:05", "%Y-%m-%d %H:%M").unwrap();
        assert_eq!(naming.file_name(at), "response_241ADB008_AnnaMaria_Ozola_20240310_0805.json");
    }
}
