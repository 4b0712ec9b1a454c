//! Flight Schedule
//!
//! Validates flight-schedule CSV files, keeps the accepted flights in a
//! JSON record database and answers filter queries against it.
//!
//! ## Pipeline
//!
//! ```text
//! CSV lines ──► FlightRecord::parse_line ──► Ingestion ──► [FlightRecord]
//!                                               │                │
//!                                               ▼                ▼
//!                                         [Diagnostic]    run_batch(queries)
//!                                          errors.txt      response_*.json
//! ```
//!
//! ## Example
//!
//! ```
//! use flight_schedule::{Ingestion, Query};
//!
//! let mut ingestion = Ingestion::new();
//! ingestion.ingest_str("BA2490,LHR,JFK,2024-03-10 08:00,2024-03-10 16:30,450.00\n# note\n");
//! assert_eq!(ingestion.records().len(), 1);
//! assert_eq!(ingestion.diagnostics().len(), 1);
//!
//! let query = Query::from_value(serde_json::json!({"origin": "LHR"})).unwrap();
//! assert_eq!(query.filter(ingestion.records()).len(), 1);
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod ingest;
pub mod query;
pub mod record;
pub mod store;
pub mod validate;

pub use batch::{run_batch, QueryResponse, ResponseNaming};
pub use config::{FlightConfig, OutputFormat};
pub use error::{FlightError, Result};
pub use ingest::{Diagnostic, Ingestion};
pub use query::Query;
pub use record::{FlightRecord, Rejection};
pub use validate::FieldIssue;
