//! Ingestion pass
//!
//! Turns raw CSV text into accepted [`FlightRecord`]s and a list of
//! [`Diagnostic`]s. Problems on a line are recovered locally; only
//! failing to read a source aborts a call.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::Result;
use crate::record::{FlightRecord, Rejection};

/// Header row recognised (case-insensitively) on the first line of a source
pub const HEADER: &str = "flight_id,origin,destination,departure_datetime,arrival_datetime,price";

/// A line that did not become a record
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// `#`-prefixed line, reported but never parsed
    Comment { line_number: usize, text: String },
    /// Data line that failed validation
    Rejected(Rejection),
}

impl Diagnostic {
    pub fn line_number(&self) -> usize {
        match self {
            Self::Comment { line_number, .. } => *line_number,
            Self::Rejected(rejection) => rejection.line_number,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment { line_number, text } => write!(
                f,
                "Line {}: {} \u{2192} comment line, ignored for data parsing",
                line_number, text
            ),
            Self::Rejected(rejection) => fmt::Display::fmt(rejection, f),
        }
    }
}

/// Accumulated output of one ingestion pass over any number of sources
#[derive(Debug, Default)]
pub struct Ingestion {
    records: Vec<FlightRecord>,
    diagnostics: Vec<Diagnostic>,
}

impl Ingestion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records accepted so far, in encounter order
    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    /// Diagnostics emitted so far, in encounter order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (Vec<FlightRecord>, Vec<Diagnostic>) {
        (self.records, self.diagnostics)
    }

    /// Classify a single line. Line numbers are 1-based per source.
    pub fn ingest_line(&mut self, line: &str, line_number: usize) {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return;
        }

        if line_number == 1 && trimmed.to_lowercase().starts_with(HEADER) {
            return;
        }

        if trimmed.starts_with('#') {
            self.diagnostics.push(Diagnostic::Comment {
                line_number,
                text: trimmed.to_string(),
            });
            return;
        }

        match FlightRecord::parse_line(line, line_number) {
            Ok(record) => self.records.push(record),
            Err(rejection) => {
                debug!(line = line_number, "rejected: {}", rejection);
                self.diagnostics.push(Diagnostic::Rejected(rejection));
            }
        }
    }

    /// Ingest in-memory CSV text as one source
    pub fn ingest_str(&mut self, text: &str) {
        for (idx, line) in text.lines().enumerate() {
            self.ingest_line(line, idx + 1);
        }
    }

    /// Ingest one source from a reader, line by line
    pub fn ingest_reader(&mut self, reader: impl BufRead) -> Result<()> {
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            self.ingest_line(line.trim_end_matches('\r'), idx + 1);
        }
        Ok(())
    }

    /// Ingest a single CSV file
    pub fn ingest_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let (records_before, diagnostics_before) = (self.records.len(), self.diagnostics.len());

        let file = File::open(path)?;
        self.ingest_reader(BufReader::new(file))?;

        info!(
            path = %path.display(),
            accepted = self.records.len() - records_before,
            diagnostics = self.diagnostics.len() - diagnostics_before,
            "ingested file"
        );
        Ok(())
    }

    /// Ingest every file with the given extension directly inside `dir`,
    /// in lexicographic file-name order
    pub fn ingest_dir(&mut self, dir: impl AsRef<Path>, extension: &str) -> Result<()> {
        for path in source_files(dir.as_ref(), extension)? {
            self.ingest_file(&path)?;
        }
        Ok(())
    }
}

/// Convenience wrapper: run a fresh pass over any readable source
pub fn ingest_source(source: impl Read) -> Result<Ingestion> {
    let mut ingestion = Ingestion::new();
    ingestion.ingest_reader(BufReader::new(source))?;
    Ok(ingestion)
}

/// Files with `extension` directly inside `dir`, sorted by name
pub fn source_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}
