//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

/// Errors raised while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to open export target: {0}")]
    Io(#[from] io::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod itinerary {
    use std::io::Write;
    use std::path::Path;

    use serde::Serialize;
    use solar_transfer::Leg;

    use super::{ExportError, writer_for_path};

    /// CSV row for one flown leg.
    #[derive(Debug, Clone, Serialize)]
    pub struct Record<'a> {
        pub system: &'a str,
        pub from: &'a str,
        pub to: &'a str,
        pub depart_utc: String,
        pub arrive_utc: String,
        pub depart_s_past_j2000: f64,
        pub arrive_s_past_j2000: f64,
        pub travel_days: f64,
        pub peak_speed_m_s: f64,
        pub converged: bool,
        pub iterations: u32,
    }

    impl<'a> From<&'a Leg> for Record<'a> {
        fn from(leg: &'a Leg) -> Self {
            Self {
                system: &leg.system,
                from: &leg.from,
                to: &leg.to,
                depart_utc: leg.departure.to_utc_string(),
                arrive_utc: leg.arrival.to_utc_string(),
                depart_s_past_j2000: leg.departure.seconds_past_j2000(),
                arrive_s_past_j2000: leg.arrival.seconds_past_j2000(),
                travel_days: leg.travel_days(),
                peak_speed_m_s: leg.peak_speed_m_s,
                converged: leg.converged,
                iterations: leg.iterations,
            }
        }
    }

    /// Write the legs as CSV, header first, in flight order.
    pub fn write<W: Write>(writer: W, legs: &[Leg]) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        for leg in legs {
            csv.serialize(Record::from(leg))?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn write_to_path(path: &Path, legs: &[Leg]) -> Result<(), ExportError> {
        write(writer_for_path(path)?, legs)
    }
}

pub mod summary {
    use std::io::Write;
    use std::path::Path;

    use serde::Serialize;
    use solar_core::time::seconds_to_days;
    use solar_transfer::{SummaryEntry, SummaryKind};

    use super::{ExportError, writer_for_path};

    /// CSV row for one summary entry.
    #[derive(Debug, Clone, Serialize)]
    pub struct Record<'a> {
        pub kind: SummaryKind,
        pub label: &'a str,
        pub route: String,
        pub start_utc: String,
        pub finish_utc: String,
        pub internal_days: f64,
    }

    impl<'a> From<&'a SummaryEntry> for Record<'a> {
        fn from(entry: &'a SummaryEntry) -> Self {
            Self {
                kind: entry.kind,
                label: &entry.label,
                route: entry.route_label(),
                start_utc: entry.start.to_utc_string(),
                finish_utc: entry.finish.to_utc_string(),
                internal_days: seconds_to_days(entry.internal_time_s),
            }
        }
    }

    pub fn write<W: Write>(writer: W, entries: &[SummaryEntry]) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        for entry in entries {
            csv.serialize(Record::from(entry))?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn write_to_path(path: &Path, entries: &[SummaryEntry]) -> Result<(), ExportError> {
        write(writer_for_path(path)?, entries)
    }
}

pub mod plan {
    use std::io::Write;
    use std::path::Path;

    use serde_json::to_writer_pretty;
    use solar_transfer::TourPlan;

    use super::{ExportError, writer_for_path};

    /// Dump the whole plan, itinerary, summary and diagnostics included, as pretty JSON.
    pub fn write_json<W: Write>(mut writer: W, plan: &TourPlan) -> Result<(), ExportError> {
        to_writer_pretty(&mut writer, plan)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_json_to_path(path: &Path, plan: &TourPlan) -> Result<(), ExportError> {
        write_json(writer_for_path(path)?, plan)
    }
}
