//! Trace export for plotting
//!
//! The simulation core hands its sequences to a [`PlotSink`]. Sinks here
//! serialize them as CSV (one row per grid point, `time [s]` first) or as
//! JSON, ready for any external plotting tool.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::error::SimError;
use crate::simulation::SimulationResult;

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Shape(#[from] SimError),
}

/// Consumer of a reference/output pair over time
pub trait PlotSink {
    /// Receive three equal-length sequences
    fn plot(&mut self, time: &[f64], reference: &[f64], output: &[f64])
        -> Result<(), ExportError>;
}

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// Guess the format from a file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format '{other}' (expected csv or json)")),
        }
    }
}

fn check_columns(time: &[f64], columns: &[(&'static str, &[f64])]) -> Result<(), SimError> {
    for &(name, column) in columns {
        SimError::check_len(name, time.len(), column.len())?;
    }
    Ok(())
}

fn write_csv<W: Write>(
    writer: W,
    time: &[f64],
    columns: &[(&'static str, &[f64])],
) -> Result<(), ExportError> {
    check_columns(time, columns)?;

    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["time [s]"];
    header.extend(columns.iter().map(|(name, _)| *name));
    wtr.write_record(&header)?;

    for (i, t) in time.iter().enumerate() {
        let mut record = vec![t.to_string()];
        record.extend(columns.iter().map(|(_, column)| column[i].to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes `time [s],reference,output` rows
///
/// # Example
///
/// ```
/// use pdsim::scope::{CsvScope, PlotSink};
///
/// let mut buffer = Vec::new();
/// CsvScope::new(&mut buffer)
///     .plot(&[0.0, 0.5], &[1.0, 1.0], &[0.0, 0.25])
///     .unwrap();
///
/// let csv = String::from_utf8(buffer).unwrap();
/// assert_eq!(csv, "time [s],reference,output\n0,1,0\n0.5,1,0.25\n");
/// ```
#[derive(Debug)]
pub struct CsvScope<W: Write> {
    writer: W,
}

impl<W: Write> CsvScope<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl CsvScope<BufWriter<File>> {
    /// Create (or truncate) a CSV file
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> PlotSink for CsvScope<W> {
    fn plot(
        &mut self,
        time: &[f64],
        reference: &[f64],
        output: &[f64],
    ) -> Result<(), ExportError> {
        write_csv(
            &mut self.writer,
            time,
            &[("reference", reference), ("output", output)],
        )
    }
}

#[derive(Serialize)]
struct PlotData<'a> {
    time: &'a [f64],
    reference: &'a [f64],
    output: &'a [f64],
}

/// Writes `{"time": [...], "reference": [...], "output": [...]}`
///
/// Non-finite samples are written as `null`.
#[derive(Debug)]
pub struct JsonScope<W: Write> {
    writer: W,
}

impl<W: Write> JsonScope<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PlotSink for JsonScope<W> {
    fn plot(
        &mut self,
        time: &[f64],
        reference: &[f64],
        output: &[f64],
    ) -> Result<(), ExportError> {
        check_columns(time, &[("reference", reference), ("output", output)])?;
        serde_json::to_writer_pretty(
            &mut self.writer,
            &PlotData {
                time,
                reference,
                output,
            },
        )?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Hand a finished run to a plot sink
pub fn plot_result<S: PlotSink + ?Sized>(
    sink: &mut S,
    result: &SimulationResult,
) -> Result<(), ExportError> {
    sink.plot(&result.time, &result.reference, &result.output)
}

/// Write the full trace of a run, control sequence included
pub fn write_trace<W: Write>(
    writer: W,
    result: &SimulationResult,
    format: ExportFormat,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => write_csv(
            writer,
            &result.time,
            &[
                ("reference", result.reference.as_slice()),
                ("output", result.output.as_slice()),
                ("control", result.control.as_slice()),
            ],
        ),
        ExportFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, result)?;
            writer.flush()?;
            Ok(())
        }
    }
}

/// Write the full trace of a run to `path`
pub fn save_trace(
    path: impl AsRef<Path>,
    result: &SimulationResult,
    format: ExportFormat,
) -> Result<(), ExportError> {
    let file = BufWriter::new(File::create(path)?);
    write_trace(file, result, format)
}
