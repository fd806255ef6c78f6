use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::TimeZone;
use thiserror::Error;
use tracing::{info, instrument};

use crate::column::ColumnKind;
use crate::fixture::{fixtures, TimestampFixture};
use crate::mode::Mode;
use crate::oracle::{classify, Cell};
use crate::runner::run_round_trip;
use crate::store::{StoreError, TimestampStore};

/// Line-oriented destination for the report.
pub trait ReportSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

impl ReportSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Buffered report file. Legacy runs append, modern runs start fresh.
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    pub fn open(path: impl AsRef<Path>, mode: Mode) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        options.create(true);
        if mode.appends_report() {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }

        let file = options.open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub fn finish(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl ReportSink for FileSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to truncate backing tables: {0}")]
    Truncate(#[source] StoreError),
    #[error("failed to write report: {0}")]
    Sink(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixRow {
    pub fixture: TimestampFixture,
    /// One cell per column kind, in `ColumnKind::ALL` order.
    pub cells: [Cell; 3],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixReport {
    pub mode: Mode,
    pub rows: Vec<MatrixRow>,
}

impl MatrixReport {
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }

    pub fn mismatch_count(&self) -> usize {
        self.cells().filter(|cell| cell.is_mismatch()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.cells().filter(|cell| cell.failed).count()
    }
}

pub fn heading_line(mode: Mode) -> String {
    format!("## {}", mode.heading())
}

pub fn header_line() -> String {
    let headers = ColumnKind::ALL
        .iter()
        .map(|kind| kind.header())
        .collect::<Vec<_>>()
        .join(" | ");
    format!("| Input | {headers} |")
}

/// Dashes sized to each header label.
pub fn separator_line() -> String {
    let dashes = std::iter::once("Input")
        .chain(ColumnKind::ALL.iter().map(|kind| kind.header()))
        .map(|label| "-".repeat(label.len()))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("| {dashes} |")
}

pub fn render_row(row: &MatrixRow) -> String {
    let cells = row
        .cells
        .iter()
        .map(|cell| cell.text.as_str())
        .collect::<Vec<_>>()
        .join(" | ");
    format!("| {} | {cells} |", row.fixture)
}

async fn run_fixture<S, Tz>(
    store: &S,
    fixture: &TimestampFixture,
    local_zone: &Tz,
) -> Result<MatrixRow, ReportError>
where
    S: TimestampStore,
    Tz: TimeZone,
{
    store.truncate_tables().await.map_err(ReportError::Truncate)?;

    // Attempts run one after another; each sees at most one row in its table.
    let [without_tz, with_tz, date] = ColumnKind::ALL;
    let cells = [
        classify(fixture, &run_round_trip(store, fixture, without_tz).await, local_zone),
        classify(fixture, &run_round_trip(store, fixture, with_tz).await, local_zone),
        classify(fixture, &run_round_trip(store, fixture, date).await, local_zone),
    ];

    Ok(MatrixRow {
        fixture: *fixture,
        cells,
    })
}

/// Run every fixture against every column kind and write the Markdown
/// table to `sink`.
///
/// Cell failures are part of the report; only truncation and sink I/O
/// abort the run.
#[instrument(skip(store, sink, local_zone))]
pub async fn write_matrix_report<S, W, Tz>(
    store: &S,
    sink: &mut W,
    mode: Mode,
    local_zone: &Tz,
) -> Result<MatrixReport, ReportError>
where
    S: TimestampStore,
    W: ReportSink,
    Tz: TimeZone,
{
    sink.write_line(&heading_line(mode))?;
    sink.write_line(&header_line())?;
    sink.write_line(&separator_line())?;

    let mut rows = Vec::new();
    for fixture in fixtures() {
        let row = run_fixture(store, &fixture, local_zone).await?;
        sink.write_line(&render_row(&row))?;
        info!(fixture = %fixture, "row written");
        rows.push(row);
    }

    sink.write_line("")?;

    let report = MatrixReport { mode, rows };
    info!(
        %mode,
        cells = report.cells().count(),
        mismatches = report.mismatch_count(),
        failures = report.failure_count(),
        "matrix complete"
    );
    Ok(report)
}
