//! Timestamp round-trip conformance matrix.
//!
//! Inserts each fixture into each column kind, reads it back, and renders
//! the outcome grid as Markdown.

pub mod column;
pub mod db;
pub mod fixture;
pub mod logging;
pub mod mode;
pub mod oracle;
pub mod report;
pub mod run_id;
pub mod runner;
pub mod store;
pub mod timezone;

pub use column::{ColumnKind, ParamType};
pub use fixture::{fixtures, AwarenessTag, TimestampFixture};
pub use mode::Mode;
pub use oracle::{classify, Cell};
pub use report::{write_matrix_report, FileSink, MatrixReport, MatrixRow, ReportError, ReportSink};
pub use runner::{run_round_trip, FailureKind, RoundTripOutcome};
pub use store::{bind_parameter, ParamBinding, StoreError, StoredScalar, TimestampStore};
