#![allow(async_fn_in_trait)]

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use deadpool_postgres::PoolError;
use thiserror::Error;
use tokio_postgres::Error as PgError;

use crate::column::{ColumnKind, ParamType};
use crate::fixture::AwarenessTag;
use crate::mode::Mode;

/// Scalar read back from a backing table, shaped by the column's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredScalar {
    Naive(NaiveDateTime),
    Zoned(DateTime<Utc>),
    Date(NaiveDate),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{tag} values cannot be sent in {mode} mode")]
    Unrepresentable { tag: AwarenessTag, mode: Mode },
    #[error("expected at most one row, got {0}")]
    UnexpectedRowCount(usize),
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
}

impl StoreError {
    /// Short classification used in report cells.
    pub fn cause(&self) -> String {
        match self {
            StoreError::Unrepresentable { .. } => "unrepresentable".to_string(),
            StoreError::UnexpectedRowCount(count) => format!("rows={count}"),
            StoreError::Pool(_) => "pool".to_string(),
            StoreError::Postgres(err) => err
                .code()
                .map(|state| state.code().to_string())
                .unwrap_or_else(|| "client".to_string()),
        }
    }
}

/// Parameter as it goes over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamBinding {
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
}

impl ParamBinding {
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamBinding::Timestamp(_) => ParamType::Timestamp,
            ParamBinding::TimestampTz(_) => ParamType::TimestampTz,
        }
    }
}

/// The compatibility switch: how a tagged value is bound for `kind` under
/// `mode`.
///
/// Absolute values always reach a zoned column as `timestamptz`, so the
/// session `TimeZone` never shifts them. Zone-less tags always travel as
/// their wall clock into zone-less columns. The modes differ only where the
/// two meet:
/// - zoned column, zone-less tag: legacy lets the server reconcile the wall
///   clock in the session zone, modern refuses it;
/// - zone-less column, absolute tag: legacy sends the UTC wall clock, modern
///   sends the instant and lets the server convert it.
pub fn bind_parameter(
    mode: Mode,
    kind: ColumnKind,
    value: NaiveDateTime,
    tag: AwarenessTag,
) -> Result<ParamBinding, StoreError> {
    let zoned_column = kind == ColumnKind::WithTimeZone;
    match (tag, zoned_column, mode) {
        (AwarenessTag::Absolute, true, _) | (AwarenessTag::Absolute, false, Mode::Modern) => {
            Ok(ParamBinding::TimestampTz(value.and_utc()))
        }
        (AwarenessTag::Absolute, false, Mode::Legacy) => Ok(ParamBinding::Timestamp(value)),
        (tag, true, Mode::Modern) => Err(StoreError::Unrepresentable { tag, mode }),
        (_, true, Mode::Legacy) | (_, false, _) => Ok(ParamBinding::Timestamp(value)),
    }
}

/// Relational store the matrix is run against.
pub trait TimestampStore {
    /// Create one backing table per column kind. Failure aborts the run.
    async fn create_tables(&self) -> Result<(), StoreError>;

    /// Empty every backing table.
    async fn truncate_tables(&self) -> Result<(), StoreError>;

    async fn insert(
        &self,
        kind: ColumnKind,
        value: NaiveDateTime,
        tag: AwarenessTag,
    ) -> Result<u64, StoreError>;

    /// Read the single stored scalar, if any.
    async fn select_scalar(&self, kind: ColumnKind) -> Result<Option<StoredScalar>, StoreError>;
}
