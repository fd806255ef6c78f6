use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use deadpool_postgres::Client;
use tokio_postgres::{Error as PgError, Row};
use tracing::{info, instrument};

use crate::column::{create_tables_sql, truncate_tables_sql, ColumnKind};
use crate::db::{PgPool, TimedClientExt};
use crate::fixture::AwarenessTag;
use crate::mode::Mode;
use crate::store::{bind_parameter, ParamBinding, StoreError, StoredScalar, TimestampStore};

/// PostgreSQL-backed store holding one session for the whole run.
///
/// The backing tables are temporary, so every call must go through the
/// same connection; the pooled object is kept until the store is dropped.
pub struct PgTimestampStore {
    client: Client,
    mode: Mode,
}

impl PgTimestampStore {
    pub fn new(client: Client, mode: Mode) -> Self {
        Self { client, mode }
    }

    /// Check out the single pooled connection and wrap it.
    pub async fn connect(pool: &PgPool, mode: Mode) -> Result<Self, StoreError> {
        let client = pool.get().await?;
        Ok(Self::new(client, mode))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Override the session `TimeZone` used to reconcile zone-less values
    /// against `timestamptz` columns.
    #[instrument(skip(self))]
    pub async fn set_session_time_zone(&self, zone: &str) -> Result<(), StoreError> {
        self.client
            .timed_query(
                "SELECT set_config('TimeZone', $1, false)",
                &[&zone],
                "set_session_time_zone",
            )
            .await?;
        Ok(())
    }

    pub async fn session_time_zone(&self) -> Result<String, StoreError> {
        let rows = self
            .client
            .timed_query("SELECT current_setting('TimeZone')", &[], "session_time_zone")
            .await?;
        let zone = rows
            .first()
            .map(|row| row.try_get::<_, String>(0))
            .transpose()?
            .unwrap_or_default();
        Ok(zone)
    }
}

fn read_scalar(kind: ColumnKind, row: &Row) -> Result<Option<StoredScalar>, PgError> {
    let scalar = match kind {
        ColumnKind::WithoutTimeZone => row
            .try_get::<_, Option<NaiveDateTime>>(0)?
            .map(StoredScalar::Naive),
        ColumnKind::WithTimeZone => row
            .try_get::<_, Option<DateTime<Utc>>>(0)?
            .map(StoredScalar::Zoned),
        ColumnKind::DateOnly => row
            .try_get::<_, Option<NaiveDate>>(0)?
            .map(StoredScalar::Date),
    };
    Ok(scalar)
}

impl TimestampStore for PgTimestampStore {
    #[instrument(skip(self), fields(mode = %self.mode))]
    async fn create_tables(&self) -> Result<(), StoreError> {
        self.client
            .timed_batch_execute(&create_tables_sql(), "create_tables")
            .await?;
        info!("created backing tables");
        Ok(())
    }

    async fn truncate_tables(&self) -> Result<(), StoreError> {
        self.client
            .timed_batch_execute(&truncate_tables_sql(), "truncate_tables")
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(table = kind.table_name()))]
    async fn insert(
        &self,
        kind: ColumnKind,
        value: NaiveDateTime,
        tag: AwarenessTag,
    ) -> Result<u64, StoreError> {
        let binding = bind_parameter(self.mode, kind, value, tag)?;
        let sql = kind.insert_sql(binding.param_type());

        let inserted = match binding {
            ParamBinding::Timestamp(naive) => {
                self.client
                    .timed_execute(sql.as_str(), &[&naive], "insert")
                    .await?
            }
            ParamBinding::TimestampTz(instant) => {
                self.client
                    .timed_execute(sql.as_str(), &[&instant], "insert")
                    .await?
            }
        };
        Ok(inserted)
    }

    #[instrument(skip(self), fields(table = kind.table_name()))]
    async fn select_scalar(&self, kind: ColumnKind) -> Result<Option<StoredScalar>, StoreError> {
        let rows = self
            .client
            .timed_query(kind.select_sql().as_str(), &[], "select_scalar")
            .await?;

        match rows.as_slice() {
            [] => Ok(None),
            [row] => Ok(read_scalar(kind, row)?),
            _ => Err(StoreError::UnexpectedRowCount(rows.len())),
        }
    }
}
