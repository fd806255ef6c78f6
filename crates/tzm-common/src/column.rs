/// Storage kinds under test. `ALL` fixes the report's column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    WithoutTimeZone,
    WithTimeZone,
    DateOnly,
}

/// Wire type a timestamp parameter is sent as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Timestamp,
    TimestampTz,
}

impl ParamType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ParamType::Timestamp => "timestamp",
            ParamType::TimestampTz => "timestamptz",
        }
    }
}

impl ColumnKind {
    pub const ALL: [ColumnKind; 3] = [
        ColumnKind::WithoutTimeZone,
        ColumnKind::WithTimeZone,
        ColumnKind::DateOnly,
    ];

    /// Backing table name. Each table holds a single column named `value`.
    pub fn table_name(&self) -> &'static str {
        match self {
            ColumnKind::WithoutTimeZone => "ts_wotz_test",
            ColumnKind::WithTimeZone => "ts_wtz_test",
            ColumnKind::DateOnly => "date_test",
        }
    }

    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnKind::WithoutTimeZone => "timestamp without time zone",
            ColumnKind::WithTimeZone => "timestamp with time zone",
            ColumnKind::DateOnly => "date",
        }
    }

    /// Report header label.
    pub fn header(&self) -> &'static str {
        match self {
            ColumnKind::WithoutTimeZone => "without time zone",
            ColumnKind::WithTimeZone => "with time zone",
            ColumnKind::DateOnly => "date",
        }
    }

    pub fn create_table_sql(&self) -> String {
        format!(
            "CREATE TEMPORARY TABLE {} (value {})",
            self.table_name(),
            self.sql_type()
        )
    }

    pub fn truncate_sql(&self) -> String {
        format!("TRUNCATE TABLE {}", self.table_name())
    }

    pub fn select_sql(&self) -> String {
        format!("SELECT value FROM {}", self.table_name())
    }

    /// The explicit cast pins the parameter's wire type; the server then
    /// applies its own assignment cast into the column.
    pub fn insert_sql(&self, param: ParamType) -> String {
        format!(
            "INSERT INTO {} VALUES ($1::{})",
            self.table_name(),
            param.as_sql()
        )
    }
}

fn batch<F>(statement: F) -> String
where
    F: Fn(&ColumnKind) -> String,
{
    ColumnKind::ALL
        .iter()
        .map(|kind| format!("{};", statement(kind)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn create_tables_sql() -> String {
    batch(ColumnKind::create_table_sql)
}

pub fn truncate_tables_sql() -> String {
    batch(ColumnKind::truncate_sql)
}
