use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use tracing::{instrument, warn};

use crate::column::ColumnKind;
use crate::fixture::{AwarenessTag, TimestampFixture};
use crate::store::{StoreError, StoredScalar, TimestampStore};

/// Which leg of the round trip failed, with a short cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Insert(String),
    Select(String),
}

impl FailureKind {
    pub fn label(&self) -> String {
        match self {
            FailureKind::Insert(cause) => format!("InsertError({cause})"),
            FailureKind::Select(cause) => format!("SelectError({cause})"),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundTripOutcome {
    Success {
        value: NaiveDateTime,
        tag: AwarenessTag,
    },
    Failure(FailureKind),
}

impl RoundTripOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, RoundTripOutcome::Failure(_))
    }
}

/// Infer the returned tag from the scalar's shape. Zoned columns come back
/// as absolute UTC instants; everything else carries no zone.
pub fn interpret_scalar(scalar: StoredScalar) -> (NaiveDateTime, AwarenessTag) {
    match scalar {
        StoredScalar::Zoned(instant) => (instant.naive_utc(), AwarenessTag::Absolute),
        StoredScalar::Naive(value) => (value, AwarenessTag::Unspecified),
        StoredScalar::Date(date) => (date.and_time(NaiveTime::MIN), AwarenessTag::Unspecified),
    }
}

fn failure(kind: ColumnKind, stage: fn(String) -> FailureKind, err: &StoreError) -> RoundTripOutcome {
    let failure = stage(err.cause());
    warn!(table = kind.table_name(), failure = %failure, error = %err, "round trip failed");
    RoundTripOutcome::Failure(failure)
}

/// Insert `fixture` into `kind`'s table and read it back.
///
/// Never returns an error: store failures become `Failure` outcomes. The
/// caller is responsible for truncating the tables beforehand.
#[instrument(skip(store, fixture), fields(fixture = %fixture, table = kind.table_name()))]
pub async fn run_round_trip<S: TimestampStore>(
    store: &S,
    fixture: &TimestampFixture,
    kind: ColumnKind,
) -> RoundTripOutcome {
    if let Err(err) = store.insert(kind, fixture.value, fixture.tag).await {
        return failure(kind, FailureKind::Insert, &err);
    }

    match store.select_scalar(kind).await {
        Ok(Some(scalar)) => {
            let (value, tag) = interpret_scalar(scalar);
            RoundTripOutcome::Success { value, tag }
        }
        Ok(None) => RoundTripOutcome::Failure(FailureKind::Select("empty".to_string())),
        Err(err) => failure(kind, FailureKind::Select, &err),
    }
}
