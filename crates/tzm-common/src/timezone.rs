use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};

/// Resolve a wall-clock value in `zone` to an instant.
///
/// Ambiguous wall clocks (DST fall-back) take the earlier instant; wall
/// clocks skipped by a DST jump have no instant.
pub fn resolve_in_zone<Tz: TimeZone>(value: &NaiveDateTime, zone: &Tz) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(value) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}
