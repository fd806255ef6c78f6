use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::fixture::{format_calendar, AwarenessTag, TimestampFixture};
use crate::runner::RoundTripOutcome;
use crate::timezone::resolve_in_zone;

/// One rendered report cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    /// Whether the round-tripped value equals the input. Always false for
    /// failures, which are never compared.
    pub matches: bool,
    pub failed: bool,
}

impl Cell {
    pub fn is_mismatch(&self) -> bool {
        !self.failed && !self.matches
    }
}

/// Instant the fixture denotes, if its tag anchors it to a zone.
pub fn fixture_instant<Tz: TimeZone>(
    fixture: &TimestampFixture,
    local_zone: &Tz,
) -> Option<DateTime<Utc>> {
    match fixture.tag {
        AwarenessTag::Absolute => Some(fixture.value.and_utc()),
        AwarenessTag::LocalZone => resolve_in_zone(&fixture.value, local_zone),
        AwarenessTag::Unspecified => None,
    }
}

/// Compare as instants when both sides carry a zone, otherwise as bare
/// calendar values. No canonicalisation: lossy storage shows up as a
/// mismatch.
pub fn round_trip_matches<Tz: TimeZone>(
    fixture: &TimestampFixture,
    value: &NaiveDateTime,
    tag: AwarenessTag,
    local_zone: &Tz,
) -> bool {
    match (fixture_instant(fixture, local_zone), tag) {
        (Some(expected), AwarenessTag::Absolute) => expected == value.and_utc(),
        _ => fixture.value == *value,
    }
}

fn emphasize(text: String) -> String {
    format!("**{text}**")
}

pub fn classify<Tz: TimeZone>(
    fixture: &TimestampFixture,
    outcome: &RoundTripOutcome,
    local_zone: &Tz,
) -> Cell {
    match outcome {
        RoundTripOutcome::Failure(kind) => Cell {
            text: kind.label(),
            matches: false,
            failed: true,
        },
        RoundTripOutcome::Success { value, tag } => {
            let matches = round_trip_matches(fixture, value, *tag, local_zone);
            let text = format!("{},{}", format_calendar(value), tag);
            Cell {
                text: if matches { text } else { emphasize(text) },
                matches,
                failed: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::fixtures;
    use crate::runner::FailureKind;
    use crate::timezone::stepped::{fall_back, spring_forward};
    use chrono::{Duration, FixedOffset, NaiveTime};

    fn tokyo() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn success(value: NaiveDateTime, tag: AwarenessTag) -> RoundTripOutcome {
        RoundTripOutcome::Success { value, tag }
    }

    #[test]
    fn failures_render_label_without_comparison() {
        let outcome = RoundTripOutcome::Failure(FailureKind::Insert("unrepresentable".into()));
        let cell = classify(&fixtures()[1], &outcome, &tokyo());
        assert_eq!(cell.text, "InsertError(unrepresentable)");
        assert!(cell.failed);
        assert!(!cell.matches);
        assert!(!cell.is_mismatch());
    }

    #[test]
    fn absolute_instant_matches_zoned_return() {
        let fixture = fixtures()[3];
        let cell = classify(&fixture, &success(fixture.value, AwarenessTag::Absolute), &tokyo());
        assert!(cell.matches);
        assert_eq!(cell.text, "2000-01-01 21:00:00,Absolute");
    }

    #[test]
    fn local_input_compares_as_instant_against_zoned_return() {
        let fixture = fixtures()[1];
        let utc_wall_clock = fixture.value - Duration::hours(9);

        let same_instant = classify(
            &fixture,
            &success(utc_wall_clock, AwarenessTag::Absolute),
            &tokyo(),
        );
        assert!(same_instant.matches);

        let shifted = classify(
            &fixture,
            &success(fixture.value, AwarenessTag::Absolute),
            &tokyo(),
        );
        assert!(!shifted.matches);
        assert_eq!(shifted.text, "**2000-01-01 00:00:00,Absolute**");
    }

    #[test]
    fn zone_less_return_compares_calendar_values() {
        let fixture = fixtures()[0];
        let cell = classify(&fixture, &success(fixture.value, AwarenessTag::Unspecified), &tokyo());
        assert!(cell.matches);
    }

    #[test]
    fn unspecified_input_against_zoned_return_uses_wall_clock() {
        let fixture = fixtures()[2];
        assert!(round_trip_matches(
            &fixture,
            &fixture.value,
            AwarenessTag::Absolute,
            &tokyo()
        ));
        assert!(!round_trip_matches(
            &fixture,
            &(fixture.value - Duration::hours(9)),
            AwarenessTag::Absolute,
            &tokyo()
        ));
    }

    #[test]
    fn date_truncation_is_a_mismatch_for_evening_inputs() {
        let fixture = fixtures()[5];
        let midnight = fixture.value.date().and_time(NaiveTime::MIN);
        let cell = classify(&fixture, &success(midnight, AwarenessTag::Unspecified), &Utc);
        assert!(cell.is_mismatch());
        assert_eq!(cell.text, "**2000-01-01 00:00:00,Unspecified**");
    }

    #[test]
    fn unspecified_fixture_has_no_instant() {
        assert_eq!(fixture_instant(&fixtures()[2], &tokyo()), None);
        assert!(fixture_instant(&fixtures()[1], &tokyo()).is_some());
    }

    #[test]
    fn repeated_local_midnight_compares_against_earliest_instant() {
        let fixture = fixtures()[1];
        let earliest = fixture.value - Duration::hours(1);
        assert_eq!(
            fixture_instant(&fixture, &fall_back()).map(|i| i.naive_utc()),
            Some(earliest)
        );

        let cell = classify(&fixture, &success(earliest, AwarenessTag::Absolute), &fall_back());
        assert!(cell.matches);
        assert_eq!(cell.text, "1999-12-31 23:00:00,Absolute");

        let latest = classify(&fixture, &success(fixture.value, AwarenessTag::Absolute), &fall_back());
        assert!(latest.is_mismatch());
    }

    #[test]
    fn skipped_local_midnight_falls_back_to_calendar_comparison() {
        let fixture = fixtures()[1];
        assert_eq!(fixture_instant(&fixture, &spring_forward()), None);

        let same_wall_clock = classify(
            &fixture,
            &success(fixture.value, AwarenessTag::Absolute),
            &spring_forward(),
        );
        assert!(same_wall_clock.matches);

        let shifted = classify(
            &fixture,
            &success(fixture.value - Duration::hours(1), AwarenessTag::Absolute),
            &spring_forward(),
        );
        assert!(shifted.is_mismatch());
    }
}
