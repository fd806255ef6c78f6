use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// Zone awareness carried alongside every timestamp value.
///
/// `LocalZone` only ever appears on inputs: storage surfaces `Absolute`
/// (zoned columns) or `Unspecified` (everything else) on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AwarenessTag {
    Absolute,
    LocalZone,
    Unspecified,
}

impl AwarenessTag {
    pub const ALL: [AwarenessTag; 3] = [
        AwarenessTag::Absolute,
        AwarenessTag::LocalZone,
        AwarenessTag::Unspecified,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AwarenessTag::Absolute => "Absolute",
            AwarenessTag::LocalZone => "LocalZone",
            AwarenessTag::Unspecified => "Unspecified",
        }
    }
}

impl fmt::Display for AwarenessTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calendar value plus the tag it was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampFixture {
    pub value: NaiveDateTime,
    pub tag: AwarenessTag,
}

impl TimestampFixture {
    pub fn new(value: NaiveDateTime, tag: AwarenessTag) -> Self {
        Self { value, tag }
    }
}

impl fmt::Display for TimestampFixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", format_calendar(&self.value), self.tag)
    }
}

/// Renders a calendar value the way every report cell shows it.
pub fn format_calendar(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

const FIXTURE_DATE: (i32, u32, u32) = (2000, 1, 1);
const FIXTURE_HOURS: [u32; 2] = [0, 21];

fn fixture_value(hour: u32) -> NaiveDateTime {
    let (year, month, day) = FIXTURE_DATE;
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("fixture date and hours are valid calendar values")
}

/// The six inputs under test, in report row order: midnight then 21:00,
/// each crossed with every tag.
pub fn fixtures() -> [TimestampFixture; 6] {
    let [midnight, evening] = FIXTURE_HOURS.map(fixture_value);
    let [absolute, local, unspecified] = AwarenessTag::ALL;

    [
        TimestampFixture::new(midnight, absolute),
        TimestampFixture::new(midnight, local),
        TimestampFixture::new(midnight, unspecified),
        TimestampFixture::new(evening, absolute),
        TimestampFixture::new(evening, local),
        TimestampFixture::new(evening, unspecified),
    ]
}
