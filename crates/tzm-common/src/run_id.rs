//! Process-level run ID.
//!
//! Each probe run gets a ULID at first access. It is attached to the root
//! tracing span so that log lines from a legacy run and a modern run that
//! append to the same report can be told apart.

use once_cell::sync::Lazy;
use ulid::Ulid;

static RUN_ID: Lazy<String> = Lazy::new(|| Ulid::new().to_string());

/// Returns the process-level run ID (26 characters, time-ordered).
#[inline]
pub fn get() -> &'static str {
    &RUN_ID
}
