use std::fmt;

/// Process-wide timestamp interpretation mode, decided once at startup and
/// handed to the store and the sink by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Every tag travels as a zone-less timestamp; the server reconciles it.
    Legacy,
    /// Parameters travel as zoned instants; only absolute values are accepted.
    Modern,
}

impl Mode {
    /// Any startup argument selects `Legacy`.
    pub fn from_invocation<S: AsRef<str>>(args: &[S]) -> Self {
        if args.is_empty() {
            Mode::Modern
        } else {
            Mode::Legacy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Legacy => "legacy",
            Mode::Modern => "modern",
        }
    }

    /// Report heading text (without the Markdown prefix).
    pub fn heading(&self) -> &'static str {
        match self {
            Mode::Legacy => "Legacy (zone-less parameter binding)",
            Mode::Modern => "Modern (zoned parameter binding)",
        }
    }

    /// Legacy runs append to the report so both modes can share one file.
    pub fn appends_report(&self) -> bool {
        matches!(self, Mode::Legacy)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
