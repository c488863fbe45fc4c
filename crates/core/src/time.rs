use chrono::{DateTime, Duration, Utc};

/// Where a quiz attempt reads its start and finish timestamps from.
///
/// `Stepping` moves forward by `step` after every reading, so an attempt
/// driven in a test still has a measurable duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
    Stepping { next: DateTime<Utc>, step: Duration },
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// First reading is `start`; each later one is `step` further on.
    #[must_use]
    pub fn stepping(start: DateTime<Utc>, step: Duration) -> Self {
        Self::Stepping { next: start, step }
    }

    /// Take a reading.
    pub fn now(&mut self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Fixed(at) => *at,
            Self::Stepping { next, step } => {
                let reading = *next;
                *next = reading.checked_add_signed(*step).unwrap_or(reading);
                reading
            }
        }
    }
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
