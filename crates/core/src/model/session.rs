use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::scoring::{Rank, accuracy};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CountMismatch { total: u32, correct: u32 },

    #[error("too many questions for a single session: {len}")]
    TooManyQuestions { len: usize },
}

/// Outcome of a finished quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total: u32,
    correct: u32,
}

impl SessionSummary {
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SummaryError::CountMismatch` if `correct` exceeds `total`.
    pub fn new(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total: u32,
        correct: u32,
    ) -> Result<Self, SummaryError> {
        if completed_at < started_at {
            return Err(SummaryError::InvalidTimeRange);
        }
        if correct > total {
            return Err(SummaryError::CountMismatch { total, correct });
        }

        Ok(Self {
            started_at,
            completed_at,
            total,
            correct,
        })
    }

    /// Build a summary from per-question verdicts.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SummaryError::TooManyQuestions` if the total cannot fit in `u32`.
    pub fn from_verdicts(
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total_questions: usize,
        verdicts: impl IntoIterator<Item = bool>,
    ) -> Result<Self, SummaryError> {
        let total = u32::try_from(total_questions).map_err(|_| SummaryError::TooManyQuestions {
            len: total_questions,
        })?;
        let correct = verdicts
            .into_iter()
            .fold(0_u32, |acc, ok| if ok { acc.saturating_add(1) } else { acc });

        Self::new(started_at, completed_at, total, correct)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Time from start to the final `next`.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.completed_at - self.started_at
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    /// Rounded percentage of correct answers; 0 for an empty session.
    #[must_use]
    pub fn accuracy(&self) -> u32 {
        accuracy(self.correct, self.total)
    }

    #[must_use]
    pub fn rank(&self) -> Rank {
        Rank::from_score(self.correct, self.total)
    }
}
