/// Stage of the quiz as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizPhase {
    NotStarted,
    AwaitingAnswer,
    ShowingResult,
    Finished,
}

/// Result of feeding one event into the state machine.
///
/// Events that do not fit the current phase are reported as `Ignored` and
/// leave the state untouched; a stray click after the phase moved on is normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied(QuizPhase),
    Ignored(Ignored),
}

impl Outcome {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Why an event left the state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    WrongPhase(QuizPhase),
    EmptySelection,
    OptionOutOfRange(usize),
    StaleTimer,
}
