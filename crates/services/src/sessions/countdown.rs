/// Identity of one live per-question countdown.
///
/// A token names the attempt and the question it was started for. Ticks
/// carrying any other token are ignored, so a tick scheduled before an abort
/// or an advance can never fire against the new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    session: u64,
    question: usize,
}

impl TimerToken {
    pub(crate) fn new(session: u64, question: usize) -> Self {
        Self { session, question }
    }

    #[must_use]
    pub fn session(&self) -> u64 {
        self.session
    }

    #[must_use]
    pub fn question(&self) -> usize {
        self.question
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickResult {
    Running(u32),
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Countdown {
    token: TimerToken,
    remaining: u32,
}

impl Countdown {
    pub(crate) fn new(token: TimerToken, seconds: u32) -> Self {
        Self {
            token,
            remaining: seconds,
        }
    }

    pub(crate) fn token(&self) -> TimerToken {
        self.token
    }

    pub(crate) fn remaining(&self) -> u32 {
        self.remaining
    }

    /// One elapsed second.
    pub(crate) fn tick(&mut self) -> TickResult {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            TickResult::Expired
        } else {
            TickResult::Running(self.remaining)
        }
    }
}
