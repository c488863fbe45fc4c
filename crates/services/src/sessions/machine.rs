use std::sync::Arc;
use tracing::{debug, info, trace};

use quiz_core::Clock;
use quiz_core::model::{
    CategoryFilter, QuestionBank, SessionSettings, SessionSettingsDraft, SessionSummary,
};

use super::countdown::TimerToken;
use super::phase::{Ignored, Outcome, QuizPhase};
use super::plan::{SessionBuilder, SessionPlan};
use super::progress::SessionProgress;
use super::service::QuizSession;
use super::view::QuizView;
use crate::error::SessionError;

/// Drives quiz attempts over one question bank.
///
/// Holds the applied settings between attempts and at most one live
/// `QuizSession`. Every event goes through `&mut self`, so transitions are
/// serialized; events that do not fit the current phase return
/// `Outcome::Ignored` and change nothing.
#[derive(Debug)]
pub struct QuizMachine {
    bank: Arc<QuestionBank>,
    settings: SessionSettings,
    clock: Clock,
    session: Option<QuizSession>,
    serial: u64,
}

impl QuizMachine {
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self {
            bank,
            settings: SessionSettings::default(),
            clock: Clock::default(),
            session: None,
            serial: 0,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Editable copy of the applied settings.
    #[must_use]
    pub fn settings_draft(&self) -> SessionSettingsDraft {
        self.settings.to_draft()
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.session
            .as_ref()
            .map_or(QuizPhase::NotStarted, QuizSession::phase)
    }

    /// Questions the next attempt will contain under the applied settings.
    #[must_use]
    pub fn expected_question_count(&self) -> usize {
        SessionPlan::expected_len(&self.bank, &self.settings)
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        self.session.as_ref().map(QuizSession::progress)
    }

    /// Token of the live countdown; `None` outside a timed, unanswered question.
    #[must_use]
    pub fn timer_token(&self) -> Option<TimerToken> {
        self.session.as_ref().and_then(QuizSession::timer_token)
    }

    /// Snapshot for the presentation layer.
    #[must_use]
    pub fn view(&self) -> QuizView {
        QuizView::from_machine(self)
    }

    /// Summary of the finished attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` unless an attempt has reached `Finished`.
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        self.session
            .as_ref()
            .ok_or(SessionError::NotFinished)?
            .summary()
    }

    //
    // ─── SETTINGS ──────────────────────────────────────────────────────────────
    //

    /// Change the category filter on the start screen.
    pub fn select_category(&mut self, category: CategoryFilter) -> Outcome {
        if self.session.is_some() {
            return self.ignored("select_category", Ignored::WrongPhase(self.phase()));
        }
        debug!(category = %category, "category selected");
        self.settings = self.settings.clone().with_category(category);
        Outcome::Applied(QuizPhase::NotStarted)
    }

    /// Validate and apply edited settings on the start screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Settings` if the draft does not validate.
    pub fn apply_settings(&mut self, draft: SessionSettingsDraft) -> Result<Outcome, SessionError> {
        if self.session.is_some() {
            return Ok(self.ignored("apply_settings", Ignored::WrongPhase(self.phase())));
        }
        self.settings = draft.validate()?;
        debug!(settings = ?self.settings, "settings applied");
        Ok(Outcome::Applied(QuizPhase::NotStarted))
    }

    //
    // ─── LIFECYCLE ─────────────────────────────────────────────────────────────
    //

    /// Begin an attempt with the applied settings.
    pub fn start(&mut self) -> Outcome {
        if self.session.is_some() {
            return self.ignored("start", Ignored::WrongPhase(self.phase()));
        }
        self.begin()
    }

    /// Apply `settings`, then begin an attempt.
    pub fn start_with(&mut self, settings: SessionSettings) -> Outcome {
        if self.session.is_some() {
            return self.ignored("start", Ignored::WrongPhase(self.phase()));
        }
        self.settings = settings;
        self.begin()
    }

    /// Run a fresh attempt with the same settings after finishing.
    pub fn restart(&mut self) -> Outcome {
        if self.phase() != QuizPhase::Finished {
            return self.ignored("restart", Ignored::WrongPhase(self.phase()));
        }
        self.session = None;
        self.begin()
    }

    /// Leave an attempt in progress and return to the start screen.
    pub fn abort(&mut self) -> Outcome {
        match self.phase() {
            QuizPhase::AwaitingAnswer | QuizPhase::ShowingResult => {
                self.discard("aborted");
                Outcome::Applied(QuizPhase::NotStarted)
            }
            phase => self.ignored("abort", Ignored::WrongPhase(phase)),
        }
    }

    /// Return to the start screen from the result screen.
    pub fn back_to_start(&mut self) -> Outcome {
        if self.phase() != QuizPhase::Finished {
            return self.ignored("back_to_start", Ignored::WrongPhase(self.phase()));
        }
        self.discard("closed");
        Outcome::Applied(QuizPhase::NotStarted)
    }

    fn begin(&mut self) -> Outcome {
        let plan = SessionBuilder::new(&self.bank).build(&self.settings);
        self.serial = self.serial.wrapping_add(1);
        let session = QuizSession::new(
            self.serial,
            plan,
            self.settings.countdown_secs(),
            self.clock.now(),
        );
        info!(
            serial = self.serial,
            bank = self.bank.label(),
            category = %self.settings.category(),
            questions = session.total(),
            time_limit = ?session.time_limit(),
            "quiz session started"
        );
        let phase = session.phase();
        self.session = Some(session);
        Outcome::Applied(phase)
    }

    fn discard(&mut self, reason: &'static str) {
        if let Some(session) = self.session.take() {
            info!(
                serial = session.serial(),
                answered = session.answers().len(),
                score = session.score(),
                reason,
                "quiz session discarded"
            );
        }
    }

    //
    // ─── ANSWERING ─────────────────────────────────────────────────────────────
    //

    pub fn toggle_option(&mut self, index: usize) -> Outcome {
        match self.session.as_mut() {
            Some(session) => {
                let outcome = session.toggle_option(index);
                self.report("toggle_option", outcome)
            }
            None => self.ignored("toggle_option", Ignored::WrongPhase(QuizPhase::NotStarted)),
        }
    }

    /// Submit the current selection. An empty selection is ignored.
    pub fn submit(&mut self) -> Outcome {
        match self.session.as_mut() {
            Some(session) => {
                let outcome = session.submit();
                self.report("submit", outcome)
            }
            None => self.ignored("submit", Ignored::WrongPhase(QuizPhase::NotStarted)),
        }
    }

    /// Move past the feedback to the next question, or finish after the last.
    pub fn next(&mut self) -> Outcome {
        let now = self.clock.now();
        match self.session.as_mut() {
            Some(session) => {
                let outcome = session.next(now);
                if outcome == Outcome::Applied(QuizPhase::Finished) {
                    info!(
                        serial = session.serial(),
                        score = session.score(),
                        total = session.total(),
                        "quiz session finished"
                    );
                }
                self.report("next", outcome)
            }
            None => self.ignored("next", Ignored::WrongPhase(QuizPhase::NotStarted)),
        }
    }

    /// One elapsed second for the countdown named by `token`.
    ///
    /// Reaching zero submits whatever is selected, even nothing. Ticks for a
    /// countdown that is no longer live are ignored.
    pub fn tick(&mut self, token: TimerToken) -> Outcome {
        let Some(session) = self.session.as_mut() else {
            return self.ignored("tick", Ignored::StaleTimer);
        };
        let outcome = session.tick(token);
        match outcome {
            Outcome::Applied(QuizPhase::ShowingResult) => {
                debug!(serial = session.serial(), "countdown expired");
            }
            Outcome::Applied(_) => {
                trace!(remaining = ?session.remaining_secs(), "tick");
            }
            Outcome::Ignored(_) => {}
        }
        self.report("tick", outcome)
    }

    fn report(&self, event: &'static str, outcome: Outcome) -> Outcome {
        match outcome {
            Outcome::Applied(phase) => debug!(event, ?phase, "transition applied"),
            Outcome::Ignored(reason) => debug!(event, ?reason, "event ignored"),
        }
        outcome
    }

    fn ignored(&self, event: &'static str, reason: Ignored) -> Outcome {
        self.report(event, Outcome::Ignored(reason))
    }
}
