use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use quiz_core::model::{Question, QuestionId, SessionSummary};
use quiz_core::scoring::is_correct;

use super::countdown::{Countdown, TickResult, TimerToken};
use super::feedback::AnswerFeedback;
use super::phase::{Ignored, Outcome, QuizPhase};
use super::plan::SessionPlan;
use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── ANSWER RECORD ─────────────────────────────────────────────────────────────
//

/// What was submitted for one question of the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub selected: BTreeSet<usize>,
    pub is_correct: bool,
    pub timed_out: bool,
}

//
// ─── STEP ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
enum Step {
    Awaiting {
        selection: BTreeSet<usize>,
        countdown: Option<Countdown>,
    },
    Reviewing {
        feedback: AnswerFeedback,
    },
    Finished {
        completed_at: DateTime<Utc>,
    },
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt through a fixed list of questions.
///
/// The question list never changes after construction. `score` only grows.
/// The countdown lives inside the awaiting step, so leaving that step for any
/// reason drops it.
pub struct QuizSession {
    serial: u64,
    questions: Vec<Question>,
    current: usize,
    score: u32,
    step: Step,
    answers: Vec<AnswerRecord>,
    time_limit: Option<u32>,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    /// Start an attempt over `plan`. An empty plan is finished immediately.
    pub(crate) fn new(
        serial: u64,
        plan: SessionPlan,
        time_limit: Option<u32>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let mut session = Self {
            serial,
            questions: plan.questions,
            current: 0,
            score: 0,
            step: Step::Finished {
                completed_at: started_at,
            },
            answers: Vec::new(),
            time_limit,
            started_at,
        };
        if !session.questions.is_empty() {
            session.step = session.awaiting_step();
        }
        session
    }

    fn awaiting_step(&self) -> Step {
        Step::Awaiting {
            selection: BTreeSet::new(),
            countdown: self
                .time_limit
                .map(|secs| Countdown::new(TimerToken::new(self.serial, self.current), secs)),
        }
    }

    #[must_use]
    pub fn serial(&self) -> u64 {
        self.serial
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        match self.step {
            Step::Awaiting { .. } => QuizPhase::AwaitingAnswer,
            Step::Reviewing { .. } => QuizPhase::ShowingResult,
            Step::Finished { .. } => QuizPhase::Finished,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Total number of questions in this attempt.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Zero-based index of the question on screen.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question being answered or reviewed; `None` once finished.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.step {
            Step::Finished { .. } => None,
            _ => self.questions.get(self.current),
        }
    }

    /// Options picked so far, or the frozen submission while reviewing.
    #[must_use]
    pub fn selection(&self) -> Option<&BTreeSet<usize>> {
        match &self.step {
            Step::Awaiting { selection, .. } => Some(selection),
            Step::Reviewing { feedback } => Some(&feedback.selected),
            Step::Finished { .. } => None,
        }
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        match &self.step {
            Step::Reviewing { feedback } => Some(feedback),
            _ => None,
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn time_limit(&self) -> Option<u32> {
        self.time_limit
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match self.step {
            Step::Finished { completed_at } => Some(completed_at),
            _ => None,
        }
    }

    /// Token of the live countdown, if one is running.
    #[must_use]
    pub fn timer_token(&self) -> Option<TimerToken> {
        match &self.step {
            Step::Awaiting {
                countdown: Some(countdown),
                ..
            } => Some(countdown.token()),
            _ => None,
        }
    }

    /// Seconds left on the live countdown.
    #[must_use]
    pub fn remaining_secs(&self) -> Option<u32> {
        match &self.step {
            Step::Awaiting {
                countdown: Some(countdown),
                ..
            } => Some(countdown.remaining()),
            _ => None,
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total(),
            answered: self.answers.len(),
            remaining: self.total().saturating_sub(self.answers.len()),
            score: self.score,
            is_complete: self.phase() == QuizPhase::Finished,
        }
    }

    pub(crate) fn toggle_option(&mut self, index: usize) -> Outcome {
        let phase = self.phase();
        let Some(question) = self.questions.get(self.current) else {
            return Outcome::Ignored(Ignored::WrongPhase(phase));
        };
        let option_count = question.options().len();
        let multi = question.is_multi_answer();

        let Step::Awaiting { selection, .. } = &mut self.step else {
            return Outcome::Ignored(Ignored::WrongPhase(phase));
        };
        if index >= option_count {
            return Outcome::Ignored(Ignored::OptionOutOfRange(index));
        }

        if multi {
            if !selection.remove(&index) {
                selection.insert(index);
            }
        } else {
            selection.clear();
            selection.insert(index);
        }
        Outcome::Applied(QuizPhase::AwaitingAnswer)
    }

    pub(crate) fn submit(&mut self) -> Outcome {
        self.resolve(false)
    }

    /// Apply one elapsed second to the countdown named by `token`.
    pub(crate) fn tick(&mut self, token: TimerToken) -> Outcome {
        let Step::Awaiting {
            countdown: Some(countdown),
            ..
        } = &mut self.step
        else {
            return Outcome::Ignored(Ignored::StaleTimer);
        };
        if countdown.token() != token {
            return Outcome::Ignored(Ignored::StaleTimer);
        }

        match countdown.tick() {
            TickResult::Running(_) => Outcome::Applied(QuizPhase::AwaitingAnswer),
            TickResult::Expired => self.resolve(true),
        }
    }

    /// Score the current selection. Only a timeout may submit nothing.
    fn resolve(&mut self, timed_out: bool) -> Outcome {
        let phase = self.phase();
        let Step::Awaiting { selection, .. } = &mut self.step else {
            return Outcome::Ignored(Ignored::WrongPhase(phase));
        };
        if selection.is_empty() && !timed_out {
            return Outcome::Ignored(Ignored::EmptySelection);
        }
        let Some(question) = self.questions.get(self.current) else {
            return Outcome::Ignored(Ignored::WrongPhase(phase));
        };

        let selected = std::mem::take(selection);
        let verdict = is_correct(selected.iter().copied(), question.correct_indices());
        if verdict {
            self.score = self.score.saturating_add(1);
        }
        self.answers.push(AnswerRecord {
            question_id: question.id(),
            selected: selected.clone(),
            is_correct: verdict,
            timed_out,
        });
        let feedback =
            AnswerFeedback::new(question, selected, verdict, timed_out, &mut rand::rng());
        self.step = Step::Reviewing { feedback };
        Outcome::Applied(QuizPhase::ShowingResult)
    }

    pub(crate) fn next(&mut self, now: DateTime<Utc>) -> Outcome {
        if !matches!(self.step, Step::Reviewing { .. }) {
            return Outcome::Ignored(Ignored::WrongPhase(self.phase()));
        }

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.step = self.awaiting_step();
            Outcome::Applied(QuizPhase::AwaitingAnswer)
        } else {
            self.step = Step::Finished {
                completed_at: now.max(self.started_at),
            };
            Outcome::Applied(QuizPhase::Finished)
        }
    }

    /// Summary of a finished attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` before the last question is passed.
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        let completed_at = self.completed_at().ok_or(SessionError::NotFinished)?;
        Ok(SessionSummary::from_verdicts(
            self.started_at,
            completed_at,
            self.total(),
            self.answers.iter().map(|answer| answer.is_correct),
        )?)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("serial", &self.serial)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("phase", &self.phase())
            .field("answers_len", &self.answers.len())
            .field("time_limit", &self.time_limit)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionRecord;
    use quiz_core::time::fixed_now;

    fn build_question(id: u32, options: usize, correct: &[i64]) -> Question {
        QuestionRecord {
            id,
            category: "A".into(),
            question: format!("Q{id}"),
            options: (0..options).map(|i| format!("option {i}")).collect(),
            correct: correct.to_vec(),
            explanation: None,
        }
        .validate()
        .unwrap()
    }

    fn build_session(questions: Vec<Question>, time_limit: Option<u32>) -> QuizSession {
        let plan = SessionPlan {
            questions,
            shuffled: false,
        };
        QuizSession::new(1, plan, time_limit, fixed_now())
    }

    #[test]
    fn single_answer_toggle_replaces_selection() {
        let mut session = build_session(vec![build_question(1, 3, &[1])], None);

        let _ = session.toggle_option(0);
        let _ = session.toggle_option(2);
        assert_eq!(session.selection(), Some(&BTreeSet::from([2])));
    }

    #[test]
    fn multi_answer_toggle_flips_membership() {
        let mut session = build_session(vec![build_question(1, 3, &[0, 2])], None);

        let _ = session.toggle_option(0);
        let _ = session.toggle_option(2);
        let _ = session.toggle_option(0);
        assert_eq!(session.selection(), Some(&BTreeSet::from([2])));
    }

    #[test]
    fn out_of_range_toggle_is_ignored() {
        let mut session = build_session(vec![build_question(1, 3, &[1])], None);
        assert_eq!(
            session.toggle_option(3),
            Outcome::Ignored(Ignored::OptionOutOfRange(3))
        );
        assert_eq!(session.selection(), Some(&BTreeSet::new()));
    }

    #[test]
    fn empty_submit_is_ignored() {
        let mut session = build_session(vec![build_question(1, 3, &[1])], None);
        assert_eq!(session.submit(), Outcome::Ignored(Ignored::EmptySelection));
        assert_eq!(session.phase(), QuizPhase::AwaitingAnswer);
    }

    #[test]
    fn submit_freezes_selection_and_scores() {
        let mut session = build_session(vec![build_question(1, 3, &[1])], None);
        let _ = session.toggle_option(1);

        assert_eq!(session.submit(), Outcome::Applied(QuizPhase::ShowingResult));
        assert_eq!(session.score(), 1);
        assert_eq!(
            session.toggle_option(0),
            Outcome::Ignored(Ignored::WrongPhase(QuizPhase::ShowingResult))
        );
        assert_eq!(session.selection(), Some(&BTreeSet::from([1])));
        assert_eq!(
            session.submit(),
            Outcome::Ignored(Ignored::WrongPhase(QuizPhase::ShowingResult))
        );
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn empty_plan_is_finished_at_start() {
        let session = build_session(Vec::new(), Some(10));
        assert_eq!(session.phase(), QuizPhase::Finished);
        assert_eq!(session.timer_token(), None);
        let summary = session.summary().unwrap();
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.accuracy(), 0);
    }

    #[test]
    fn next_resets_countdown_with_new_token() {
        let mut session = build_session(
            vec![build_question(1, 2, &[0]), build_question(2, 2, &[1])],
            Some(10),
        );
        let first = session.timer_token().unwrap();
        let _ = session.tick(first);
        assert_eq!(session.remaining_secs(), Some(9));

        let _ = session.toggle_option(0);
        let _ = session.submit();
        assert_eq!(session.timer_token(), None);
        assert_eq!(session.tick(first), Outcome::Ignored(Ignored::StaleTimer));

        let _ = session.next(fixed_now());
        let second = session.timer_token().unwrap();
        assert_ne!(first, second);
        assert_eq!(session.remaining_secs(), Some(10));
        assert_eq!(session.selection(), Some(&BTreeSet::new()));
        assert_eq!(session.tick(first), Outcome::Ignored(Ignored::StaleTimer));
    }

    #[test]
    fn summary_requires_finish() {
        let mut session = build_session(vec![build_question(1, 2, &[0])], None);
        assert!(matches!(session.summary(), Err(SessionError::NotFinished)));

        let _ = session.toggle_option(1);
        let _ = session.submit();
        let _ = session.next(fixed_now());
        let summary = session.summary().unwrap();
        assert_eq!(summary.total(), 1);
        assert_eq!(summary.correct(), 0);
        assert_eq!(session.answers()[0].selected, BTreeSet::from([1]));
    }

    #[test]
    fn answer_log_serializes_for_export() {
        let mut session = build_session(vec![build_question(4, 3, &[0, 2])], None);
        let _ = session.toggle_option(2);
        let _ = session.toggle_option(0);
        let _ = session.submit();

        let json = serde_json::to_value(session.answers()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "question_id": 4,
                "selected": [0, 2],
                "is_correct": true,
                "timed_out": false
            }])
        );
    }
}
