use rand::seq::SliceRandom;
use rand::{Rng, rng};

use quiz_core::model::{CategoryFilter, Question, QuestionBank, SessionSettings};

/// Questions selected for one attempt.
///
/// The questions are cloned out of the bank, so the plan is a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub questions: Vec<Question>,
    pub shuffled: bool,
}

impl SessionPlan {
    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Returns true when no questions were selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Number of questions a plan for `settings` will contain, without building it.
    #[must_use]
    pub fn expected_len(bank: &QuestionBank, settings: &SessionSettings) -> usize {
        match settings.category() {
            CategoryFilter::All => settings.question_count().take_from(bank.len()),
            CategoryFilter::Only(category) => bank.in_category(category).count(),
        }
    }
}

/// Draws the question list for an attempt from a bank.
pub struct SessionBuilder<'a> {
    bank: &'a QuestionBank,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(bank: &'a QuestionBank) -> Self {
        Self { bank }
    }

    /// Build a plan using the thread-local RNG.
    ///
    /// - A single category keeps bank order and ignores the question count.
    /// - Every category shuffles the whole bank, then keeps the first `count`.
    #[must_use]
    pub fn build(self, settings: &SessionSettings) -> SessionPlan {
        self.build_with_rng(settings, &mut rng())
    }

    pub fn build_with_rng<R: Rng + ?Sized>(
        self,
        settings: &SessionSettings,
        rng: &mut R,
    ) -> SessionPlan {
        match settings.category() {
            CategoryFilter::Only(category) => SessionPlan {
                questions: self.bank.in_category(category).cloned().collect(),
                shuffled: false,
            },
            CategoryFilter::All => {
                let mut questions = self.bank.questions().to_vec();
                questions.shuffle(rng);
                questions.truncate(settings.question_count().take_from(self.bank.len()));
                SessionPlan {
                    questions,
                    shuffled: true,
                }
            }
        }
    }
}
