use quiz_core::model::{CategoryFilter, Question, QuestionId, SessionSettings};
use quiz_core::scoring::{Rank, accuracy};

use super::feedback::AnswerFeedback;
use super::machine::QuizMachine;
use super::phase::QuizPhase;

const CIRCLED_DIGITS: [char; 21] = [
    '⓪', '①', '②', '③', '④', '⑤', '⑥', '⑦', '⑧', '⑨', '⑩', '⑪', '⑫', '⑬', '⑭', '⑮', '⑯',
    '⑰', '⑱', '⑲', '⑳',
];

/// Display marker for the zero-based option `index`: `①` for 0, `n.` past `⑳`.
#[must_use]
pub fn option_marker(index: usize) -> String {
    let number = index.saturating_add(1);
    CIRCLED_DIGITS
        .get(number)
        .map_or_else(|| format!("{number}."), ToString::to_string)
}

/// Snapshot of everything a screen needs, read after each transition.
///
/// This is intentionally **not** a rendering model:
/// - no styling or layout hints
/// - strings are passed through from the bank untouched
///
/// Sections that do not apply to the current phase are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizView {
    pub phase: QuizPhase,
    pub start: Option<StartView>,
    pub question: Option<QuestionView>,
    pub selected: Vec<usize>,
    pub score: u32,
    pub position: Option<Position>,
    pub remaining_secs: Option<u32>,
    pub feedback: Option<AnswerFeedback>,
    pub result: Option<ResultView>,
}

/// Start screen: category picker and the applied settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartView {
    pub categories: Vec<CategoryFilter>,
    pub settings: SessionSettings,
    pub question_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub id: QuestionId,
    pub category: String,
    pub text: String,
    pub options: Vec<String>,
    pub is_multi_answer: bool,
}

impl QuestionView {
    fn from_question(question: &Question) -> Self {
        Self {
            id: question.id(),
            category: question.category().to_string(),
            text: question.text().to_string(),
            options: question.options().to_vec(),
            is_multi_answer: question.is_multi_answer(),
        }
    }
}

/// One-based question number out of the attempt total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub number: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultView {
    pub score: u32,
    pub total: u32,
    pub accuracy: u32,
    pub rank: Rank,
}

impl QuizView {
    pub(crate) fn from_machine(machine: &QuizMachine) -> Self {
        let phase = machine.phase();
        let Some(session) = machine.session() else {
            let categories = std::iter::once(CategoryFilter::All)
                .chain(machine.bank().categories().iter().cloned().map(CategoryFilter::Only))
                .collect();
            return Self {
                phase,
                start: Some(StartView {
                    categories,
                    settings: machine.settings().clone(),
                    question_count: machine.expected_question_count(),
                }),
                question: None,
                selected: Vec::new(),
                score: 0,
                position: None,
                remaining_secs: None,
                feedback: None,
                result: None,
            };
        };

        let result = (phase == QuizPhase::Finished).then(|| {
            let total = u32::try_from(session.total()).unwrap_or(u32::MAX);
            ResultView {
                score: session.score(),
                total,
                accuracy: accuracy(session.score(), total),
                rank: Rank::from_score(session.score(), total),
            }
        });

        Self {
            phase,
            start: None,
            question: session.current_question().map(QuestionView::from_question),
            selected: session
                .selection()
                .map(|selected| selected.iter().copied().collect())
                .unwrap_or_default(),
            score: session.score(),
            position: session.current_question().map(|_| Position {
                number: session.current_index() + 1,
                total: session.total(),
            }),
            remaining_secs: session.remaining_secs(),
            feedback: session.feedback().cloned(),
            result,
        }
    }
}
