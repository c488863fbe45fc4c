use std::sync::Arc;

use crate::model::question::Question;

//
// ─── QUESTION BANK ─────────────────────────────────────────────────────────────
//

/// Ordered, read-only questions for one exam sitting.
///
/// The category list is derived once at construction, in order of first
/// appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    label: String,
    questions: Vec<Question>,
    categories: Vec<String>,
}

impl QuestionBank {
    #[must_use]
    pub fn new(label: impl Into<String>, questions: Vec<Question>) -> Self {
        let mut categories: Vec<String> = Vec::new();
        for question in &questions {
            if !categories.iter().any(|c| c == question.category()) {
                categories.push(question.category().to_string());
            }
        }

        Self {
            label: label.into(),
            questions,
            categories,
        }
    }

    /// Exam-sitting label, e.g. `第37回`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Questions in `category`, in bank order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions
            .iter()
            .filter(move |question| question.category() == category)
    }
}

//
// ─── EXAM SETS ─────────────────────────────────────────────────────────────────
//

/// All loaded banks, keyed by sitting label, in load order.
#[derive(Debug, Clone, Default)]
pub struct ExamSets {
    banks: Vec<Arc<QuestionBank>>,
}

impl ExamSets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bank. A bank with an existing label replaces the earlier one in place.
    pub fn insert(&mut self, bank: QuestionBank) {
        let bank = Arc::new(bank);
        match self.banks.iter_mut().find(|b| b.label() == bank.label()) {
            Some(slot) => *slot = bank,
            None => self.banks.push(bank),
        }
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<Arc<QuestionBank>> {
        self.banks.iter().find(|b| b.label() == label).cloned()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.banks.iter().map(|b| b.label())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.banks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    /// Label of the bank with the highest sitting number; ties go to the
    /// earliest loaded bank, so labels not of the `第N回` form fall back to the first.
    #[must_use]
    pub fn default_label(&self) -> Option<&str> {
        let mut best: Option<(&QuestionBank, u64)> = None;
        for bank in &self.banks {
            let number = sitting_number(bank.label());
            if best.is_none_or(|(_, top)| number > top) {
                best = Some((bank, number));
            }
        }
        best.map(|(bank, _)| bank.label())
    }

    #[must_use]
    pub fn default_bank(&self) -> Option<Arc<QuestionBank>> {
        self.default_label().and_then(|label| self.get(label))
    }
}

/// Number of a `第N回` label; zero for any other label.
fn sitting_number(label: &str) -> u64 {
    label
        .strip_prefix('第')
        .and_then(|rest| rest.strip_suffix('回'))
        .and_then(|number| number.parse().ok())
        .unwrap_or(0)
}
