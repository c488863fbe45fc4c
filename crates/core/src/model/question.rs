use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id must be > 0")]
    InvalidId,

    #[error("question must have at least one option")]
    NoOptions,

    #[error("question must have at least one correct answer")]
    NoCorrectAnswer,

    #[error("correct index {index} is out of range for {options} options")]
    CorrectIndexOutOfRange { index: i64, options: usize },

    #[error("correct index {0} is listed more than once")]
    DuplicateCorrectIndex(usize),
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// Raw question record as produced by the offline parser.
///
/// `correct` holds zero-based option indices. Values are signed so that a
/// record pointing before the first option is reported instead of failing
/// deserialization of the whole bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: u32,
    pub category: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuestionRecord {
    /// Validate the record into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the id is zero, there are no options, the
    /// correct set is empty, or a correct index is out of range or repeated.
    pub fn validate(self) -> Result<Question, QuestionError> {
        if self.id == 0 {
            return Err(QuestionError::InvalidId);
        }
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if self.correct.is_empty() {
            return Err(QuestionError::NoCorrectAnswer);
        }

        let mut correct = BTreeSet::new();
        for raw in self.correct {
            let index = usize::try_from(raw)
                .ok()
                .filter(|idx| *idx < self.options.len())
                .ok_or(QuestionError::CorrectIndexOutOfRange {
                    index: raw,
                    options: self.options.len(),
                })?;
            if !correct.insert(index) {
                return Err(QuestionError::DuplicateCorrectIndex(index));
            }
        }

        let explanation = self
            .explanation
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(Question {
            id: QuestionId::new(self.id),
            category: self.category,
            text: self.question,
            options: self.options,
            correct,
            explanation,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
///
/// `correct` is never empty and every index is a valid position in `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    category: String,
    text: String,
    options: Vec<String>,
    correct: BTreeSet<usize>,
    explanation: Option<String>,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn correct_indices(&self) -> &BTreeSet<usize> {
        &self.correct
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// True when more than one option must be selected.
    #[must_use]
    pub fn is_multi_answer(&self) -> bool {
        self.correct.len() > 1
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
