use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::BTreeSet;

use quiz_core::model::{Question, QuestionId};

/// Lines shown after a correct answer.
pub const PRAISE_MESSAGES: [&str; 5] = [
    "その調子！素晴らしい知識です✨",
    "正解！あなたは社会福祉士の素質十分です🧠",
    "お見事！自信を持って進みましょう。",
    "ピンポン！専門用語もバッチリです。",
    "完璧です！合格が近づいていますよ🌸",
];

/// Lines shown after a wrong or missing answer.
pub const RETRY_MESSAGES: [&str; 4] = [
    "惜しい！次こそは正解を掴みましょう。",
    "間違いは成長の糧です。復習が大事です📚",
    "どんまい。解説を確認して知識を定着させよう🌱",
    "焦らず一歩ずつ！次はきっと大丈夫です💪",
];

/// Verdict and context for the question just answered.
///
/// `selected` is empty when the countdown ran out before anything was picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub selected: BTreeSet<usize>,
    pub correct: BTreeSet<usize>,
    pub timed_out: bool,
    pub explanation: Option<String>,
    pub encouragement: &'static str,
}

impl AnswerFeedback {
    pub(crate) fn new<R: Rng + ?Sized>(
        question: &Question,
        selected: BTreeSet<usize>,
        is_correct: bool,
        timed_out: bool,
        rng: &mut R,
    ) -> Self {
        Self {
            question_id: question.id(),
            is_correct,
            selected,
            correct: question.correct_indices().clone(),
            timed_out,
            explanation: question.explanation().map(ToString::to_string),
            encouragement: encouragement(is_correct, rng),
        }
    }
}

fn encouragement<R: Rng + ?Sized>(is_correct: bool, rng: &mut R) -> &'static str {
    let pool: &[&'static str] = if is_correct {
        &PRAISE_MESSAGES
    } else {
        &RETRY_MESSAGES
    };
    pool.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionRecord;

    fn question() -> Question {
        QuestionRecord {
            id: 7,
            category: "A".into(),
            question: "Q".into(),
            options: vec!["x".into(), "y".into()],
            correct: vec![1],
            explanation: Some("y is right".into()),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn feedback_carries_verdict_and_explanation() {
        let feedback =
            AnswerFeedback::new(&question(), BTreeSet::from([1]), true, false, &mut rand::rng());

        assert_eq!(feedback.question_id, QuestionId::new(7));
        assert_eq!(feedback.correct, BTreeSet::from([1]));
        assert_eq!(feedback.explanation.as_deref(), Some("y is right"));
        assert!(PRAISE_MESSAGES.contains(&feedback.encouragement));
    }

    #[test]
    fn wrong_answers_get_retry_lines() {
        let feedback =
            AnswerFeedback::new(&question(), BTreeSet::new(), false, true, &mut rand::rng());
        assert!(RETRY_MESSAGES.contains(&feedback.encouragement));
        assert!(feedback.timed_out);
    }
}
