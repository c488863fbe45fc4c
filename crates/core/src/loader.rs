//! Builds question banks from the JSON produced by the offline parser.
//!
//! Loading is best-effort: a bad record is dropped, a bad source is skipped,
//! and everything else still loads.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{ExamSets, QuestionBank, QuestionRecord};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("question bank {label:?} is not valid JSON: {source}")]
    Json {
        label: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One raw question set, e.g. the contents of `questions37.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankSource {
    pub name: String,
    pub contents: String,
}

impl BankSource {
    #[must_use]
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Accepted document shapes: a bare array, or an object with `questions`.
#[derive(Deserialize)]
#[serde(untagged)]
enum BankDocument {
    List(Vec<Value>),
    Wrapped { questions: Vec<Value> },
}

impl BankDocument {
    fn into_records(self) -> Vec<Value> {
        match self {
            Self::List(records) | Self::Wrapped { questions: records } => records,
        }
    }
}

/// Stem of the index source that lists the others; it never holds a bank.
const INDEX_STEM: &str = "questions";

fn source_stem(source_name: &str) -> &str {
    Path::new(source_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(source_name)
}

/// Derive the sitting label from a source name.
///
/// `questions37.json` becomes `第37回`; any other name keeps its stem.
#[must_use]
pub fn sitting_label(source_name: &str) -> String {
    let stem = source_stem(source_name);
    let prefix = stem.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &stem[prefix.len()..];

    if prefix.ends_with(INDEX_STEM) && !digits.is_empty() {
        format!("第{digits}回")
    } else {
        stem.to_string()
    }
}

/// Parse one bank, dropping records that are malformed or reuse an id.
///
/// # Errors
///
/// Returns `BankLoadError::Json` if the document is not JSON of an accepted shape.
pub fn parse_bank(label: &str, contents: &str) -> Result<QuestionBank, BankLoadError> {
    let document: BankDocument =
        serde_json::from_str(contents).map_err(|source| BankLoadError::Json {
            label: label.to_string(),
            source,
        })?;

    let mut seen = HashSet::new();
    let mut questions = Vec::new();
    for (position, raw) in document.into_records().into_iter().enumerate() {
        let record = match serde_json::from_value::<QuestionRecord>(raw) {
            Ok(record) => record,
            Err(err) => {
                warn!(bank = label, position, error = %err, "dropping unreadable question record");
                continue;
            }
        };
        let id = record.id;
        let question = match record.validate() {
            Ok(question) => question,
            Err(err) => {
                warn!(bank = label, id, error = %err, "dropping invalid question");
                continue;
            }
        };
        if !seen.insert(question.id()) {
            warn!(bank = label, id, "dropping question with duplicate id");
            continue;
        }
        questions.push(question);
    }

    debug!(bank = label, questions = questions.len(), "question bank parsed");
    Ok(QuestionBank::new(label, questions))
}

/// Load every source into `ExamSets`, skipping sources that fail to parse.
pub fn load_exam_sets(sources: impl IntoIterator<Item = BankSource>) -> ExamSets {
    let mut sets = ExamSets::new();
    for source in sources {
        if source_stem(&source.name) == INDEX_STEM {
            debug!(source = %source.name, "skipping index source");
            continue;
        }
        let label = sitting_label(&source.name);
        match parse_bank(&label, &source.contents) {
            Ok(bank) => sets.insert(bank),
            Err(err) => warn!(source = %source.name, error = %err, "skipping question bank"),
        }
    }
    sets
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANK: &str = r#"[
        {"id": 1, "category": "A", "question": "Q1", "options": ["x", "y"], "correct": [1]},
        {"id": 2, "category": "B", "question": "Q2", "options": ["x", "y", "z"], "correct": [0, 2],
         "explanation": "because"}
    ]"#;

    #[test]
    fn sitting_label_uses_number_in_name() {
        assert_eq!(sitting_label("questions37.json"), "第37回");
        assert_eq!(sitting_label("data/questions36.js"), "第36回");
        assert_eq!(sitting_label("practice.json"), "practice");
        assert_eq!(sitting_label("questions_v2_37.json"), "questions_v2_37");
        assert_eq!(sitting_label("questions.json"), "questions");
    }

    #[test]
    fn parses_array_and_wrapped_documents() {
        let bank = parse_bank("第37回", BANK).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.questions()[1].explanation(), Some("because"));

        let wrapped = format!(r#"{{"questions": {BANK}}}"#);
        let bank = parse_bank("第37回", &wrapped).unwrap();
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn drops_bad_records_and_keeps_the_rest() {
        let contents = r#"[
            {"id": 1, "category": "A", "question": "ok", "options": ["x"], "correct": [0]},
            {"id": 2, "category": "A", "question": "bad index", "options": ["x"], "correct": [3]},
            {"id": 3, "category": "A", "question": "no options", "options": [], "correct": [0]},
            {"id": 4, "category": "A", "question": "missing options", "correct": [0]},
            {"id": 1, "category": "A", "question": "duplicate", "options": ["x"], "correct": [0]},
            {"id": 5, "category": "A", "question": "ok too", "options": ["x", "y"], "correct": [1]}
        ]"#;

        let bank = parse_bank("第37回", contents).unwrap();
        let ids: Vec<u32> = bank.questions().iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn malformed_document_fails() {
        let err = parse_bank("第37回", "{not json").unwrap_err();
        assert!(matches!(err, BankLoadError::Json { .. }));
        assert!(parse_bank("第37回", r#"{"items": []}"#).is_err());
    }

    #[test]
    fn load_skips_broken_sources() {
        let sets = load_exam_sets(vec![
            BankSource::new("questions36.json", BANK),
            BankSource::new("questions38.json", "oops"),
            BankSource::new("questions37.json", BANK),
        ]);

        assert_eq!(sets.len(), 2);
        assert!(sets.get("第38回").is_none());
        assert_eq!(sets.default_label(), Some("第37回"));
    }

    #[test]
    fn load_ignores_index_source_and_ranks_by_label() {
        let sets = load_exam_sets(vec![
            BankSource::new("questions.json", BANK),
            BankSource::new("questions_v2_37.json", BANK),
            BankSource::new("questions36.json", BANK),
        ]);

        assert_eq!(sets.len(), 2);
        assert!(sets.get("questions").is_none());
        assert!(sets.get("questions_v2_37").is_some());
        assert_eq!(sets.default_label(), Some("第36回"));
    }
}
