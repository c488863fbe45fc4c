use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Sentinel used by the settings surface for "no filter" / "no cap".
pub const ALL_SENTINEL: &str = "all";

/// Question caps offered when every category is selected.
pub const QUESTION_COUNT_CHOICES: [u32; 5] = [10, 20, 30, 50, 100];

/// Per-question time limits offered in timed mode, in seconds.
pub const TIME_LIMIT_CHOICES: [u32; 3] = [10, 20, 30];

const MAX_TIME_LIMIT_SECS: u32 = 600;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("time limit must be between 1 and {MAX_TIME_LIMIT_SECS} seconds, got {0}")]
    InvalidTimeLimit(u32),

    #[error("question count must be \"all\" or a number, got {0:?}")]
    InvalidQuestionCount(String),
}

//
// ─── CATEGORY FILTER ───────────────────────────────────────────────────────────
//

/// Which questions of the bank a session draws from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    #[must_use]
    pub fn only(category: impl Into<String>) -> Self {
        Self::Only(category.into())
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_SENTINEL,
            Self::Only(category) => category,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == ALL_SENTINEL {
            Self::All
        } else {
            Self::Only(value)
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        match value {
            CategoryFilter::All => ALL_SENTINEL.to_string(),
            CategoryFilter::Only(category) => category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── QUESTION COUNT ────────────────────────────────────────────────────────────
//

/// Cap on the number of questions when every category is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "QuestionCountRepr", into = "QuestionCountRepr")]
pub enum QuestionCount {
    #[default]
    All,
    Limit(u32),
}

impl QuestionCount {
    /// Number of questions to take from a bank of `available` questions.
    #[must_use]
    pub fn take_from(self, available: usize) -> usize {
        match self {
            Self::All => available,
            Self::Limit(limit) => usize::try_from(limit).unwrap_or(usize::MAX).min(available),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum QuestionCountRepr {
    Count(u32),
    Keyword(String),
}

impl TryFrom<QuestionCountRepr> for QuestionCount {
    type Error = SettingsError;

    fn try_from(value: QuestionCountRepr) -> Result<Self, Self::Error> {
        match value {
            QuestionCountRepr::Count(limit) => Ok(Self::Limit(limit)),
            QuestionCountRepr::Keyword(word) if word == ALL_SENTINEL => Ok(Self::All),
            QuestionCountRepr::Keyword(word) => word
                .parse()
                .map(Self::Limit)
                .map_err(|_| SettingsError::InvalidQuestionCount(word)),
        }
    }
}

impl From<QuestionCount> for QuestionCountRepr {
    fn from(value: QuestionCount) -> Self {
        match value {
            QuestionCount::All => Self::Keyword(ALL_SENTINEL.to_string()),
            QuestionCount::Limit(limit) => Self::Count(limit),
        }
    }
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Configuration applied to one attempt.
///
/// Defaults: every category, every question, untimed, shortest time limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionSettingsDraft", into = "SessionSettingsDraft")]
pub struct SessionSettings {
    category: CategoryFilter,
    question_count: QuestionCount,
    time_limit_enabled: bool,
    time_limit_secs: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            question_count: QuestionCount::All,
            time_limit_enabled: false,
            time_limit_secs: TIME_LIMIT_CHOICES[0],
        }
    }
}

impl SessionSettings {
    #[must_use]
    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    #[must_use]
    pub fn question_count(&self) -> QuestionCount {
        self.question_count
    }

    #[must_use]
    pub fn time_limit_enabled(&self) -> bool {
        self.time_limit_enabled
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    /// Per-question limit when timed mode is on.
    #[must_use]
    pub fn countdown_secs(&self) -> Option<u32> {
        self.time_limit_enabled.then_some(self.time_limit_secs)
    }

    /// Replace the category filter; other settings are kept.
    #[must_use]
    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    /// Draft pre-filled with these settings, for editing.
    #[must_use]
    pub fn to_draft(&self) -> SessionSettingsDraft {
        SessionSettingsDraft {
            category: self.category.clone(),
            question_count: self.question_count,
            time_limit_enabled: self.time_limit_enabled,
            time_limit_secs: self.time_limit_secs,
        }
    }
}

/// Editable settings, validated into `SessionSettings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettingsDraft {
    pub category: CategoryFilter,
    pub question_count: QuestionCount,
    pub time_limit_enabled: bool,
    pub time_limit_secs: u32,
}

impl Default for SessionSettingsDraft {
    fn default() -> Self {
        SessionSettings::default().to_draft()
    }
}

impl SessionSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the draft.
    ///
    /// The time limit is checked even when timed mode is off.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimeLimit` if the limit is 0 or above 600 seconds.
    pub fn validate(self) -> Result<SessionSettings, SettingsError> {
        if self.time_limit_secs == 0 || self.time_limit_secs > MAX_TIME_LIMIT_SECS {
            return Err(SettingsError::InvalidTimeLimit(self.time_limit_secs));
        }

        Ok(SessionSettings {
            category: self.category,
            question_count: self.question_count,
            time_limit_enabled: self.time_limit_enabled,
            time_limit_secs: self.time_limit_secs,
        })
    }
}

impl TryFrom<SessionSettingsDraft> for SessionSettings {
    type Error = SettingsError;

    fn try_from(draft: SessionSettingsDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl From<SessionSettings> for SessionSettingsDraft {
    fn from(settings: SessionSettings) -> Self {
        settings.to_draft()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_untimed_all_questions() {
        let settings = SessionSettings::default();
        assert!(settings.category().is_all());
        assert_eq!(settings.question_count(), QuestionCount::All);
        assert!(!settings.time_limit_enabled());
        assert_eq!(settings.time_limit_secs(), 10);
        assert_eq!(settings.countdown_secs(), None);
    }

    #[test]
    fn draft_validates_time_limit() {
        let draft = SessionSettingsDraft {
            time_limit_secs: 0,
            ..SessionSettingsDraft::new()
        };
        assert_eq!(draft.validate(), Err(SettingsError::InvalidTimeLimit(0)));

        let draft = SessionSettingsDraft {
            time_limit_enabled: true,
            time_limit_secs: 20,
            question_count: QuestionCount::Limit(30),
            ..SessionSettingsDraft::new()
        };
        let settings = draft.validate().unwrap();
        assert_eq!(settings.countdown_secs(), Some(20));
        assert_eq!(settings.question_count(), QuestionCount::Limit(30));
    }

    #[test]
    fn question_count_caps_available() {
        assert_eq!(QuestionCount::All.take_from(7), 7);
        assert_eq!(QuestionCount::Limit(10).take_from(7), 7);
        assert_eq!(QuestionCount::Limit(3).take_from(7), 3);
        assert_eq!(QuestionCount::Limit(0).take_from(7), 0);
    }

    #[test]
    fn settings_load_from_json_with_sentinels() {
        let settings: SessionSettings = serde_json::from_str(
            r#"{"category":"all","question_count":"all","time_limit_enabled":true}"#,
        )
        .unwrap();
        assert!(settings.category().is_all());
        assert_eq!(settings.question_count(), QuestionCount::All);
        assert_eq!(settings.countdown_secs(), Some(10));

        let settings: SessionSettings =
            serde_json::from_str(r#"{"category":"児童・家庭福祉","question_count":20}"#).unwrap();
        assert_eq!(settings.category(), &CategoryFilter::only("児童・家庭福祉"));
        assert_eq!(settings.question_count(), QuestionCount::Limit(20));
    }

    #[test]
    fn json_settings_are_validated() {
        let err = serde_json::from_str::<SessionSettings>(r#"{"time_limit_secs":0}"#).unwrap_err();
        assert!(err.to_string().contains("time limit"));
    }

    #[test]
    fn unknown_count_keyword_is_rejected() {
        let err = serde_json::from_str::<QuestionCount>(r#""many""#).unwrap_err();
        assert!(err.to_string().contains("many"));
    }
}
