mod bank;
mod ids;
mod question;
mod session;
mod settings;

pub use ids::QuestionId;

pub use bank::{ExamSets, QuestionBank};
pub use question::{Question, QuestionError, QuestionRecord};
pub use session::{SessionSummary, SummaryError};
pub use settings::{
    ALL_SENTINEL, CategoryFilter, QUESTION_COUNT_CHOICES, QuestionCount, SessionSettings,
    SessionSettingsDraft, SettingsError, TIME_LIMIT_CHOICES,
};
