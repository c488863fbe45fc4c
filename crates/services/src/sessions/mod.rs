mod countdown;
mod feedback;
mod machine;
mod phase;
mod plan;
mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use countdown::TimerToken;
pub use feedback::{AnswerFeedback, PRAISE_MESSAGES, RETRY_MESSAGES};
pub use machine::QuizMachine;
pub use phase::{Ignored, Outcome, QuizPhase};
pub use plan::{SessionBuilder, SessionPlan};
pub use progress::SessionProgress;
pub use service::{AnswerRecord, QuizSession};
pub use view::{Position, QuestionView, QuizView, ResultView, StartView, option_marker};
pub use workflow::{QuizIntent, SessionHandle, SessionLoop};
