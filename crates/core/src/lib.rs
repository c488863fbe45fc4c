#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod model;
pub mod scoring;
pub mod time;

pub use error::Error;
pub use loader::{BankSource, load_exam_sets, parse_bank, sitting_label};
pub use scoring::{Rank, accuracy, is_correct};
pub use time::Clock;
