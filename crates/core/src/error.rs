use thiserror::Error;

use crate::loader::BankLoadError;
use crate::model::{QuestionError, SettingsError, SummaryError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    BankLoad(#[from] BankLoadError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Summary(#[from] SummaryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SessionSettingsDraft;

    #[test]
    fn settings_errors_convert() {
        let draft = SessionSettingsDraft {
            time_limit_secs: 0,
            ..SessionSettingsDraft::default()
        };
        let err: Error = draft.validate().unwrap_err().into();
        assert!(matches!(err, Error::Settings(SettingsError::InvalidTimeLimit(0))));
    }
}
