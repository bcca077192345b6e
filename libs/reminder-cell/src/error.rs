use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReminderError {
    #[error("notification dispatch failed: {0}")]
    Dispatch(String),

    #[error("notification channel unavailable")]
    ChannelUnavailable,
}
