use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed record at line {line} ({content:?}): {reason}")]
    MalformedRecord {
        line: usize,
        content: String,
        reason: String,
    },
    #[error("trial count must be at least 1")]
    InvalidTrials,
    #[error("chart rendering failed: {0}")]
    Chart(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
