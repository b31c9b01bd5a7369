use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("alias length must be at least 1, got {0}")]
    InvalidLength(usize),
    #[error("no free alias found within {budget:?} after {attempts} attempts")]
    Timeout { budget: Duration, attempts: u64 },
}
