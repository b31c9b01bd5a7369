use hop_core::CoreError;
use hop_generator::GenerateError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShortenerError {
    #[error("alias already exists: {0}")]
    AliasExists(String),
    #[error("alias is reserved: {0}")]
    ReservedAlias(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid alias: {0}")]
    InvalidAlias(String),
    #[error("alias generation timed out")]
    GenerationTimeout,
    #[error("alias not found: {0}")]
    NotFound(String),
    #[error("requester may not modify alias: {0}")]
    Unauthorized(String),
    /// Store, transport or timeout failure. The message is for logs only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidAlias(message) => Self::InvalidAlias(message),
        }
    }
}

impl From<GenerateError> for ShortenerError {
    fn from(value: GenerateError) -> Self {
        match value {
            GenerateError::Timeout { .. } => Self::GenerationTimeout,
            GenerateError::InvalidLength(_) => Self::Internal(value.to_string()),
        }
    }
}
