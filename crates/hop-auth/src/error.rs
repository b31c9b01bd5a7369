use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("authorization header is missing")]
    MissingHeader,
    #[error("authorization header must be `Bearer <token>`")]
    InvalidHeader,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("token has no usable `uid` claim")]
    MissingSubject,
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("user already exists: {0}")]
    AlreadyExists(String),
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
    #[error("identity service call timed out")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, AuthError>;
