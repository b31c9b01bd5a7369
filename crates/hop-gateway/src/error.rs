use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hop_auth::AuthError;
use hop_shortener::ShortenerError;
use thiserror::Error;
use tracing::{debug, error};

use crate::model::Envelope;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    BadRequest(String),
    #[error("identity provider is not configured")]
    IdentityDisabled,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Shortener(e) => match e {
                ShortenerError::AliasExists(_) | ShortenerError::ReservedAlias(_) => {
                    StatusCode::NOT_ACCEPTABLE
                }
                ShortenerError::InvalidUrl(_) | ShortenerError::InvalidAlias(_) => {
                    StatusCode::BAD_REQUEST
                }
                ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
                ShortenerError::Unauthorized(_) => StatusCode::FORBIDDEN,
                ShortenerError::GenerationTimeout | ShortenerError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::Auth(e) => match e {
                AuthError::MissingHeader
                | AuthError::InvalidHeader
                | AuthError::InvalidToken(_)
                | AuthError::MissingSubject => StatusCode::UNAUTHORIZED,
                AuthError::InvalidCredentials(_) => StatusCode::BAD_REQUEST,
                AuthError::AlreadyExists(_) => StatusCode::CONFLICT,
                AuthError::Unavailable(_) | AuthError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::IdentityDisabled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// The message shown to clients. Internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Shortener(ShortenerError::AliasExists(_)) => "alias already exists".into(),
            AppError::Shortener(ShortenerError::ReservedAlias(_)) => "alias is reserved".into(),
            AppError::Shortener(ShortenerError::NotFound(_)) => "alias not found".into(),
            AppError::Shortener(ShortenerError::Unauthorized(_)) => {
                "not allowed to delete this alias".into()
            }
            AppError::Shortener(ShortenerError::GenerationTimeout) => {
                "failed to generate alias".into()
            }
            AppError::Shortener(ShortenerError::Internal(_)) => "internal server error".into(),
            AppError::Auth(AuthError::InvalidToken(_)) => "invalid token".into(),
            AppError::Auth(AuthError::InvalidCredentials(_)) => "invalid credentials".into(),
            AppError::Auth(AuthError::AlreadyExists(_)) => "user already exists".into(),
            AppError::Auth(AuthError::Unavailable(_) | AuthError::Timeout) => {
                "identity service unavailable".into()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, status = %status, "Request failed");
        } else {
            debug!(error = %self, status = %status, "Request rejected");
        }

        (status, Json(Envelope::error(status, self.public_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_details_are_hidden() {
        let err = AppError::from(ShortenerError::Internal("mysql: connection reset".into()));

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn status_mapping() {
        let cases = [
            (AppError::from(ShortenerError::AliasExists("a".into())), 406),
            (AppError::from(ShortenerError::ReservedAlias("url".into())), 406),
            (AppError::from(ShortenerError::InvalidUrl("x".into())), 400),
            (AppError::from(ShortenerError::NotFound("a".into())), 404),
            (AppError::from(ShortenerError::Unauthorized("a".into())), 403),
            (AppError::from(ShortenerError::GenerationTimeout), 500),
            (AppError::from(AuthError::MissingHeader), 401),
            (AppError::from(AuthError::InvalidCredentials("x".into())), 400),
            (AppError::IdentityDisabled, 503),
        ];

        for (err, status) in cases {
            assert_eq!(err.status().as_u16(), status, "{err}");
        }
    }
}
