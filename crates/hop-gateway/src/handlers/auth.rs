use crate::error::{AppError, Result};
use crate::model::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

pub async fn login_handler(
    State(state): State<AppState>,
    request: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let identity = state.identity.as_ref().ok_or(AppError::IdentityDisabled)?;
    let Json(request) = request.map_err(|e| AppError::BadRequest(e.body_text()))?;
    request.validate().map_err(AppError::BadRequest)?;

    let token = identity
        .login(&request.placeholder, &request.password)
        .await?;

    info!(placeholder = %request.placeholder, "User logged in");

    Ok(Json(LoginResponse {
        status: StatusCode::OK.to_string(),
        access_token: token,
        token_type: "Bearer".to_string(),
    }))
}

pub async fn register_handler(
    State(state): State<AppState>,
    request: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let identity = state.identity.as_ref().ok_or(AppError::IdentityDisabled)?;
    let Json(request) = request.map_err(|e| AppError::BadRequest(e.body_text()))?;
    request.validate().map_err(AppError::BadRequest)?;

    let user_id = identity
        .register(&request.email, &request.username, &request.password)
        .await?;

    info!(user_id, username = %request.username, "User registered");

    let status = StatusCode::CREATED;
    Ok((
        status,
        Json(RegisterResponse {
            status: status.to_string(),
            user_id,
        }),
    ))
}
