use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, Envelope};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header::{AUTHORIZATION, LOCATION};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use hop_auth::{subject_from_header, AuthError};
use hop_core::{Alias, UserId};
use hop_shortener::ShortenerError;
use tracing::info;

/// Extracts the verified requester from the `Authorization` header.
fn requester(headers: &HeaderMap, state: &AppState) -> Result<UserId> {
    let header = match headers.get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AuthError::InvalidHeader)?),
        None => None,
    };
    Ok(subject_from_header(header, &state.app_secret)?)
}

/// Aliases that can never be stored resolve as missing rather than invalid.
fn path_alias(alias: String) -> Result<Alias> {
    Alias::new(alias.as_str()).map_err(|_| AppError::Shortener(ShortenerError::NotFound(alias)))
}

pub async fn create_url_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<Json<Envelope>> {
    let creator = requester(&headers, &state)?;
    let Json(request) = request.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let created = state
        .service
        .create(&request.url, request.alias.as_deref(), creator)
        .await?;

    info!(alias = %created.alias, creator, "Shortened url");

    Ok(Json(
        Envelope::ok()
            .alias(created.alias.as_str())
            .info(created.alias.to_url(&state.base_url)),
    ))
}

pub async fn redirect_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let alias = path_alias(alias)?;
    let url = state.service.resolve(&alias).await?;

    Ok((StatusCode::FOUND, [(LOCATION, url)]).into_response())
}

pub async fn delete_url_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Envelope>)> {
    let requester = requester(&headers, &state)?;
    let alias = path_alias(alias)?;

    state.service.delete(&alias, requester).await?;

    let status = StatusCode::ACCEPTED;
    Ok((
        status,
        Json(Envelope::with_status(status).alias(alias.as_str())),
    ))
}
