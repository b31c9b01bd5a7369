use crate::error::{AuthError, Result};
use hop_core::UserId;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

const BEARER: &str = "Bearer";

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    uid: Option<Value>,
}

/// Verifies an HMAC-signed token (HS256, HS384 or HS512) against `secret`
/// and returns its `uid` claim.
///
/// `exp` is checked when present but not required. The subject may be
/// encoded as a JSON integer or as a whole-valued float.
pub fn verify_and_extract_subject(token: &str, secret: &[u8]) -> Result<UserId> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| {
            debug!(error = %e, "Rejected token");
            AuthError::InvalidToken(e.to_string())
        })?;

    match data.claims.uid {
        Some(Value::Number(n)) => {
            if let Some(uid) = n.as_i64() {
                return Ok(uid);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as UserId),
                _ => Err(AuthError::MissingSubject),
            }
        }
        _ => Err(AuthError::MissingSubject),
    }
}

/// Extracts the subject from an `Authorization: Bearer <token>` header value.
pub fn subject_from_header(header: Option<&str>, secret: &[u8]) -> Result<UserId> {
    let header = header
        .filter(|h| !h.is_empty())
        .ok_or(AuthError::MissingHeader)?;

    let token = match header.split_once(' ') {
        Some((scheme, token)) if scheme == BEARER && !token.is_empty() => token,
        _ => return Err(AuthError::InvalidHeader),
    };

    verify_and_extract_subject(token, secret)
}
