use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A short public token mapped to a target URL.
///
/// User-supplied aliases must be 1-64 characters long and contain only
/// alphanumeric characters, hyphens, or underscores. Reserved tokens pass
/// validation here; rejecting them is a policy decision made by the service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Alias(String);

const MIN_LENGTH: usize = 1;
const MAX_LENGTH: usize = 64;

/// Tokens that collide with routing paths and must never be assigned.
pub const RESERVED_ALIASES: &[&str] = &["url"];

impl Alias {
    /// Creates a new `Alias` after validating the input.
    ///
    /// Valid aliases are 1-64 characters and contain only `[a-zA-Z0-9_-]`.
    pub fn new(alias: impl Into<String>) -> std::result::Result<Self, CoreError> {
        let alias = alias.into();
        Self::validate(&alias)?;
        Ok(Self(alias))
    }

    /// Creates an `Alias` without validation.
    ///
    /// Use this only for aliases produced by trusted internal sources
    /// (e.g. the generator, whose alphabet is a subset of the valid one).
    pub fn new_unchecked(alias: impl Into<String>) -> Self {
        Self(alias.into())
    }

    /// Returns `true` if this alias is one of [`RESERVED_ALIASES`].
    pub fn is_reserved(&self) -> bool {
        RESERVED_ALIASES.contains(&self.0.as_str())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the alias as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(alias: &str) -> std::result::Result<(), CoreError> {
        if alias.len() < MIN_LENGTH || alias.len() > MAX_LENGTH {
            return Err(CoreError::InvalidAlias(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                alias.len()
            )));
        }

        if !alias
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CoreError::InvalidAlias(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                alias
            )));
        }

        Ok(())
    }
}

impl Display for Alias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Alias {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
