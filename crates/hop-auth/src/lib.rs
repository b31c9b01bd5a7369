//! Identity plumbing for hop.
//!
//! [`jwt`] turns a bearer token into a verified [`UserId`](hop_core::UserId).
//! [`sso`] talks to the external SSO service for admin checks, login and
//! registration. [`StaticAuthority`] stands in for the SSO admin check when no
//! SSO service is configured.

pub mod error;
pub mod jwt;
pub mod sso;
pub mod static_authority;

pub use error::AuthError;
pub use jwt::{subject_from_header, verify_and_extract_subject};
pub use sso::{IdentityProvider, SsoClient, SsoConfig};
pub use static_authority::StaticAuthority;
