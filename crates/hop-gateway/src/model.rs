mod auth;
mod response;
mod url;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
pub use response::{Envelope, HealthResponse};
pub use url::CreateUrlRequest;
