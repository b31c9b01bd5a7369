mod auth;
mod health;
mod url;

pub use auth::{login_handler, register_handler};
pub use health::health_handler;
pub use url::{create_url_handler, delete_url_handler, redirect_handler};
