use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub url: String,
    /// Generated when absent or empty.
    #[serde(default)]
    pub alias: Option<String>,
}
