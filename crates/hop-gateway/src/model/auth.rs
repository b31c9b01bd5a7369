use serde::{Deserialize, Serialize};

const USERNAME_LEN: std::ops::RangeInclusive<usize> = 4..=32;
const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 8..=72;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email or username.
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.placeholder.is_empty() {
            return Err("empty placeholder".to_string());
        }
        if self.password.is_empty() {
            return Err("empty password".to_string());
        }
        if !is_email(&self.placeholder) && !is_username(&self.placeholder) {
            return Err("invalid placeholder".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: String,
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.email.is_empty() {
            return Err("empty email".to_string());
        }
        if self.username.is_empty() {
            return Err("empty username".to_string());
        }
        if self.password.is_empty() {
            return Err("empty password".to_string());
        }
        if !is_email(&self.email) {
            return Err("invalid email".to_string());
        }
        if !is_username(&self.username) {
            return Err("invalid username".to_string());
        }
        if !is_password(&self.password) {
            return Err(format!(
                "invalid password: must be {}-{} characters with upper case, lower case and a digit",
                PASSWORD_LEN.start(),
                PASSWORD_LEN.end()
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub status: String,
    pub user_id: i64,
}

fn is_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !s.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

fn is_username(s: &str) -> bool {
    USERNAME_LEN.contains(&s.len())
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

fn is_password(s: &str) -> bool {
    PASSWORD_LEN.contains(&s.len())
        && s.chars().any(|c| c.is_ascii_uppercase())
        && s.chars().any(|c| c.is_ascii_lowercase())
        && s.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn login_accepts_email_or_username() {
        for placeholder in ["alice", "alice@example.com"] {
            let req = LoginRequest {
                placeholder: placeholder.to_string(),
                password: "x".to_string(),
            };
            assert!(req.validate().is_ok(), "{placeholder}");
        }

        let req = LoginRequest {
            placeholder: "a b".to_string(),
            password: "x".to_string(),
        };
        assert_eq!(req.validate().unwrap_err(), "invalid placeholder");
    }

    #[test]
    fn register_rules() {
        assert!(register("a@b.io", "alice", "Passw0rdX").validate().is_ok());

        assert_eq!(
            register("", "alice", "Passw0rdX").validate().unwrap_err(),
            "empty email"
        );
        assert_eq!(
            register("not-an-email", "alice", "Passw0rdX").validate().unwrap_err(),
            "invalid email"
        );
        assert_eq!(
            register("a@b.io", "abc", "Passw0rdX").validate().unwrap_err(),
            "invalid username"
        );
        assert!(register("a@b.io", "alice", "password")
            .validate()
            .unwrap_err()
            .starts_with("invalid password"));
    }
}
