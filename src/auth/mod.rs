//! Accounts: password hashing, bearer tokens, and user persistence.

pub mod password;
pub mod store;
pub mod token;

pub use password::{hash_password, verify_password};
pub use store::{NewUser, SqliteUserStore, User, UserStore};
pub use token::{Claims, TokenSigner};

use crate::error::AuthError;
use serde::Deserialize;

pub const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Registration fields after trimming and email normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    pub fn validate(self) -> Result<ValidRegistration, AuthError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidInput("name is required".into()));
        }
        let email = normalize_email(&self.email)
            .ok_or_else(|| AuthError::InvalidInput("a valid email is required".into()))?;
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_CHARS} characters"
            )));
        }
        Ok(ValidRegistration {
            name: name.to_string(),
            email,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginInput {
    /// Email as it is stored, or `None` when it could never match an account.
    pub fn normalized_email(&self) -> Option<String> {
        normalize_email(&self.email)
    }
}

/// Trim and lowercase; requires text on both sides of a single `@`.
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    if email.chars().any(char::is_whitespace) {
        return None;
    }
    Some(email)
}

/// Token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
