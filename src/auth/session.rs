use std::collections::BTreeSet;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::json_error;

/// Access level carried inside a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Candidate,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Admin => "admin",
        }
    }
}

/// JWT payload. `sub` is the account email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Authorization token missing")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Admin access required")]
    Forbidden,
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl SessionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SessionError::MissingToken | SessionError::InvalidToken => StatusCode::UNAUTHORIZED,
            SessionError::Forbidden => StatusCode::FORBIDDEN,
            SessionError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        json_error(self.status_code(), self.to_string())
    }
}

/// Issues and verifies HS256 session tokens.
#[derive(Clone)]
pub struct SessionAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    admin_emails: BTreeSet<String>,
}

impl SessionAuthority {
    pub fn new(secret: &str, ttl: Duration, admin_emails: BTreeSet<String>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl,
            admin_emails: admin_emails
                .into_iter()
                .map(|email| email.to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            Duration::hours(config.token_ttl_hours),
            config.admin_emails.clone(),
        )
    }

    pub fn role_for(&self, email: &str) -> Role {
        if self.admin_emails.contains(&email.to_ascii_lowercase()) {
            Role::Admin
        } else {
            Role::Candidate
        }
    }

    pub fn issue(&self, email: &str) -> Result<IssuedToken, SessionError> {
        self.issue_at(email, Utc::now())
    }

    pub fn issue_at(&self, email: &str, now: DateTime<Utc>) -> Result<IssuedToken, SessionError> {
        let role = self.role_for(email);
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: email.to_ascii_lowercase(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| SessionError::Signing(err.to_string()))?;

        Ok(IssuedToken {
            token,
            role,
            expires_at,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, SessionError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| SessionError::InvalidToken)
    }
}
