/// JWT issuance and verification (HS256).
///
/// Four token purposes with separate secrets and lifetimes:
/// access 15 min, refresh 10 days, email-confirm 10 min, password-reset
/// 5 min. The access token carries the caller's admin flag, signed
/// server-side at login from the user row; it is the only admin signal the
/// service trusts.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;
use crate::error::{AppError, Result};
use crate::models::User;

pub const ACCESS_TOKEN_TTL_SECS: i64 = 900;
pub const REFRESH_TOKEN_TTL_SECS: i64 = 10 * 24 * 3600;
pub const EMAIL_TOKEN_TTL_SECS: i64 = 600;
pub const RESET_TOKEN_TTL_SECS: i64 = 300;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id (or the email for reset tokens, where the account
    /// may be looked up by address)
    pub sub: String,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
    /// "access", "refresh", "email" or "reset"
    pub token_type: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenIssuer {
    config: JwtConfig,
}

impl TokenIssuer {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    pub fn access_token(&self, user: &User) -> Result<String> {
        self.sign(
            &self.config.access_secret,
            claims_for(user, "access", ACCESS_TOKEN_TTL_SECS),
        )
    }

    pub fn refresh_token(&self, user: &User) -> Result<String> {
        self.sign(
            &self.config.refresh_secret,
            claims_for(user, "refresh", REFRESH_TOKEN_TTL_SECS),
        )
    }

    pub fn email_token(&self, user: &User) -> Result<String> {
        self.sign(
            &self.config.email_secret,
            claims_for(user, "email", EMAIL_TOKEN_TTL_SECS),
        )
    }

    pub fn reset_token(&self, user: &User) -> Result<String> {
        self.sign(
            &self.config.reset_secret,
            claims_for(user, "reset", RESET_TOKEN_TTL_SECS),
        )
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims> {
        self.verify(token, &self.config.access_secret, "access")
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims> {
        self.verify(token, &self.config.refresh_secret, "refresh")
    }

    pub fn verify_email(&self, token: &str) -> Result<Claims> {
        self.verify(token, &self.config.email_secret, "email")
    }

    pub fn verify_reset(&self, token: &str) -> Result<Claims> {
        self.verify(token, &self.config.reset_secret, "reset")
    }

    fn sign(&self, secret: &str, claims: Claims) -> Result<String> {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    fn verify(&self, token: &str, secret: &str, expected_type: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::Unauthorized("Token expired".to_string())
            }
            _ => AppError::Unauthorized("Invalid token".to_string()),
        })?;

        if data.claims.token_type != expected_type {
            return Err(AppError::Unauthorized("Invalid token".to_string()));
        }
        Ok(data.claims)
    }
}

fn claims_for(user: &User, token_type: &str, ttl_secs: i64) -> Claims {
    let now = Utc::now();
    Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        username: user.username.clone(),
        is_admin: user.is_admin,
        token_type: token_type.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
    }
}
