/// Configuration management for the clipstream service.
///
/// All settings are loaded from environment variables, with development
/// defaults. Secrets must be set explicitly when APP_ENV=production.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub smtp: SmtpConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins, or "*"
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Signing secrets for the four token purposes.
///
/// Access and refresh tokens carry sessions; the email-confirm and
/// password-reset secrets sign short-lived single-purpose links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub email_secret: String,
    pub reset_secret: String,
}

/// SMTP settings; an empty host puts the mailer in no-op mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub use_starttls: bool,
    /// Base URL the verification link points at (the SPA route)
    pub verification_base_url: Option<String>,
    /// Base URL the password-reset link points at
    pub password_reset_base_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let is_production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("HTTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if is_production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:5173".to_string(),
                };

                if is_production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/clipstream".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            jwt: JwtConfig {
                access_secret: secret("ACCESS_TOKEN_SECRET", is_production)?,
                refresh_secret: secret("REFRESH_TOKEN_SECRET", is_production)?,
                email_secret: secret("EMAIL_CONFIRM_SECRET", is_production)?,
                reset_secret: secret("PASSWORD_RESET_SECRET", is_production)?,
            },
            smtp: SmtpConfig {
                host: std::env::var("SMTP_HOST").unwrap_or_default(),
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(587),
                username: std::env::var("SMTP_USERNAME").ok(),
                password: std::env::var("SMTP_PASSWORD").ok(),
                from: std::env::var("SMTP_FROM")
                    .unwrap_or_else(|_| "Clipstream <no-reply@clipstream.local>".to_string()),
                use_starttls: std::env::var("SMTP_STARTTLS")
                    .map(|v| v != "false")
                    .unwrap_or(true),
                verification_base_url: std::env::var("EMAIL_VERIFICATION_BASE_URL").ok(),
                password_reset_base_url: std::env::var("PASSWORD_RESET_BASE_URL").ok(),
            },
        })
    }
}

fn secret(name: &str, is_production: bool) -> Result<String, String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ if is_production => Err(format!("{} must be set in production", name)),
        _ => Ok(format!("dev-{}", name.to_lowercase())),
    }
}
