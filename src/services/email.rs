/// Email delivery for verification and password-reset links.
use std::sync::Arc;

use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{info, warn};

use crate::config::SmtpConfig;
use crate::error::{AppError, Result};

/// Async SMTP transport wrapper.
///
/// When no SMTP host is configured the service runs in no-op mode and logs
/// the link instead, so development and tests need no mail infrastructure.
#[derive(Clone)]
pub struct EmailService {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
    verification_base_url: Option<String>,
    password_reset_base_url: Option<String>,
}

impl EmailService {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| AppError::Internal(format!("Invalid SMTP_FROM address: {}", e)))?;

        let transport = if config.host.trim().is_empty() {
            warn!("SMTP host not configured; email service will operate in no-op mode");
            None
        } else {
            let builder = if config.use_starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            }
            .map_err(|e| AppError::Internal(format!("Failed to configure SMTP transport: {}", e)))?
            .port(config.port);

            let builder = if let (Some(username), Some(password)) =
                (&config.username, &config.password)
            {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            } else {
                builder
            };

            Some(Arc::new(builder.build()))
        };

        Ok(Self {
            transport,
            from,
            verification_base_url: config.verification_base_url.clone(),
            password_reset_base_url: config.password_reset_base_url.clone(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send the email-verification link for a fresh or re-issued token.
    pub async fn send_verification_email(&self, recipient: &str, token: &str) -> Result<()> {
        let link = build_link(self.verification_base_url.as_deref(), "verify-email", token);
        let body = format!(
            "Welcome to Clipstream!\n\nPlease follow this link to verify your email address:\n{}\n\nThe link expires in 10 minutes. If you did not register, ignore this email.",
            link
        );
        self.send_mail(recipient, "Email Verification", &body).await
    }

    /// Send the password-reset link.
    pub async fn send_password_reset_email(&self, recipient: &str, token: &str) -> Result<()> {
        let link = build_link(
            self.password_reset_base_url.as_deref(),
            "reset-password",
            token,
        );
        let body = format!(
            "A password reset was requested for your Clipstream account.\n\nFollow this link to choose a new password:\n{}\n\nThe link expires in 5 minutes. If you did not request a reset, ignore this email.",
            link
        );
        self.send_mail(recipient, "Password Reset", &body).await
    }

    async fn send_mail(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let Some(transport) = &self.transport else {
            info!(%recipient, subject, "email suppressed (no-op mode): {}", body);
            return Ok(());
        };

        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| AppError::Validation(format!("Invalid recipient address: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        info!(%recipient, subject, "email sent");
        Ok(())
    }
}

fn build_link(base_url: Option<&str>, route: &str, token: &str) -> String {
    match base_url {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), token),
        None => format!("/{}/{}", route, token),
    }
}
