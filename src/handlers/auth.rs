/// Authentication endpoints: registration, email verification, login,
/// token refresh, logout, and password reset.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use crate::db::users;
use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::security::{password, TokenIssuer};
use crate::services::EmailService;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 8))]
    pub password: String,
}

/// POST /auth/register
pub async fn register(
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
    mailer: web::Data<EmailService>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if users::find_by_username(&pool, &req.username).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "User with username {} already exists",
            req.username
        )));
    }
    if users::find_by_email(&pool, &req.email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "User with email {} already exists",
            req.email
        )));
    }

    let password_hash = password::hash_password(&req.password)?;
    let user = users::create_user(&pool, &req.username, &req.email, &password_hash).await?;

    let token = issuer.email_token(&user)?;
    users::set_verification_token(&pool, user.id, Some(token.as_str())).await?;

    if let Err(e) = mailer.send_verification_email(&user.email, &token).await {
        warn!(email = %user.email, "failed to send verification email: {}", e);
    }

    Ok(HttpResponse::Created().json(json!({
        "ok": true,
        "msg": format!("Email verification link sent to {}", user.email),
        "user": {
            "id": user.id,
            "username": user.username,
            "email": user.email,
        },
    })))
}

/// GET /auth/verify-email/{token}
pub async fn verify_email(
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let token = path.into_inner();
    let user = users::find_by_verification_token(&pool, &token)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid verification token entered".to_string()))?;

    issuer.verify_email(&token)?;
    users::mark_email_verified(&pool, user.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "msg": "Email successfully verified",
    })))
}

/// GET /auth/resend-email/{token}
///
/// Re-issues the verification link for the user holding an (often already
/// expired) token and sends a fresh email.
pub async fn resend_email(
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
    mailer: web::Data<EmailService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let token = path.into_inner();
    let user = users::find_by_verification_token(&pool, &token)
        .await?
        .ok_or_else(|| AppError::NotFound("Token not valid".to_string()))?;

    let new_token = issuer.email_token(&user)?;
    users::set_verification_token(&pool, user.id, Some(new_token.as_str())).await?;

    if let Err(e) = mailer.send_verification_email(&user.email, &new_token).await {
        warn!(email = %user.email, "failed to resend verification email: {}", e);
    }

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "msg": "Verification email resent",
    })))
}

/// POST /auth/login
pub async fn login(
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = users::find_by_email(&pool, &req.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Wrong credentials entered".to_string()))?;

    if !user.is_email_verified {
        return Err(AppError::Forbidden("Email verification required".to_string()));
    }
    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Wrong credentials entered".to_string()));
    }

    let access_token = issuer.access_token(&user)?;
    let refresh_token = issuer.refresh_token(&user)?;
    users::set_refresh_token(&pool, user.id, Some(refresh_token.as_str())).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "msg": format!("User {} successfully logged in", user.email),
        "accessToken": access_token,
        "refreshToken": refresh_token,
    })))
}

/// POST /auth/refresh
pub async fn refresh(
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
    req: web::Json<RefreshRequest>,
) -> Result<HttpResponse> {
    let user = users::find_by_refresh_token(&pool, &req.refresh_token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    issuer.verify_refresh(&req.refresh_token)?;
    let access_token = issuer.access_token(&user)?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "msg": "Token refreshed",
        "accessToken": access_token,
    })))
}

/// POST /auth/logout
pub async fn logout(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse> {
    let user_id = Uuid::parse_str(&auth.0.sub)
        .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;
    // The token may outlive the account; resolve the row before clearing.
    let user = users::find_by_id(&pool, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;
    users::set_refresh_token(&pool, user.id, None).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "msg": format!("User {} successfully logged out", user.email),
    })))
}

/// POST /auth/reset-password
pub async fn request_password_reset(
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
    mailer: web::Data<EmailService>,
    req: web::Json<PasswordResetRequest>,
) -> Result<HttpResponse> {
    let user = users::find_by_email(&pool, &req.email)
        .await?
        .ok_or_else(|| AppError::NotFound("Email not registered".to_string()))?;

    let token = issuer.reset_token(&user)?;
    users::set_verification_token(&pool, user.id, Some(token.as_str())).await?;

    if let Err(e) = mailer.send_password_reset_email(&user.email, &token).await {
        warn!(email = %user.email, "failed to send password reset email: {}", e);
    }

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "msg": "Reset email sent",
    })))
}

/// POST /auth/reset-password/{token}
pub async fn reset_password(
    pool: web::Data<PgPool>,
    issuer: web::Data<TokenIssuer>,
    path: web::Path<String>,
    req: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let token = path.into_inner();
    issuer
        .verify_reset(&token)
        .map_err(|_| AppError::Unauthorized("Reset password token expired".to_string()))?;

    let user = users::find_by_verification_token(&pool, &token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid password reset token".to_string()))?;

    let password_hash = password::hash_password(&req.password)?;
    users::set_password_hash(&pool, user.id, &password_hash).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "msg": "Password reset successful",
    })))
}
