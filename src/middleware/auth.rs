/// Bearer-token extractors.
///
/// `AuthenticatedUser` resolves the Authorization header to verified
/// access-token claims; `AdminUser` additionally requires the admin flag.
/// The flag is trusted only from the server-signed token, never from the
/// request body.
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

use crate::error::AppError;
use crate::security::{Claims, TokenIssuer};

/// Verified access-token claims of the caller
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

/// Verified claims of a caller holding admin rights
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

fn bearer_claims(req: &HttpRequest) -> Result<Claims, AppError> {
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| AppError::Internal("token issuer not configured".to_string()))?;

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))?;

    issuer.verify_access(token)
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(bearer_claims(req).map(AuthenticatedUser))
    }
}

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(bearer_claims(req).and_then(|claims| {
            if claims.is_admin {
                Ok(AdminUser(claims))
            } else {
                Err(AppError::Forbidden("Admin rights required".to_string()))
            }
        }))
    }
}
