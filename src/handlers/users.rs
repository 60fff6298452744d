/// User listing endpoint.
use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::PgPool;

use crate::db::users;
use crate::error::Result;
use crate::middleware::AuthenticatedUser;

/// GET /users
pub async fn get_users(
    _auth: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse> {
    let all_users = users::list_users(&pool).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "users": all_users,
    })))
}
