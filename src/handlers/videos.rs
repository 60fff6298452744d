/// Video catalog endpoints.
///
/// Mutating routes require an admin bearer token; reads are public.
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::AdminUser;
use crate::models::{Direction, VideoPatch};
use crate::services::{CatalogService, NewVideo};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub media_url: Option<String>,
    pub poster_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditVideoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub media_url: Option<String>,
    pub poster_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVideosQuery {
    pub limit: Option<i64>,
    pub start_index: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct NeighborRequest {
    pub id: String,
    pub direction: Option<Direction>,
}

fn parse_video_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Video not found".to_string()))
}

/// POST /videos/save
pub async fn save_video(
    _admin: AdminUser,
    catalog: web::Data<CatalogService>,
    req: web::Json<SaveVideoRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let video = catalog
        .insert_at_head(NewVideo {
            title: req.title.unwrap_or_default(),
            description: req.description.unwrap_or_default(),
            media_url: req.media_url.unwrap_or_default(),
            poster_id: req.poster_id,
        })
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "ok": true,
        "msg": "Video saved successfully",
        "video": video,
    })))
}

/// GET /videos?limit&startIndex
pub async fn list_videos(
    catalog: web::Data<CatalogService>,
    query: web::Query<ListVideosQuery>,
) -> Result<HttpResponse> {
    let videos = catalog.list_page(query.limit, query.start_index).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "msg": "Videos fetched successfully",
        "videos": videos,
    })))
}

/// GET /videos/{id}
pub async fn get_video(
    catalog: web::Data<CatalogService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_video_id(&path)?;
    let video = catalog.get(id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "msg": "Videos fetched successfully",
        "video": video,
    })))
}

/// POST /videos/next
pub async fn next_video(
    catalog: web::Data<CatalogService>,
    req: web::Json<NeighborRequest>,
) -> Result<HttpResponse> {
    let id = parse_video_id(&req.id)?;
    let direction = req.direction.unwrap_or(Direction::Next);
    let neighbor = catalog.neighbor(id, direction).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "msg": "Videos fetched successfully",
        "nextVid": neighbor,
    })))
}

/// GET /videos/delete/{id}
pub async fn delete_video(
    _admin: AdminUser,
    catalog: web::Data<CatalogService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_video_id(&path)?;
    catalog.remove_by_id(id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "msg": "Video deleted",
    })))
}

/// POST /videos/edit/{id}
pub async fn edit_video(
    _admin: AdminUser,
    catalog: web::Data<CatalogService>,
    path: web::Path<String>,
    req: web::Json<EditVideoRequest>,
) -> Result<HttpResponse> {
    let id = parse_video_id(&path)?;
    let req = req.into_inner();
    let video = catalog
        .update_fields(
            id,
            VideoPatch {
                title: req.title,
                description: req.description,
                media_url: req.media_url,
                poster_id: req.poster_id,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "ok": true,
        "msg": "Video edited successfully",
        "video": video,
    })))
}
