/// HTTP handlers and route configuration.
pub mod auth;
pub mod users;
pub mod videos;

use actix_web::{web, HttpResponse};

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                .route("/logout", web::post().to(auth::logout))
                .route("/refresh", web::post().to(auth::refresh))
                .route("/verify-email/{token}", web::get().to(auth::verify_email))
                .route("/resend-email/{token}", web::get().to(auth::resend_email))
                .route("/reset-password", web::post().to(auth::request_password_reset))
                .route("/reset-password/{token}", web::post().to(auth::reset_password)),
        )
        .service(web::scope("/users").route("", web::get().to(users::get_users)))
        .service(
            // Literal segments are registered before the `{id}` catch-all
            web::scope("/videos")
                .route("/save", web::post().to(videos::save_video))
                .route("/next", web::post().to(videos::next_video))
                .route("/delete/{id}", web::get().to(videos::delete_video))
                .route("/edit/{id}", web::post().to(videos::edit_video))
                .route("/{id}", web::get().to(videos::get_video))
                .route("", web::get().to(videos::list_videos)),
        );
}
