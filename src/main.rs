use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing_actix_web::TracingLogger;

use clipstream::config::{Config, CorsConfig};
use clipstream::handlers;
use clipstream::security::TokenIssuer;
use clipstream::services::{CatalogService, EmailService};
use clipstream::store::PgRecordStore;

fn build_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600);

    if config.allowed_origins.trim() == "*" {
        cors = cors.allow_any_origin();
    } else {
        for origin in config.allowed_origins.split(',') {
            let origin = origin.trim();
            if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
    }
    cors
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!("Starting clipstream v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let catalog = CatalogService::new(Arc::new(PgRecordStore::new(pool.clone())));
    let issuer = TokenIssuer::new(config.jwt.clone());
    let mailer = EmailService::new(&config.smtp)?;

    let bind_addr = (config.app.host.clone(), config.app.port);
    let cors_config = config.cors.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(build_cors(&cors_config))
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(catalog.clone()))
            .app_data(web::Data::new(issuer.clone()))
            .app_data(web::Data::new(mailer.clone()))
            .configure(handlers::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
