use actix_web::{web, App, HttpServer};
use actix_web::middleware::Logger;
use actix_cors::Cors;
use anyhow::Context;
use company_registry_server::{configure, AppState, DbOperations, Settings};
use company_registry_server::config::CorsConfig;
use dotenv::dotenv;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn cors(config: &CorsConfig) -> Cors {
    if !config.enabled {
        // CORS disabled - use most restrictive settings
        return Cors::default();
    }

    let cors = if config.allow_any_origin {
        Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .expose_any_header()
    } else {
        Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec!["Authorization", "Content-Type"])
    };

    cors.max_age(config.max_age as usize)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    let config = Settings::new().context("failed to load configuration")?;
    info!("Configuration loaded successfully ({})", config.environment);

    let db = DbOperations::new_with_options(
        &config.database.url,
        config.database.max_connections,
        Duration::from_secs(5),
    )
    .await
    .context("failed to connect to database")?;
    db.migrate().await.context("failed to run migrations")?;

    let state = web::Data::new(AppState::new(config.clone(), Arc::new(db.clone())));

    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))
        .context("failed to bind listener")?;
    info!("Starting server at {}:{}", config.server.host, config.server.port);

    let cors_config = config.cors.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(cors(&cors_config))
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .listen(listener)?
    .workers(config.server.workers as usize)
    .run()
    .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}
