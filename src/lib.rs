pub mod auth;
pub mod companies;
pub mod config;
pub mod db;
pub mod error;
pub mod validation;

use std::sync::Arc;
use actix_web::{web, HttpResponse};

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::AuthService;
pub use companies::CompanyService;
pub use db::{DbOperations, MemoryStorage, Storage};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub auth_service: Arc<AuthService>,
    pub company_service: Arc<CompanyService>,
}

impl AppState {
    pub fn new(config: Settings, storage: Arc<dyn Storage>) -> Self {
        let auth_service = AuthService::new(storage.clone(), &config.auth);
        let company_service = CompanyService::new(storage);

        Self {
            config: Arc::new(config),
            auth_service: Arc::new(auth_service),
            company_service: Arc::new(company_service),
        }
    }
}

/// Registers every route plus the JSON body error mapping.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use auth::handlers::{profile, register, token};
    use companies::handlers::{
        create_company, delete_company, get_company, list_companies, update_company,
    };

    cfg.app_data(json_config())
        .route("/health", web::get().to(health_check))
        .route("/register", web::post().to(register))
        .route("/token", web::post().to(token))
        .route("/profile/user", web::get().to(profile))
        .service(
            web::resource("/companies")
                .route(web::get().to(list_companies))
                .route(web::post().to(create_company)),
        )
        .service(
            web::resource("/companies/{id}")
                .route(web::get().to(get_company))
                .route(web::put().to(update_company))
                .route(web::delete().to(delete_company)),
        );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid JSON body: {}", err)).into()
    })
}
