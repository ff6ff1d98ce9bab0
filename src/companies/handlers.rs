use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::info;

use crate::AppState;
use crate::companies::service::CompanyPayload;
use crate::db::models::CompanyUpdate;
use crate::error::AppError;

pub async fn list_companies(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let companies = state.company_service.list().await?;
    Ok(HttpResponse::Ok().json(companies))
}

pub async fn get_company(
    path: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let company = state.company_service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(company))
}

pub async fn create_company(
    req: web::Json<CompanyPayload>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received company creation request");
    let company = state.company_service.create(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(company))
}

pub async fn update_company(
    path: web::Path<i32>,
    req: web::Json<CompanyUpdate>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let company = state
        .company_service
        .update(path.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(company))
}

pub async fn delete_company(
    path: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let message = state.company_service.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": message })))
}
