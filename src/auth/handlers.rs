use actix_web::{web, HttpResponse, HttpRequest, ResponseError};
use serde::Serialize;
use serde_json::json;
use crate::AppState;
use crate::auth::service::{Credentials, Registration};
use crate::error::{AppError, AuthError};
use tracing::{info, error};

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub authorize: bool,
}

pub async fn register(
    req: web::Json<Registration>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let registration = req.into_inner();
    let email = registration.email.clone().unwrap_or_default();
    info!("Received registration request for email: {}", email);

    match state.auth_service.register(registration).await {
        Ok(message) => {
            info!("Registration successful for email: {}", email);
            Ok(HttpResponse::Ok().json(json!({ "message": message })))
        }
        Err(e) => {
            error!("Registration failed for email: {}: {}", email, e);
            Err(e)
        }
    }
}

/// Issues a token. Every response carries `authorize`, failures included.
pub async fn token(
    req: web::Json<Credentials>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let credentials = req.into_inner();
    let email = credentials.email.clone().unwrap_or_default();
    info!("Received login request for email: {}", email);

    match state.auth_service.login(credentials).await {
        Ok(token) => {
            info!("Login successful for email: {}", email);
            HttpResponse::Ok().json(TokenResponse { token, authorize: true })
        }
        Err(e) => {
            error!("Login failed for email: {}: {}", email, e);
            HttpResponse::build(e.status_code()).json(json!({
                "message": e.public_message(),
                "authorize": false
            }))
        }
    }
}

pub async fn profile(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(&req)?;
    let profile = state.auth_service.get_profile(token).await?;
    Ok(HttpResponse::Ok().json(profile))
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AppError> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or(AppError::AuthError(AuthError::MissingToken))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_extraction() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).unwrap(), "abc.def.ghi");

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwdw=="))
            .to_http_request();
        assert!(bearer_token(&req).is_err());

        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            bearer_token(&req),
            Err(AppError::AuthError(AuthError::MissingToken))
        ));
    }
}
