use crate::auth::password::{hash_password, verify_password};
use crate::config::AuthConfig;
use crate::db::models::{NewUser, UserProfile};
use crate::db::storage::Storage;
use crate::error::{AppError, AuthError};
use crate::validation::{is_valid_email, present};
use crate::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    encode, decode, Header, EncodingKey, DecodingKey, Validation, Algorithm,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // User email
    pub exp: i64,     // Expiration time
    pub iat: i64,     // Issued at
}

/// Registration payload as received; presence is checked by the service.
#[derive(Debug, Default, Deserialize)]
pub struct Registration {
    pub nombre: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "contraseña")]
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    #[serde(rename = "contraseña")]
    pub password: Option<String>,
}

pub struct AuthService {
    storage: Arc<dyn Storage>,
    jwt_secret: String,
    token_expiry: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>, config: &AuthConfig) -> Self {
        Self {
            storage,
            jwt_secret: config.jwt_secret.clone(),
            token_expiry: Duration::minutes(config.token_expiry_minutes),
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    /// Creates a user and returns the confirmation message.
    pub async fn register(&self, registration: Registration) -> Result<String> {
        const MISSING: &str = "Missing arguments";
        let name = present(registration.nombre, MISSING)?;
        let email = present(registration.email, MISSING)?;
        let password = present(registration.password, MISSING)?;

        if !is_valid_email(&email) {
            return Err(AppError::ValidationError("email is not valid".into()));
        }

        if self.storage.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("User with this email already exists".into()));
        }

        let password_hash = hash_password(password, self.bcrypt_cost).await?;
        let user = self
            .storage
            .create_user(NewUser { name, email, password_hash })
            .await?;

        info!("Registered user {}", user.id);
        Ok(format!("User {} was created", user.email))
    }

    /// Verifies credentials and issues a bearer token.
    pub async fn login(&self, credentials: Credentials) -> Result<String> {
        const MISSING: &str = "missing parameters";
        let email = present(credentials.email, MISSING)?;
        let password = present(credentials.password, MISSING)?;

        if !is_valid_email(&email) {
            return Err(AppError::ValidationError("email is not valid".into()));
        }

        let user = self
            .storage
            .get_user_by_email(&email)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        if !verify_password(password, user.password_hash).await? {
            warn!("Password mismatch for user {}", user.id);
            return Err(AuthError::InvalidCredentials.into());
        }

        self.generate_token(&user.email)
    }

    /// Resolves a bearer token to the profile of the user it names.
    pub async fn get_profile(&self, token: &str) -> Result<UserProfile> {
        let claims = self.decode_token(token)?;

        let user = self
            .storage
            .get_user_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        Ok(user.into())
    }

    fn generate_token(&self, email: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            exp: (now + self.token_expiry).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    fn decode_token(&self, token: &str) -> Result<Claims> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(claims.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::db::models::User;
    use crate::db::storage::MockStorage;
    use crate::db::MemoryStorage;

    fn auth_config() -> AuthConfig {
        Settings::new_for_test().expect("Failed to load test config").auth
    }

    fn service(storage: Arc<dyn Storage>) -> AuthService {
        AuthService::new(storage, &auth_config())
    }

    fn registration(name: &str, email: &str, password: &str) -> Registration {
        Registration {
            nombre: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = service(Arc::new(MemoryStorage::new()));

        let message = auth.register(registration("A", "a@b.com", "x")).await.unwrap();
        assert_eq!(message, "User a@b.com was created");

        let token = auth.login(credentials("a@b.com", "x")).await.unwrap();
        let profile = auth.get_profile(&token).await.unwrap();
        assert_eq!(profile.email, "a@b.com");
        assert_eq!(profile.nombre, "A");
    }

    #[tokio::test]
    async fn test_register_missing_fields() {
        let auth = service(Arc::new(MemoryStorage::new()));
        let mut reg = registration("A", "a@b.com", "x");
        reg.password = None;

        let err = auth.register(reg).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(m) if m == "Missing arguments"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let auth = service(Arc::new(MemoryStorage::new()));
        auth.register(registration("A", "a@b.com", "x")).await.unwrap();

        let err = auth.register(registration("B", "a@b.com", "y")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let auth = service(Arc::new(MemoryStorage::new()));
        auth.register(registration("A", "a@b.com", "x")).await.unwrap();

        let err = auth.login(credentials("a@b.com", "y")).await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_malformed_email_skips_storage() {
        // No expectations: any storage call would panic.
        let auth = service(Arc::new(MockStorage::new()));

        let err = auth.login(credentials("not-an-email", "x")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(m) if m == "email is not valid"));
    }

    #[tokio::test]
    async fn test_login_missing_fields_skips_storage() {
        // No expectations: any storage call would panic.
        let auth = service(Arc::new(MockStorage::new()));

        let mut no_email = credentials("a@b.com", "x");
        no_email.email = None;
        let err = auth.login(no_email).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(m) if m == "missing parameters"));

        let mut no_password = credentials("a@b.com", "x");
        no_password.password = None;
        let err = auth.login(no_password).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(m) if m == "missing parameters"));
    }

    #[tokio::test]
    async fn test_empty_password_is_a_password() {
        let auth = service(Arc::new(MemoryStorage::new()));
        auth.register(registration("C", "c@b.com", "")).await.unwrap();

        let token = auth.login(credentials("c@b.com", "")).await.unwrap();
        assert_eq!(auth.get_profile(&token).await.unwrap().email, "c@b.com");

        let err = auth.login(credentials("c@b.com", "x")).await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_empty_password_against_real_account() {
        let auth = service(Arc::new(MemoryStorage::new()));
        auth.register(registration("C", "c@b.com", "x")).await.unwrap();

        let err = auth.login(credentials("c@b.com", "")).await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let mut storage = MockStorage::new();
        storage
            .expect_get_user_by_email()
            .times(1)
            .returning(|email| {
                assert_eq!(email, "ghost@b.com");
                Ok(None)
            });
        let auth = service(Arc::new(storage));

        let err = auth.login(credentials("ghost@b.com", "x")).await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(AuthError::UnknownUser)));
    }

    #[tokio::test]
    async fn test_profile_for_deleted_user() {
        let mut storage = MockStorage::new();
        let hash = hash_password("x".to_string(), 4).await.unwrap();
        let mut calls = 0;
        storage.expect_get_user_by_email().times(2).returning(move |email| {
            calls += 1;
            if calls == 1 {
                Ok(Some(User {
                    id: 1,
                    name: "A".to_string(),
                    email: email.to_string(),
                    password_hash: hash.clone(),
                    created_at: Utc::now(),
                }))
            } else {
                Ok(None)
            }
        });
        let auth = service(Arc::new(storage));

        let token = auth.login(credentials("a@b.com", "x")).await.unwrap();
        let err = auth.get_profile(&token).await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let auth = service(Arc::new(MemoryStorage::new()));
        let now = Utc::now();
        let claims = Claims {
            sub: "a@b.com".to_string(),
            exp: (now - Duration::hours(2)).timestamp(),
            iat: (now - Duration::hours(3)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(auth_config().jwt_secret.as_bytes()),
        )
        .unwrap();

        let err = auth.get_profile(&token).await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_rejected() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let auth = service(storage.clone());
        auth.register(registration("A", "a@b.com", "x")).await.unwrap();

        let mut other_config = auth_config();
        other_config.jwt_secret = "another_secret".to_string();
        let other = AuthService::new(storage, &other_config);
        let token = other.login(credentials("a@b.com", "x")).await.unwrap();

        let err = auth.get_profile(&token).await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(AuthError::InvalidToken)));
    }
}
