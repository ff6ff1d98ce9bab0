use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use std::sync::Arc;
use tracing::info;

use crate::db::models::{Company, NewCompany, NewUser, User};
use crate::db::storage::Storage;
use crate::error::{AppError, DatabaseError};
use crate::Result;

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";
const COMPANY_COLUMNS: &str =
    "id, nif, nombre, sector, direccion, email, descripcion, web, certificado";

/// PostgreSQL-backed `Storage`.
#[derive(Clone)]
pub struct DbOperations {
    pool: Arc<PgPool>,
}

impl DbOperations {
    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
            .map_err(|e| {
                AppError::DatabaseError(DatabaseError::ConnectionError(e.to_string()))
            })?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Storage for DbOperations {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn list_companies(&self) -> Result<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies ORDER BY id",
            COMPANY_COLUMNS
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(companies)
    }

    async fn get_company(&self, id: i32) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE id = $1",
            COMPANY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(company)
    }

    async fn find_company_by_nif_or_email(
        &self,
        nif: &str,
        email: &str,
    ) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE nif = $1 OR email = $2 LIMIT 1",
            COMPANY_COLUMNS
        ))
        .bind(nif)
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(company)
    }

    async fn insert_company(&self, company: NewCompany) -> Result<Company> {
        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            INSERT INTO companies
                (nif, nombre, sector, direccion, email, descripcion, web, certificado)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        ))
        .bind(&company.nif)
        .bind(&company.nombre)
        .bind(&company.sector)
        .bind(&company.direccion)
        .bind(&company.email)
        .bind(&company.descripcion)
        .bind(&company.web)
        .bind(&company.certificado)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(company)
    }

    async fn save_company(&self, company: Company) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(&format!(
            r#"
            UPDATE companies
            SET nif = $2, nombre = $3, sector = $4, direccion = $5,
                email = $6, descripcion = $7, web = $8, certificado = $9
            WHERE id = $1
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        ))
        .bind(company.id)
        .bind(&company.nif)
        .bind(&company.nombre)
        .bind(&company.sector)
        .bind(&company.direccion)
        .bind(&company.email)
        .bind(&company.descripcion)
        .bind(&company.web)
        .bind(&company.certificado)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(company)
    }

    async fn delete_company(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
