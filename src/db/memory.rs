use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::db::models::{Company, NewCompany, NewUser, User};
use crate::db::storage::Storage;
use crate::error::AppError;
use crate::Result;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    companies: Vec<Company>,
    last_user_id: i32,
    last_company_id: i32,
}

/// In-process `Storage` used by tests and local runs without Postgres.
///
/// Mirrors the schema's unique constraints on `users.email`,
/// `companies.nif` and `companies.email`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Record already exists".into()));
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_companies(&self) -> Result<Vec<Company>> {
        Ok(self.tables.read().await.companies.clone())
    }

    async fn get_company(&self, id: i32) -> Result<Option<Company>> {
        let tables = self.tables.read().await;
        Ok(tables.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn find_company_by_nif_or_email(
        &self,
        nif: &str,
        email: &str,
    ) -> Result<Option<Company>> {
        let tables = self.tables.read().await;
        Ok(tables
            .companies
            .iter()
            .find(|c| c.nif == nif || c.email == email)
            .cloned())
    }

    async fn insert_company(&self, company: NewCompany) -> Result<Company> {
        let mut tables = self.tables.write().await;
        if tables
            .companies
            .iter()
            .any(|c| c.nif == company.nif || c.email == company.email)
        {
            return Err(AppError::Conflict("Record already exists".into()));
        }

        tables.last_company_id += 1;
        let company = company.into_company(tables.last_company_id);
        tables.companies.push(company.clone());
        Ok(company)
    }

    async fn save_company(&self, company: Company) -> Result<Option<Company>> {
        let mut tables = self.tables.write().await;
        match tables.companies.iter_mut().find(|c| c.id == company.id) {
            Some(stored) => {
                *stored = company.clone();
                Ok(Some(company))
            }
            None => Ok(None),
        }
    }

    async fn delete_company(&self, id: i32) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.companies.len();
        tables.companies.retain(|c| c.id != id);
        Ok(tables.companies.len() != before)
    }
}
