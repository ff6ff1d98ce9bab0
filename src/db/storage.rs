use async_trait::async_trait;

use crate::db::models::{Company, NewCompany, NewUser, User};
use crate::Result;

/// Persistence interface shared by the auth and company services.
///
/// Handlers never touch a pool directly; they receive an `Arc<dyn Storage>`
/// through `AppState`, which lets tests swap in `MemoryStorage` or a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// All companies in storage order.
    async fn list_companies(&self) -> Result<Vec<Company>>;

    async fn get_company(&self, id: i32) -> Result<Option<Company>>;

    /// First company whose nif or email matches either argument.
    async fn find_company_by_nif_or_email(
        &self,
        nif: &str,
        email: &str,
    ) -> Result<Option<Company>>;

    async fn insert_company(&self, company: NewCompany) -> Result<Company>;

    /// Overwrites every column of the stored row with `company`.
    /// Returns `None` when no row has `company.id`.
    async fn save_company(&self, company: Company) -> Result<Option<Company>>;

    /// Returns whether a row was removed.
    async fn delete_company(&self, id: i32) -> Result<bool>;
}
