use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::models::{Company, CompanyUpdate, NewCompany};
use crate::db::storage::Storage;
use crate::error::AppError;
use crate::validation::required;
use crate::Result;

const NOT_FOUND: &str = "Company not found";

/// Create payload as received; presence is checked by the service.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CompanyPayload {
    pub nif: Option<String>,
    pub nombre: Option<String>,
    pub sector: Option<String>,
    pub direccion: Option<String>,
    pub email: Option<String>,
    pub descripcion: Option<String>,
    pub web: Option<String>,
    pub certificado: Option<String>,
}

impl TryFrom<CompanyPayload> for NewCompany {
    type Error = AppError;

    fn try_from(payload: CompanyPayload) -> Result<Self> {
        const MISSING: &str = "Missing required fields";
        Ok(NewCompany {
            nif: required(payload.nif, MISSING)?,
            nombre: required(payload.nombre, MISSING)?,
            sector: required(payload.sector, MISSING)?,
            direccion: required(payload.direccion, MISSING)?,
            email: required(payload.email, MISSING)?,
            descripcion: required(payload.descripcion, MISSING)?,
            web: required(payload.web, MISSING)?,
            certificado: payload.certificado,
        })
    }
}

pub struct CompanyService {
    storage: Arc<dyn Storage>,
}

impl CompanyService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> Result<Vec<Company>> {
        self.storage.list_companies().await
    }

    pub async fn get(&self, id: i32) -> Result<Company> {
        self.storage
            .get_company(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))
    }

    pub async fn create(&self, payload: CompanyPayload) -> Result<Company> {
        let company = NewCompany::try_from(payload)?;

        if let Some(existing) = self
            .storage
            .find_company_by_nif_or_email(&company.nif, &company.email)
            .await?
        {
            warn!("Rejected company {}: clashes with company {}", company.nif, existing.id);
            return Err(AppError::Conflict(
                "Company with this NIF or email already exists".into(),
            ));
        }

        let company = self.storage.insert_company(company).await?;
        info!("Created company {} ({})", company.id, company.nif);
        Ok(company)
    }

    /// Applies a partial update. Uniqueness of nif and email is not
    /// re-checked here; the Postgres constraints still reject clashes.
    pub async fn update(&self, id: i32, update: CompanyUpdate) -> Result<Company> {
        let mut company = self.get(id).await?;
        update.apply(&mut company);

        let company = self
            .storage
            .save_company(company)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.into()))?;
        info!("Updated company {}", company.id);
        Ok(company)
    }

    /// Removes the company and returns the confirmation message.
    pub async fn delete(&self, id: i32) -> Result<String> {
        if !self.storage.delete_company(id).await? {
            return Err(AppError::NotFound(NOT_FOUND.into()));
        }

        info!("Deleted company {}", id);
        Ok(format!("Company {} deleted", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::storage::MockStorage;
    use crate::db::MemoryStorage;

    fn payload(nif: &str, email: &str) -> CompanyPayload {
        CompanyPayload {
            nif: Some(nif.to_string()),
            nombre: Some("Acme".to_string()),
            sector: Some("Retail".to_string()),
            direccion: Some("Calle Mayor 1".to_string()),
            email: Some(email.to_string()),
            descripcion: Some("Tienda".to_string()),
            web: Some("https://acme.es".to_string()),
            certificado: None,
        }
    }

    fn service() -> CompanyService {
        CompanyService::new(Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let companies = service();
        let created = companies.create(payload("B1", "a@acme.es")).await.unwrap();
        assert_eq!(created.nif, "B1");
        assert_eq!(companies.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_missing_field() {
        let companies = service();
        let mut p = payload("B1", "a@acme.es");
        p.web = None;
        let err = companies.create(p).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(m) if m == "Missing required fields"));

        let mut p = payload("B1", "a@acme.es");
        p.sector = Some(String::new());
        assert!(matches!(companies.create(p).await, Err(AppError::ValidationError(_))));
        assert!(companies.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_conflict_leaves_storage_untouched() {
        let companies = service();
        companies.create(payload("B1", "a@acme.es")).await.unwrap();

        let by_nif = companies.create(payload("B1", "b@acme.es")).await.unwrap_err();
        assert!(matches!(by_nif, AppError::Conflict(_)));
        let by_email = companies.create(payload("B2", "a@acme.es")).await.unwrap_err();
        assert!(matches!(by_email, AppError::Conflict(_)));

        assert_eq!(companies.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_conflict_never_inserts() {
        let mut storage = MockStorage::new();
        storage
            .expect_find_company_by_nif_or_email()
            .returning(|nif, email| {
                Ok(Some(
                    NewCompany::try_from(payload(nif, email)).unwrap().into_company(3),
                ))
            });
        storage.expect_insert_company().never();
        let companies = CompanyService::new(Arc::new(storage));

        assert!(companies.create(payload("B1", "a@acme.es")).await.is_err());
    }

    #[tokio::test]
    async fn test_update_single_field() {
        let companies = service();
        let created = companies.create(payload("B1", "a@acme.es")).await.unwrap();

        let update = CompanyUpdate {
            nombre: Some("Acme Global".to_string()),
            ..Default::default()
        };
        let updated = companies.update(created.id, update).await.unwrap();

        let mut expected = created.clone();
        expected.nombre = "Acme Global".to_string();
        assert_eq!(updated, expected);
        assert_eq!(companies.get(created.id).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_update_does_not_recheck_uniqueness() {
        let companies = service();
        companies.create(payload("B1", "a@acme.es")).await.unwrap();
        let second = companies.create(payload("B2", "b@acme.es")).await.unwrap();

        let update = CompanyUpdate {
            nif: Some("B1".to_string()),
            ..Default::default()
        };
        let updated = companies.update(second.id, update).await.unwrap();
        assert_eq!(updated.nif, "B1");
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let companies = service();
        assert!(matches!(companies.get(9999).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            companies.update(9999, CompanyUpdate::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(companies.delete(9999).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let companies = service();
        let created = companies.create(payload("B1", "a@acme.es")).await.unwrap();
        assert_eq!(
            companies.delete(created.id).await.unwrap(),
            format!("Company {} deleted", created.id)
        );
        assert!(companies.get(created.id).await.is_err());
    }
}
