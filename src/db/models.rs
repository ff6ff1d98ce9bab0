use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to persist a freshly registered user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Public view of a user returned by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i32,
    pub nombre: String,
    pub email: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nombre: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: i32,
    pub nif: String,
    pub nombre: String,
    pub sector: String,
    pub direccion: String,
    pub email: String,
    pub descripcion: String,
    pub web: String,
    pub certificado: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCompany {
    pub nif: String,
    pub nombre: String,
    pub sector: String,
    pub direccion: String,
    pub email: String,
    pub descripcion: String,
    pub web: String,
    pub certificado: Option<String>,
}

impl NewCompany {
    pub fn into_company(self, id: i32) -> Company {
        Company {
            id,
            nif: self.nif,
            nombre: self.nombre,
            sector: self.sector,
            direccion: self.direccion,
            email: self.email,
            descripcion: self.descripcion,
            web: self.web,
            certificado: self.certificado,
        }
    }
}

/// Partial update of a company. `None` leaves the stored value untouched.
///
/// `certificado` is nullable, so it carries two levels: the outer `Option`
/// records whether the field was sent at all, the inner one whether it was
/// `null`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompanyUpdate {
    pub nif: Option<String>,
    pub nombre: Option<String>,
    pub sector: Option<String>,
    pub direccion: Option<String>,
    pub email: Option<String>,
    pub descripcion: Option<String>,
    pub web: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub certificado: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl CompanyUpdate {
    pub fn apply(self, company: &mut Company) {
        if let Some(nif) = self.nif {
            company.nif = nif;
        }
        if let Some(nombre) = self.nombre {
            company.nombre = nombre;
        }
        if let Some(sector) = self.sector {
            company.sector = sector;
        }
        if let Some(direccion) = self.direccion {
            company.direccion = direccion;
        }
        if let Some(email) = self.email {
            company.email = email;
        }
        if let Some(descripcion) = self.descripcion {
            company.descripcion = descripcion;
        }
        if let Some(web) = self.web {
            company.web = web;
        }
        if let Some(certificado) = self.certificado {
            company.certificado = certificado;
        }
    }
}
