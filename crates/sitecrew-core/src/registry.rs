// ── Record registration ──
//
// Creates new sites, personnel, and certificates. IDs are minted here (a
// caller-supplied ID is honored after a duplicate check); the registration
// timestamp doubles as the site's initial version token.

use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use tracing::info;

use crate::error::CoreError;
use crate::ident::{generate_certificate_id, generate_personnel_id, generate_site_id};
use crate::model::{
    AssignmentStatus, Certificate, CertificateAvailability, CertificateId, EmploymentStatus,
    Personnel, PersonnelId, Site, SiteId, VersionToken,
};
use crate::store::EntityStore;

/// Input for registering a build site.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSite {
    /// Optional caller-chosen ID; generated when absent.
    #[serde(default)]
    pub id: Option<SiteId>,
    pub name: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPersonnel {
    #[serde(default)]
    pub id: Option<PersonnelId>,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCertificate {
    #[serde(default)]
    pub id: Option<CertificateId>,
    pub name: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub owner_phone: String,
    #[serde(default)]
    pub issuer: String,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Register a site. Returns the stored record, including its minted ID and
/// initial version token.
pub async fn register_site(store: &dyn EntityStore, new: NewSite) -> Result<Site, CoreError> {
    if new.name.trim().is_empty() {
        return Err(CoreError::MissingParams);
    }

    let id = match new.id {
        Some(id) => {
            if store
                .get_site(&id)
                .await
                .map_err(CoreError::StoreRead)?
                .is_some()
            {
                return Err(CoreError::DuplicateId {
                    id: id.into_string(),
                });
            }
            id
        }
        None => loop {
            // Generated IDs carry a random suffix; regenerate until the
            // candidate is free.
            let id = generate_site_id();
            if store
                .get_site(&id)
                .await
                .map_err(CoreError::StoreRead)?
                .is_none()
            {
                break id;
            }
        },
    };

    let registered = now();
    let site = Site {
        id,
        name: new.name,
        owner_name: new.owner_name,
        company: new.company,
        address: new.address,
        phase: new.phase,
        notes: new.notes,
        assignment: AssignmentStatus::Unassigned,
        manager: None,
        certificate: None,
        manager_name: String::new(),
        manager_phone: String::new(),
        certificate_name: String::new(),
        certificate_owner: String::new(),
        certificate_owner_phone: String::new(),
        registered: registered.clone(),
        last_modified: VersionToken::from(registered),
    };
    store
        .create_site(&site)
        .await
        .map_err(|e| CoreError::StoreWrite {
            step: "site",
            source: e,
        })?;
    info!(site = %site.id, name = %site.name, "registered site");
    Ok(site)
}

pub async fn register_personnel(
    store: &dyn EntityStore,
    new: NewPersonnel,
) -> Result<Personnel, CoreError> {
    if new.name.trim().is_empty() {
        return Err(CoreError::MissingParams);
    }

    let id = match new.id {
        Some(id) => {
            if store
                .get_personnel(&id)
                .await
                .map_err(CoreError::StoreRead)?
                .is_some()
            {
                return Err(CoreError::DuplicateId {
                    id: id.into_string(),
                });
            }
            id
        }
        None => generate_personnel_id(),
    };

    let person = Personnel {
        id,
        name: new.name,
        role: new.role,
        affiliation: new.affiliation,
        phone: new.phone,
        status: EmploymentStatus::Available,
        active_site_count: 0,
        registered: now(),
    };
    store
        .create_personnel(&person)
        .await
        .map_err(|e| CoreError::StoreWrite {
            step: "personnel",
            source: e,
        })?;
    info!(manager = %person.id, name = %person.name, "registered manager");
    Ok(person)
}

pub async fn register_certificate(
    store: &dyn EntityStore,
    new: NewCertificate,
) -> Result<Certificate, CoreError> {
    if new.name.trim().is_empty() {
        return Err(CoreError::MissingParams);
    }

    let id = match new.id {
        Some(id) => {
            if store
                .get_certificate(&id)
                .await
                .map_err(CoreError::StoreRead)?
                .is_some()
            {
                return Err(CoreError::DuplicateId {
                    id: id.into_string(),
                });
            }
            id
        }
        None => generate_certificate_id(),
    };

    let certificate = Certificate {
        id,
        name: new.name,
        owner_name: new.owner_name,
        owner_phone: new.owner_phone,
        issuer: new.issuer,
        availability: CertificateAvailability::Available,
        current_site: None,
        registered: now(),
    };
    store
        .create_certificate(&certificate)
        .await
        .map_err(|e| CoreError::StoreWrite {
            step: "certificate",
            source: e,
        })?;
    info!(certificate = %certificate.id, name = %certificate.name, "registered certificate");
    Ok(certificate)
}
