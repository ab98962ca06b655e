//! The entity store seam.
//!
//! The coordinator treats persistence as a narrow per-entity CRUD interface
//! and is agnostic to which backend sits behind it. Three implementations:
//!
//! - [`MemoryStore`] — in-process maps, for tests and demos
//! - [`SheetsStore`] — Google Sheets spreadsheet (one tab per entity)
//! - [`PostgrestStore`] — PostgREST/Supabase (one table per entity)
//!
//! None of the backends offer a multi-row transaction; every mutation is a
//! single-entity write and the coordinator sequences them.

pub mod memory;
pub mod postgrest;
pub mod sheets;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    AssignmentStatus, Certificate, CertificateAvailability, CertificateId, EmploymentStatus,
    Personnel, PersonnelId, Site, SiteId, VersionToken,
};

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;
pub use sheets::SheetsStore;

// ── Errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    /// An update addressed a row that disappeared between read and write.
    #[error("{entity} {id} does not exist in the backing store")]
    MissingRow { entity: &'static str, id: String },

    /// A stored row could not be mapped onto the canonical model.
    #[error("malformed {entity} record {id}: {message}")]
    Malformed {
        entity: &'static str,
        id: String,
        message: String,
    },

    #[error(transparent)]
    Backend(#[from] sitecrew_api::Error),
}

// ── Patches ──────────────────────────────────────────────────────────
//
// Partial updates: `None` leaves a field untouched, `Some` writes it. For
// optional references the inner Option distinguishes "set" from "clear".

#[derive(Debug, Clone, Default)]
pub struct SitePatch {
    pub name: Option<String>,
    pub phase: Option<String>,
    pub notes: Option<String>,
    pub assignment: Option<AssignmentStatus>,
    pub manager: Option<Option<PersonnelId>>,
    pub manager_name: Option<String>,
    pub manager_phone: Option<String>,
    pub certificate: Option<Option<CertificateId>>,
    pub certificate_name: Option<String>,
    pub certificate_owner: Option<String>,
    pub certificate_owner_phone: Option<String>,
    pub last_modified: Option<VersionToken>,
}

impl SitePatch {
    pub fn apply(&self, site: &mut Site) {
        if let Some(v) = &self.name {
            site.name.clone_from(v);
        }
        if let Some(v) = &self.phase {
            site.phase.clone_from(v);
        }
        if let Some(v) = &self.notes {
            site.notes.clone_from(v);
        }
        if let Some(v) = self.assignment {
            site.assignment = v;
        }
        if let Some(v) = &self.manager {
            site.manager.clone_from(v);
        }
        if let Some(v) = &self.manager_name {
            site.manager_name.clone_from(v);
        }
        if let Some(v) = &self.manager_phone {
            site.manager_phone.clone_from(v);
        }
        if let Some(v) = &self.certificate {
            site.certificate.clone_from(v);
        }
        if let Some(v) = &self.certificate_name {
            site.certificate_name.clone_from(v);
        }
        if let Some(v) = &self.certificate_owner {
            site.certificate_owner.clone_from(v);
        }
        if let Some(v) = &self.certificate_owner_phone {
            site.certificate_owner_phone.clone_from(v);
        }
        if let Some(v) = &self.last_modified {
            site.last_modified.clone_from(v);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PersonnelPatch {
    pub status: Option<EmploymentStatus>,
    pub active_site_count: Option<u32>,
}

impl PersonnelPatch {
    pub fn apply(&self, person: &mut Personnel) {
        if let Some(v) = self.status {
            person.status = v;
        }
        if let Some(v) = self.active_site_count {
            person.active_site_count = v;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CertificatePatch {
    pub availability: Option<CertificateAvailability>,
    pub current_site: Option<Option<SiteId>>,
}

impl CertificatePatch {
    pub fn apply(&self, certificate: &mut Certificate) {
        if let Some(v) = self.availability {
            certificate.availability = v;
        }
        if let Some(v) = &self.current_site {
            certificate.current_site.clone_from(v);
        }
    }
}

// ── Trait ────────────────────────────────────────────────────────────

/// Per-entity CRUD against a backing store.
///
/// `get_*` return `Ok(None)` for unknown IDs — absence is a domain outcome,
/// not a store failure. Every call is one blocking-style network round trip;
/// there is no caching layer in front.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_site(&self, id: &SiteId) -> Result<Option<Site>, StoreError>;
    async fn list_sites(&self) -> Result<Vec<Site>, StoreError>;
    async fn create_site(&self, site: &Site) -> Result<(), StoreError>;
    async fn update_site(&self, id: &SiteId, patch: &SitePatch) -> Result<(), StoreError>;

    async fn get_personnel(&self, id: &PersonnelId) -> Result<Option<Personnel>, StoreError>;
    async fn list_personnel(&self) -> Result<Vec<Personnel>, StoreError>;
    async fn create_personnel(&self, person: &Personnel) -> Result<(), StoreError>;
    async fn update_personnel(
        &self,
        id: &PersonnelId,
        patch: &PersonnelPatch,
    ) -> Result<(), StoreError>;

    async fn get_certificate(&self, id: &CertificateId)
    -> Result<Option<Certificate>, StoreError>;
    async fn list_certificates(&self) -> Result<Vec<Certificate>, StoreError>;
    async fn create_certificate(&self, certificate: &Certificate) -> Result<(), StoreError>;
    async fn update_certificate(
        &self,
        id: &CertificateId,
        patch: &CertificatePatch,
    ) -> Result<(), StoreError>;
}
