// ── In-memory entity store ──
//
// Backs tests and demos. Same observable contract as the remote stores:
// updates against unknown IDs fail with MissingRow, reads return None.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::model::{Certificate, CertificateId, Personnel, PersonnelId, Site, SiteId};

use super::{CertificatePatch, EntityStore, PersonnelPatch, SitePatch, StoreError};

/// Concurrent map-backed store.
#[derive(Default)]
pub struct MemoryStore {
    sites: DashMap<SiteId, Site>,
    personnel: DashMap<PersonnelId, Personnel>,
    certificates: DashMap<CertificateId, Certificate>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed helper: insert entities without going through `create_*`.
    pub fn seed_site(&self, site: Site) {
        self.sites.insert(site.id.clone(), site);
    }

    pub fn seed_personnel(&self, person: Personnel) {
        self.personnel.insert(person.id.clone(), person);
    }

    pub fn seed_certificate(&self, certificate: Certificate) {
        self.certificates.insert(certificate.id.clone(), certificate);
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get_site(&self, id: &SiteId) -> Result<Option<Site>, StoreError> {
        Ok(self.sites.get(id).map(|r| r.value().clone()))
    }

    async fn list_sites(&self) -> Result<Vec<Site>, StoreError> {
        let mut all: Vec<Site> = self.sites.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(all)
    }

    async fn create_site(&self, site: &Site) -> Result<(), StoreError> {
        self.sites.insert(site.id.clone(), site.clone());
        Ok(())
    }

    async fn update_site(&self, id: &SiteId, patch: &SitePatch) -> Result<(), StoreError> {
        let mut entry = self.sites.get_mut(id).ok_or_else(|| StoreError::MissingRow {
            entity: "site",
            id: id.to_string(),
        })?;
        patch.apply(entry.value_mut());
        Ok(())
    }

    async fn get_personnel(&self, id: &PersonnelId) -> Result<Option<Personnel>, StoreError> {
        Ok(self.personnel.get(id).map(|r| r.value().clone()))
    }

    async fn list_personnel(&self) -> Result<Vec<Personnel>, StoreError> {
        let mut all: Vec<Personnel> = self.personnel.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(all)
    }

    async fn create_personnel(&self, person: &Personnel) -> Result<(), StoreError> {
        self.personnel.insert(person.id.clone(), person.clone());
        Ok(())
    }

    async fn update_personnel(
        &self,
        id: &PersonnelId,
        patch: &PersonnelPatch,
    ) -> Result<(), StoreError> {
        let mut entry = self
            .personnel
            .get_mut(id)
            .ok_or_else(|| StoreError::MissingRow {
                entity: "personnel",
                id: id.to_string(),
            })?;
        patch.apply(entry.value_mut());
        Ok(())
    }

    async fn get_certificate(
        &self,
        id: &CertificateId,
    ) -> Result<Option<Certificate>, StoreError> {
        Ok(self.certificates.get(id).map(|r| r.value().clone()))
    }

    async fn list_certificates(&self) -> Result<Vec<Certificate>, StoreError> {
        let mut all: Vec<Certificate> = self
            .certificates
            .iter()
            .map(|r| r.value().clone())
            .collect();
        all.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(all)
    }

    async fn create_certificate(&self, certificate: &Certificate) -> Result<(), StoreError> {
        self.certificates
            .insert(certificate.id.clone(), certificate.clone());
        Ok(())
    }

    async fn update_certificate(
        &self,
        id: &CertificateId,
        patch: &CertificatePatch,
    ) -> Result<(), StoreError> {
        let mut entry = self
            .certificates
            .get_mut(id)
            .ok_or_else(|| StoreError::MissingRow {
                entity: "certificate",
                id: id.to_string(),
            })?;
        patch.apply(entry.value_mut());
        Ok(())
    }
}
