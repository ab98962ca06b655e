// ── PostgREST store adapter ──
//
// One table per entity type; rows serialize exactly as the canonical domain
// types (snake_case columns, enum values as their wire names, cleared
// references as SQL NULL). Patches become PATCH bodies carrying only the
// touched columns.

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use sitecrew_api::PostgrestClient;

use crate::model::{Certificate, CertificateId, Personnel, PersonnelId, Site, SiteId};

use super::{CertificatePatch, EntityStore, PersonnelPatch, SitePatch, StoreError};

pub const TABLE_SITES: &str = "sites";
pub const TABLE_PERSONNEL: &str = "personnel";
pub const TABLE_CERTIFICATES: &str = "certificates";

/// Entity store backed by a PostgREST endpoint (Supabase).
pub struct PostgrestStore {
    client: PostgrestClient,
}

impl PostgrestStore {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }
}

// ── Patch bodies ─────────────────────────────────────────────────────

fn opt_ref(value: &Option<impl ToString>) -> Value {
    value
        .as_ref()
        .map_or(Value::Null, |id| Value::String(id.to_string()))
}

fn site_patch_body(patch: &SitePatch) -> Map<String, Value> {
    let mut body = Map::new();
    if let Some(v) = &patch.name {
        body.insert("name".into(), json!(v));
    }
    if let Some(v) = &patch.phase {
        body.insert("phase".into(), json!(v));
    }
    if let Some(v) = &patch.notes {
        body.insert("notes".into(), json!(v));
    }
    if let Some(v) = patch.assignment {
        body.insert("assignment".into(), json!(v));
    }
    if let Some(v) = &patch.manager {
        body.insert("manager".into(), opt_ref(v));
    }
    if let Some(v) = &patch.manager_name {
        body.insert("manager_name".into(), json!(v));
    }
    if let Some(v) = &patch.manager_phone {
        body.insert("manager_phone".into(), json!(v));
    }
    if let Some(v) = &patch.certificate {
        body.insert("certificate".into(), opt_ref(v));
    }
    if let Some(v) = &patch.certificate_name {
        body.insert("certificate_name".into(), json!(v));
    }
    if let Some(v) = &patch.certificate_owner {
        body.insert("certificate_owner".into(), json!(v));
    }
    if let Some(v) = &patch.certificate_owner_phone {
        body.insert("certificate_owner_phone".into(), json!(v));
    }
    if let Some(v) = &patch.last_modified {
        body.insert("last_modified".into(), json!(v));
    }
    body
}

fn personnel_patch_body(patch: &PersonnelPatch) -> Map<String, Value> {
    let mut body = Map::new();
    if let Some(v) = patch.status {
        body.insert("status".into(), json!(v));
    }
    if let Some(v) = patch.active_site_count {
        body.insert("active_site_count".into(), json!(v));
    }
    body
}

fn certificate_patch_body(patch: &CertificatePatch) -> Map<String, Value> {
    let mut body = Map::new();
    if let Some(v) = patch.availability {
        body.insert("availability".into(), json!(v));
    }
    if let Some(v) = &patch.current_site {
        body.insert("current_site".into(), opt_ref(v));
    }
    body
}

// ── EntityStore impl ─────────────────────────────────────────────────

#[async_trait]
impl EntityStore for PostgrestStore {
    async fn get_site(&self, id: &SiteId) -> Result<Option<Site>, StoreError> {
        let rows: Vec<Site> = self
            .client
            .select_eq(TABLE_SITES, "id", id.as_str())
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_sites(&self) -> Result<Vec<Site>, StoreError> {
        Ok(self.client.select_all(TABLE_SITES, Some("id")).await?)
    }

    async fn create_site(&self, site: &Site) -> Result<(), StoreError> {
        Ok(self.client.insert(TABLE_SITES, site).await?)
    }

    async fn update_site(&self, id: &SiteId, patch: &SitePatch) -> Result<(), StoreError> {
        // PATCH on a missing key is a silent no-op in PostgREST; check first
        // so the contract matches the other backends.
        if self.get_site(id).await?.is_none() {
            return Err(StoreError::MissingRow {
                entity: "site",
                id: id.to_string(),
            });
        }
        let body = site_patch_body(patch);
        if body.is_empty() {
            return Ok(());
        }
        Ok(self
            .client
            .update_eq(TABLE_SITES, "id", id.as_str(), &body)
            .await?)
    }

    async fn get_personnel(&self, id: &PersonnelId) -> Result<Option<Personnel>, StoreError> {
        let rows: Vec<Personnel> = self
            .client
            .select_eq(TABLE_PERSONNEL, "id", id.as_str())
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_personnel(&self) -> Result<Vec<Personnel>, StoreError> {
        Ok(self.client.select_all(TABLE_PERSONNEL, Some("id")).await?)
    }

    async fn create_personnel(&self, person: &Personnel) -> Result<(), StoreError> {
        Ok(self.client.insert(TABLE_PERSONNEL, person).await?)
    }

    async fn update_personnel(
        &self,
        id: &PersonnelId,
        patch: &PersonnelPatch,
    ) -> Result<(), StoreError> {
        if self.get_personnel(id).await?.is_none() {
            return Err(StoreError::MissingRow {
                entity: "personnel",
                id: id.to_string(),
            });
        }
        let body = personnel_patch_body(patch);
        if body.is_empty() {
            return Ok(());
        }
        Ok(self
            .client
            .update_eq(TABLE_PERSONNEL, "id", id.as_str(), &body)
            .await?)
    }

    async fn get_certificate(
        &self,
        id: &CertificateId,
    ) -> Result<Option<Certificate>, StoreError> {
        let rows: Vec<Certificate> = self
            .client
            .select_eq(TABLE_CERTIFICATES, "id", id.as_str())
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_certificates(&self) -> Result<Vec<Certificate>, StoreError> {
        Ok(self.client.select_all(TABLE_CERTIFICATES, Some("id")).await?)
    }

    async fn create_certificate(&self, certificate: &Certificate) -> Result<(), StoreError> {
        Ok(self.client.insert(TABLE_CERTIFICATES, certificate).await?)
    }

    async fn update_certificate(
        &self,
        id: &CertificateId,
        patch: &CertificatePatch,
    ) -> Result<(), StoreError> {
        if self.get_certificate(id).await?.is_none() {
            return Err(StoreError::MissingRow {
                entity: "certificate",
                id: id.to_string(),
            });
        }
        let body = certificate_patch_body(patch);
        if body.is_empty() {
            return Ok(());
        }
        Ok(self
            .client
            .update_eq(TABLE_CERTIFICATES, "id", id.as_str(), &body)
            .await?)
    }
}
