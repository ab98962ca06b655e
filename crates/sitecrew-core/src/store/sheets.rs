// ── Spreadsheet store adapter ──
//
// One sheet tab per entity type, header in row 1, one record per row, every
// cell a formatted string. Lookups scan the ID column; updates write the
// individual cells named by a patch through one values:batchUpdate call.
//
// Sheet layouts (fixed):
//   sites         A id  B name  C owner_name  D company  E address  F phase
//                 G notes  H manager  I manager_name  J manager_phone
//                 K certificate  L certificate_name  M certificate_owner
//                 N certificate_owner_phone  O assignment  P registered
//                 Q last_modified
//   personnel     A id  B name  C role  D affiliation  E phone  F status
//                 G active_site_count  H registered
//   certificates  A id  B name  C owner_name  D owner_phone  E issuer
//                 F availability  G current_site  H registered

use std::str::FromStr;

use async_trait::async_trait;
use sitecrew_api::{SheetsClient, ValueUpdate};

use crate::model::{
    Certificate, CertificateId, Personnel, PersonnelId, Site, SiteId, VersionToken,
};

use super::{CertificatePatch, EntityStore, PersonnelPatch, SitePatch, StoreError};

pub const SHEET_SITES: &str = "sites";
pub const SHEET_PERSONNEL: &str = "personnel";
pub const SHEET_CERTIFICATES: &str = "certificates";

/// Entity store backed by a Google spreadsheet.
pub struct SheetsStore {
    client: SheetsClient,
}

impl SheetsStore {
    pub fn new(client: SheetsClient) -> Self {
        Self { client }
    }

    /// Find the 1-based sheet row holding `id` (data starts at row 2).
    async fn find_row(&self, sheet: &str, id: &str) -> Result<Option<u32>, StoreError> {
        let column = self.client.get_values(&format!("{sheet}!A2:A")).await?;
        for (offset, row) in column.iter().enumerate() {
            if row.first().map(String::as_str) == Some(id) {
                #[allow(clippy::cast_possible_truncation)]
                return Ok(Some(offset as u32 + 2));
            }
        }
        Ok(None)
    }
}

// ── Cell helpers ─────────────────────────────────────────────────────

/// Trailing empty cells are trimmed from API responses; treat a short row
/// as padded with blanks.
fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", |s| s.trim())
}

fn opt_cell(row: &[String], index: usize) -> Option<String> {
    let value = cell(row, index);
    (!value.is_empty()).then(|| value.to_owned())
}

fn parse_status<T: FromStr + Default>(
    raw: &str,
    entity: &'static str,
    id: &str,
) -> Result<T, StoreError> {
    if raw.is_empty() {
        return Ok(T::default());
    }
    raw.parse().map_err(|_| StoreError::Malformed {
        entity,
        id: id.to_owned(),
        message: format!("unrecognized status value {raw:?}"),
    })
}

fn column(letter: char, row: u32, sheet: &str) -> String {
    format!("{sheet}!{letter}{row}")
}

fn cleared(id: &Option<impl ToString>) -> String {
    id.as_ref().map(ToString::to_string).unwrap_or_default()
}

// ── Row mappings ─────────────────────────────────────────────────────

fn site_from_row(row: &[String]) -> Result<Site, StoreError> {
    let id = cell(row, 0);
    Ok(Site {
        id: SiteId::from(id),
        name: cell(row, 1).to_owned(),
        owner_name: cell(row, 2).to_owned(),
        company: cell(row, 3).to_owned(),
        address: cell(row, 4).to_owned(),
        phase: cell(row, 5).to_owned(),
        notes: cell(row, 6).to_owned(),
        manager: opt_cell(row, 7).map(PersonnelId::from),
        manager_name: cell(row, 8).to_owned(),
        manager_phone: cell(row, 9).to_owned(),
        certificate: opt_cell(row, 10).map(CertificateId::from),
        certificate_name: cell(row, 11).to_owned(),
        certificate_owner: cell(row, 12).to_owned(),
        certificate_owner_phone: cell(row, 13).to_owned(),
        assignment: parse_status(cell(row, 14), "site", id)?,
        registered: cell(row, 15).to_owned(),
        last_modified: VersionToken::from(cell(row, 16)),
    })
}

fn site_to_row(site: &Site) -> Vec<String> {
    vec![
        site.id.to_string(),
        site.name.clone(),
        site.owner_name.clone(),
        site.company.clone(),
        site.address.clone(),
        site.phase.clone(),
        site.notes.clone(),
        cleared(&site.manager),
        site.manager_name.clone(),
        site.manager_phone.clone(),
        cleared(&site.certificate),
        site.certificate_name.clone(),
        site.certificate_owner.clone(),
        site.certificate_owner_phone.clone(),
        site.assignment.to_string(),
        site.registered.clone(),
        site.last_modified.to_string(),
    ]
}

fn site_patch_updates(patch: &SitePatch, row: u32) -> Vec<ValueUpdate> {
    let mut updates = Vec::new();
    let mut push = |letter: char, value: String| {
        updates.push(ValueUpdate::cell(column(letter, row, SHEET_SITES), value));
    };
    if let Some(v) = &patch.name {
        push('B', v.clone());
    }
    if let Some(v) = &patch.phase {
        push('F', v.clone());
    }
    if let Some(v) = &patch.notes {
        push('G', v.clone());
    }
    if let Some(v) = &patch.manager {
        push('H', cleared(v));
    }
    if let Some(v) = &patch.manager_name {
        push('I', v.clone());
    }
    if let Some(v) = &patch.manager_phone {
        push('J', v.clone());
    }
    if let Some(v) = &patch.certificate {
        push('K', cleared(v));
    }
    if let Some(v) = &patch.certificate_name {
        push('L', v.clone());
    }
    if let Some(v) = &patch.certificate_owner {
        push('M', v.clone());
    }
    if let Some(v) = &patch.certificate_owner_phone {
        push('N', v.clone());
    }
    if let Some(v) = patch.assignment {
        push('O', v.to_string());
    }
    if let Some(v) = &patch.last_modified {
        push('Q', v.to_string());
    }
    updates
}

fn personnel_from_row(row: &[String]) -> Result<Personnel, StoreError> {
    let id = cell(row, 0);
    Ok(Personnel {
        id: PersonnelId::from(id),
        name: cell(row, 1).to_owned(),
        role: cell(row, 2).to_owned(),
        affiliation: cell(row, 3).to_owned(),
        phone: cell(row, 4).to_owned(),
        status: parse_status(cell(row, 5), "personnel", id)?,
        active_site_count: cell(row, 6).parse().unwrap_or(0),
        registered: cell(row, 7).to_owned(),
    })
}

fn personnel_to_row(person: &Personnel) -> Vec<String> {
    vec![
        person.id.to_string(),
        person.name.clone(),
        person.role.clone(),
        person.affiliation.clone(),
        person.phone.clone(),
        person.status.to_string(),
        person.active_site_count.to_string(),
        person.registered.clone(),
    ]
}

fn certificate_from_row(row: &[String]) -> Result<Certificate, StoreError> {
    let id = cell(row, 0);
    Ok(Certificate {
        id: CertificateId::from(id),
        name: cell(row, 1).to_owned(),
        owner_name: cell(row, 2).to_owned(),
        owner_phone: cell(row, 3).to_owned(),
        issuer: cell(row, 4).to_owned(),
        availability: parse_status(cell(row, 5), "certificate", id)?,
        current_site: opt_cell(row, 6).map(SiteId::from),
        registered: cell(row, 7).to_owned(),
    })
}

fn certificate_to_row(certificate: &Certificate) -> Vec<String> {
    vec![
        certificate.id.to_string(),
        certificate.name.clone(),
        certificate.owner_name.clone(),
        certificate.owner_phone.clone(),
        certificate.issuer.clone(),
        certificate.availability.to_string(),
        cleared(&certificate.current_site),
        certificate.registered.clone(),
    ]
}

// ── EntityStore impl ─────────────────────────────────────────────────

#[async_trait]
impl EntityStore for SheetsStore {
    async fn get_site(&self, id: &SiteId) -> Result<Option<Site>, StoreError> {
        let rows = self.client.get_values(&format!("{SHEET_SITES}!A2:Q")).await?;
        rows.iter()
            .find(|row| cell(row, 0) == id.as_str())
            .map(|row| site_from_row(row))
            .transpose()
    }

    async fn list_sites(&self) -> Result<Vec<Site>, StoreError> {
        let rows = self.client.get_values(&format!("{SHEET_SITES}!A2:Q")).await?;
        rows.iter()
            .filter(|row| !cell(row, 0).is_empty())
            .map(|row| site_from_row(row))
            .collect()
    }

    async fn create_site(&self, site: &Site) -> Result<(), StoreError> {
        self.client
            .append_row(&format!("{SHEET_SITES}!A1"), &site_to_row(site))
            .await?;
        Ok(())
    }

    async fn update_site(&self, id: &SiteId, patch: &SitePatch) -> Result<(), StoreError> {
        let row = self
            .find_row(SHEET_SITES, id.as_str())
            .await?
            .ok_or_else(|| StoreError::MissingRow {
                entity: "site",
                id: id.to_string(),
            })?;
        self.client
            .batch_update(&site_patch_updates(patch, row))
            .await?;
        Ok(())
    }

    async fn get_personnel(&self, id: &PersonnelId) -> Result<Option<Personnel>, StoreError> {
        let rows = self
            .client
            .get_values(&format!("{SHEET_PERSONNEL}!A2:H"))
            .await?;
        rows.iter()
            .find(|row| cell(row, 0) == id.as_str())
            .map(|row| personnel_from_row(row))
            .transpose()
    }

    async fn list_personnel(&self) -> Result<Vec<Personnel>, StoreError> {
        let rows = self
            .client
            .get_values(&format!("{SHEET_PERSONNEL}!A2:H"))
            .await?;
        rows.iter()
            .filter(|row| !cell(row, 0).is_empty())
            .map(|row| personnel_from_row(row))
            .collect()
    }

    async fn create_personnel(&self, person: &Personnel) -> Result<(), StoreError> {
        self.client
            .append_row(&format!("{SHEET_PERSONNEL}!A1"), &personnel_to_row(person))
            .await?;
        Ok(())
    }

    async fn update_personnel(
        &self,
        id: &PersonnelId,
        patch: &PersonnelPatch,
    ) -> Result<(), StoreError> {
        let row = self
            .find_row(SHEET_PERSONNEL, id.as_str())
            .await?
            .ok_or_else(|| StoreError::MissingRow {
                entity: "personnel",
                id: id.to_string(),
            })?;
        let mut updates = Vec::new();
        if let Some(v) = patch.status {
            updates.push(ValueUpdate::cell(
                column('F', row, SHEET_PERSONNEL),
                v.to_string(),
            ));
        }
        if let Some(v) = patch.active_site_count {
            updates.push(ValueUpdate::cell(
                column('G', row, SHEET_PERSONNEL),
                v.to_string(),
            ));
        }
        self.client.batch_update(&updates).await?;
        Ok(())
    }

    async fn get_certificate(
        &self,
        id: &CertificateId,
    ) -> Result<Option<Certificate>, StoreError> {
        let rows = self
            .client
            .get_values(&format!("{SHEET_CERTIFICATES}!A2:H"))
            .await?;
        rows.iter()
            .find(|row| cell(row, 0) == id.as_str())
            .map(|row| certificate_from_row(row))
            .transpose()
    }

    async fn list_certificates(&self) -> Result<Vec<Certificate>, StoreError> {
        let rows = self
            .client
            .get_values(&format!("{SHEET_CERTIFICATES}!A2:H"))
            .await?;
        rows.iter()
            .filter(|row| !cell(row, 0).is_empty())
            .map(|row| certificate_from_row(row))
            .collect()
    }

    async fn create_certificate(&self, certificate: &Certificate) -> Result<(), StoreError> {
        self.client
            .append_row(
                &format!("{SHEET_CERTIFICATES}!A1"),
                &certificate_to_row(certificate),
            )
            .await?;
        Ok(())
    }

    async fn update_certificate(
        &self,
        id: &CertificateId,
        patch: &CertificatePatch,
    ) -> Result<(), StoreError> {
        let row = self
            .find_row(SHEET_CERTIFICATES, id.as_str())
            .await?
            .ok_or_else(|| StoreError::MissingRow {
                entity: "certificate",
                id: id.to_string(),
            })?;
        let mut updates = Vec::new();
        if let Some(v) = patch.availability {
            updates.push(ValueUpdate::cell(
                column('F', row, SHEET_CERTIFICATES),
                v.to_string(),
            ));
        }
        if let Some(v) = &patch.current_site {
            updates.push(ValueUpdate::cell(
                column('G', row, SHEET_CERTIFICATES),
                cleared(v),
            ));
        }
        self.client.batch_update(&updates).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{AssignmentStatus, CertificateAvailability};

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_owned()).collect()
    }

    #[test]
    fn site_row_round_trip() {
        let cells = row(&[
            "SITE-1",
            "Riverside Offices",
            "K. Holt",
            "general",
            "12 Quay St",
            "in_progress",
            "",
            "MGR-1",
            "Ines Baptista",
            "010-1111",
            "CERT-1",
            "Architect License",
            "D. Mora",
            "010-2222",
            "assigned",
            "2024-05-01",
            "2024-06-01T10:00:00.000000Z",
        ]);
        let site = site_from_row(&cells).unwrap();
        assert_eq!(site.assignment, AssignmentStatus::Assigned);
        assert_eq!(site.manager, Some(PersonnelId::from("MGR-1")));
        assert_eq!(site_to_row(&site), cells);
    }

    #[test]
    fn short_row_pads_with_blanks() {
        let site = site_from_row(&row(&["SITE-2", "Harbor Flats"])).unwrap();
        assert_eq!(site.assignment, AssignmentStatus::Unassigned);
        assert!(site.manager.is_none());
        assert!(site.last_modified.is_blank());
    }

    #[test]
    fn bad_status_cell_is_malformed() {
        let err = site_from_row(&row(&[
            "SITE-3", "", "", "", "", "", "", "", "", "", "", "", "", "", "definitely-not-a-status",
        ]))
        .unwrap_err();
        assert!(matches!(err, StoreError::Malformed { entity: "site", .. }));
    }

    #[test]
    fn unassign_patch_clears_reference_cells() {
        let patch = SitePatch {
            manager: Some(None),
            certificate: Some(None),
            assignment: Some(AssignmentStatus::Unassigned),
            last_modified: Some(VersionToken::from("v2")),
            ..SitePatch::default()
        };
        let updates = site_patch_updates(&patch, 4);
        let ranges: Vec<&str> = updates.iter().map(|u| u.range.as_str()).collect();
        assert_eq!(ranges, vec!["sites!H4", "sites!K4", "sites!O4", "sites!Q4"]);
        assert_eq!(updates[0].values, vec![vec![String::new()]]);
    }

    #[test]
    fn personnel_count_defaults_to_zero_on_junk() {
        let person =
            personnel_from_row(&row(&["MGR-1", "Ines", "", "", "", "available", "junk"])).unwrap();
        assert_eq!(person.active_site_count, 0);
    }

    #[test]
    fn certificate_row_round_trip() {
        let cells = row(&[
            "CERT-1",
            "Architect License",
            "D. Mora",
            "010-2222",
            "City Board",
            "in_use",
            "SITE-1",
            "2024-01-15",
        ]);
        let certificate = certificate_from_row(&cells).unwrap();
        assert_eq!(
            certificate.availability,
            CertificateAvailability::InUse
        );
        assert_eq!(certificate.current_site, Some(SiteId::from("SITE-1")));
        assert_eq!(certificate_to_row(&certificate), cells);
    }
}
