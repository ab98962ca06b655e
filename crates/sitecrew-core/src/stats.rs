//! Aggregate counts across all three entity collections.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::model::{AssignmentStatus, CertificateAvailability, EmploymentStatus};
use crate::store::EntityStore;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteStats {
    pub total: usize,
    pub assigned: usize,
    pub unassigned: usize,
    /// Site counts keyed by phase, sorted for stable output.
    pub by_phase: BTreeMap<String, usize>,
    pub by_company: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PersonnelStats {
    pub total: usize,
    pub by_status: BTreeMap<EmploymentStatus, usize>,
    pub by_role: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CertificateStats {
    pub total: usize,
    pub available: usize,
    pub in_use: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Statistics {
    pub sites: SiteStats,
    pub personnel: PersonnelStats,
    pub certificates: CertificateStats,
}

impl Statistics {
    /// Read all three collections and tally them.
    pub async fn collect(store: &dyn EntityStore) -> Result<Self, CoreError> {
        let sites = store.list_sites().await.map_err(CoreError::StoreRead)?;
        let personnel = store.list_personnel().await.map_err(CoreError::StoreRead)?;
        let certificates = store
            .list_certificates()
            .await
            .map_err(CoreError::StoreRead)?;

        let mut stats = Self::default();

        stats.sites.total = sites.len();
        for site in &sites {
            match site.assignment {
                AssignmentStatus::Assigned => stats.sites.assigned += 1,
                AssignmentStatus::Unassigned => stats.sites.unassigned += 1,
            }
            if !site.phase.is_empty() {
                *stats.sites.by_phase.entry(site.phase.clone()).or_default() += 1;
            }
            if !site.company.is_empty() {
                *stats
                    .sites
                    .by_company
                    .entry(site.company.clone())
                    .or_default() += 1;
            }
        }

        stats.personnel.total = personnel.len();
        for person in &personnel {
            *stats.personnel.by_status.entry(person.status).or_default() += 1;
            if !person.role.is_empty() {
                *stats
                    .personnel
                    .by_role
                    .entry(person.role.clone())
                    .or_default() += 1;
            }
        }

        stats.certificates.total = certificates.len();
        for certificate in &certificates {
            match certificate.availability {
                CertificateAvailability::Available => stats.certificates.available += 1,
                CertificateAvailability::InUse => stats.certificates.in_use += 1,
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Certificate, CertificateId, Personnel, PersonnelId, Site, SiteId, VersionToken};
    use crate::store::MemoryStore;

    fn site(id: &str, phase: &str, assignment: AssignmentStatus) -> Site {
        Site {
            id: SiteId::from(id),
            name: format!("Site {id}"),
            owner_name: String::new(),
            company: String::new(),
            address: String::new(),
            phase: phase.to_owned(),
            notes: String::new(),
            assignment,
            manager: None,
            certificate: None,
            manager_name: String::new(),
            manager_phone: String::new(),
            certificate_name: String::new(),
            certificate_owner: String::new(),
            certificate_owner_phone: String::new(),
            registered: String::new(),
            last_modified: VersionToken::from("V0"),
        }
    }

    #[tokio::test]
    async fn tallies_every_collection() {
        let store = MemoryStore::new();
        let mut flagship = site("SITE-1", "foundation", AssignmentStatus::Assigned);
        flagship.company = "general".into();
        store.seed_site(flagship);
        store.seed_site(site("SITE-2", "foundation", AssignmentStatus::Unassigned));
        store.seed_site(site("SITE-3", "framing", AssignmentStatus::Unassigned));
        store.seed_personnel(Personnel {
            id: PersonnelId::from("MGR-1"),
            name: "Ines Baptista".into(),
            role: "site manager".into(),
            affiliation: String::new(),
            phone: String::new(),
            status: EmploymentStatus::Deployed,
            active_site_count: 1,
            registered: String::new(),
        });
        store.seed_certificate(Certificate {
            id: CertificateId::from("CERT-1"),
            name: "Architect License".into(),
            owner_name: String::new(),
            owner_phone: String::new(),
            issuer: String::new(),
            availability: CertificateAvailability::InUse,
            current_site: Some(SiteId::from("SITE-1")),
            registered: String::new(),
        });

        let stats = Statistics::collect(&store).await.unwrap();
        assert_eq!(stats.sites.total, 3);
        assert_eq!(stats.sites.assigned, 1);
        assert_eq!(stats.sites.unassigned, 2);
        assert_eq!(stats.sites.by_phase["foundation"], 2);
        assert_eq!(stats.sites.by_phase["framing"], 1);
        assert_eq!(stats.sites.by_company["general"], 1);
        assert_eq!(stats.personnel.by_status[&EmploymentStatus::Deployed], 1);
        assert_eq!(stats.personnel.by_role["site manager"], 1);
        assert_eq!(stats.certificates.in_use, 1);
        assert_eq!(stats.certificates.available, 0);
    }

    #[tokio::test]
    async fn empty_store_yields_zeroes() {
        let store = MemoryStore::new();
        let stats = Statistics::collect(&store).await.unwrap();
        assert_eq!(stats.sites.total, 0);
        assert!(stats.sites.by_phase.is_empty());
        assert!(stats.personnel.by_status.is_empty());
    }
}
