//! End-to-end coordinator scenarios over the in-memory store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use sitecrew_core::model::{
    AssignmentStatus, Certificate, CertificateAvailability, CertificateId, EmploymentStatus,
    Personnel, PersonnelId, Site, SiteId, VersionToken,
};
use sitecrew_core::store::{
    CertificatePatch, EntityStore, MemoryStore, PersonnelPatch, SitePatch, StoreError,
};
use sitecrew_core::{Coordinator, CoreError};

// ── Fixtures ─────────────────────────────────────────────────────────

fn site(id: &str, version: &str) -> Site {
    Site {
        id: SiteId::from(id),
        name: format!("Site {id}"),
        owner_name: "Goran Mestre".into(),
        company: "Acme Build".into(),
        address: "Harbor Road 12".into(),
        phase: "foundation".into(),
        notes: String::new(),
        assignment: AssignmentStatus::Unassigned,
        manager: None,
        certificate: None,
        manager_name: String::new(),
        manager_phone: String::new(),
        certificate_name: String::new(),
        certificate_owner: String::new(),
        certificate_owner_phone: String::new(),
        registered: "2026-01-05T09:00:00.000000Z".into(),
        last_modified: VersionToken::from(version),
    }
}

fn manager(id: &str, status: EmploymentStatus, count: u32) -> Personnel {
    Personnel {
        id: PersonnelId::from(id),
        name: "Ines Baptista".into(),
        role: "site manager".into(),
        affiliation: "Acme Build".into(),
        phone: "010-1234-5678".into(),
        status,
        active_site_count: count,
        registered: String::new(),
    }
}

fn certificate(id: &str, availability: CertificateAvailability) -> Certificate {
    Certificate {
        id: CertificateId::from(id),
        name: "Architect License".into(),
        owner_name: "Goran Mestre".into(),
        owner_phone: "010-8765-4321".into(),
        issuer: "National Board".into(),
        availability,
        current_site: None,
        registered: String::new(),
    }
}

fn seeded() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.seed_site(site("SITE-1", "2026-01-05T09:00:00.000000Z"));
    store.seed_personnel(manager("MGR-1", EmploymentStatus::Available, 0));
    store.seed_certificate(certificate("CERT-1", CertificateAvailability::Available));
    Arc::new(store)
}

// ── Happy path ───────────────────────────────────────────────────────

#[tokio::test]
async fn assign_links_all_three_entities_and_advances_the_version() {
    let store = seeded();
    let coordinator = Coordinator::new(store.clone());

    let expected = VersionToken::from("2026-01-05T09:00:00.000000Z");
    let receipt = coordinator
        .assign(
            &SiteId::from("SITE-1"),
            &PersonnelId::from("MGR-1"),
            &CertificateId::from("CERT-1"),
            Some(&expected),
        )
        .await
        .unwrap();

    assert_eq!(receipt.manager_name, "Ines Baptista");
    assert_eq!(receipt.certificate_name, "Architect License");
    assert!(receipt.version.as_str() > "2026-01-05T09:00:00.000000Z");

    let site = store.get_site(&SiteId::from("SITE-1")).await.unwrap().unwrap();
    assert_eq!(site.assignment, AssignmentStatus::Assigned);
    assert_eq!(site.manager, Some(PersonnelId::from("MGR-1")));
    assert_eq!(site.certificate, Some(CertificateId::from("CERT-1")));
    assert_eq!(site.manager_name, "Ines Baptista");
    assert_eq!(site.certificate_owner, "Goran Mestre");
    assert_eq!(site.last_modified, receipt.version);

    let mgr = store
        .get_personnel(&PersonnelId::from("MGR-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mgr.status, EmploymentStatus::Deployed);
    assert_eq!(mgr.active_site_count, 1);

    let cert = store
        .get_certificate(&CertificateId::from("CERT-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cert.availability, CertificateAvailability::InUse);
    assert_eq!(cert.current_site, Some(SiteId::from("SITE-1")));
}

#[tokio::test]
async fn assign_without_expected_version_skips_the_lock_check() {
    let store = seeded();
    let coordinator = Coordinator::new(store.clone());
    coordinator
        .assign(
            &SiteId::from("SITE-1"),
            &PersonnelId::from("MGR-1"),
            &CertificateId::from("CERT-1"),
            None,
        )
        .await
        .unwrap();
}

// ── Conflict detection ───────────────────────────────────────────────

#[tokio::test]
async fn stale_version_rejects_with_zero_writes() {
    let store = seeded();
    let coordinator = Coordinator::new(store.clone());

    let stale = VersionToken::from("2025-12-31T00:00:00.000000Z");
    let err = coordinator
        .assign(
            &SiteId::from("SITE-1"),
            &PersonnelId::from("MGR-1"),
            &CertificateId::from("CERT-1"),
            Some(&stale),
        )
        .await
        .unwrap_err();

    match err {
        CoreError::VersionConflict { current, expected, .. } => {
            assert_eq!(current, "2026-01-05T09:00:00.000000Z");
            assert_eq!(expected, "2025-12-31T00:00:00.000000Z");
        }
        other => panic!("expected VersionConflict, got {other:?}"),
    }

    // Nothing moved.
    let site = store.get_site(&SiteId::from("SITE-1")).await.unwrap().unwrap();
    assert_eq!(site.assignment, AssignmentStatus::Unassigned);
    assert_eq!(site.last_modified.as_str(), "2026-01-05T09:00:00.000000Z");
    let mgr = store
        .get_personnel(&PersonnelId::from("MGR-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mgr.active_site_count, 0);
    assert_eq!(mgr.status, EmploymentStatus::Available);
}

#[tokio::test]
async fn repeated_rejection_never_double_counts() {
    let store = seeded();
    let coordinator = Coordinator::new(store.clone());
    let stale = VersionToken::from("stale");

    for _ in 0..3 {
        let err = coordinator
            .assign(
                &SiteId::from("SITE-1"),
                &PersonnelId::from("MGR-1"),
                &CertificateId::from("CERT-1"),
                Some(&stale),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::VersionConflict { .. }));
    }

    let mgr = store
        .get_personnel(&PersonnelId::from("MGR-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mgr.active_site_count, 0);
}

#[tokio::test]
async fn unassign_checks_the_version_before_the_assignment_state() {
    // The lock check runs before the NOT_ASSIGNED gate, so a stale token on
    // an unassigned site reports a conflict, not NotAssigned.
    let store = seeded();
    let coordinator = Coordinator::new(store);
    let stale = VersionToken::from("stale");
    let err = coordinator
        .unassign(&SiteId::from("SITE-1"), Some(&stale))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::VersionConflict { .. }));
}

// ── Precondition gates ───────────────────────────────────────────────

#[tokio::test]
async fn missing_entities_are_reported_in_precondition_order() {
    let store = seeded();
    let coordinator = Coordinator::new(store);

    let err = coordinator
        .assign(
            &SiteId::from("SITE-9"),
            &PersonnelId::from("MGR-9"),
            &CertificateId::from("CERT-9"),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::SiteNotFound { .. }));

    let coordinator = Coordinator::new(seeded());
    let err = coordinator
        .assign(
            &SiteId::from("SITE-1"),
            &PersonnelId::from("MGR-9"),
            &CertificateId::from("CERT-1"),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ManagerNotFound { .. }));
}

#[tokio::test]
async fn in_use_certificate_is_rejected_before_validation() {
    let store = seeded();
    store.seed_certificate(certificate("CERT-2", CertificateAvailability::InUse));
    let coordinator = Coordinator::new(store);

    let err = coordinator
        .assign(
            &SiteId::from("SITE-1"),
            &PersonnelId::from("MGR-1"),
            &CertificateId::from("CERT-2"),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::CertificateUnavailable { .. }));
}

#[tokio::test]
async fn resigned_manager_is_rejected_by_validation() {
    let store = seeded();
    store.seed_personnel(manager("MGR-2", EmploymentStatus::Resigned, 0));
    let coordinator = Coordinator::new(store.clone());

    let err = coordinator
        .assign(
            &SiteId::from("SITE-1"),
            &PersonnelId::from("MGR-2"),
            &CertificateId::from("CERT-1"),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));

    let cert = store
        .get_certificate(&CertificateId::from("CERT-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cert.availability, CertificateAvailability::Available);
}

// ── Unassign / round trip ────────────────────────────────────────────

#[tokio::test]
async fn assign_then_unassign_restores_the_collaborators() {
    let store = seeded();
    let coordinator = Coordinator::new(store.clone());

    let receipt = coordinator
        .assign(
            &SiteId::from("SITE-1"),
            &PersonnelId::from("MGR-1"),
            &CertificateId::from("CERT-1"),
            None,
        )
        .await
        .unwrap();

    let undone = coordinator
        .unassign(&SiteId::from("SITE-1"), Some(&receipt.version))
        .await
        .unwrap();
    assert!(undone.version.as_str() > receipt.version.as_str());

    let site = store.get_site(&SiteId::from("SITE-1")).await.unwrap().unwrap();
    assert_eq!(site.assignment, AssignmentStatus::Unassigned);
    assert_eq!(site.manager, None);
    assert_eq!(site.certificate, None);
    assert_eq!(site.manager_name, "");
    assert_eq!(site.certificate_owner_phone, "");

    let mgr = store
        .get_personnel(&PersonnelId::from("MGR-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mgr.status, EmploymentStatus::Available);
    assert_eq!(mgr.active_site_count, 0);

    let cert = store
        .get_certificate(&CertificateId::from("CERT-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cert.availability, CertificateAvailability::Available);
    assert_eq!(cert.current_site, None);
}

#[tokio::test]
async fn unassigning_an_unassigned_site_is_rejected() {
    let store = seeded();
    let coordinator = Coordinator::new(store);
    let err = coordinator
        .unassign(&SiteId::from("SITE-1"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotAssigned { .. }));
}

#[tokio::test]
async fn manager_reverts_to_available_at_count_one() {
    // The revert threshold is `new_count <= 1`: a manager dropping from two
    // sites to one is flipped back to available even though one assignment
    // remains. Deliberately preserved legacy behavior.
    let store = seeded();
    store.seed_personnel(manager("MGR-1", EmploymentStatus::Deployed, 2));
    let mut linked = site("SITE-1", "V1");
    linked.assignment = AssignmentStatus::Assigned;
    linked.manager = Some(PersonnelId::from("MGR-1"));
    linked.certificate = Some(CertificateId::from("CERT-1"));
    store.seed_site(linked);
    let coordinator = Coordinator::new(store.clone());

    coordinator
        .unassign(&SiteId::from("SITE-1"), None)
        .await
        .unwrap();

    let mgr = store
        .get_personnel(&PersonnelId::from("MGR-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mgr.active_site_count, 1);
    assert_eq!(mgr.status, EmploymentStatus::Available);
}

#[tokio::test]
async fn resigned_manager_is_not_forced_back_to_available() {
    let store = seeded();
    store.seed_personnel(manager("MGR-1", EmploymentStatus::Resigned, 1));
    let mut linked = site("SITE-1", "V1");
    linked.assignment = AssignmentStatus::Assigned;
    linked.manager = Some(PersonnelId::from("MGR-1"));
    store.seed_site(linked);
    let coordinator = Coordinator::new(store.clone());

    coordinator
        .unassign(&SiteId::from("SITE-1"), None)
        .await
        .unwrap();

    let mgr = store
        .get_personnel(&PersonnelId::from("MGR-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mgr.status, EmploymentStatus::Resigned);
    assert_eq!(mgr.active_site_count, 0);
}

#[tokio::test]
async fn unassign_tolerates_a_dangling_manager_reference() {
    let store = seeded();
    let mut linked = site("SITE-1", "V1");
    linked.assignment = AssignmentStatus::Assigned;
    linked.manager = Some(PersonnelId::from("MGR-GONE"));
    linked.certificate = Some(CertificateId::from("CERT-1"));
    store.seed_site(linked);
    let coordinator = Coordinator::new(store.clone());

    coordinator
        .unassign(&SiteId::from("SITE-1"), None)
        .await
        .unwrap();

    let site = store.get_site(&SiteId::from("SITE-1")).await.unwrap().unwrap();
    assert_eq!(site.assignment, AssignmentStatus::Unassigned);
    let cert = store
        .get_certificate(&CertificateId::from("CERT-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cert.availability, CertificateAvailability::Available);
}

// ── Partial failure (no compensation) ────────────────────────────────

/// Delegates to a [`MemoryStore`] but fails a chosen write once armed.
struct FailingStore {
    inner: Arc<MemoryStore>,
    fail_site_update: AtomicBool,
    fail_personnel_update: AtomicBool,
}

impl FailingStore {
    fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            fail_site_update: AtomicBool::new(false),
            fail_personnel_update: AtomicBool::new(false),
        }
    }

    fn injected(entity: &'static str) -> StoreError {
        StoreError::MissingRow {
            entity,
            id: "injected".into(),
        }
    }
}

#[async_trait]
impl EntityStore for FailingStore {
    async fn get_site(&self, id: &SiteId) -> Result<Option<Site>, StoreError> {
        self.inner.get_site(id).await
    }
    async fn list_sites(&self) -> Result<Vec<Site>, StoreError> {
        self.inner.list_sites().await
    }
    async fn create_site(&self, site: &Site) -> Result<(), StoreError> {
        self.inner.create_site(site).await
    }
    async fn update_site(&self, id: &SiteId, patch: &SitePatch) -> Result<(), StoreError> {
        if self.fail_site_update.load(Ordering::SeqCst) {
            return Err(Self::injected("site"));
        }
        self.inner.update_site(id, patch).await
    }

    async fn get_personnel(&self, id: &PersonnelId) -> Result<Option<Personnel>, StoreError> {
        self.inner.get_personnel(id).await
    }
    async fn list_personnel(&self) -> Result<Vec<Personnel>, StoreError> {
        self.inner.list_personnel().await
    }
    async fn create_personnel(&self, person: &Personnel) -> Result<(), StoreError> {
        self.inner.create_personnel(person).await
    }
    async fn update_personnel(
        &self,
        id: &PersonnelId,
        patch: &PersonnelPatch,
    ) -> Result<(), StoreError> {
        if self.fail_personnel_update.load(Ordering::SeqCst) {
            return Err(Self::injected("personnel"));
        }
        self.inner.update_personnel(id, patch).await
    }

    async fn get_certificate(
        &self,
        id: &CertificateId,
    ) -> Result<Option<Certificate>, StoreError> {
        self.inner.get_certificate(id).await
    }
    async fn list_certificates(&self) -> Result<Vec<Certificate>, StoreError> {
        self.inner.list_certificates().await
    }
    async fn create_certificate(&self, certificate: &Certificate) -> Result<(), StoreError> {
        self.inner.create_certificate(certificate).await
    }
    async fn update_certificate(
        &self,
        id: &CertificateId,
        patch: &CertificatePatch,
    ) -> Result<(), StoreError> {
        self.inner.update_certificate(id, patch).await
    }
}

#[tokio::test]
async fn site_write_failure_leaves_collaborators_untouched() {
    let inner = seeded();
    let failing = FailingStore::new(inner.clone());
    failing.fail_site_update.store(true, Ordering::SeqCst);
    let coordinator = Coordinator::new(Arc::new(failing));

    let err = coordinator
        .assign(
            &SiteId::from("SITE-1"),
            &PersonnelId::from("MGR-1"),
            &CertificateId::from("CERT-1"),
            None,
        )
        .await
        .unwrap_err();
    match err {
        CoreError::StoreWrite { step, .. } => assert_eq!(step, "site"),
        other => panic!("expected StoreWrite, got {other:?}"),
    }

    // The site write is first in the sequence, so nothing else ran.
    let mgr = inner
        .get_personnel(&PersonnelId::from("MGR-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mgr.active_site_count, 0);
    let cert = inner
        .get_certificate(&CertificateId::from("CERT-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cert.availability, CertificateAvailability::Available);
}

#[tokio::test]
async fn personnel_write_failure_leaves_the_site_half_updated() {
    // No compensation: the site write stands even though the personnel write
    // failed. The error names the failed step so an operator can repair.
    let inner = seeded();
    let failing = FailingStore::new(inner.clone());
    failing.fail_personnel_update.store(true, Ordering::SeqCst);
    let coordinator = Coordinator::new(Arc::new(failing));

    let err = coordinator
        .assign(
            &SiteId::from("SITE-1"),
            &PersonnelId::from("MGR-1"),
            &CertificateId::from("CERT-1"),
            None,
        )
        .await
        .unwrap_err();
    match err {
        CoreError::StoreWrite { step, .. } => assert_eq!(step, "personnel"),
        other => panic!("expected StoreWrite, got {other:?}"),
    }

    let site = inner.get_site(&SiteId::from("SITE-1")).await.unwrap().unwrap();
    assert_eq!(site.assignment, AssignmentStatus::Assigned);
    assert_eq!(site.manager, Some(PersonnelId::from("MGR-1")));

    let mgr = inner
        .get_personnel(&PersonnelId::from("MGR-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mgr.active_site_count, 0);
    let cert = inner
        .get_certificate(&CertificateId::from("CERT-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cert.availability, CertificateAvailability::Available);
}
