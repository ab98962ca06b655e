// ── Assignment coordinator ──
//
// Orchestrates the three-way link between a site, a manager, and a
// certificate as one logical operation over a store that offers no
// multi-row transaction. All preconditions run first (zero writes on any
// failure); the effect then executes as a fixed sequence of single-entity
// writes. There is NO compensation: if a later step fails, earlier writes
// stand and the store is left partially updated. Callers see that as
// `CoreError::StoreWrite` naming the failed step.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::model::{
    AssignmentStatus, CertificateAvailability, CertificateId, EmploymentStatus, PersonnelId,
    SiteId, VersionToken,
};
use crate::store::{CertificatePatch, EntityStore, PersonnelPatch, SitePatch};
use crate::sync::VersionOracle;
use crate::validation::validate_assignment;

/// Snapshot returned by a successful assign, for display.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentReceipt {
    pub site_id: SiteId,
    pub site_name: String,
    pub manager_name: String,
    pub certificate_name: String,
    /// The site's new lock token; echo it on the next mutating call.
    pub version: VersionToken,
}

/// Result of a successful unassign.
#[derive(Debug, Clone, Serialize)]
pub struct UnassignmentReceipt {
    pub site_id: SiteId,
    pub site_name: String,
    pub version: VersionToken,
}

/// Stateless orchestration over an injected entity store.
///
/// Holds no locks and keeps no cache; the version token on the site record
/// is the entire concurrency-control mechanism.
pub struct Coordinator {
    store: Arc<dyn EntityStore>,
}

impl Coordinator {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// The underlying store, for read-side consumers (listings, stats).
    pub fn store(&self) -> &Arc<dyn EntityStore> {
        &self.store
    }

    /// Link `manager` + `certificate` to `site`.
    ///
    /// Precondition order is fixed; the first failure aborts with no writes
    /// performed. The version check runs last, once, immediately before the
    /// mutating sequence.
    pub async fn assign(
        &self,
        site_id: &SiteId,
        manager_id: &PersonnelId,
        certificate_id: &CertificateId,
        expected_version: Option<&VersionToken>,
    ) -> Result<AssignmentReceipt, CoreError> {
        // 1-3. Existence checks.
        let site = self
            .store
            .get_site(site_id)
            .await
            .map_err(CoreError::StoreRead)?
            .ok_or_else(|| CoreError::SiteNotFound { id: site_id.clone() })?;
        let manager = self
            .store
            .get_personnel(manager_id)
            .await
            .map_err(CoreError::StoreRead)?
            .ok_or_else(|| CoreError::ManagerNotFound {
                id: manager_id.clone(),
            })?;
        let certificate = self
            .store
            .get_certificate(certificate_id)
            .await
            .map_err(CoreError::StoreRead)?
            .ok_or_else(|| CoreError::CertificateNotFound {
                id: certificate_id.clone(),
            })?;

        // 4. Certificate must be free.
        if certificate.availability != CertificateAvailability::Available {
            return Err(CoreError::CertificateUnavailable {
                id: certificate_id.clone(),
            });
        }

        // 5. Business-rule gate (accumulates all violations).
        validate_assignment(&site, &manager, &certificate)?;

        // 6. Optimistic-lock check — once, not re-checked after writes.
        VersionOracle::new(self.store.as_ref())
            .require_version(site_id, expected_version)
            .await?;

        let version = VersionToken::next_after(&site.last_modified);

        // a. Site: link both references, flip status, advance the token.
        let site_patch = SitePatch {
            manager: Some(Some(manager_id.clone())),
            manager_name: Some(manager.name.clone()),
            manager_phone: Some(manager.phone.clone()),
            certificate: Some(Some(certificate_id.clone())),
            certificate_name: Some(certificate.name.clone()),
            certificate_owner: Some(certificate.owner_name.clone()),
            certificate_owner_phone: Some(certificate.owner_phone.clone()),
            assignment: Some(AssignmentStatus::Assigned),
            last_modified: Some(version.clone()),
            ..SitePatch::default()
        };
        self.store
            .update_site(site_id, &site_patch)
            .await
            .map_err(|e| CoreError::StoreWrite {
                step: "site",
                source: e,
            })?;

        // b. Personnel: bump the active count, deploy if not already.
        let personnel_patch = PersonnelPatch {
            active_site_count: Some(manager.active_site_count + 1),
            status: (manager.status != EmploymentStatus::Deployed)
                .then_some(EmploymentStatus::Deployed),
        };
        self.store
            .update_personnel(manager_id, &personnel_patch)
            .await
            .map_err(|e| CoreError::StoreWrite {
                step: "personnel",
                source: e,
            })?;

        // c. Certificate: pin to the site.
        let certificate_patch = CertificatePatch {
            availability: Some(CertificateAvailability::InUse),
            current_site: Some(Some(site_id.clone())),
        };
        self.store
            .update_certificate(certificate_id, &certificate_patch)
            .await
            .map_err(|e| CoreError::StoreWrite {
                step: "certificate",
                source: e,
            })?;

        info!(
            site = %site_id,
            manager = %manager_id,
            certificate = %certificate_id,
            version = %version,
            "assigned manager and certificate to site"
        );

        Ok(AssignmentReceipt {
            site_id: site_id.clone(),
            site_name: site.name,
            manager_name: manager.name,
            certificate_name: certificate.name,
            version,
        })
    }

    /// Unlink the site's manager and certificate.
    pub async fn unassign(
        &self,
        site_id: &SiteId,
        expected_version: Option<&VersionToken>,
    ) -> Result<UnassignmentReceipt, CoreError> {
        let site = self
            .store
            .get_site(site_id)
            .await
            .map_err(CoreError::StoreRead)?
            .ok_or_else(|| CoreError::SiteNotFound { id: site_id.clone() })?;

        VersionOracle::new(self.store.as_ref())
            .require_version(site_id, expected_version)
            .await?;

        if site.assignment != AssignmentStatus::Assigned {
            return Err(CoreError::NotAssigned { id: site_id.clone() });
        }

        // a. Capture references before clearing them.
        let manager_ref = site.manager.clone();
        let certificate_ref = site.certificate.clone();
        let version = VersionToken::next_after(&site.last_modified);

        // b. Site: clear both references, flip status, advance the token.
        let site_patch = SitePatch {
            manager: Some(None),
            manager_name: Some(String::new()),
            manager_phone: Some(String::new()),
            certificate: Some(None),
            certificate_name: Some(String::new()),
            certificate_owner: Some(String::new()),
            certificate_owner_phone: Some(String::new()),
            assignment: Some(AssignmentStatus::Unassigned),
            last_modified: Some(version.clone()),
            ..SitePatch::default()
        };
        self.store
            .update_site(site_id, &site_patch)
            .await
            .map_err(|e| CoreError::StoreWrite {
                step: "site",
                source: e,
            })?;

        // c. Personnel: decrement, floored at 0. The revert threshold is
        // `new_count <= 1`, not `== 0` — carried over verbatim from the
        // legacy spreadsheet adapter pending a decision on the intended
        // semantics (see DESIGN.md). A manager on leave or resigned is
        // never forced back to available.
        if let Some(manager_id) = manager_ref {
            match self
                .store
                .get_personnel(&manager_id)
                .await
                .map_err(|e| CoreError::StoreWrite {
                    step: "personnel",
                    source: e,
                })? {
                Some(manager) => {
                    let new_count = manager.active_site_count.saturating_sub(1);
                    let personnel_patch = PersonnelPatch {
                        active_site_count: Some(new_count),
                        status: (new_count <= 1
                            && manager.status == EmploymentStatus::Deployed)
                            .then_some(EmploymentStatus::Available),
                    };
                    self.store
                        .update_personnel(&manager_id, &personnel_patch)
                        .await
                        .map_err(|e| CoreError::StoreWrite {
                            step: "personnel",
                            source: e,
                        })?;
                }
                None => {
                    // Dangling reference: the site pointed at a manager that
                    // no longer exists. Clearing the site already fixed the
                    // inconsistency, so just log it.
                    warn!(site = %site_id, manager = %manager_id, "unassign: manager record missing");
                }
            }
        }

        // d. Certificate: release.
        if let Some(certificate_id) = certificate_ref {
            let certificate_patch = CertificatePatch {
                availability: Some(CertificateAvailability::Available),
                current_site: Some(None),
            };
            self.store
                .update_certificate(&certificate_id, &certificate_patch)
                .await
                .map_err(|e| CoreError::StoreWrite {
                    step: "certificate",
                    source: e,
                })?;
        }

        info!(site = %site_id, version = %version, "unassigned manager from site");

        Ok(UnassignmentReceipt {
            site_id: site_id.clone(),
            site_name: site.name,
            version,
        })
    }
}
