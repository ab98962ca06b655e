// ── Core error taxonomy ──
//
// Tagged variants instead of exception control flow: the coordinator returns
// these, and the transport boundary (envelope module / CLI) translates them
// to wire codes. Nothing here is retried internally.

use thiserror::Error;

use crate::model::{CertificateId, PersonnelId, SiteId};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("site {id} was not found")]
    SiteNotFound { id: SiteId },

    #[error("personnel {id} was not found")]
    ManagerNotFound { id: PersonnelId },

    #[error("certificate {id} was not found")]
    CertificateNotFound { id: CertificateId },

    #[error("certificate {id} is not available for assignment")]
    CertificateUnavailable { id: CertificateId },

    #[error("site {id} has no manager assigned")]
    NotAssigned { id: SiteId },

    /// Business-rule gate failure. The message accumulates every violated
    /// rule, joined by "; ", so one round-trip shows all problems.
    #[error("{message}")]
    Validation { message: String },

    #[error("manager_id and certificate_id are required")]
    MissingParams,

    /// Optimistic-lock mismatch. Recoverable by reload-and-retry on the
    /// client; never auto-retried here.
    #[error(
        "site {id} was modified by another user (current version: {current}, \
         requested version: {expected}); reload the latest data and retry"
    )]
    VersionConflict {
        id: SiteId,
        current: String,
        expected: String,
    },

    #[error("an entity with id {id} already exists")]
    DuplicateId { id: String },

    #[error("store read failed: {0}")]
    StoreRead(#[source] StoreError),

    /// A write inside the multi-step effect sequence failed. Earlier steps
    /// are NOT rolled back; the store may be left partially updated.
    #[error("store write failed during {step} update: {source}")]
    StoreWrite {
        step: &'static str,
        #[source]
        source: StoreError,
    },
}
