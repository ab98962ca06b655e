//! Domain layer for the sitecrew back-office coordinator.
//!
//! This crate owns the business logic and domain model for the workspace:
//!
//! - **[`Coordinator`]** — Orchestrates the three-way assignment between a
//!   site, a field manager, and a professional certificate as one logical
//!   operation over a store with no multi-row transactions. Writes execute
//!   as a fixed sequence with no compensation on partial failure.
//!
//! - **[`VersionOracle`]** — Optimistic concurrency control. A site's
//!   `last_modified` token is the entire locking mechanism: clients echo the
//!   token they last saw, and a mismatch rejects the write with a 409-style
//!   conflict carrying both tokens.
//!
//! - **[`EntityStore`]** — Backend seam. Adapters exist for Google Sheets
//!   ([`store::SheetsStore`]), PostgREST ([`store::PostgrestStore`]), and an
//!   in-memory map for tests ([`store::MemoryStore`]).
//!
//! - **Domain model** ([`model`]) — Canonical types (`Site`, `Personnel`,
//!   `Certificate`) with typed IDs and closed status enums.
//!
//! - **Envelope** ([`envelope`]) — The uniform wire response contract and
//!   the domain-error to status-code mapping shared by every frontend.

pub mod coordinator;
pub mod envelope;
pub mod error;
pub mod ident;
pub mod model;
pub mod query;
pub mod registry;
pub mod stats;
pub mod store;
pub mod sync;
pub mod validation;

// ── Primary re-exports ──────────────────────────────────────────────
pub use coordinator::{AssignmentReceipt, Coordinator, UnassignmentReceipt};
pub use envelope::{ApiResponse, ErrorBody, resolve_version, status_and_code};
pub use error::CoreError;
pub use query::{SiteFilter, find_sites};
pub use registry::{
    NewCertificate, NewPersonnel, NewSite, register_certificate, register_personnel,
    register_site,
};
pub use stats::Statistics;
pub use store::{EntityStore, MemoryStore, PostgrestStore, SheetsStore, StoreError};
pub use sync::VersionOracle;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AssignmentStatus,
    Certificate,
    CertificateAvailability,
    CertificateId,
    EmploymentStatus,
    Personnel,
    PersonnelId,
    Site,
    SiteId,
    VersionToken,
};
