//! Canonical domain types shared by every store backend.
//!
//! The original records were free-form spreadsheet rows; here each entity is
//! a typed struct, and status columns are closed enums. Backend adapters in
//! [`crate::store`] map their wire shapes onto these.

pub mod certificate;
pub mod ids;
pub mod personnel;
pub mod site;
pub mod version;

pub use certificate::{Certificate, CertificateAvailability};
pub use ids::{CertificateId, PersonnelId, SiteId};
pub use personnel::{EmploymentStatus, Personnel};
pub use site::{AssignmentStatus, Site};
pub use version::VersionToken;
