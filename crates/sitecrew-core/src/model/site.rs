// ── Site domain type ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::ids::{CertificateId, PersonnelId, SiteId};
use super::version::VersionToken;

/// Whether a manager + certificate pair is currently linked to the site.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    Unassigned,
    Assigned,
}

/// A build site tracked by the back office.
///
/// Invariant: `assignment == Assigned` exactly when both `manager` and
/// `certificate` are set. The assignment coordinator is the only writer of
/// these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    #[serde(default)]
    pub owner_name: String,
    /// Company division running the site.
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub address: String,
    /// Construction phase (permit, pre-start, in progress, completed).
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub notes: String,

    pub assignment: AssignmentStatus,
    pub manager: Option<PersonnelId>,
    pub certificate: Option<CertificateId>,

    // Denormalized display fields, refreshed on every (un)assignment so list
    // views need no joins against the other sheets/tables.
    #[serde(default)]
    pub manager_name: String,
    #[serde(default)]
    pub manager_phone: String,
    #[serde(default)]
    pub certificate_name: String,
    #[serde(default)]
    pub certificate_owner: String,
    #[serde(default)]
    pub certificate_owner_phone: String,

    #[serde(default)]
    pub registered: String,
    /// Doubles as the optimistic-lock version token.
    pub last_modified: VersionToken,
}

impl Site {
    /// Site detail payloads expose the lock token under the name clients
    /// echo back (`version`).
    pub fn version(&self) -> &VersionToken {
        &self.last_modified
    }
}
