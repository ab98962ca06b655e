// ── Personnel (field manager) domain type ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::ids::PersonnelId;

/// Employment status of a field manager.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmploymentStatus {
    #[default]
    Available,
    Deployed,
    OnLeave,
    Resigned,
}

/// A field manager in the personnel pool.
///
/// Invariant: `active_site_count > 0` implies `Deployed`. A count of 0
/// allows reverting to `Available`, but never forces a manager out of
/// `OnLeave` or `Resigned`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Personnel {
    pub id: PersonnelId,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default)]
    pub phone: String,
    pub status: EmploymentStatus,
    /// Number of sites this manager is currently assigned to.
    #[serde(default)]
    pub active_site_count: u32,
    #[serde(default)]
    pub registered: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names() {
        assert_eq!(
            serde_json::to_string(&EmploymentStatus::OnLeave).unwrap(),
            "\"on_leave\""
        );
        assert_eq!(
            "on_leave".parse::<EmploymentStatus>().unwrap(),
            EmploymentStatus::OnLeave
        );
        assert_eq!(EmploymentStatus::Deployed.to_string(), "deployed");
    }
}
