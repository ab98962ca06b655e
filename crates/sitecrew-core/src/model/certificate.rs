// ── Certificate domain type ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::ids::{CertificateId, SiteId};

/// Whether a certificate is free for assignment or pinned to a site.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CertificateAvailability {
    #[default]
    Available,
    InUse,
}

/// A professional certificate in the pool.
///
/// Invariant: `availability == InUse` exactly when `current_site` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub id: CertificateId,
    pub name: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub owner_phone: String,
    #[serde(default)]
    pub issuer: String,
    pub availability: CertificateAvailability,
    /// The site this certificate is deployed at, when `InUse`.
    pub current_site: Option<SiteId>,
    #[serde(default)]
    pub registered: String,
}
