//! Read-side filtering over the site collection.
//!
//! Backends only offer whole-collection reads, so filters apply in memory
//! after the fetch. Fine at back-office scale.

use serde::Deserialize;

use crate::error::CoreError;
use crate::model::{AssignmentStatus, Site};
use crate::store::EntityStore;

/// Filter criteria for listing sites. All populated fields must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteFilter {
    /// Exact match on the constructing company.
    #[serde(default)]
    pub company: Option<String>,
    /// Exact match on the construction phase.
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub assignment: Option<AssignmentStatus>,
    /// Case-insensitive substring match over name and address.
    #[serde(default)]
    pub search: Option<String>,
}

impl SiteFilter {
    pub fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.phase.is_none()
            && self.assignment.is_none()
            && self.search.is_none()
    }

    fn matches(&self, site: &Site) -> bool {
        if let Some(company) = &self.company {
            if site.company != *company {
                return false;
            }
        }
        if let Some(phase) = &self.phase {
            if site.phase != *phase {
                return false;
            }
        }
        if let Some(assignment) = self.assignment {
            if site.assignment != assignment {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = site.name.to_lowercase().contains(&needle)
                || site.address.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// List sites matching `filter`, in the store's ID order.
pub async fn find_sites(
    store: &dyn EntityStore,
    filter: &SiteFilter,
) -> Result<Vec<Site>, CoreError> {
    let sites = store.list_sites().await.map_err(CoreError::StoreRead)?;
    if filter.is_empty() {
        return Ok(sites);
    }
    Ok(sites.into_iter().filter(|s| filter.matches(s)).collect())
}
