// ── Version oracle (optimistic locking) ──
//
// A site's `last_modified` token is the entire concurrency-control
// mechanism: last-writer-wins with detection, not prevention. The check runs
// once, immediately before a mutating sequence begins, and is never
// re-evaluated after partial writes.

use tracing::debug;

use crate::error::CoreError;
use crate::model::{SiteId, VersionToken};
use crate::store::EntityStore;

/// Reads a site's current version and compares it to a caller expectation.
pub struct VersionOracle<'a> {
    store: &'a dyn EntityStore,
}

impl<'a> VersionOracle<'a> {
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self { store }
    }

    /// The site's current token, or `None` when the site does not exist.
    pub async fn current_version(
        &self,
        site_id: &SiteId,
    ) -> Result<Option<VersionToken>, CoreError> {
        let site = self
            .store
            .get_site(site_id)
            .await
            .map_err(CoreError::StoreRead)?;
        Ok(site.map(|s| s.last_modified))
    }

    /// `true` when the expectation matches (or was not supplied).
    ///
    /// A `None` or blank expectation means the caller opted out of
    /// concurrency protection; the check then always passes.
    pub async fn check_version(
        &self,
        site_id: &SiteId,
        expected: Option<&VersionToken>,
    ) -> Result<bool, CoreError> {
        let Some(expected) = expected.filter(|t| !t.is_blank()) else {
            return Ok(true);
        };
        let current = self.current_version(site_id).await?;
        Ok(current.as_ref().map(|t| t.as_str().trim()) == Some(expected.as_str().trim()))
    }

    /// Fail with [`CoreError::VersionConflict`] when the expectation does not
    /// match, carrying both tokens so the caller can tell the user to reload.
    pub async fn require_version(
        &self,
        site_id: &SiteId,
        expected: Option<&VersionToken>,
    ) -> Result<(), CoreError> {
        if self.check_version(site_id, expected).await? {
            return Ok(());
        }
        let current = self.current_version(site_id).await?;
        debug!(site = %site_id, "optimistic lock mismatch");
        Err(CoreError::VersionConflict {
            id: site_id.clone(),
            current: current.map(|t| t.as_str().to_owned()).unwrap_or_default(),
            expected: expected
                .map(|t| t.as_str().to_owned())
                .unwrap_or_default(),
        })
    }
}
