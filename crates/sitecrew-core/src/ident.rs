//! Identifier generation for newly registered records.

use chrono::Utc;
use uuid::Uuid;

use crate::model::{CertificateId, PersonnelId, SiteId};

fn stamp(prefix: &str) -> String {
    // `SITE-20260827143005-9F3A1C`: sortable timestamp plus a short random
    // suffix so two registrations in the same second stay distinct.
    let ts = Utc::now().format("%Y%m%d%H%M%S");
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect::<String>()
        .to_uppercase();
    format!("{prefix}-{ts}-{suffix}")
}

pub fn generate_site_id() -> SiteId {
    SiteId::from(stamp("SITE"))
}

pub fn generate_personnel_id() -> PersonnelId {
    PersonnelId::from(stamp("MGR"))
}

pub fn generate_certificate_id() -> CertificateId {
    CertificateId::from(stamp("CERT"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn site_id_shape() {
        let id = generate_site_id();
        let parts: Vec<&str> = id.as_str().split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "SITE");
        assert_eq!(parts[1].len(), 14);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 6);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn consecutive_ids_differ() {
        assert_ne!(generate_site_id(), generate_site_id());
        assert_ne!(
            generate_certificate_id().as_str(),
            generate_personnel_id().as_str()
        );
    }
}
