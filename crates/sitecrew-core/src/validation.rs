// ── Business-rule gate for assignment ──
//
// Pure predicate over entity snapshots. Collects every violated rule into
// one combined message instead of short-circuiting, so a single round trip
// shows the operator every problem at once.

use crate::error::CoreError;
use crate::model::{
    AssignmentStatus, Certificate, CertificateAvailability, EmploymentStatus, Personnel, Site,
};

/// Check whether `manager` + `certificate` may be assigned to `site`.
///
/// All applicable violations are accumulated and joined by `"; "` in the
/// resulting [`CoreError::Validation`] message.
pub fn validate_assignment(
    site: &Site,
    manager: &Personnel,
    certificate: &Certificate,
) -> Result<(), CoreError> {
    let mut errors: Vec<String> = Vec::new();

    if site.assignment == AssignmentStatus::Assigned {
        errors.push("a manager is already assigned to this site".to_owned());
    }

    match manager.status {
        EmploymentStatus::Resigned => {
            errors.push("a resigned manager cannot be assigned".to_owned());
        }
        EmploymentStatus::OnLeave => {
            errors.push("a manager on leave cannot be assigned".to_owned());
        }
        EmploymentStatus::Available | EmploymentStatus::Deployed => {}
    }

    if certificate.availability != CertificateAvailability::Available {
        errors.push(format!(
            "the certificate is currently '{}'",
            certificate.availability
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation {
            message: errors.join("; "),
        })
    }
}
