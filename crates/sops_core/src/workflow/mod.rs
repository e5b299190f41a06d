use crate::domain::{Incident, IncidentPatch, IncidentStatus};
use crate::error::AppError;

/// Legal status transitions. The lifecycle is monotonic: once an incident
/// leaves a state it can never return, and `Resolved` is terminal.
pub fn is_legal_transition(from: IncidentStatus, to: IncidentStatus) -> bool {
    use IncidentStatus::*;
    matches!(
        (from, to),
        (Active, Active)
            | (Active, UnderReview)
            | (UnderReview, UnderReview)
            | (UnderReview, Resolved)
            | (Resolved, Resolved)
    )
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn required(field: &str) -> AppError {
    AppError::new(
        "VALIDATION_FIELD_REQUIRED",
        format!("{field} must be non-empty"),
    )
    .with_field(field)
}

/// Check a patch against the current record before any mutation.
///
/// All rules are evaluated on the post-merge candidate, so a single patch may
/// supply a missing field and the transition that requires it together.
/// On `Err` the store must stay untouched and no subscriber is notified.
pub fn validate_patch(current: &Incident, patch: &IncidentPatch) -> Result<(), AppError> {
    // Resolved records are frozen. An empty patch is tolerated as a no-op.
    if current.status == IncidentStatus::Resolved && !patch.is_empty() {
        return Err(AppError::new(
            "INCIDENT_ALREADY_RESOLVED",
            "Resolved incidents are immutable",
        )
        .with_details(format!("id={}", current.id)));
    }

    let target = patch.status.unwrap_or(current.status);
    if !is_legal_transition(current.status, target) {
        return Err(AppError::new(
            "INVALID_STATUS_TRANSITION",
            format!(
                "Illegal transition {} -> {}",
                current.status.as_str(),
                target.as_str()
            ),
        )
        .with_field("status"));
    }

    // Provided text fields must carry content; there is no "set to empty".
    if patch.description.is_some() && is_blank(&patch.description) {
        return Err(required("description"));
    }
    if patch.resolution_notes.is_some() && is_blank(&patch.resolution_notes) {
        return Err(required("resolution_notes"));
    }
    if patch.attended_by_officer_id.is_some() && is_blank(&patch.attended_by_officer_id) {
        return Err(required("attended_by_officer_id"));
    }
    if patch
        .append_initial_media
        .iter()
        .any(|url| url.trim().is_empty())
    {
        return Err(AppError::new(
            "VALIDATION_EMPTY_MEDIA_URL",
            "Media URLs must be non-empty",
        )
        .with_field("append_initial_media"));
    }

    let entering_resolved =
        target == IncidentStatus::Resolved && current.status != IncidentStatus::Resolved;

    // Resolution fields are written exactly once, by the resolving patch.
    if !entering_resolved
        && (patch.resolution_notes.is_some() || patch.resolved_media_urls.is_some())
    {
        return Err(AppError::new(
            "FIELD_NOT_SETTABLE",
            "Resolution fields may only be set when resolving the incident",
        )
        .with_field("resolution_notes"));
    }

    // Leaving Active requires the report to be classified and described.
    if current.status == IncidentStatus::Active && target != IncidentStatus::Active {
        let candidate_type = patch.incident_type.or(current.incident_type);
        if candidate_type.is_none() {
            return Err(required("incident_type"));
        }
        if is_blank(&patch.description) && is_blank(&current.description) {
            return Err(required("description"));
        }
    }

    if entering_resolved && is_blank(&patch.resolution_notes) {
        return Err(required("resolution_notes"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IncidentType;

    fn under_review_incident() -> Incident {
        let mut inc = Incident::new("INC-1", "SITE-1", "G-1", "2026-02-01T08:00:00Z");
        inc.incident_type = Some(IncidentType::Theft);
        inc.description = Some("gate forced open".to_string());
        inc.status = IncidentStatus::UnderReview;
        inc
    }

    #[test]
    fn transition_table_rejects_regressions_and_skips() {
        use IncidentStatus::*;
        assert!(is_legal_transition(Active, UnderReview));
        assert!(is_legal_transition(UnderReview, Resolved));
        assert!(!is_legal_transition(Active, Resolved));
        assert!(!is_legal_transition(UnderReview, Active));
        assert!(!is_legal_transition(Resolved, Active));
        assert!(!is_legal_transition(Resolved, UnderReview));
    }

    #[test]
    fn leaving_active_requires_type_and_description() {
        let inc = Incident::new("INC-1", "SITE-1", "G-1", "2026-02-01T08:00:00Z");
        let patch = IncidentPatch {
            status: Some(IncidentStatus::UnderReview),
            ..Default::default()
        };
        let err = validate_patch(&inc, &patch).unwrap_err();
        assert_eq!(err.code, "VALIDATION_FIELD_REQUIRED");
        assert_eq!(err.field.as_deref(), Some("incident_type"));
    }

    #[test]
    fn same_patch_may_supply_fields_and_transition() {
        let inc = Incident::new("INC-1", "SITE-1", "G-1", "2026-02-01T08:00:00Z");
        let patch = IncidentPatch {
            incident_type: Some(IncidentType::Vandalism),
            description: Some("spray paint on north wall".to_string()),
            status: Some(IncidentStatus::UnderReview),
            ..Default::default()
        };
        assert!(validate_patch(&inc, &patch).is_ok());
    }

    #[test]
    fn resolution_fields_outside_resolving_patch_are_rejected() {
        let inc = under_review_incident();
        let patch = IncidentPatch {
            resolution_notes: Some("premature".to_string()),
            ..Default::default()
        };
        let err = validate_patch(&inc, &patch).unwrap_err();
        assert_eq!(err.code, "FIELD_NOT_SETTABLE");
    }

    #[test]
    fn resolving_requires_notes() {
        let inc = under_review_incident();
        let patch = IncidentPatch {
            status: Some(IncidentStatus::Resolved),
            ..Default::default()
        };
        let err = validate_patch(&inc, &patch).unwrap_err();
        assert_eq!(err.code, "VALIDATION_FIELD_REQUIRED");
        assert_eq!(err.field.as_deref(), Some("resolution_notes"));
    }

    #[test]
    fn resolved_incident_rejects_any_change() {
        let mut inc = under_review_incident();
        inc.status = IncidentStatus::Resolved;
        inc.resolution_notes = Some("patrol dispatched, area secured".to_string());

        let patch = IncidentPatch {
            description: Some("late edit".to_string()),
            ..Default::default()
        };
        let err = validate_patch(&inc, &patch).unwrap_err();
        assert_eq!(err.code, "INCIDENT_ALREADY_RESOLVED");

        // A patch with nothing in it is a tolerated no-op.
        assert!(validate_patch(&inc, &IncidentPatch::default()).is_ok());
    }
}
