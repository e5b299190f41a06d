use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{Incident, IncidentStatus, ValidationWarning};

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Validate a single incident record.
///
/// The store never produces inconsistent records, but a remote source may hand
/// us any shape; findings are warnings so display still works (no silent
/// correction, no rejection).
pub fn validate_incident(incident: &Incident) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if let Err(e) = OffsetDateTime::parse(&incident.incident_time, &Rfc3339) {
        warnings.push(
            ValidationWarning::new(
                "VALIDATION_TS_PARSE_FAILED",
                "Failed to parse incident_time",
            )
            .with_details(format!("value={}; err={e}", incident.incident_time)),
        );
    }

    // Past Active, the report must already be classified and described.
    if incident.status != IncidentStatus::Active {
        if incident.incident_type.is_none() {
            warnings.push(ValidationWarning::new(
                "VALIDATION_STATUS_FIELD_MISMATCH",
                format!(
                    "Incident is {} but incident_type is unset",
                    incident.status.as_str()
                ),
            ));
        }
        if is_blank(&incident.description) {
            warnings.push(ValidationWarning::new(
                "VALIDATION_STATUS_FIELD_MISMATCH",
                format!(
                    "Incident is {} but description is empty",
                    incident.status.as_str()
                ),
            ));
        }
    }

    if incident.status == IncidentStatus::Resolved && is_blank(&incident.resolution_notes) {
        warnings.push(ValidationWarning::new(
            "VALIDATION_STATUS_FIELD_MISMATCH",
            "Incident is Resolved but resolution_notes is empty",
        ));
    }

    for (field, urls) in [
        ("initial_media_urls", &incident.initial_media_urls),
        ("resolved_media_urls", &incident.resolved_media_urls),
    ] {
        if urls.iter().any(|url| url.trim().is_empty()) {
            warnings.push(
                ValidationWarning::new(
                    "VALIDATION_EMPTY_MEDIA_URL",
                    format!("{field} contains an empty entry"),
                )
                .with_details(format!("id={}", incident.id)),
            );
        }
    }

    warnings
}
