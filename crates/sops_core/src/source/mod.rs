use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{fingerprint, Incident, IncidentStatus, IncidentType, ValidationWarning};
use crate::error::AppError;
use crate::validate::validate_incident;

/// One page of the backend's paginated incident listing. The core does not
/// fetch; the UI layer hands pages in and we only parse and flatten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentPage {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Incident>,
}

pub fn parse_incident_page(json: &str) -> Result<IncidentPage, AppError> {
    serde_json::from_str(json).map_err(|e| {
        AppError::new("SOURCE_PAGE_PARSE_FAILED", "Failed to parse incident page")
            .with_details(e.to_string())
    })
}

/// Summary of a multi-page load, mirroring the shape the UI shows after a sync.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped_duplicates: usize,
    pub warnings: Vec<ValidationWarning>,
}

/// Flatten pages into one collection suitable for `IncidentStore::new`.
///
/// Records missing a fingerprint get one computed; duplicate fingerprints are
/// skipped (first occurrence wins) with a warning. Every kept record runs
/// through `validate_incident`; warnings accumulate, records are never
/// rejected here.
pub fn collect_pages(pages: &[IncidentPage]) -> (Vec<Incident>, LoadSummary) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    let mut warnings = Vec::new();
    let mut skipped_duplicates = 0usize;

    for page in pages {
        for record in &page.results {
            let mut incident = record.clone();
            if incident.fingerprint.is_empty() {
                incident.fingerprint = fingerprint(
                    &incident.site_id,
                    &incident.raised_by_guard_id,
                    &incident.incident_time,
                );
            }
            if !seen.insert(incident.fingerprint.clone()) {
                skipped_duplicates += 1;
                warnings.push(
                    ValidationWarning::new(
                        "SOURCE_DUPLICATE_FINGERPRINT",
                        "Duplicate incident skipped (same site, guard, and time)",
                    )
                    .with_details(format!("id={}", incident.id)),
                );
                continue;
            }
            warnings.extend(validate_incident(&incident));
            out.push(incident);
        }
    }

    let loaded = out.len();
    (
        out,
        LoadSummary {
            loaded,
            skipped_duplicates,
            warnings,
        },
    )
}

/// Deterministic mock dataset, large enough to make dashboards and scorecards
/// meaningful. Timestamps are RFC3339 so validation stays clean; every record
/// is internally consistent with its status.
pub fn seed_demo_incidents() -> Vec<Incident> {
    let sites = ["SITE-001", "SITE-002", "SITE-003", "SITE-004"];
    let guards = ["G-01", "G-02", "G-03", "G-04", "G-05"];
    let officers = ["PO-1", "PO-2", "PO-3"];
    let types = [
        IncidentType::Sos,
        IncidentType::SuspiciousActivity,
        IncidentType::Theft,
        IncidentType::Vandalism,
        IncidentType::Trespassing,
        IncidentType::SafetyHazard,
        IncidentType::Other,
    ];

    let mut out = Vec::new();
    for i in 1..=30usize {
        let day = 1 + (i - 1) / 2; // two incidents per day
        let hour = ((i - 1) % 2) * 8; // 0 or 8
        let time = format!("2026-02-{day:02}T{hour:02}:30:00Z");

        let mut inc = Incident::new(
            format!("INC-{i:03}"),
            sites[(i - 1) % sites.len()],
            guards[(i - 1) % guards.len()],
            time,
        );
        inc.initial_media_urls = vec![format!("https://media.example/inc-{i:03}/initial-1.jpg")];

        // Cycle Active / Under Review / Resolved.
        match i % 3 {
            0 => {
                inc.incident_type = Some(types[(i - 1) % types.len()]);
                inc.description = Some(format!("Demo incident {i} at the perimeter fence"));
                inc.attended_by_officer_id =
                    Some(officers[(i - 1) % officers.len()].to_string());
                inc.status = IncidentStatus::Resolved;
                inc.resolution_notes =
                    Some(format!("Patrol attended, incident {i} closed out"));
                inc.resolved_media_urls =
                    vec![format!("https://media.example/inc-{i:03}/resolved-1.jpg")];
            }
            1 => {
                // Freshly raised, not yet classified.
            }
            _ => {
                inc.incident_type = Some(types[(i - 1) % types.len()]);
                inc.description = Some(format!("Demo incident {i} at the perimeter fence"));
                inc.attended_by_officer_id =
                    Some(officers[(i - 1) % officers.len()].to_string());
                inc.status = IncidentStatus::UnderReview;
            }
        }

        out.push(inc);
    }
    out
}
