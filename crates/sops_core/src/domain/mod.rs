use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Incident lifecycle. Transitions are monotonic: `Active -> UnderReview -> Resolved`,
/// enforced by the store (see `workflow`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum IncidentStatus {
    Active,
    #[serde(rename = "Under Review")]
    UnderReview,
    Resolved,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Active => "Active",
            IncidentStatus::UnderReview => "Under Review",
            IncidentStatus::Resolved => "Resolved",
        }
    }
}

/// Fixed incident classification. Unset while the report is still `Active`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum IncidentType {
    #[serde(rename = "SOS")]
    Sos,
    #[serde(rename = "Suspicious Activity")]
    SuspiciousActivity,
    Theft,
    Vandalism,
    Trespassing,
    #[serde(rename = "Safety Hazard")]
    SafetyHazard,
    Other,
}

impl IncidentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::Sos => "SOS",
            IncidentType::SuspiciousActivity => "Suspicious Activity",
            IncidentType::Theft => "Theft",
            IncidentType::Vandalism => "Vandalism",
            IncidentType::Trespassing => "Trespassing",
            IncidentType::SafetyHazard => "Safety Hazard",
            IncidentType::Other => "Other",
        }
    }
}

/// Canonical incident record.
///
/// Notes:
/// - `incident_time` is an RFC3339 UTC string; unparseable values surface as
///   validation warnings (no silent guessing or defaults).
/// - `site_id` / `raised_by_guard_id` / `attended_by_officer_id` are weak foreign
///   references; the core only stores and echoes them.
/// - `initial_media_urls` is append-only while the incident is non-`Resolved`.
/// - `resolution_notes` / `resolved_media_urls` are written exactly once, on the
///   transition into `Resolved`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Incident {
    pub id: String,
    pub site_id: String,
    pub raised_by_guard_id: String,
    #[serde(default)]
    pub attended_by_officer_id: Option<String>,
    pub incident_time: String,
    #[serde(default)]
    pub incident_type: Option<IncidentType>,
    pub status: IncidentStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub initial_media_urls: Vec<String>,
    #[serde(default)]
    pub resolution_notes: Option<String>,
    #[serde(default)]
    pub resolved_media_urls: Vec<String>,
    #[serde(default)]
    pub fingerprint: String,
}

impl Incident {
    /// Fresh report as raised by a guard: `Active`, unclassified, no media yet.
    pub fn new(
        id: impl Into<String>,
        site_id: impl Into<String>,
        raised_by_guard_id: impl Into<String>,
        incident_time: impl Into<String>,
    ) -> Self {
        let site_id = site_id.into();
        let raised_by_guard_id = raised_by_guard_id.into();
        let incident_time = incident_time.into();
        let fingerprint = fingerprint(&site_id, &raised_by_guard_id, &incident_time);
        Self {
            id: id.into(),
            site_id,
            raised_by_guard_id,
            attended_by_officer_id: None,
            incident_time,
            incident_type: None,
            status: IncidentStatus::Active,
            description: None,
            initial_media_urls: Vec::new(),
            resolution_notes: None,
            resolved_media_urls: Vec::new(),
            fingerprint,
        }
    }

    /// Explicit field-by-field merge. Unknown fields are unrepresentable by
    /// construction; legality of the merge is checked beforehand by
    /// `workflow::validate_patch`.
    pub fn apply_patch(&mut self, patch: IncidentPatch) {
        if let Some(incident_type) = patch.incident_type {
            self.incident_type = Some(incident_type);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(officer) = patch.attended_by_officer_id {
            self.attended_by_officer_id = Some(officer);
        }
        self.initial_media_urls.extend(patch.append_initial_media);
        if let Some(notes) = patch.resolution_notes {
            self.resolution_notes = Some(notes);
        }
        if let Some(urls) = patch.resolved_media_urls {
            self.resolved_media_urls = urls;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Partial update applied through `IncidentStore::update_incident`.
///
/// `append_initial_media` appends; it never replaces existing entries.
/// `resolved_media_urls` is only accepted by the patch that moves the incident
/// into `Resolved`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentPatch {
    #[serde(default)]
    pub incident_type: Option<IncidentType>,
    #[serde(default)]
    pub status: Option<IncidentStatus>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attended_by_officer_id: Option<String>,
    #[serde(default)]
    pub append_initial_media: Vec<String>,
    #[serde(default)]
    pub resolution_notes: Option<String>,
    #[serde(default)]
    pub resolved_media_urls: Option<Vec<String>>,
}

impl IncidentPatch {
    /// True when applying the patch could not change any field.
    pub fn is_empty(&self) -> bool {
        self.incident_type.is_none()
            && self.status.is_none()
            && self.description.is_none()
            && self.attended_by_officer_id.is_none()
            && self.append_initial_media.is_empty()
            && self.resolution_notes.is_none()
            && self.resolved_media_urls.is_none()
    }
}

/// Non-blocking data-quality finding. Warnings accompany records loaded from a
/// remote source; they never reject the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Stable record fingerprint used to deduplicate incidents across source pages.
/// A site/guard pair cannot raise two distinct incidents at the same instant.
pub fn fingerprint(site_id: &str, raised_by_guard_id: &str, incident_time: &str) -> String {
    let payload = format!("site={site_id}|guard={raised_by_guard_id}|time={incident_time}");
    let digest = Sha256::digest(payload.as_bytes());
    hex::encode(digest)
}
