use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Incident, IncidentStatus};
use crate::metrics::{display_pct, incident_resolution_rate};
use crate::validate::validate_incident;

pub const DASHBOARD_PAYLOAD_VERSION: u32 = 1;

/// Count bucket with drill-down ids. Buckets always reconcile to the total:
/// every incident lands in exactly one bucket per dimension, UNKNOWN included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryBucket {
    pub key: String,
    pub label: String,
    pub count: i64,
    pub incident_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentSummary {
    pub id: String,
    pub site_id: String,
    pub status: String,
    pub incident_type: Option<String>,
    pub media_count: i64,
    pub warning_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardPayload {
    pub version: u32,
    pub incident_count: i64,
    pub resolution_rate_pct: i64,
    pub status_counts: Vec<CategoryBucket>,
    pub type_counts: Vec<CategoryBucket>,
    pub incidents: Vec<IncidentSummary>,
}

fn buckets_from_map(prefix: &str, map: BTreeMap<String, Vec<String>>) -> Vec<CategoryBucket> {
    let mut out = map
        .into_iter()
        .map(|(label, mut ids)| {
            ids.sort();
            CategoryBucket {
                key: format!("{prefix}:{label}"),
                count: ids.len() as i64,
                incident_ids: ids,
                label,
            }
        })
        .collect::<Vec<_>>();
    out.sort_by(|a, b| (-(a.count), a.label.clone()).cmp(&(-(b.count), b.label.clone())));
    out
}

/// Build the dashboard payload over a caller-filtered collection (all sites,
/// one agency, one site — the filter is the caller's concern). Fully
/// deterministic: same input, same payload.
pub fn build_dashboard_payload(incidents: &[Incident]) -> DashboardPayload {
    let mut status_map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut type_map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut summaries = Vec::new();

    for inc in incidents {
        status_map
            .entry(inc.status.as_str().to_string())
            .or_default()
            .push(inc.id.clone());

        let type_label = inc
            .incident_type
            .map(|t| t.as_str().to_string())
            .unwrap_or_else(|| "UNKNOWN".to_string());
        type_map.entry(type_label).or_default().push(inc.id.clone());

        let warning_count = validate_incident(inc).len() as i64;
        summaries.push(IncidentSummary {
            id: inc.id.clone(),
            site_id: inc.site_id.clone(),
            status: inc.status.as_str().to_string(),
            incident_type: inc.incident_type.map(|t| t.as_str().to_string()),
            media_count: (inc.initial_media_urls.len() + inc.resolved_media_urls.len()) as i64,
            warning_count,
        });
    }

    summaries.sort_by(|a, b| a.id.cmp(&b.id));

    // Keep status buckets in lifecycle order rather than by count.
    let mut status_counts = buckets_from_map("status", status_map);
    let lifecycle_order = |label: &str| match label {
        l if l == IncidentStatus::Active.as_str() => 0,
        l if l == IncidentStatus::UnderReview.as_str() => 1,
        l if l == IncidentStatus::Resolved.as_str() => 2,
        _ => 3,
    };
    status_counts.sort_by_key(|b| lifecycle_order(&b.label));

    DashboardPayload {
        version: DASHBOARD_PAYLOAD_VERSION,
        incident_count: incidents.len() as i64,
        resolution_rate_pct: display_pct(incident_resolution_rate(incidents)),
        status_counts,
        type_counts: buckets_from_map("type", type_map),
        incidents: summaries,
    }
}
