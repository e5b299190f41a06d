use sops_core::domain::{IncidentStatus, IncidentType};
use sops_core::source::{collect_pages, parse_incident_page, seed_demo_incidents};
use sops_core::store::IncidentStore;
use sops_core::validate::validate_incident;

const PAGE_JSON: &str = r#"{
  "count": 2,
  "next": "https://api.example/incidents/?page=2",
  "previous": null,
  "results": [
    {
      "id": "INC-900",
      "site_id": "SITE-009",
      "raised_by_guard_id": "G-09",
      "incident_time": "2026-02-10T21:15:00Z",
      "status": "Active"
    },
    {
      "id": "INC-901",
      "site_id": "SITE-009",
      "raised_by_guard_id": "G-10",
      "attended_by_officer_id": "PO-2",
      "incident_time": "2026-02-10T22:40:00Z",
      "incident_type": "Suspicious Activity",
      "status": "Under Review",
      "description": "Unknown vehicle parked at the gate",
      "initial_media_urls": ["https://media.example/inc-901/1.jpg"]
    }
  ]
}"#;

#[test]
fn page_parses_wire_format_including_spaced_enum_strings() {
    let page = parse_incident_page(PAGE_JSON).expect("parse");
    assert_eq!(page.count, 2);
    assert_eq!(page.results.len(), 2);

    let fresh = &page.results[0];
    assert_eq!(fresh.status, IncidentStatus::Active);
    assert_eq!(fresh.incident_type, None);
    assert!(fresh.initial_media_urls.is_empty());

    let reviewed = &page.results[1];
    assert_eq!(reviewed.status, IncidentStatus::UnderReview);
    assert_eq!(reviewed.incident_type, Some(IncidentType::SuspiciousActivity));
    assert_eq!(reviewed.attended_by_officer_id.as_deref(), Some("PO-2"));
}

#[test]
fn malformed_page_is_a_structured_error() {
    let err = parse_incident_page("{not json").unwrap_err();
    assert_eq!(err.code, "SOURCE_PAGE_PARSE_FAILED");
}

#[test]
fn collect_pages_dedups_by_fingerprint_first_occurrence_wins() {
    let page = parse_incident_page(PAGE_JSON).expect("parse");

    // Second page re-sends INC-900 under a different id but the same
    // site/guard/time, as overlapping pagination does.
    let mut dup = page.results[0].clone();
    dup.id = "INC-900-DUP".to_string();
    let page2 = sops_core::source::IncidentPage {
        count: 1,
        next: None,
        previous: Some("https://api.example/incidents/?page=1".to_string()),
        results: vec![dup],
    };

    let (incidents, summary) = collect_pages(&[page, page2]);
    assert_eq!(summary.loaded, 2);
    assert_eq!(summary.skipped_duplicates, 1);
    assert!(summary
        .warnings
        .iter()
        .any(|w| w.code == "SOURCE_DUPLICATE_FINGERPRINT"));
    assert!(incidents.iter().all(|inc| !inc.fingerprint.is_empty()));
    assert!(incidents.iter().any(|inc| inc.id == "INC-900"));
    assert!(!incidents.iter().any(|inc| inc.id == "INC-900-DUP"));
}

#[test]
fn collect_pages_surfaces_record_warnings_without_rejecting() {
    let json = r#"{
      "count": 1,
      "next": null,
      "previous": null,
      "results": [
        {
          "id": "INC-902",
          "site_id": "SITE-009",
          "raised_by_guard_id": "G-09",
          "incident_time": "last tuesday",
          "status": "Resolved"
        }
      ]
    }"#;
    let page = parse_incident_page(json).expect("parse");
    let (incidents, summary) = collect_pages(&[page]);

    assert_eq!(incidents.len(), 1);
    assert!(summary
        .warnings
        .iter()
        .any(|w| w.code == "VALIDATION_TS_PARSE_FAILED"));
    assert!(summary
        .warnings
        .iter()
        .any(|w| w.code == "VALIDATION_STATUS_FIELD_MISMATCH"));
}

#[test]
fn demo_dataset_is_deterministic_consistent_and_store_ready() {
    let seed = seed_demo_incidents();
    assert_eq!(seed.len(), 30);
    assert_eq!(seed, seed_demo_incidents());

    for inc in &seed {
        assert!(
            validate_incident(inc).is_empty(),
            "seed record {} must validate cleanly",
            inc.id
        );
    }

    let statuses: Vec<IncidentStatus> = seed.iter().map(|i| i.status).collect();
    assert!(statuses.contains(&IncidentStatus::Active));
    assert!(statuses.contains(&IncidentStatus::UnderReview));
    assert!(statuses.contains(&IncidentStatus::Resolved));

    let store = IncidentStore::new(seed);
    assert_eq!(store.len(), 30);
    assert!(store.get_incident("INC-001").is_some());
}
