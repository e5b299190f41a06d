use serde::{Deserialize, Serialize};

use crate::domain::{Incident, IncidentStatus};

/// Percentage of successful members in a collection of `total` opportunities.
///
/// Zero opportunities report as 100% ("vacuously compliant"): an entity with
/// nothing to fail at scores full marks. This policy is preserved from the
/// production scoring rules; see DESIGN.md before changing it.
pub fn ratio_pct(successes: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (successes as f64 / total as f64) * 100.0
}

/// Display rounding: nearest whole percent, halves away from zero. Ratios are
/// non-negative so this is plain half-up (62.5 -> 63). Raw values stay raw
/// until the final display boundary; never feed a rounded value into a
/// further aggregate.
pub fn display_pct(raw: f64) -> i64 {
    raw.round() as i64
}

/// Unweighted arithmetic mean of the four scorecard components. Each component
/// independently follows the vacuous-100% policy for its own denominator.
pub fn composite_score(components: [f64; 4]) -> f64 {
    components.iter().sum::<f64>() / components.len() as f64
}

/// Successes over opportunities for one ratio metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RatioInput {
    pub successes: u64,
    pub total: u64,
}

impl RatioInput {
    pub fn new(successes: u64, total: u64) -> Self {
        Self { successes, total }
    }

    pub fn pct(&self) -> f64 {
        ratio_pct(self.successes, self.total)
    }
}

/// Raw inputs for an entity's performance scorecard. The same shape serves
/// agencies, guards, patrolling officers, and sites; callers filter the
/// underlying collections to the entity before counting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scorecard {
    pub incident_resolution: RatioInput,
    pub guard_perimeter_accuracy: RatioInput,
    pub guard_selfie_accuracy: RatioInput,
    pub officer_site_visit: RatioInput,
}

impl Scorecard {
    /// Unrounded overall performance: mean of the four unrounded components.
    pub fn overall(&self) -> f64 {
        composite_score([
            self.incident_resolution.pct(),
            self.guard_perimeter_accuracy.pct(),
            self.guard_selfie_accuracy.pct(),
            self.officer_site_visit.pct(),
        ])
    }

    /// Rounded view for rendering. Rounding happens here and nowhere earlier.
    pub fn display(&self) -> ScorecardDisplay {
        ScorecardDisplay {
            incident_resolution_pct: display_pct(self.incident_resolution.pct()),
            guard_perimeter_accuracy_pct: display_pct(self.guard_perimeter_accuracy.pct()),
            guard_selfie_accuracy_pct: display_pct(self.guard_selfie_accuracy.pct()),
            officer_site_visit_pct: display_pct(self.officer_site_visit.pct()),
            overall_pct: display_pct(self.overall()),
        }
    }
}

/// Whole-percent scorecard as shown in the dashboard tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScorecardDisplay {
    pub incident_resolution_pct: i64,
    pub guard_perimeter_accuracy_pct: i64,
    pub guard_selfie_accuracy_pct: i64,
    pub officer_site_visit_pct: i64,
    pub overall_pct: i64,
}

/// Resolved share of a caller-filtered incident collection (per agency, per
/// site, per guard — the filter is the caller's concern).
pub fn incident_resolution_rate(incidents: &[Incident]) -> f64 {
    let resolved = incidents
        .iter()
        .filter(|inc| inc.status == IncidentStatus::Resolved)
        .count() as u64;
    ratio_pct(resolved, incidents.len() as u64)
}
