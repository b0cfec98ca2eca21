//! Duplicate-volunteer check for upcoming plans.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::planning_center::{Plan, ServicesApi, TeamMember};

/// Duplicates found on one upcoming plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDuplicates {
    /// The plan checked
    pub plan: Plan,
    /// Names listed more than once, each reported once, in order of first repeat
    pub duplicates: Vec<String>,
}

/// Result of a duplicate check, newest plan first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateReport {
    /// Every upcoming plan that was checked
    pub plans: Vec<PlanDuplicates>,
}

impl DuplicateReport {
    /// Total duplicate names across all plans
    pub fn total(&self) -> usize {
        self.plans.iter().map(|p| p.duplicates.len()).sum()
    }
}

impl fmt::Display for DuplicateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for checked in &self.plans {
            writeln!(f, "Plan: {} ({})", checked.plan.sort_date.format("%Y-%m-%dT%H:%M:%SZ"), checked.plan.title)?;
            for name in &checked.duplicates {
                writeln!(f, "Duplicate volunteer: {name}")?;
            }
        }
        write!(f, "{} duplicate(s) across {} upcoming plan(s)", self.total(), self.plans.len())
    }
}

/// Names appearing more than once, each reported on its first repeat.
pub fn duplicate_names<'a>(members: impl IntoIterator<Item = &'a TeamMember>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();

    for member in members {
        let name = member.name.as_str();
        if !seen.insert(name) && reported.insert(name) {
            duplicates.push(name.to_string());
        }
    }

    duplicates
}

/// Check every plan dated `now` or later for volunteers listed twice.
pub async fn check_duplicates(
    api: &dyn ServicesApi,
    service_type_id: &str,
    now: DateTime<Utc>,
) -> Result<DuplicateReport> {
    let plans = api.recent_plans(service_type_id).await?;
    let mut report = DuplicateReport::default();

    for plan in plans {
        // Plans arrive newest first, so everything after the first past
        // plan is also past. An unsorted listing would hide later plans.
        if !plan.is_upcoming(now) {
            break;
        }

        let pages = api.team_members(service_type_id, &plan.id).await?;
        let duplicates = duplicate_names(pages.iter().flatten());
        for name in &duplicates {
            tracing::warn!("Duplicate volunteer on plan {}: {}", plan.id, name);
        }
        report.plans.push(PlanDuplicates { plan, duplicates });
    }

    Ok(report)
}
