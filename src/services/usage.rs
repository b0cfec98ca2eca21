//! Volunteer usage over a date window.
//!
//! Counts how many team-member listings each volunteer appears in, across
//! plans dated inside the window. Repeated listings on one plan all count.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::planning_center::{ServicesApi, TeamMember};

/// Inclusive window between two midnights (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl UsageWindow {
    /// Window from `start` to `end`; `start` may not come after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::Input(format!("start date {start} is after end date {end}")));
        }
        Ok(Self { start, end })
    }

    /// First day of the window
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether a plan date lies between the two midnights, bounds included.
    ///
    /// A plan later on the end day is outside the window.
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        let start = self.start.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = self.end.and_time(chrono::NaiveTime::MIN).and_utc();
        start <= date && date <= end
    }
}

/// Appearance counts per volunteer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageReport {
    /// Window the counts cover
    pub window: UsageWindow,
    /// Plans inside the window
    pub plans_counted: usize,
    /// Appearances per volunteer name
    pub counts: BTreeMap<String, u32>,
}

impl UsageReport {
    /// Empty report for a window
    pub const fn new(window: UsageWindow) -> Self {
        Self { window, plans_counted: 0, counts: BTreeMap::new() }
    }

    /// Add every listed member to the counts.
    pub fn tally<'a>(&mut self, members: impl IntoIterator<Item = &'a TeamMember>) {
        for member in members {
            *self.counts.entry(member.name.clone()).or_insert(0) += 1;
        }
    }

    /// Total appearances across all volunteers
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Mean appearances per volunteer, zero when nobody served
    pub fn average(&self) -> f64 {
        if self.counts.is_empty() {
            return 0.0;
        }
        let people = u32::try_from(self.counts.len()).unwrap_or(u32::MAX);
        f64::from(self.total()) / f64::from(people)
    }

    /// Volunteers by descending count, then name
    pub fn ranked(&self) -> Vec<(&str, u32)> {
        let mut ranked: Vec<(&str, u32)> = self.counts.iter().map(|(n, c)| (n.as_str(), *c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

impl fmt::Display for UsageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Volunteer usage for plans between {} and {}:",
            self.window.start, self.window.end
        )?;
        for (name, count) in self.ranked() {
            writeln!(f, "{name}: {count} times")?;
        }
        write!(
            f,
            "{} plan(s), {} volunteer(s), {:.2} appearances per volunteer",
            self.plans_counted,
            self.counts.len(),
            self.average()
        )
    }
}

/// Count volunteer appearances on plans inside `window`.
pub async fn volunteer_usage(
    api: &dyn ServicesApi,
    service_type_id: &str,
    window: UsageWindow,
) -> Result<UsageReport> {
    let plans = api.recent_plans(service_type_id).await?;
    let mut report = UsageReport::new(window);

    // Every listed plan is checked; ordering is not relied on here.
    for plan in plans.iter().filter(|p| window.contains(p.sort_date)) {
        let pages = api.team_members(service_type_id, &plan.id).await?;
        report.tally(pages.iter().flatten());
        report.plans_counted += 1;
    }

    tracing::info!(
        "Counted {} appearances on {} plan(s)",
        report.total(),
        report.plans_counted
    );
    Ok(report)
}
