//! Command flows built on the API client.
//!
//! Each flow takes a [`ServicesApi`](crate::planning_center::ServicesApi)
//! so it can run against the live client or an in-memory double.

pub mod blockouts;
pub mod duplicates;
pub mod usage;

#[cfg(test)]
pub(crate) mod fake;

pub use blockouts::{add_blockouts, BlockoutReport, EntryOutcome};
pub use duplicates::{check_duplicates, DuplicateReport};
pub use usage::{volunteer_usage, UsageReport, UsageWindow};
