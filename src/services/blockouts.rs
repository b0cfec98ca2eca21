//! Add-blockouts flow.
//!
//! Fetches the people list once, then walks the roster in order: each entry
//! is looked up in the blockout directory, matched against the people list,
//! and on a hit a blockout is posted for the matched person. Failures are
//! recorded per entry and never stop the run.

use std::fmt;

use crate::blockouts::{BlockoutDirectory, BlockoutSpec};
use crate::error::Result;
use crate::matcher::{resolve, AmbiguityPolicy, Match, MatchOptions, MatchResult, MatchRule};
use crate::planning_center::ServicesApi;
use crate::roster::RosterEntry;

/// What happened to one roster entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// A blockout was created for the matched person
    Created {
        /// Matched person id
        person_id: String,
        /// Rule that produced the match
        rule: MatchRule,
        /// Further candidates seen when ambiguity is reported
        other_candidates: Vec<String>,
    },
    /// The entry's trip has no blockout configured; nothing was sent
    NoBlockout,
    /// No person matched the entry
    Unmatched,
    /// Several people matched and the policy refused to pick
    Ambiguous {
        /// Ids of every matching person, in scan order
        candidates: Vec<String>,
    },
    /// The blockout request failed
    Failed {
        /// Matched person id
        person_id: String,
        /// Error reported by the client
        error: String,
    },
}

/// Outcome for one roster entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    /// Roster full name
    pub full_name: String,
    /// Roster trip
    pub trip: String,
    /// Result of processing
    pub outcome: EntryOutcome,
}

/// Result of an add-blockouts run, in roster order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockoutReport {
    /// One report per roster entry
    pub entries: Vec<EntryReport>,
}

impl BlockoutReport {
    fn push(&mut self, entry: &RosterEntry, outcome: EntryOutcome) {
        self.entries.push(EntryReport {
            full_name: entry.full_name.clone(),
            trip: entry.trip.clone(),
            outcome,
        });
    }

    fn count(&self, pred: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }

    /// Entries for which a blockout was created
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Created { .. }))
    }

    /// Entries that matched nobody
    pub fn unmatched(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Unmatched))
    }

    /// Entries skipped for lack of a blockout or an unambiguous match
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::NoBlockout | EntryOutcome::Ambiguous { .. }))
    }

    /// Entries whose blockout request failed
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Failed { .. }))
    }
}

impl fmt::Display for BlockoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match &entry.outcome {
                EntryOutcome::Created { person_id, rule, other_candidates } => {
                    writeln!(f, "Added blockout for {} (person {person_id}, matched on {rule})", entry.full_name)?;
                    if !other_candidates.is_empty() {
                        writeln!(f, "  Also matched: {}", other_candidates.join(", "))?;
                    }
                }
                EntryOutcome::NoBlockout => {
                    writeln!(f, "No blockout information found for {}", entry.trip)?;
                }
                EntryOutcome::Unmatched => writeln!(f, "No match found for {}", entry.full_name)?,
                EntryOutcome::Ambiguous { candidates } => writeln!(
                    f,
                    "Several people match {}: {}; skipped",
                    entry.full_name,
                    candidates.join(", ")
                )?,
                EntryOutcome::Failed { person_id, error } => writeln!(
                    f,
                    "Failed to add blockout for {} (person {person_id}): {error}",
                    entry.full_name
                )?,
            }
        }
        write!(
            f,
            "{} created, {} unmatched, {} skipped, {} failed",
            self.created(),
            self.unmatched(),
            self.skipped(),
            self.failed()
        )
    }
}

/// Add blockouts for every roster entry that can be matched.
///
/// Only the initial people fetch can fail the whole run.
pub async fn add_blockouts(
    api: &dyn ServicesApi,
    roster: &[RosterEntry],
    directory: &BlockoutDirectory,
    options: &MatchOptions,
) -> Result<BlockoutReport> {
    let people = api.people().await?;
    let mut report = BlockoutReport::default();

    for entry in roster {
        let Some(spec) = directory.get(&entry.trip) else {
            tracing::warn!("No blockout information found for {}", entry.trip);
            report.push(entry, EntryOutcome::NoBlockout);
            continue;
        };

        let outcome = match resolve(entry, &people, options) {
            MatchResult::Unmatched => {
                tracing::warn!("No match found for {}", entry.full_name);
                EntryOutcome::Unmatched
            }
            MatchResult::Matched(m) => post(api, entry, spec, m, Vec::new()).await,
            MatchResult::Ambiguous { chosen, others } => {
                let mut candidates = vec![chosen.person.id.clone()];
                candidates.extend(others.iter().map(|m| m.person.id.clone()));
                tracing::warn!("{} matches several people: {}", entry.full_name, candidates.join(", "));

                if options.ambiguity == AmbiguityPolicy::Skip {
                    EntryOutcome::Ambiguous { candidates }
                } else {
                    post(api, entry, spec, chosen, candidates.split_off(1)).await
                }
            }
        };

        report.push(entry, outcome);
    }

    Ok(report)
}

async fn post(
    api: &dyn ServicesApi,
    entry: &RosterEntry,
    spec: &BlockoutSpec,
    chosen: Match<'_>,
    other_candidates: Vec<String>,
) -> EntryOutcome {
    let person_id = chosen.person.id.clone();
    match api.create_blockout(&person_id, spec).await {
        Ok(()) => {
            tracing::info!("Added blockout for {} ({})", entry.full_name, person_id);
            EntryOutcome::Created { person_id, rule: chosen.rule, other_candidates }
        }
        Err(e) => {
            tracing::warn!("Blockout for {} failed: {}", entry.full_name, e);
            EntryOutcome::Failed { person_id, error: e.to_string() }
        }
    }
}
