//! Roster-to-person matching.
//!
//! Each person record is tested against three rules, strongest first:
//!
//! 1. the roster full name equals the record's full name;
//! 2. the roster first/last names equal the record's first/last name fields;
//! 3. the roster first/last names equal the first/last tokens of the
//!    record's full name.
//!
//! Records are scanned page by page in listing order and the first record
//! satisfying any rule wins. Comparisons are exact unless
//! [`MatchOptions::case_sensitive`] is turned off.

use std::fmt;
use std::str::FromStr;

use crate::planning_center::types::PersonRecord;
use crate::roster::{split_name, RosterEntry};

/// Which rule produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Full names are equal
    FullName,
    /// First and last name fields are equal
    NameFields,
    /// First and last tokens of the record's full name are equal
    FullNameTokens,
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FullName => "full name",
            Self::NameFields => "first and last name",
            Self::FullNameTokens => "first and last word of full name",
        })
    }
}

/// What to do when more than one record matches an entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmbiguityPolicy {
    /// Take the first match and never look further
    #[default]
    FirstMatch,
    /// Take the first match but report the other candidates
    Warn,
    /// Refuse to pick when several records match
    Skip,
}

impl FromStr for AmbiguityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first_match" => Ok(Self::FirstMatch),
            "warn" => Ok(Self::Warn),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown ambiguity policy '{other}' (expected first, warn or skip)")),
        }
    }
}

/// Matching configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Compare names exactly (default) or ignoring case
    pub case_sensitive: bool,
    /// Handling of entries matching several records
    pub ambiguity: AmbiguityPolicy,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self { case_sensitive: true, ambiguity: AmbiguityPolicy::FirstMatch }
    }
}

/// A record matched to a roster entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    /// The matched record
    pub person: &'a PersonRecord,
    /// Rule that fired
    pub rule: MatchRule,
}

/// Outcome of resolving one roster entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult<'a> {
    /// Exactly one record was selected
    Matched(Match<'a>),
    /// Several records matched; `chosen` is the first in scan order
    Ambiguous {
        /// First candidate in scan order
        chosen: Match<'a>,
        /// Every later candidate
        others: Vec<Match<'a>>,
    },
    /// No record matched
    Unmatched,
}

/// Rule under which `record` matches `entry`, if any.
pub fn match_rule(entry: &RosterEntry, record: &PersonRecord, options: &MatchOptions) -> Option<MatchRule> {
    let eq = |a: &str, b: &str| {
        if options.case_sensitive {
            a == b
        } else {
            a.to_lowercase() == b.to_lowercase()
        }
    };

    if eq(&entry.full_name, &record.full_name) {
        return Some(MatchRule::FullName);
    }
    if eq(&entry.first_name, &record.first_name) && eq(&entry.last_name, &record.last_name) {
        return Some(MatchRule::NameFields);
    }
    let (first, last) = split_name(&record.full_name);
    if eq(&entry.first_name, first) && eq(&entry.last_name, last) {
        return Some(MatchRule::FullNameTokens);
    }
    None
}

fn candidates<'a, 'e>(
    entry: &'e RosterEntry,
    pages: &'a [Vec<PersonRecord>],
    options: &'e MatchOptions,
) -> impl Iterator<Item = Match<'a>> + 'e
where
    'a: 'e,
{
    pages
        .iter()
        .flatten()
        .filter_map(move |person| match_rule(entry, person, options).map(|rule| Match { person, rule }))
}

/// First record in page-then-record order matching `entry`.
///
/// Stops at the first hit; later records are not examined.
pub fn find_match<'a>(
    entry: &RosterEntry,
    pages: &'a [Vec<PersonRecord>],
    options: &MatchOptions,
) -> Option<Match<'a>> {
    candidates(entry, pages, options).next()
}

/// Every record matching `entry`, in scan order.
pub fn find_all_matches<'a>(
    entry: &RosterEntry,
    pages: &'a [Vec<PersonRecord>],
    options: &MatchOptions,
) -> Vec<Match<'a>> {
    candidates(entry, pages, options).collect()
}

/// Resolve `entry` according to the configured ambiguity policy.
///
/// With [`AmbiguityPolicy::FirstMatch`] this is [`find_match`]; the other
/// policies scan the whole collection to detect competing candidates.
pub fn resolve<'a>(
    entry: &RosterEntry,
    pages: &'a [Vec<PersonRecord>],
    options: &MatchOptions,
) -> MatchResult<'a> {
    if options.ambiguity == AmbiguityPolicy::FirstMatch {
        return find_match(entry, pages, options).map_or(MatchResult::Unmatched, MatchResult::Matched);
    }

    let mut all = find_all_matches(entry, pages, options).into_iter();
    match all.next() {
        None => MatchResult::Unmatched,
        Some(chosen) => {
            let others: Vec<_> = all.collect();
            if others.is_empty() {
                MatchResult::Matched(chosen)
            } else {
                MatchResult::Ambiguous { chosen, others }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn person(id: &str, full: &str, first: &str, last: &str) -> PersonRecord {
        PersonRecord::new(id, full, first, last)
    }

    fn exact() -> MatchOptions {
        MatchOptions::default()
    }

    #[test]
    fn full_name_equality_wins_regardless_of_fields() {
        let entry = RosterEntry::new("Jane Doe", "Mexico");
        let record = person("1", "Jane Doe", "J", "Unrelated");
        assert_eq!(match_rule(&entry, &record, &exact()), Some(MatchRule::FullName));
    }

    #[test]
    fn name_fields_match_when_full_names_differ() {
        let entry = RosterEntry::new("Jane Q Doe", "Mexico");
        let record = person("1", "Jane Doe", "Jane", "Doe");
        assert_eq!(match_rule(&entry, &record, &exact()), Some(MatchRule::NameFields));
    }

    #[test]
    fn full_name_tokens_match_when_fields_differ() {
        // Nickname stored as first_name, legal name kept in full_name
        let entry = RosterEntry::new("Robert James Smith", "Peru");
        let record = person("2", "Robert Smith", "Bobby", "Smith");
        assert_eq!(match_rule(&entry, &record, &exact()), Some(MatchRule::FullNameTokens));
    }

    #[test]
    fn no_rule_means_no_match() {
        let entry = RosterEntry::new("Bob Smith", "Peru");
        let pages = vec![vec![person("2", "Robert Smith", "Robert", "Smith")]];
        assert!(find_match(&entry, &pages, &exact()).is_none());
        assert_eq!(resolve(&entry, &pages, &exact()), MatchResult::Unmatched);
    }

    #[test]
    fn comparisons_are_case_sensitive_by_default() {
        let entry = RosterEntry::new("jane doe", "Mexico");
        let pages = vec![vec![person("1", "Jane Doe", "Jane", "Doe")]];
        assert!(find_match(&entry, &pages, &exact()).is_none());

        let relaxed = MatchOptions { case_sensitive: false, ..MatchOptions::default() };
        let hit = find_match(&entry, &pages, &relaxed).unwrap();
        assert_eq!(hit.person.id, "1");
        assert_eq!(hit.rule, MatchRule::FullName);
    }

    #[test]
    fn first_candidate_in_scan_order_wins() {
        let entry = RosterEntry::new("Jane Doe", "Mexico");
        let pages = vec![
            vec![person("0", "Al Able", "Al", "Able")],
            vec![
                person("1", "Jane Marie Doe", "Jane", "Doe"),
                person("2", "Jane Doe", "Jane", "Doe"),
            ],
            vec![person("3", "Jane Doe", "Jane", "Doe")],
        ];
        let hit = find_match(&entry, &pages, &exact()).unwrap();
        assert_eq!(hit.person.id, "1");
        assert_eq!(hit.rule, MatchRule::NameFields);
    }

    #[test]
    fn empty_collection_is_unmatched() {
        let entry = RosterEntry::new("Jane Doe", "Mexico");
        assert!(find_match(&entry, &[], &exact()).is_none());
        assert!(find_match(&entry, &[vec![], vec![]], &exact()).is_none());
    }

    #[test]
    fn first_match_policy_ignores_later_candidates() {
        let entry = RosterEntry::new("Jane Doe", "Mexico");
        let pages = vec![vec![person("1", "Jane Doe", "Jane", "Doe"), person("2", "Jane Doe", "Jane", "Doe")]];
        match resolve(&entry, &pages, &exact()) {
            MatchResult::Matched(m) => assert_eq!(m.person.id, "1"),
            other => panic!("expected a single match, got {other:?}"),
        }
    }

    #[test]
    fn other_policies_surface_ambiguity() {
        let entry = RosterEntry::new("Jane Doe", "Mexico");
        let pages = vec![
            vec![person("1", "Jane Doe", "Jane", "Doe")],
            vec![person("9", "Jane A Doe", "Jane", "Doe")],
        ];
        let warn = MatchOptions { ambiguity: AmbiguityPolicy::Warn, ..MatchOptions::default() };
        match resolve(&entry, &pages, &warn) {
            MatchResult::Ambiguous { chosen, others } => {
                assert_eq!(chosen.person.id, "1");
                assert_eq!(others.len(), 1);
                assert_eq!(others[0].person.id, "9");
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }

        let single = vec![vec![person("1", "Jane Doe", "Jane", "Doe")]];
        assert!(matches!(resolve(&entry, &single, &warn), MatchResult::Matched(_)));
    }

    #[test]
    fn parses_ambiguity_policy_names() {
        assert_eq!("first".parse(), Ok(AmbiguityPolicy::FirstMatch));
        assert_eq!(" Warn ".parse(), Ok(AmbiguityPolicy::Warn));
        assert_eq!("skip".parse(), Ok(AmbiguityPolicy::Skip));
        assert!("maybe".parse::<AmbiguityPolicy>().is_err());
    }
}
