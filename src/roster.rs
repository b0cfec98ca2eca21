//! Roster spreadsheets.
//!
//! A roster is a CSV export with at least `Full Name` and `Trip` columns.
//! Extra columns are ignored.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::constants::files::ROSTER_EXTENSION;
use crate::error::{Error, Result};
use crate::prompt::Console;

/// One roster row, with first and last names derived from the full name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Name exactly as written in the roster.
    pub full_name: String,
    /// Trip or assignment key into the blockout directory.
    pub trip: String,
    /// First whitespace token of `full_name`.
    pub first_name: String,
    /// Last whitespace token of `full_name`.
    pub last_name: String,
}

impl RosterEntry {
    /// Build an entry, deriving first and last names.
    ///
    /// A single-token name yields that token for both parts.
    pub fn new(full_name: impl Into<String>, trip: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let (first_name, last_name) = split_name(&full_name);
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            full_name,
            trip: trip.into(),
        }
    }
}

/// First and last whitespace-delimited tokens of a name.
///
/// Returns empty strings for a blank name.
pub fn split_name(name: &str) -> (&str, &str) {
    let mut tokens = name.split_whitespace();
    let first = tokens.next().unwrap_or_default();
    let last = tokens.last().unwrap_or(first);
    (first, last)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Full Name")]
    full_name: String,
    #[serde(rename = "Trip")]
    trip: String,
}

/// Parse roster rows from any CSV reader.
///
/// Rows with a blank `Full Name` are skipped with a warning.
pub fn read_roster<R: Read>(reader: R, origin: Option<&Path>) -> Result<Vec<RosterEntry>> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut entries = Vec::new();

    for (line, row) in csv.deserialize::<RosterRow>().enumerate() {
        let row = row.map_err(|e| Error::parse(e.to_string(), origin.map(Path::to_path_buf)))?;
        if row.full_name.trim().is_empty() {
            tracing::warn!("Skipping roster row {} with no name", line + 2);
            continue;
        }
        entries.push(RosterEntry::new(row.full_name, row.trip));
    }

    Ok(entries)
}

/// Load a roster file from disk.
pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>> {
    let file = fs_err::File::open(path)?;
    let entries = read_roster(file, Some(path))?;
    tracing::debug!("Loaded {} roster entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// List roster files in a directory, sorted by file name.
pub fn find_rosters(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| p.extension().is_some_and(|ext| ext == ROSTER_EXTENSION))
        .collect();

    if files.is_empty() {
        return Err(Error::config(
            format!("No roster files found in {}", dir.display()),
            "Export the roster spreadsheet as CSV with 'Full Name' and 'Trip' columns",
        ));
    }

    files.sort();
    Ok(files)
}

/// Let the user pick one of the roster files in `dir` and load it.
pub fn pick_roster(dir: &Path, console: &mut dyn Console) -> Result<Vec<RosterEntry>> {
    let files = find_rosters(dir)?;
    let labels: Vec<String> = files
        .iter()
        .map(|p| p.file_name().map_or_else(|| p.display().to_string(), |n| n.to_string_lossy().into_owned()))
        .collect();

    let index = console.choose("Choose a roster file to use:", &labels)?;
    load_roster(&files[index])
}
