//! Application configuration.
//!
//! Settings come from environment variables and an optional `.env` file.
//! Credentials live in named context files (`<context dir>/<name>.cxt`),
//! one of which is picked interactively per run.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use dotenv::dotenv;
use serde::{Deserialize, Deserializer};
use walkdir::WalkDir;

use crate::constants::api::{DEFAULT_BASE_URL, DEFAULT_PER_PAGE};
use crate::constants::files::{
    CONTEXT_EXTENSION, DEFAULT_BLOCKOUTS_FILE, DEFAULT_CONTEXT_DIR, DEFAULT_ROSTER_DIR,
};
use crate::error::{Error, Result};
use crate::matcher::{AmbiguityPolicy, MatchOptions};
use crate::prompt::Console;

/// HTTP settings for the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// API host, without the `/services/v2` prefix
    pub base_url: String,
    /// Page size for paginated listings
    pub per_page: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Configuration for one run of the tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding `*.cxt` credential contexts
    pub context_dir: PathBuf,
    /// Directory holding roster CSV files
    pub roster_dir: PathBuf,
    /// Blockout directory file
    pub blockouts_file: PathBuf,
    /// HTTP settings
    pub api: ApiSettings,
    /// Roster matching behaviour
    pub matching: MatchOptions,
    /// Enable debug logging
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            context_dir: PathBuf::from(DEFAULT_CONTEXT_DIR),
            roster_dir: PathBuf::from(DEFAULT_ROSTER_DIR),
            blockouts_file: PathBuf::from(DEFAULT_BLOCKOUTS_FILE),
            api: ApiSettings::default(),
            matching: MatchOptions::default(),
            verbose: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup("PCO_CONTEXT_DIR") {
            config.context_dir = expand_path(&dir);
        }
        if let Some(dir) = lookup("PCO_ROSTER_DIR") {
            config.roster_dir = expand_path(&dir);
        }
        if let Some(file) = lookup("PCO_BLOCKOUTS_FILE") {
            config.blockouts_file = expand_path(&file);
        }
        if let Some(url) = lookup("PCO_BASE_URL") {
            config.api.base_url = url;
        }
        if let Some(per_page) = lookup("PCO_PER_PAGE") {
            config.api.per_page = per_page
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=100_u32).contains(n))
                .ok_or_else(|| {
                    Error::config(
                        format!("PCO_PER_PAGE must be a number from 1 to 100, got '{per_page}'"),
                        "Unset PCO_PER_PAGE to use the default of 100",
                    )
                })?;
        }

        config.matching.case_sensitive = !lookup("PCO_MATCH_CASE_INSENSITIVE").is_some_and(|v| is_truthy(&v));
        if let Some(policy) = lookup("PCO_AMBIGUOUS") {
            config.matching.ambiguity = policy.parse::<AmbiguityPolicy>().map_err(|e| {
                Error::config(e, "Set PCO_AMBIGUOUS to first, warn or skip")
            })?;
        }
        config.verbose = lookup("PCO_VERBOSE").is_some_and(|v| is_truthy(&v));

        Ok(config)
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).to_string())
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// A named set of Planning Center API credentials.
#[derive(Clone, Deserialize)]
pub struct Context {
    /// File stem the context was loaded from
    #[serde(skip)]
    pub name: String,
    /// Personal access token application id
    pub application_id: String,
    /// Personal access token secret
    pub secret: String,
    /// Organization id, informational
    #[serde(default, deserialize_with = "string_or_number")]
    pub organization_id: Option<String>,
    /// Service type id used by the plan checks
    #[serde(default, deserialize_with = "string_or_number")]
    pub service_id: Option<String>,
}

impl Context {
    /// Service type id, required by the duplicate and usage checks
    pub fn service_type_id(&self) -> Result<&str> {
        self.service_id.as_deref().filter(|s| !s.is_empty()).ok_or_else(|| {
            Error::config(
                format!("Context '{}' has no service_id", self.name),
                "Add the service type id as \"service_id\" to the context file",
            )
        })
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("name", &self.name)
            .field("application_id", &self.application_id)
            .field("secret", &"<redacted>")
            .field("organization_id", &self.organization_id)
            .field("service_id", &self.service_id)
            .finish()
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Id>::deserialize(d)?.map(|id| match id {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    }))
}

/// All credential contexts found in a directory, sorted by name.
#[derive(Debug, Clone)]
pub struct ContextStore {
    contexts: Vec<Context>,
}

impl ContextStore {
    /// Read every `*.cxt` file in `dir`.
    ///
    /// Finding none is a configuration error.
    pub fn discover(dir: &Path) -> Result<Self> {
        let mut contexts = Vec::new();

        let files = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|p| p.extension().is_some_and(|ext| ext == CONTEXT_EXTENSION));

        for path in files {
            let text = fs_err::read_to_string(&path)?;
            let mut context: Context = serde_json::from_str(&text)
                .map_err(|e| Error::parse(e.to_string(), path.clone()))?;
            context.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            contexts.push(context);
        }

        if contexts.is_empty() {
            return Err(Error::config(
                format!("No contexts found in {}", dir.display()),
                "Create a {name}.cxt file with the application_id and secret from https://developer.planning.center/",
            ));
        }

        contexts.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::debug!("Found {} context(s) in {}", contexts.len(), dir.display());
        Ok(Self { contexts })
    }

    /// Build a store from already-loaded contexts.
    pub fn from_contexts(mut contexts: Vec<Context>) -> Self {
        contexts.sort_by(|a, b| a.name.cmp(&b.name));
        Self { contexts }
    }

    /// Context names in menu order.
    pub fn names(&self) -> Vec<String> {
        self.contexts.iter().map(|c| c.name.clone()).collect()
    }

    /// Look a context up by name.
    pub fn get(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Ask the user which context to use.
    pub fn pick(&self, console: &mut dyn Console) -> Result<&Context> {
        let index = console.choose("Choose a context to use:", &self.names())?;
        Ok(&self.contexts[index])
    }
}
