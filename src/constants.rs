//! Application constants.
//!
//! Centralizes API paths and default locations.

/// `Planning Center` API constants.
pub mod api {
    /// Default API host.
    pub const DEFAULT_BASE_URL: &str = "https://api.planningcenteronline.com";

    /// Path prefix for the Services product.
    pub const SERVICES_PREFIX: &str = "/services/v2";

    /// Default page size for paginated listings.
    pub const DEFAULT_PER_PAGE: u32 = 100;

    /// Per-request timeout in seconds.
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Status code returned when a blockout is created.
    pub const BLOCKOUT_CREATED: u16 = 201;

    /// Blockouts created by these tools never repeat.
    pub const BLOCKOUT_REPEAT_FREQUENCY: &str = "no_repeat";

    /// Blockouts are not shared with other schedulers.
    pub const BLOCKOUT_SHARE: &str = "false";
}

/// Local file layout defaults.
pub mod files {
    /// Directory holding `*.cxt` credential contexts.
    pub const DEFAULT_CONTEXT_DIR: &str = "context";

    /// Extension of credential context files.
    pub const CONTEXT_EXTENSION: &str = "cxt";

    /// Directory holding roster spreadsheets.
    pub const DEFAULT_ROSTER_DIR: &str = "rosters";

    /// Extension of roster files.
    pub const ROSTER_EXTENSION: &str = "csv";

    /// Blockout directory keyed by trip name.
    pub const DEFAULT_BLOCKOUTS_FILE: &str = "blockouts.json";
}

/// Date formats used at the prompt.
pub mod dates {
    /// Format for user-entered dates.
    pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";
}
