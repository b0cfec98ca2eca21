//! Top-level menu flow.
//!
//! Asks what to do, which context to use, then runs the chosen command and
//! prints its report through the console.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::blockouts::BlockoutDirectory;
use crate::config::{AppConfig, Context, ContextStore};
use crate::error::{Error, Result};
use crate::planning_center::{PlanningCenterClient, ServicesApi};
use crate::prompt::{ask_date, Console};
use crate::roster::pick_roster;
use crate::services::{add_blockouts, check_duplicates, volunteer_usage, UsageWindow};

/// Commands offered by the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Post blockouts for a roster
    AddBlockouts,
    /// Look for volunteers listed twice on upcoming plans
    CheckDuplicates,
    /// Count volunteer appearances over a date window
    CheckUsage,
}

impl Command {
    /// Menu order
    pub const ALL: [Self; 3] = [Self::AddBlockouts, Self::CheckDuplicates, Self::CheckUsage];

    /// Menu label
    pub const fn label(self) -> &'static str {
        match self {
            Self::AddBlockouts => "Add blockouts",
            Self::CheckDuplicates => "Check for duplicates",
            Self::CheckUsage => "Check average volunteer usage",
        }
    }
}

/// Run one interactive session against the live API.
pub async fn run(config: &AppConfig, console: &mut dyn Console) -> Result<()> {
    console.show("Welcome to the Planning Center Services tool!")?;
    let labels: Vec<String> = Command::ALL.iter().map(|c| c.label().to_string()).collect();
    let command = Command::ALL[console.choose("What would you like to do?", &labels)?];

    let store = ContextStore::discover(&config.context_dir)?;
    let context = store.pick(console)?;
    tracing::debug!("Using context {}", context.name);

    let client = PlanningCenterClient::new(context, &config.api);
    execute(command, config, context, &client, console, Utc::now()).await
}

/// Run a command with an already-selected context and client.
pub async fn execute(
    command: Command,
    config: &AppConfig,
    context: &Context,
    api: &dyn ServicesApi,
    console: &mut dyn Console,
    now: DateTime<Utc>,
) -> Result<()> {
    match command {
        Command::AddBlockouts => {
            let roster = pick_roster(&config.roster_dir, console)?;
            let directory = BlockoutDirectory::load(&config.blockouts_file)?;
            let report = add_blockouts(api, &roster, &directory, &config.matching).await?;
            show_report(console, &report)
        }
        Command::CheckDuplicates => {
            let service_type_id = context.service_type_id()?;
            let report = check_duplicates(api, service_type_id, now).await?;
            show_report(console, &report)
        }
        Command::CheckUsage => {
            let service_type_id = context.service_type_id()?;
            let window = ask_window(console)?;
            let report = volunteer_usage(api, service_type_id, window).await?;
            show_report(console, &report)
        }
    }
}

/// Use the named context when given, otherwise ask for one.
pub fn select_context<'a>(
    store: &'a ContextStore,
    name: Option<&str>,
    console: &mut dyn Console,
) -> Result<&'a Context> {
    match name {
        Some(name) => store.get(name).ok_or_else(|| {
            Error::config(
                format!("No context named '{name}'"),
                "Pass the file name of a .cxt file without its extension",
            )
        }),
        None => store.pick(console),
    }
}

fn ask_window(console: &mut dyn Console) -> Result<UsageWindow> {
    loop {
        let end = ask_date(console, "Enter the end date for the time period to check (YYYY-MM-DD): ")?;
        let start = ask_date(console, "Enter the start date for the time period to check (YYYY-MM-DD): ")?;
        match UsageWindow::new(start, end) {
            Ok(window) => return Ok(window),
            Err(Error::Input(message)) => console.show(&format!("Invalid period: {message}"))?,
            Err(e) => return Err(e),
        }
    }
}

fn show_report(console: &mut dyn Console, report: &impl fmt::Display) -> Result<()> {
    for line in report.to_string().lines() {
        console.show(line)?;
    }
    Ok(())
}
