//! Dump every Planning Center person to a JSON file.
//!
//! Usage: cargo run --bin dump_people [-- --context main --out people.json]

use anyhow::Context as _;
use pco_tools::app::select_context;
use pco_tools::config::{AppConfig, ContextStore};
use pco_tools::logging;
use pco_tools::planning_center::PlanningCenterClient;
use pco_tools::prompt::TerminalConsole;

fn arg(name: &str) -> Option<String> {
    std::env::args()
        .position(|a| a == name)
        .and_then(|i| std::env::args().nth(i + 1))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let out = arg("--out").unwrap_or_else(|| "people.json".to_string());

    let config = AppConfig::load()?;
    logging::init(config.verbose);

    let store = ContextStore::discover(&config.context_dir)?;
    let mut console = TerminalConsole::stdio();
    let context = select_context(&store, arg("--context").as_deref(), &mut console)?;
    let client = PlanningCenterClient::new(context, &config.api);

    let pages = client.people_pages().await?;
    let people: usize = pages.iter().map(|p| p.data.len()).sum();

    let json = serde_json::to_string_pretty(&pages)?;
    fs_err::write(&out, json).with_context(|| format!("writing {out}"))?;

    println!("Wrote {people} people in {} page(s) to {out}", pages.len());
    Ok(())
}
