//! Dump upcoming plans and their team members for analysis.
//!
//! Usage: cargo run --bin dump_plans [-- --context main --out plans.json]

use anyhow::Context as _;
use chrono::Utc;
use serde::Serialize;

use pco_tools::app::select_context;
use pco_tools::config::{AppConfig, ContextStore};
use pco_tools::logging;
use pco_tools::planning_center::{Plan, PlanningCenterClient, ServicesApi, TeamMember};
use pco_tools::prompt::TerminalConsole;

#[derive(Serialize)]
struct PlanDump {
    #[serde(flatten)]
    plan: Plan,
    team_members: Vec<TeamMember>,
}

fn arg(name: &str) -> Option<String> {
    std::env::args()
        .position(|a| a == name)
        .and_then(|i| std::env::args().nth(i + 1))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    logging::init(config.verbose);

    let store = ContextStore::discover(&config.context_dir)?;
    let mut console = TerminalConsole::stdio();
    let context = select_context(&store, arg("--context").as_deref(), &mut console)?;
    let service_type_id = context.service_type_id()?;
    let client = PlanningCenterClient::new(context, &config.api);

    let now = Utc::now();
    let plans: Vec<_> = client
        .recent_plans(service_type_id)
        .await?
        .into_iter()
        .filter(|p| p.is_upcoming(now))
        .collect();
    println!("=== Upcoming plans ({}) ===\n", plans.len());

    let mut dumps = Vec::with_capacity(plans.len());
    for plan in plans {
        println!("--- {} | {} | {} ---", plan.id, plan.title, plan.sort_date.format("%Y-%m-%d"));

        let members: Vec<TeamMember> = client
            .team_members(service_type_id, &plan.id)
            .await
            .unwrap_or_else(|e| {
                eprintln!("  Error fetching team members: {e}");
                vec![]
            })
            .into_iter()
            .flatten()
            .collect();

        for member in &members {
            println!(
                "  {:<30} {:<25} {}",
                member.name,
                member.position.as_deref().unwrap_or("-"),
                member.status.as_deref().unwrap_or("-"),
            );
        }
        println!();

        dumps.push(PlanDump { plan, team_members: members });
    }

    if let Some(out) = arg("--out") {
        let json = serde_json::to_string_pretty(&dumps)?;
        fs_err::write(&out, json).with_context(|| format!("writing {out}"))?;
        println!("Wrote {} plan(s) to {out}", dumps.len());
    }

    Ok(())
}
