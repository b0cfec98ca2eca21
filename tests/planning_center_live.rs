//! Integration tests against the real Planning Center API.
//!
//! Enabled with `--features integration_test`; set `PCO_CONTEXT` to the
//! name of a context file and `PCO_CONTEXT_DIR` if it is not `./context`.

#![cfg(feature = "integration_test")]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use pco_tools::config::{AppConfig, ContextStore};
use pco_tools::planning_center::{PlanningCenterClient, ServicesApi};

// Helper function to set up the client for tests
fn setup_client() -> Option<(PlanningCenterClient, Option<String>)> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            println!("Skipping integration test: Failed to load config: {e}");
            return None;
        }
    };
    let Ok(name) = std::env::var("PCO_CONTEXT") else {
        println!("Skipping integration test: PCO_CONTEXT is not set.");
        return None;
    };
    let store = match ContextStore::discover(&config.context_dir) {
        Ok(store) => store,
        Err(e) => {
            println!("Skipping integration test: {e}");
            return None;
        }
    };
    let context = store.get(&name)?;
    Some((PlanningCenterClient::new(context, &config.api), context.service_id.clone()))
}

#[tokio::test]
async fn test_fetch_people() {
    if let Some((client, _)) = setup_client() {
        let people = client.people().await.unwrap();
        let count: usize = people.iter().map(Vec::len).sum();
        println!("Fetched {count} people across {} page(s).", people.len());
        assert!(count > 0, "Expected at least one person.");
    }
}

#[tokio::test]
async fn test_fetch_plans_and_team_members() {
    if let Some((client, Some(service_type_id))) = setup_client() {
        let plans = client.recent_plans(&service_type_id).await.unwrap();
        println!("Fetched {} plans.", plans.len());
        assert!(
            plans.windows(2).all(|w| w[0].sort_date >= w[1].sort_date),
            "Plans should be ordered newest first"
        );

        if let Some(plan) = plans.first() {
            let pages = client.team_members(&service_type_id, &plan.id).await.unwrap();
            println!("Plan {} has {} team member(s).", plan.id, pages.iter().map(Vec::len).sum::<usize>());
        }
    }
}
