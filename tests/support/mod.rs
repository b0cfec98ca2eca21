//! Shared helpers for integration tests.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use pco_tools::config::{ApiSettings, Context};
use serde_json::{json, Value};

/// Basic auth header for the test context (`app-id:s3cret`).
pub const AUTH_HEADER: &str = "Basic YXBwLWlkOnMzY3JldA==";

pub fn context() -> Context {
    let mut context: Context = serde_json::from_value(json!({
        "application_id": "app-id",
        "secret": "s3cret",
        "service_id": 77
    }))
    .unwrap();
    context.name = "test".into();
    context
}

pub fn settings(base_url: String) -> ApiSettings {
    ApiSettings { base_url, per_page: 100 }
}

pub fn person(id: &str, full: &str, first: &str, last: &str) -> Value {
    json!({
        "type": "Person",
        "id": id,
        "attributes": {"full_name": full, "first_name": first, "last_name": last}
    })
}

pub fn member(id: &str, name: &str) -> Value {
    json!({
        "type": "PlanPerson",
        "id": id,
        "attributes": {"name": name, "team_position_name": "Vocals", "status": "C"}
    })
}

pub fn plan(id: &str, sort_date: &str) -> Value {
    json!({
        "type": "Plan",
        "id": id,
        "attributes": {"sort_date": sort_date, "title": format!("Plan {id}")}
    })
}

pub fn page(data: Vec<Value>, next: Option<String>) -> Value {
    json!({"data": data, "links": {"next": next}, "meta": {}})
}
