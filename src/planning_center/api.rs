//! Planning Center Services HTTP client.
//!
//! Listings are JSON:API pages; [`PlanningCenterClient`] follows `links.next`
//! until the API stops returning one.

use std::collections::HashSet;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::blockouts::BlockoutSpec;
use crate::config::{ApiSettings, Context};
use crate::constants::api::{BLOCKOUT_CREATED, REQUEST_TIMEOUT_SECS, SERVICES_PREFIX};
use crate::error::{Error, Result};
use crate::planning_center::types::{
    BlockoutRequest, Page, PersonAttributes, PersonRecord, Plan, PlanAttributes, TeamMember,
    TeamMemberAttributes,
};

const NO_QUERY: &[(&str, String)] = &[];

/// Planning Center Services operations used by the command flows.
///
/// Reads that hit a non-success status log a warning and return whatever
/// was gathered before the failure; transport errors are returned.
#[async_trait]
pub trait ServicesApi: Send + Sync {
    /// All people, one inner vector per page, ordered by last name.
    async fn people(&self) -> Result<Vec<Vec<PersonRecord>>>;

    /// Create a non-repeating, unshared blockout for a person.
    async fn create_blockout(&self, person_id: &str, spec: &BlockoutSpec) -> Result<()>;

    /// Plans of a service type, newest sort date first.
    async fn recent_plans(&self, service_type_id: &str) -> Result<Vec<Plan>>;

    /// Team members of a plan, one inner vector per page.
    async fn team_members(&self, service_type_id: &str, plan_id: &str) -> Result<Vec<Vec<TeamMember>>>;
}

/// Client for accessing the Planning Center Services API
///
/// Requests are issued one at a time; pagination follows `links.next`.
#[derive(Clone)]
pub struct PlanningCenterClient {
    app_id: String,
    secret: String,
    base_url: String,
    per_page: u32,
    client: Client,
}

impl PlanningCenterClient {
    /// Create a client for the selected context
    pub fn new(context: &Context, settings: &ApiSettings) -> Self {
        Self {
            app_id: context.application_id.clone(),
            secret: context.secret.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            per_page: settings.per_page,
            client: Client::builder()
                .timeout(StdDuration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, SERVICES_PREFIX, path)
    }

    fn listing_query(&self) -> Vec<(&'static str, String)> {
        vec![("per_page", self.per_page.to_string()), ("offset", "0".to_string())]
    }

    /// Make an authenticated GET request and decode the body
    async fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        tracing::debug!("GET {}", url);
        let resp = self.client
            .get(url)
            .basic_auth(&self.app_id, Some(&self.secret))
            .header("Content-Type", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::pco_status(
                format!("Request to {url} returned {status}"),
                status.as_u16(),
            ));
        }

        resp.json().await
            .map_err(|e| Error::parse(format!("Invalid JSON from {url}: {e}"), None))
    }

    /// Fetch every page of a listing, following `links.next`
    ///
    /// A non-success status ends the walk and keeps the pages read so far.
    /// A next link that points back at a page already read ends it too.
    async fn get_pages<A: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<Page<A>>> {
        let mut pages: Vec<Page<A>> = Vec::new();
        let mut visited = HashSet::new();
        let mut url = self.url(path);
        let mut query = query;

        loop {
            let full_url = reqwest::Url::parse_with_params(&url, query)
                .map_or_else(|_| url.clone(), String::from);
            if !visited.insert(full_url) {
                tracing::warn!("Next link {url} was already fetched; stopping after {} page(s)", pages.len());
                break;
            }

            let page: Page<A> = match self.get(&url, query).await {
                Ok(page) => page,
                Err(e @ Error::PlanningCenter { .. }) => {
                    tracing::warn!("{e}; keeping {} page(s) already fetched", pages.len());
                    break;
                }
                Err(e) => return Err(e),
            };

            let next = page.links.next.clone();
            pages.push(page);

            let Some(next) = next else { break };
            url = next;
            // The next link already carries the query string
            query = NO_QUERY;
        }

        Ok(pages)
    }

    /// Raw people listing, one entry per page
    pub async fn people_pages(&self) -> Result<Vec<Page<PersonAttributes>>> {
        let mut query = vec![("order", "last_name".to_string())];
        query.extend(self.listing_query());
        self.get_pages("/people", &query).await
    }
}

#[async_trait]
impl ServicesApi for PlanningCenterClient {
    async fn people(&self) -> Result<Vec<Vec<PersonRecord>>> {
        let pages = self.people_pages().await?;
        let people: Vec<Vec<PersonRecord>> = pages
            .into_iter()
            .map(|p| p.data.into_iter().map(PersonRecord::from).collect())
            .collect();
        tracing::info!(
            "Fetched {} people across {} page(s)",
            people.iter().map(Vec::len).sum::<usize>(),
            people.len()
        );
        Ok(people)
    }

    async fn create_blockout(&self, person_id: &str, spec: &BlockoutSpec) -> Result<()> {
        let url = self.url(&format!("/people/{person_id}/blockouts"));
        tracing::debug!("POST {}", url);

        let resp = self.client
            .post(&url)
            .basic_auth(&self.app_id, Some(&self.secret))
            .json(&BlockoutRequest::from(spec))
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request to {url} failed: {e}")))?;

        let status = resp.status();
        if status.as_u16() != BLOCKOUT_CREATED {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::pco_status(
                format!("Creating blockout for person {person_id} returned {status}: {body}"),
                status.as_u16(),
            ));
        }

        Ok(())
    }

    async fn recent_plans(&self, service_type_id: &str) -> Result<Vec<Plan>> {
        let url = self.url(&format!("/service_types/{service_type_id}/plans"));
        let query = [
            ("order", "-sort_date".to_string()),
            ("per_page", self.per_page.to_string()),
        ];

        let page: Page<PlanAttributes> = match self.get(&url, &query).await {
            Ok(page) => page,
            Err(e @ Error::PlanningCenter { .. }) => {
                tracing::warn!("{e}; no plans loaded");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        Ok(page.data.into_iter().filter_map(|r| {
            let id = r.id.clone();
            let plan = Plan::from_resource(r);
            if plan.is_none() {
                tracing::warn!("Skipping plan {} without a valid sort date", id);
            }
            plan
        }).collect())
    }

    async fn team_members(&self, service_type_id: &str, plan_id: &str) -> Result<Vec<Vec<TeamMember>>> {
        let path = format!("/service_types/{service_type_id}/plans/{plan_id}/team_members");
        let pages: Vec<Page<TeamMemberAttributes>> = self.get_pages(&path, &self.listing_query()).await?;
        Ok(pages
            .into_iter()
            .map(|p| p.data.into_iter().map(TeamMember::from).collect())
            .collect())
    }
}
