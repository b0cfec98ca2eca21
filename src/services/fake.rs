//! In-memory `ServicesApi` for flow tests.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::blockouts::BlockoutSpec;
use crate::error::{Error, Result};
use crate::planning_center::{PersonRecord, Plan, ServicesApi, TeamMember};

#[derive(Default)]
pub struct FakeApi {
    people: Vec<Vec<PersonRecord>>,
    plans: Vec<Plan>,
    members: HashMap<String, Vec<Vec<TeamMember>>>,
    failing: HashSet<String>,
    posts: Mutex<Vec<(String, BlockoutSpec)>>,
    member_requests: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn with_people(people: Vec<Vec<PersonRecord>>) -> Self {
        Self { people, ..Self::default() }
    }

    pub fn with_plans(plans: Vec<Plan>) -> Self {
        Self { plans, ..Self::default() }
    }

    pub fn members(mut self, plan_id: &str, pages: Vec<Vec<TeamMember>>) -> Self {
        self.members.insert(plan_id.to_string(), pages);
        self
    }

    pub fn failing_posts_for<const N: usize>(mut self, ids: [&str; N]) -> Self {
        self.failing.extend(ids.iter().map(ToString::to_string));
        self
    }

    pub fn posts(&self) -> Vec<(String, BlockoutSpec)> {
        self.posts.lock().unwrap().clone()
    }

    pub fn member_requests(&self) -> Vec<String> {
        self.member_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ServicesApi for FakeApi {
    async fn people(&self) -> Result<Vec<Vec<PersonRecord>>> {
        Ok(self.people.clone())
    }

    async fn create_blockout(&self, person_id: &str, spec: &BlockoutSpec) -> Result<()> {
        self.posts.lock().unwrap().push((person_id.to_string(), spec.clone()));
        if self.failing.contains(person_id) {
            return Err(Error::pco_status("blockout rejected", 422));
        }
        Ok(())
    }

    async fn recent_plans(&self, _service_type_id: &str) -> Result<Vec<Plan>> {
        Ok(self.plans.clone())
    }

    async fn team_members(&self, _service_type_id: &str, plan_id: &str) -> Result<Vec<Vec<TeamMember>>> {
        self.member_requests.lock().unwrap().push(plan_id.to_string());
        Ok(self.members.get(plan_id).cloned().unwrap_or_default())
    }
}
