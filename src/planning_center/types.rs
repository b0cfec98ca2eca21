//! Planning Center data types.
//!
//! Wire shapes follow the JSON:API envelope PCO returns (`data`, `links`),
//! plus the flattened records the rest of the crate works with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::blockouts::BlockoutSpec;
use crate::constants::api::{BLOCKOUT_REPEAT_FREQUENCY, BLOCKOUT_SHARE};

/// One page of a JSON:API listing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page<A> {
    /// Resources on this page
    #[serde(default = "Vec::new")]
    pub data: Vec<Resource<A>>,
    /// Pagination links
    #[serde(default)]
    pub links: Links,
}

/// Pagination links of a listing page
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Links {
    /// Absolute URL of the next page, absent on the last page
    #[serde(default)]
    pub next: Option<String>,
}

/// A JSON:API resource object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Resource<A> {
    /// Opaque identifier
    pub id: String,
    /// Resource attributes
    pub attributes: A,
}

/// Attributes of a `Person` resource
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PersonAttributes {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

/// A person known to Planning Center Services
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRecord {
    /// Planning Center person id
    pub id: String,
    /// Name as displayed by Planning Center
    pub full_name: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

impl PersonRecord {
    /// Build a record from its parts.
    pub fn new(
        id: impl Into<String>,
        full_name: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

impl From<Resource<PersonAttributes>> for PersonRecord {
    fn from(r: Resource<PersonAttributes>) -> Self {
        let a = r.attributes;
        Self {
            id: r.id,
            full_name: a.full_name.unwrap_or_default(),
            first_name: a.first_name.unwrap_or_default(),
            last_name: a.last_name.unwrap_or_default(),
        }
    }
}

/// Attributes of a `Plan` resource
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlanAttributes {
    #[serde(default)]
    sort_date: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    dates: Option<String>,
}

/// Represents a specific instance of a service on a particular date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    /// Planning Center plan id
    pub id: String,
    /// Date the plan sorts by, usually its first service time
    pub sort_date: DateTime<Utc>,
    /// Display title (e.g., "March 31st")
    pub title: String,
}

impl Plan {
    /// Convert a plan resource, returning `None` when it has no usable sort date.
    pub fn from_resource(r: Resource<PlanAttributes>) -> Option<Self> {
        let a = r.attributes;
        let sort_date = DateTime::parse_from_rfc3339(a.sort_date.as_deref()?)
            .ok()?
            .with_timezone(&Utc);

        let title = a.title
            .filter(|t| !t.is_empty())
            .or(a.dates)
            .unwrap_or_else(|| "Untitled Plan".to_string());

        Some(Self { id: r.id, sort_date, title })
    }

    /// Whether the plan is dated `now` or later.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.sort_date >= now
    }
}

/// Attributes of a `PlanPerson` (team member) resource
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TeamMemberAttributes {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    team_position_name: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// A volunteer scheduled on a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMember {
    /// Plan person id
    pub id: String,
    /// Volunteer name as listed on the plan
    pub name: String,
    /// Team position, if assigned
    pub position: Option<String>,
    /// Confirmation status code (`C`, `U`, `D`)
    pub status: Option<String>,
}

impl TeamMember {
    /// Team member with only a name, as used when counting volunteers.
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), position: None, status: None }
    }
}

impl From<Resource<TeamMemberAttributes>> for TeamMember {
    fn from(r: Resource<TeamMemberAttributes>) -> Self {
        let a = r.attributes;
        Self {
            id: r.id,
            name: a.name.unwrap_or_default(),
            position: a.team_position_name,
            status: a.status,
        }
    }
}

/// Request body for creating a blockout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockoutRequest<'a> {
    data: BlockoutData<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct BlockoutData<'a> {
    attributes: BlockoutAttributes<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct BlockoutAttributes<'a> {
    reason: &'a str,
    repeat_frequency: &'static str,
    starts_at: &'a str,
    ends_at: &'a str,
    share: &'static str,
}

impl<'a> From<&'a BlockoutSpec> for BlockoutRequest<'a> {
    fn from(spec: &'a BlockoutSpec) -> Self {
        Self {
            data: BlockoutData {
                attributes: BlockoutAttributes {
                    reason: &spec.reason,
                    repeat_frequency: BLOCKOUT_REPEAT_FREQUENCY,
                    starts_at: &spec.starts_at,
                    ends_at: &spec.ends_at,
                    share: BLOCKOUT_SHARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use serde_json::json;

    #[test]
    fn plan_serializes_its_sort_date_as_rfc3339() {
        use chrono::TimeZone;

        let plan = Plan {
            id: "9".into(),
            sort_date: Utc.with_ymd_and_hms(2024, 6, 2, 9, 30, 0).unwrap(),
            title: "June 2".into(),
        };
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["sort_date"], "2024-06-02T09:30:00Z");
        assert_eq!(value["title"], "June 2");
    }

    #[test]
    fn plans_dated_now_or_later_are_upcoming() {
        use chrono::TimeZone;

        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let at = |hour| Plan {
            id: "1".into(),
            sort_date: Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap(),
            title: String::new(),
        };
        assert!(at(9).is_upcoming(now));
        assert!(at(10).is_upcoming(now));
        assert!(!at(8).is_upcoming(now));
    }

    #[test]
    fn person_page_parses_and_flattens() {
        let page: Page<PersonAttributes> = serde_json::from_value(json!({
            "data": [{
                "type": "Person",
                "id": "1",
                "attributes": {"full_name": "Jane Doe", "first_name": "Jane", "last_name": "Doe"}
            }],
            "links": {"self": "https://x/people", "next": "https://x/people?offset=100"},
            "meta": {"total_count": 101}
        }))
        .unwrap();

        assert_eq!(page.links.next.as_deref(), Some("https://x/people?offset=100"));
        let people: Vec<PersonRecord> = page.data.into_iter().map(Into::into).collect();
        assert_eq!(people, vec![PersonRecord::new("1", "Jane Doe", "Jane", "Doe")]);
    }

    #[test]
    fn null_name_fields_become_empty() {
        let r: Resource<PersonAttributes> = serde_json::from_value(json!({
            "id": "7",
            "attributes": {"full_name": "Prince", "first_name": null}
        }))
        .unwrap();
        let person = PersonRecord::from(r);
        assert_eq!(person.first_name, "");
        assert_eq!(person.last_name, "");
    }

    #[test]
    fn plan_requires_a_sort_date() {
        let with_date: Resource<PlanAttributes> = serde_json::from_value(json!({
            "id": "10",
            "attributes": {"sort_date": "2024-06-02T09:00:00Z", "title": "", "dates": "June 2, 2024"}
        }))
        .unwrap();
        let plan = Plan::from_resource(with_date).unwrap();
        assert_eq!(plan.title, "June 2, 2024");
        assert_eq!(plan.sort_date.to_rfc3339(), "2024-06-02T09:00:00+00:00");

        let without: Resource<PlanAttributes> =
            serde_json::from_value(json!({"id": "11", "attributes": {"sort_date": null}})).unwrap();
        assert!(Plan::from_resource(without).is_none());
    }

    #[test]
    fn blockout_request_has_the_expected_shape() {
        let spec = BlockoutSpec {
            starts_at: "2024-06-01T00:00:00Z".into(),
            ends_at: "2024-06-10T00:00:00Z".into(),
            reason: "trip".into(),
        };
        let body = serde_json::to_value(BlockoutRequest::from(&spec)).unwrap();
        assert_eq!(
            body,
            json!({"data": {"attributes": {
                "reason": "trip",
                "repeat_frequency": "no_repeat",
                "starts_at": "2024-06-01T00:00:00Z",
                "ends_at": "2024-06-10T00:00:00Z",
                "share": "false"
            }}})
        );
    }
}
