use serde::{Deserialize, Serialize};

/// A public repository from the `/users/{username}/repos` API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    pub html_url: String,
    #[serde(default)]
    pub fork: bool,
    pub updated_at: Option<String>,
}

/// One day of the GraphQL contribution calendar, still in wire form.
///
/// The date is kept as the raw string so that malformed values reach the
/// matrix builder, which drops them instead of failing deserialization of
/// the whole calendar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    pub date: String,
    pub contribution_count: u32,
}

impl ContributionDay {
    pub fn new(date: impl Into<String>, contribution_count: u32) -> Self {
        Self {
            date: date.into(),
            contribution_count,
        }
    }
}

/// Flattened contribution calendar for a user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContributionCalendar {
    pub total_contributions: u32,
    pub days: Vec<ContributionDay>,
}

// GraphQL envelope for the calendar query.

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CalendarData {
    pub user: Option<CalendarUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CalendarUser {
    pub contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContributionsCollection {
    pub contribution_calendar: RawCalendar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCalendar {
    pub total_contributions: u32,
    pub weeks: Vec<CalendarWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CalendarWeek {
    pub contribution_days: Vec<ContributionDay>,
}

impl RawCalendar {
    /// Flattens the weeks into a single day list, keeping response order.
    pub fn into_calendar(self) -> ContributionCalendar {
        ContributionCalendar {
            total_contributions: self.total_contributions,
            days: self
                .weeks
                .into_iter()
                .flat_map(|w| w.contribution_days)
                .collect(),
        }
    }
}
