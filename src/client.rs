use anyhow::{Context, Result};
use chrono::{DateTime, Days, Months, SecondsFormat, Utc};
use reqwest::{Client, Response};
use serde_json::json;

use crate::error::GithubError;
use crate::models::{CalendarData, ContributionCalendar, GraphQlResponse, Repository};

/// Public GitHub API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = "github-contrib";

const CALENDAR_QUERY: &str = "query($login: String!, $from: DateTime!, $to: DateTime!) { \
    user(login: $login) { \
        contributionsCollection(from: $from, to: $to) { \
            contributionCalendar { \
                totalContributions \
                weeks { contributionDays { date contributionCount } } \
            } \
        } \
    } \
}";

/// Creates a preconfigured HTTP client with required headers.
fn build_client(token: Option<&str>) -> Result<Client> {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

    let mut headers = HeaderMap::new();
    headers.insert("User-Agent", HeaderValue::from_static(USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

    if let Some(token) = token {
        let mut val = HeaderValue::from_str(&format!("Bearer {token}"))
            .context("Invalid token value")?;
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
    }

    Client::builder()
        .default_headers(headers)
        .build()
        .context("Failed to build HTTP client")
}

/// Thin client over the two GitHub endpoints this tool reads.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    api_url: String,
    authenticated: bool,
}

impl GithubClient {
    /// Builds a client against `api_url` (e.g. [`DEFAULT_API_URL`]).
    ///
    /// # Errors
    /// Fails if the token is not a valid header value or the TLS backend
    /// cannot be initialized.
    pub fn new(api_url: &str, token: Option<&str>) -> Result<Self> {
        Ok(Self {
            http: build_client(token)?,
            api_url: api_url.trim_end_matches('/').to_string(),
            authenticated: token.is_some(),
        })
    }

    /// Whether requests carry an access token.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Fetches up to 100 public repositories, most recently updated first.
    ///
    /// # Errors
    /// [`GithubError::InvalidUsername`], [`GithubError::UserNotFound`] or
    /// [`GithubError::Status`], plus transport and decoding failures.
    pub async fn fetch_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
        validate_username(username)?;
        let url = format!(
            "{}/users/{username}/repos?per_page=100&sort=updated",
            self.api_url
        );
        tracing::debug!(%url, "fetching repositories");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send request to GitHub API")?;
        let response = check_status(response, username).await?;

        let repos = response
            .json::<Vec<Repository>>()
            .await
            .context("Failed to deserialize repository list")?;
        tracing::debug!(count = repos.len(), "repositories received");

        Ok(repos)
    }

    /// Fetches the year of the user's contribution calendar that ends on
    /// the UTC day of `reference`.
    ///
    /// # Errors
    /// [`GithubError::MissingToken`] without sending anything when the
    /// client is anonymous; [`GithubError::GraphQl`] when the response
    /// carries errors; [`GithubError::UserNotFound`] for a `null` user.
    pub async fn fetch_contributions(
        &self,
        username: &str,
        reference: DateTime<Utc>,
    ) -> Result<ContributionCalendar> {
        validate_username(username)?;
        if !self.authenticated {
            anyhow::bail!(GithubError::MissingToken);
        }

        let url = format!("{}/graphql", self.api_url);
        let (from, to) = calendar_range(reference);
        let body = json!({
            "query": CALENDAR_QUERY,
            "variables": {
                "login": username,
                "from": from.to_rfc3339_opts(SecondsFormat::Secs, true),
                "to": to.to_rfc3339_opts(SecondsFormat::Secs, true),
            },
        });
        tracing::debug!(%url, username, %from, %to, "fetching contribution calendar");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to send GraphQL request")?;
        let response = check_status(response, username).await?;

        let envelope: GraphQlResponse<CalendarData> = response
            .json()
            .await
            .context("Failed to deserialize GraphQL response")?;

        if !envelope.errors.is_empty() {
            let messages = envelope.errors.into_iter().map(|e| e.message).collect();
            anyhow::bail!(GithubError::GraphQl(messages));
        }

        let user = envelope
            .data
            .and_then(|d| d.user)
            .ok_or_else(|| GithubError::UserNotFound(username.to_string()))?;

        let calendar = user.contributions_collection.contribution_calendar.into_calendar();
        tracing::debug!(
            days = calendar.days.len(),
            total = calendar.total_contributions,
            "contribution calendar received"
        );
        Ok(calendar)
    }
}

/// Query window for the calendar: from the day after the same date a year
/// earlier up to the last second of the reference day.
///
/// GitHub refuses ranges longer than a year. The day left out is always more
/// than 51 weeks back, so the grid never needs it.
fn calendar_range(reference: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = reference.date_naive();
    let first = today
        .checked_sub_months(Months::new(12))
        .and_then(|d| d.checked_add_days(Days::new(1)))
        .unwrap_or(today);
    let from = first.and_hms_opt(0, 0, 0).map_or(reference, |dt| dt.and_utc());
    let to = today.and_hms_opt(23, 59, 59).map_or(reference, |dt| dt.and_utc());
    (from, to)
}

async fn check_status(response: Response, username: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        anyhow::bail!(GithubError::UserNotFound(username.to_string()));
    }
    let body = response.text().await.unwrap_or_default();
    anyhow::bail!(GithubError::Status {
        status: status.as_u16(),
        body,
    })
}

/// GitHub logins are 1-39 ASCII alphanumerics or single inner hyphens.
fn validate_username(username: &str) -> Result<(), GithubError> {
    let ok = !username.is_empty()
        && username.len() <= 39
        && !username.starts_with('-')
        && !username.ends_with('-')
        && !username.contains("--")
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if ok {
        Ok(())
    } else {
        Err(GithubError::InvalidUsername(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_regular_logins() {
        for name in ["octocat", "a", "rust-lang", "user123"] {
            assert!(validate_username(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_malformed_logins() {
        let long = "a".repeat(40);
        for name in ["", "-lead", "trail-", "dou--ble", "sp ace", "a/b", "ü", long.as_str()] {
            assert!(
                matches!(validate_username(name), Err(GithubError::InvalidUsername(_))),
                "{name}"
            );
        }
    }

    #[test]
    fn trims_trailing_slash_from_api_url() {
        let client = GithubClient::new("http://localhost:1234/", None).unwrap();
        assert_eq!(client.api_url, "http://localhost:1234");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn calendar_range_spans_just_under_a_year() {
        use chrono::TimeZone;

        let reference = Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap();
        let (from, to) = calendar_range(reference);
        assert_eq!(from, Utc.with_ymd_and_hms(2023, 6, 16, 0, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2024, 6, 15, 23, 59, 59).unwrap());

        // Leap-day reference: the window starts the day after 2023-02-28.
        let (from, _) = calendar_range(Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
        assert_eq!(from, Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn anonymous_client_refuses_calendar_request() {
        let client = GithubClient::new("http://127.0.0.1:9", None).unwrap();
        let err = client.fetch_contributions("octocat", Utc::now()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GithubError>(),
            Some(GithubError::MissingToken)
        ));
    }
}
