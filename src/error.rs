use thiserror::Error;

/// Failures reported by the GitHub client that callers may want to match on.
///
/// Transport and decoding failures are not listed here; they surface as
/// `anyhow` errors with context attached.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The contribution calendar is only served by the GraphQL API, which
    /// rejects anonymous requests.
    #[error("GITHUB_TOKEN is not set; the contribution calendar needs an access token")]
    MissingToken,

    /// The username cannot be a GitHub login.
    #[error("invalid GitHub username: {0:?}")]
    InvalidUsername(String),

    /// GitHub has no user with this login.
    #[error("GitHub user not found: {0}")]
    UserNotFound(String),

    /// Non-success HTTP status.
    #[error("GitHub API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The GraphQL endpoint answered with an `errors` array.
    #[error("GitHub GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),
}
