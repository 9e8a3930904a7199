use std::env;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;

use crate::client::DEFAULT_API_URL;
use crate::render::Theme;

#[derive(Parser, Debug)]
#[command(
    name = "github-contrib",
    version,
    about = "Show a GitHub user's repositories and contribution heat map"
)]
pub struct Cli {
    /// GitHub login to look up
    pub username: String,

    #[arg(long, value_enum, default_value_t = Theme::Dark, help = "Colour scheme")]
    pub theme: Theme,

    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_as_of, help = "Reference date for the heat map (default: today)")]
    pub as_of: Option<NaiveDate>,

    #[arg(long, help = "Output machine-readable JSON")]
    pub json: bool,

    #[arg(long, help = "Skip the repository list")]
    pub no_repos: bool,

    #[arg(long, help = "Print a line for every day with data")]
    pub days: bool,

    #[arg(long, default_value_t = 30, help = "Maximum repositories listed")]
    pub limit: usize,

    #[arg(long, help = "Open the user's profile in a browser")]
    pub open: bool,

    #[arg(short, long, help = "Debug logging to stderr")]
    pub verbose: bool,
}

fn parse_as_of(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

/// Settings resolved from the command line and the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub username: String,
    pub token: Option<String>,
    pub api_url: String,
    pub theme: Theme,
    pub reference: DateTime<Utc>,
    pub json: bool,
    pub show_repos: bool,
    pub show_days: bool,
    pub limit: usize,
    pub open_profile: bool,
}

impl Config {
    /// Merges parsed arguments with `GITHUB_TOKEN` and `GITHUB_API_URL`.
    ///
    /// `.env` must already have been loaded by the caller. Empty variables
    /// count as unset. `now` is used when `--as-of` is absent.
    pub fn resolve(cli: Cli, now: DateTime<Utc>) -> Result<Self> {
        let token = env_non_empty("GITHUB_TOKEN");
        let api_url = env_non_empty("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let reference = match cli.as_of {
            Some(date) => date
                .and_hms_opt(0, 0, 0)
                .context("Invalid --as-of date")?
                .and_utc(),
            None => now,
        };

        Ok(Self {
            username: cli.username,
            token,
            api_url,
            theme: cli.theme,
            reference,
            json: cli.json,
            show_repos: !cli.no_repos,
            show_days: cli.days,
            limit: cli.limit,
            open_profile: cli.open,
        })
    }

    pub fn profile_url(&self) -> String {
        format!("https://github.com/{}", self.username)
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
