//! Terminal rendering of repositories, the heat map and notices.
//!
//! Nothing here reads global state: the palette travels in a
//! [`RenderContext`] handed to every function.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;

use crate::matrix::{classify, ContributionMatrix, ContributionRecord, Intensity, DAYS};
use crate::models::Repository;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const WEEKDAY_LABELS: [&str; DAYS] = ["", "Mon", "", "Wed", "", "Fri", ""];

/// Colour scheme for terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    /// No escape sequences; tiers are drawn with shade glyphs.
    Plain,
}

impl Theme {
    fn tier_rgb(self, tier: Intensity) -> Option<(u8, u8, u8)> {
        let palette: [(u8, u8, u8); 5] = match self {
            Theme::Light => [
                (235, 237, 240),
                (155, 233, 168),
                (64, 196, 99),
                (48, 161, 78),
                (33, 110, 57),
            ],
            Theme::Dark => [
                (22, 27, 34),
                (14, 68, 41),
                (0, 109, 50),
                (38, 166, 65),
                (57, 211, 83),
            ],
            Theme::Plain => return None,
        };
        Some(palette[tier.level()])
    }

    fn is_colored(self) -> bool {
        self != Theme::Plain
    }
}

/// Explicit rendering state passed down to every renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderContext {
    pub theme: Theme,
}

impl RenderContext {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Like [`RenderContext::new`], but drops to [`Theme::Plain`] when the
    /// output is not a terminal.
    pub fn for_output(theme: Theme, is_terminal: bool) -> Self {
        if is_terminal {
            Self::new(theme)
        } else {
            Self::new(Theme::Plain)
        }
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.theme.is_colored() {
            format!("{style}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn tier_cell(&self, tier: Intensity) -> String {
        match self.theme.tier_rgb(tier) {
            Some((r, g, b)) => format!("\x1b[38;2;{r};{g};{b}m■{RESET}"),
            None => ["·", "░", "▒", "▓", "█"][tier.level()].to_string(),
        }
    }
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A one-line status message, shown on stderr.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

pub fn render_notice(notice: &Notice, ctx: &RenderContext) -> String {
    let (tag, style) = match notice.level {
        NoticeLevel::Info => ("info", "\x1b[36m"),
        NoticeLevel::Success => ("ok", "\x1b[32m"),
        NoticeLevel::Error => ("error", "\x1b[31m"),
    };
    format!("{} {}", ctx.paint(style, &format!("[{tag}]")), notice.message)
}

/// Tooltip text for a grid cell.
#[must_use]
pub fn describe_cell(cell: Option<&ContributionRecord>) -> String {
    let Some(record) = cell else {
        return "No contributions".to_string();
    };
    let date = record.date.format("%A, %B %-d, %Y");
    match record.count {
        0 => format!("No contributions on {date}"),
        1 => format!("1 contribution on {date}"),
        n => format!("{n} contributions on {date}"),
    }
}

/// Heat map with weekday labels on the left and a legend below.
#[must_use]
pub fn render_heatmap(matrix: &ContributionMatrix, ctx: &RenderContext) -> String {
    let mut out = String::new();
    for (label, row) in WEEKDAY_LABELS.iter().zip(matrix.rows()) {
        let _ = write!(out, "{label:<4}");
        let cells: Vec<String> = row
            .map(|cell| ctx.tier_cell(classify(cell.map_or(0, |r| r.count))))
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }

    let legend: Vec<String> = Intensity::ALL.iter().map(|t| ctx.tier_cell(*t)).collect();
    let _ = writeln!(out, "{:<4}Less {} More", "", legend.join(" "));
    out
}

/// One tooltip line per occupied cell, oldest first.
#[must_use]
pub fn render_day_list(matrix: &ContributionMatrix) -> String {
    let mut days: Vec<&ContributionRecord> = matrix.records().collect();
    days.sort_by_key(|r| r.date);
    days.into_iter()
        .map(|r| describe_cell(Some(r)) + "\n")
        .collect()
}

/// Headline for the grid total, which covers the 52 drawn weeks.
#[must_use]
pub fn render_summary(total: u64, ctx: &RenderContext) -> String {
    let noun = if total == 1 { "contribution" } else { "contributions" };
    ctx.paint(BOLD, &format!("{total} {noun} in the last 52 weeks"))
}

/// Repository list, at most `limit` entries.
#[must_use]
pub fn render_repos(repos: &[Repository], limit: usize, ctx: &RenderContext) -> String {
    if repos.is_empty() {
        return "No public repositories.\n".to_string();
    }

    let mut out = String::new();
    for repo in repos.iter().take(limit) {
        let fork = if repo.fork { " (fork)" } else { "" };
        let _ = writeln!(
            out,
            "{}{fork}  ★ {}",
            ctx.paint(BOLD, &repo.name),
            repo.stargazers_count
        );
        if let Some(desc) = repo.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "    {desc}");
        }
        let language = repo.language.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "    {}",
            ctx.paint(DIM, &format!("{language} · {} forks · {}", repo.forks_count, repo.html_url))
        );
    }
    if repos.len() > limit {
        let _ = writeln!(out, "... and {} more", repos.len() - limit);
    }
    out
}

/// Machine-readable view of one grid cell.
#[derive(Debug, Serialize)]
pub struct CellReport {
    pub date: chrono::NaiveDate,
    pub count: u32,
    pub intensity: Intensity,
}

/// Everything the CLI prints, for `--json`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub username: &'a str,
    pub reference_date: chrono::NaiveDate,
    pub total_contributions: u64,
    pub repositories: &'a [Repository],
    /// 52 columns of 7 cells, `null` where there is no data.
    pub weeks: Vec<Vec<Option<CellReport>>>,
    pub notices: &'a [Notice],
}

impl<'a> Report<'a> {
    pub fn new(
        username: &'a str,
        reference_date: chrono::NaiveDate,
        repositories: &'a [Repository],
        matrix: &ContributionMatrix,
        notices: &'a [Notice],
    ) -> Self {
        let weeks = matrix
            .columns()
            .map(|col| {
                col.iter()
                    .map(|cell| {
                        cell.map(|r| CellReport {
                            date: r.date,
                            count: r.count,
                            intensity: classify(r.count),
                        })
                    })
                    .collect()
            })
            .collect();
        Self {
            username,
            reference_date,
            total_contributions: matrix.total(),
            repositories,
            weeks,
            notices,
        }
    }
}
