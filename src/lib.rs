//! Fetch a GitHub user's public repositories and contribution calendar and
//! render them for the terminal.
//!
//! The heat-map core lives in [`matrix`] and is pure: callers pass the
//! reference instant explicitly.

pub mod client;
pub mod config;
pub mod error;
pub mod matrix;
pub mod models;
pub mod render;

pub use client::GithubClient;
pub use error::GithubError;
pub use matrix::{build_matrix, classify, ContributionMatrix, ContributionRecord, Intensity};
pub use models::{ContributionCalendar, ContributionDay, Repository};
