use std::io::IsTerminal;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use github_contrib::config::{Cli, Config};
use github_contrib::render::{self, Notice, RenderContext, Report};
use github_contrib::{build_matrix, GithubClient};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("github_contrib=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    // Load .env variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::resolve(cli, Utc::now())?;

    let client = GithubClient::new(&config.api_url, config.token.as_deref())?;
    let rt = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let ctx = RenderContext::for_output(config.theme, std::io::stdout().is_terminal());
    let mut notices = Vec::new();

    // Repositories first; when requested, a failure here aborts the run.
    let repos = if config.show_repos {
        let repos = rt
            .block_on(client.fetch_user_repos(&config.username))
            .with_context(|| format!("Could not load repositories for {}", config.username))?;
        notices.push(Notice::success(format!("Loaded {} repositories", repos.len())));
        repos
    } else {
        notices.push(Notice::info("Repository list skipped (--no-repos)"));
        Vec::new()
    };
    let shown_repos = &repos[..repos.len().min(config.limit)];

    // The calendar degrades to an empty grid on any failure.
    let calendar = match rt.block_on(client.fetch_contributions(&config.username, config.reference)) {
        Ok(calendar) => calendar,
        Err(e) => {
            tracing::warn!(error = %e, "contribution calendar unavailable");
            notices.push(Notice::error(format!("Contribution calendar unavailable: {e}")));
            Default::default()
        }
    };

    let matrix = build_matrix(&calendar.days, config.reference);

    if config.json {
        let report = Report::new(
            &config.username,
            config.reference.date_naive(),
            shown_repos,
            &matrix,
            &notices,
        );
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        for notice in &notices {
            eprintln!("{}", render::render_notice(notice, &ctx));
        }
        if config.show_repos {
            print!("{}", render::render_repos(&repos, config.limit, &ctx));
            println!();
        }
        println!("{}", render::render_summary(matrix.total(), &ctx));
        print!("{}", render::render_heatmap(&matrix, &ctx));
        if config.show_days {
            println!();
            print!("{}", render::render_day_list(&matrix));
        }
    }

    if config.open_profile {
        let url = config.profile_url();
        if let Err(e) = open::that(&url) {
            tracing::warn!(%url, error = %e, "failed to open browser");
        }
    }

    Ok(())
}
