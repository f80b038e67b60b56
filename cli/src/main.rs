mod cli;
mod config;
mod output;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use gitlogstats_core::dates::DateRange;
use gitlogstats_core::format::OutputFormat;
use gitlogstats_core::git::{GitCli, DEFAULT_EXCLUSIONS};
use gitlogstats_core::repo::{self, RepoStore};
use gitlogstats_core::{Aggregator, Contributions, FailurePolicy, StatsError, StatsRequest};
use indicatif::{ProgressBar, ProgressStyle};
use output::RepositoryFailure;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("gitlogstats=debug,gitlogstats_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);
    let cfg = config::load();

    let format = match cli.format {
        Some(format) => format,
        None => cfg
            .format
            .as_deref()
            .map(str::parse::<OutputFormat>)
            .transpose()
            .map_err(|e| StatsError::Config(format!("~/.gitlogstats.toml: {e}")))?
            .unwrap_or_default(),
    };
    let range = DateRange::resolve(
        cli.start.as_deref(),
        cli.end.as_deref(),
        Local::now().date_naive(),
    )?;
    let exclusions = cli
        .exclusions
        .as_deref()
        .map(cli::split_exclusions)
        .or(cfg.exclusions)
        .unwrap_or_else(|| DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect());
    let clean = cli.clean || cfg.clean.unwrap_or(false);
    let repos_dir = cli
        .repos_dir
        .or(cfg.repos_dir)
        .unwrap_or_else(|| PathBuf::from("repos"));
    let on_failure = if cli.fail_fast {
        FailurePolicy::Abort
    } else {
        FailurePolicy::Skip
    };

    let interactive = std::io::stderr().is_terminal();
    let use_color = if cli.no_color {
        false
    } else if let Some(cfg_color) = cfg.color {
        cfg_color
    } else {
        interactive
    };
    output::set_color_enabled(use_color);

    let locations = match (&cli.repository, &cli.repofile) {
        (Some(location), None) => vec![location.clone()],
        (None, Some(file)) => repo::read_repository_list(file)
            .with_context(|| format!("Failed to read repository list {}", file.display()))?,
        _ => {
            return Err(StatsError::Config(
                "exactly one of --repository or --repofile is required".to_string(),
            )
            .into())
        }
    };

    debug!(
        "range {} - {}, format {format}, excluding {}",
        range.start_label(),
        range.end_label(),
        exclusions.join(", ")
    );

    let spinner = if interactive && !cli.verbose {
        let sp = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(&[
                "\u{2802}", "\u{2816}", "\u{2834}", "\u{2830}", "\u{2860}", "\u{28e0}", "\u{28c0}",
                "\u{2880}",
            ])
            .template("{spinner} {msg}")
        {
            sp.set_style(style);
        }
        sp.enable_steady_tick(std::time::Duration::from_millis(80));
        Some(sp)
    } else {
        None
    };

    let store = RepoStore::new(repos_dir);
    let mut collected = Contributions::default();
    let mut repo_failures = Vec::new();

    for location in &locations {
        let request = StatsRequest {
            repository: repo::repo_name_from_url(location),
            range: range.clone(),
            contributor: cli.user.clone(),
            exclusions: exclusions.clone(),
            clean,
            on_failure,
        };
        if let Some(sp) = &spinner {
            sp.set_message(format!("Collecting {}...", request.repository));
        }
        match collect_repository(&store, location, &request) {
            Ok(found) => collected.extend(found),
            Err(error) if on_failure == FailurePolicy::Skip => {
                repo_failures.push(RepositoryFailure {
                    location: location.clone(),
                    error,
                });
            }
            Err(error) => {
                if let Some(sp) = &spinner {
                    sp.finish_and_clear();
                }
                return Err(error);
            }
        }
    }

    if let Some(sp) = &spinner {
        sp.finish_and_clear();
    }

    let rendered = format.render(&collected.records)?;
    output::emit(&rendered).context("Failed to write output")?;

    if interactive {
        output::print_summary(&collected.records, locations.len());
    }
    output::report_repository_failures(&repo_failures);
    output::report_failures(&collected.failures);

    match (repo_failures.len(), collected.failures.len()) {
        (0, 0) => Ok(()),
        (0, c) => bail!("{c} contributor(s) could not be processed"),
        (r, 0) => bail!("{r} repository(ies) could not be processed"),
        (r, c) => bail!("{r} repository(ies) and {c} contributor(s) could not be processed"),
    }
}

/// Fetches one repository and collects its contributors.
fn collect_repository(
    store: &RepoStore,
    location: &str,
    request: &StatsRequest,
) -> Result<Contributions> {
    let path = store
        .materialize(location)
        .with_context(|| format!("Failed to fetch repository {location}"))?;
    debug!("switching to {}", path.display());

    let source = GitCli::new(&path);
    Aggregator::new(&source)
        .collect(request)
        .with_context(|| format!("Failed to collect statistics for {location}"))
}
