use std::io::Write;
use std::sync::OnceLock;

use colored::Colorize;
use gitlogstats_core::model::ContributionRecord;
use gitlogstats_core::ContributorFailure;

static COLOR_ENABLED: OnceLock<bool> = OnceLock::new();

pub fn set_color_enabled(enabled: bool) {
    COLOR_ENABLED.set(enabled).ok();
    colored::control::set_override(enabled);
}

pub(crate) fn color_enabled() -> bool {
    *COLOR_ENABLED.get().unwrap_or(&false)
}

/// Writes the rendered report to stdout, ending it with a newline.
pub fn emit(rendered: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    if !rendered.is_empty() && !rendered.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()
}

/// A repository that could not be fetched or enumerated.
#[derive(Debug)]
pub struct RepositoryFailure {
    pub location: String,
    pub error: anyhow::Error,
}

fn warning_label() -> String {
    if color_enabled() {
        "warning:".yellow().bold().to_string()
    } else {
        "warning:".to_string()
    }
}

pub fn report_repository_failures(failures: &[RepositoryFailure]) {
    let label = warning_label();
    for failure in failures {
        eprintln!(
            "{label} skipped repository {}: {:#}",
            failure.location, failure.error
        );
    }
}

pub fn report_failures(failures: &[ContributorFailure]) {
    let label = warning_label();
    for failure in failures {
        eprintln!(
            "{label} skipped '{}' in {}: {}",
            failure.username, failure.repository, failure.error
        );
    }
}

fn counted(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {one}")
    } else {
        format!("{n} {many}")
    }
}

pub fn summary_line(records: &[ContributionRecord], repositories: usize) -> String {
    if records.is_empty() {
        return "No contributions found.".to_string();
    }
    let commits: u64 = records.iter().map(|r| r.commits).sum();
    let commits = if commits == 1 {
        "1 commit".to_string()
    } else {
        format!("{commits} commits")
    };
    format!(
        "Found {commits} by {} in {}",
        counted(records.len(), "contributor", "contributors"),
        counted(repositories, "repository", "repositories")
    )
}

pub fn print_summary(records: &[ContributionRecord], repositories: usize) {
    let line = summary_line(records, repositories);
    if color_enabled() {
        eprintln!("{} {}", "\u{2713}".green(), line.dimmed());
    } else {
        eprintln!("\u{2713} {line}");
    }
}
