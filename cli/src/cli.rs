use clap::Parser;
use gitlogstats_core::format::OutputFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gitlogstats",
    about = "Report commits, insertions, deletions and files changed per contributor",
    version
)]
pub struct Cli {
    /// Repository URL or local path whose logs to parse
    #[arg(short, long, conflicts_with = "repofile", required_unless_present = "repofile")]
    pub repository: Option<String>,

    /// Text file listing one repository URL or path per line
    #[arg(short = 'R', long)]
    pub repofile: Option<PathBuf>,

    /// Only report this git user (default: every contributor)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Start date in mm/dd/yyyy format (default: one year ago)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date in mm/dd/yyyy format (default: today)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Comma-separated file globs to exclude, e.g. "foo.zip, *.jpg, *.json"
    #[arg(short = 'x', long)]
    pub exclusions: Option<String>,

    /// Output format: csv, json, markdown
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Print debugging information to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Leave out contributors without any contribution
    #[arg(short, long)]
    pub clean: bool,

    /// Directory where remote repositories are cloned (default: ./repos)
    #[arg(long)]
    pub repos_dir: Option<PathBuf>,

    /// Stop at the first contributor whose log cannot be read
    #[arg(long)]
    pub fail_fast: bool,

    /// Disable colored output (overrides TTY auto-detection)
    #[arg(long)]
    pub no_color: bool,
}

/// Splits a comma-separated exclusion list, trimming space after commas.
pub fn split_exclusions(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
