use std::collections::BTreeSet;
use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Output, Stdio};
use std::thread;

use tracing::debug;

use crate::dates::GitWindow;
use crate::error::{Result, StatsError};

const GIT: &str = "git";

/// Exclusion globs applied when none are configured.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "package.json",
    "package-lock.json",
    "Pipfile",
    "Pipfile.lock",
    "requirements.txt",
    "*.jpg",
    "*.png",
    "*.gif",
    "*.svg",
    "*.pdf",
    "*.zip",
    "*.gz",
    "*.tar",
    "*.csv",
    "*.json",
];

/// How a contributor identity is matched against commit authors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorFilter {
    /// Passed to git as a regular expression, as typed by the user.
    Pattern(String),
    /// An exact name discovered from the log; matched as the whole name
    /// part of `Name <email>`.
    Literal(String),
}

impl AuthorFilter {
    pub fn name(&self) -> &str {
        match self {
            AuthorFilter::Pattern(s) | AuthorFilter::Literal(s) => s,
        }
    }
}

/// Where contributor logs come from. Implemented by [`GitCli`]; tests
/// substitute canned output.
pub trait LogSource {
    /// Commit log with per-commit change summaries for one contributor.
    fn contributions_log(
        &self,
        author: &AuthorFilter,
        window: &GitWindow,
        exclusions: &[String],
    ) -> Result<String>;

    /// Every distinct author name in the full history.
    fn author_names(&self) -> Result<Vec<String>>;
}

/// Runs the `git` binary against a repository checkout.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo: PathBuf,
}

impl GitCli {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(GIT);
        cmd.arg("-C")
            .arg(&self.repo)
            .args(["-c", "log.showSignature=false"])
            .env("LC_ALL", "C");
        cmd
    }
}

impl LogSource for GitCli {
    fn contributions_log(
        &self,
        author: &AuthorFilter,
        window: &GitWindow,
        exclusions: &[String],
    ) -> Result<String> {
        let mut cmd = self.command();
        cmd.args(stats_log_args(author, window, exclusions));
        let output = run(&mut cmd)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn author_names(&self) -> Result<Vec<String>> {
        let mut cmd = self.command();
        cmd.args(["log", "--format=%aN"]);
        let names = stream_lines(&mut cmd)?;
        let authors = unique_authors(names);
        debug!(repo = %self.repo.display(), "contributors: {}", authors.join(", "));
        Ok(authors)
    }
}

/// Arguments after `git -C <repo>` for one contributor's statistics log.
pub fn stats_log_args(
    author: &AuthorFilter,
    window: &GitWindow,
    exclusions: &[String],
) -> Vec<String> {
    let mut args = vec![
        "log".to_string(),
        "--shortstat".to_string(),
        "--no-color".to_string(),
        "--no-decorate".to_string(),
        "--pretty=medium".to_string(),
    ];
    match author {
        AuthorFilter::Pattern(pattern) => args.push(format!("--author={pattern}")),
        AuthorFilter::Literal(name) => {
            args.push("--basic-regexp".to_string());
            args.push(format!("--author={}", anchored_author(name)));
        }
    }
    args.push(window.after_arg());
    args.push(window.before_arg());
    args.extend(pathspec_args(exclusions));
    args
}

/// Basic regex matching exactly `name` followed by its email: `^name <`.
pub fn anchored_author(name: &str) -> String {
    let mut pattern = String::with_capacity(name.len() + 3);
    pattern.push('^');
    for c in name.chars() {
        if matches!(c, '\\' | '.' | '[' | ']' | '*' | '^' | '$') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push_str(" <");
    pattern
}

/// Everything under the repository root except paths matching `exclusions`.
pub fn pathspec_args(exclusions: &[String]) -> Vec<String> {
    let mut args = vec!["--".to_string(), ".".to_string()];
    args.extend(
        exclusions
            .iter()
            .map(|glob| format!(":(exclude,glob)**/{glob}")),
    );
    args
}

/// Distinct author names from `%aN` output, sorted.
///
/// Line breaks and quote characters wrapped around a name are stripped.
pub fn unique_authors<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| clean_author(line.as_ref()))
        .filter(|name| !name.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn clean_author(line: &str) -> String {
    line.trim_end_matches(['\r', '\n'])
        .trim()
        .trim_matches(['\'', '"'])
        .to_string()
}

pub(crate) fn describe(cmd: &Command) -> String {
    let mut parts: Vec<OsString> = vec![cmd.get_program().to_os_string()];
    parts.extend(cmd.get_args().map(|a| a.to_os_string()));
    parts
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn spawn_error(cmd: &Command, source: std::io::Error) -> StatsError {
    StatsError::Spawn {
        program: cmd.get_program().to_string_lossy().into_owned(),
        source,
    }
}

fn check_status(cmd: &Command, status: ExitStatus, stderr: &[u8]) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    Err(StatsError::Process {
        command: describe(cmd),
        status: status.to_string(),
        stderr: String::from_utf8_lossy(stderr).trim().to_string(),
    })
}

/// Runs `cmd` to completion, capturing output. A non-zero exit is an error.
pub(crate) fn run(cmd: &mut Command) -> Result<Output> {
    debug!("running: {}", describe(cmd));
    let output = cmd
        .stdin(Stdio::null())
        .output()
        .map_err(|e| spawn_error(cmd, e))?;
    check_status(cmd, output.status, &output.stderr)?;
    Ok(output)
}

/// Streams stdout line by line. Stderr is drained on its own thread so
/// neither pipe can fill up and block git.
fn stream_lines(cmd: &mut Command) -> Result<Vec<String>> {
    debug!("streaming: {}", describe(cmd));
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(cmd, e))?;

    let stderr = child.stderr.take();
    let stderr_reader = thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = stderr {
            pipe.read_to_end(&mut buf).ok();
        }
        buf
    });

    let lines = match child.stdout.take().map(read_lines).transpose() {
        Ok(lines) => lines.unwrap_or_default(),
        Err(e) => {
            child.kill().ok();
            child.wait().ok();
            return Err(e.into());
        }
    };

    let status = child.wait()?;
    let stderr = stderr_reader.join().unwrap_or_default();
    check_status(cmd, status, &stderr)?;
    Ok(lines)
}

fn read_lines(pipe: impl Read) -> std::io::Result<Vec<String>> {
    let mut reader = BufReader::new(pipe);
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(lines);
        }
        lines.push(String::from_utf8_lossy(&buf).into_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::DateRange;

    fn window() -> GitWindow {
        DateRange::parse("01/01/2021", "12/31/2021")
            .unwrap_or_else(|e| panic!("{e}"))
            .git_window()
    }

    #[test]
    fn unique_authors_dedupes() {
        let lines = vec![
            "Jane Doe\n",
            "Jane Doe\n",
            "Bob\n",
            "Jane Doe\n",
            "Jane Doe\n",
            "Jane Doe\n",
        ];
        assert_eq!(unique_authors(lines), vec!["Bob", "Jane Doe"]);
    }

    #[test]
    fn unique_authors_strips_quotes_and_blank_lines() {
        let lines = vec!["'Jane Doe'\n", "\"Jane Doe\"\r\n", "\n", "'Li Wei'"];
        assert_eq!(unique_authors(lines), vec!["Jane Doe", "Li Wei"]);
    }

    #[test]
    fn pathspec_excludes_each_glob() {
        let args = pathspec_args(&["*.png".to_string(), "package-lock.json".to_string()]);
        assert_eq!(
            args,
            vec![
                "--",
                ".",
                ":(exclude,glob)**/*.png",
                ":(exclude,glob)**/package-lock.json",
            ]
        );
    }

    #[test]
    fn pathspec_keeps_spaces_in_one_argument() {
        let args = pathspec_args(&["my file.txt".to_string()]);
        assert_eq!(args[2], ":(exclude,glob)**/my file.txt");
    }

    #[test]
    fn stats_args_for_pattern_author() {
        let author = AuthorFilter::Pattern("Jane \"JD\" Doe".to_string());
        let args = stats_log_args(&author, &window(), &[]);
        assert_eq!(
            args,
            vec![
                "log",
                "--shortstat",
                "--no-color",
                "--no-decorate",
                "--pretty=medium",
                "--author=Jane \"JD\" Doe",
                "--after=2020-12-31 00:00:00",
                "--before=2022-01-01 00:00:00",
                "--",
                ".",
            ]
        );
    }

    #[test]
    fn literal_author_is_anchored_basic_regex() {
        let author = AuthorFilter::Literal("dependabot[bot]".to_string());
        let args = stats_log_args(&author, &window(), &["*.zip".to_string()]);
        assert!(args.contains(&"--basic-regexp".to_string()));
        assert!(args.contains(&"--author=^dependabot\\[bot\\] <".to_string()));
        assert!(!args.contains(&"--fixed-strings".to_string()));
        assert_eq!(args.last().map(String::as_str), Some(":(exclude,glob)**/*.zip"));
    }

    #[test]
    fn anchored_author_escapes_basic_regex_specials() {
        assert_eq!(anchored_author("Ann"), "^Ann <");
        assert_eq!(anchored_author("J. Doe*"), "^J\\. Doe\\* <");
        assert_eq!(anchored_author("a^b$c\\d"), "^a\\^b\\$c\\\\d <");
        // Plain characters in basic regex syntax stay as they are.
        assert_eq!(anchored_author("Li (Wei) + co?"), "^Li (Wei) + co? <");
    }

    #[test]
    fn default_exclusions_cover_lockfiles_and_media() {
        for glob in [
            "package.json",
            "package-lock.json",
            "Pipfile",
            "Pipfile.lock",
            "requirements.txt",
            "*.jpg",
            "*.png",
            "*.gif",
            "*.svg",
            "*.pdf",
            "*.zip",
            "*.gz",
            "*.tar",
            "*.csv",
            "*.json",
        ] {
            assert!(DEFAULT_EXCLUSIONS.contains(&glob), "missing {glob}");
        }
        assert_eq!(DEFAULT_EXCLUSIONS.len(), 15);
    }

    #[test]
    fn missing_repository_is_a_process_error() {
        let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
        let missing = dir.path().join("nope");
        let git = GitCli::new(&missing);
        match git.author_names() {
            Err(StatsError::Process { stderr, .. }) => assert!(!stderr.is_empty()),
            // No git binary on this machine.
            Err(StatsError::Spawn { .. }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn chatty_stderr_does_not_block_stdout() {
        // Far more than a pipe buffer holds, written before any stdout.
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "head -c 1048576 /dev/zero >&2; echo one; echo two"]);
        let lines = stream_lines(&mut cmd).unwrap_or_else(|e| panic!("{e}"));
        let lines: Vec<_> = lines.iter().map(|l| l.trim_end()).collect();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[cfg(unix)]
    #[test]
    fn streamed_failure_keeps_stderr() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo partial; echo 'fatal: gone' >&2; exit 3"]);
        match stream_lines(&mut cmd) {
            Err(StatsError::Process { stderr, .. }) => assert!(stderr.contains("fatal: gone")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
