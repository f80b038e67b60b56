//! Grammar for `git log --shortstat` output.
//!
//! Each commit is rendered by git as
//!
//! ```text
//! commit 3f2a9c1...
//! Merge: 1a2b3c4 5d6e7f8        (merge commits only)
//! Author: Jane Doe <jane@example.com>
//! Date:   Tue Mar 14 12:00:00 2023 +0100
//!
//!     Summary line
//!
//!  3 files changed, 10 insertions(+), 2 deletions(-)
//! ```
//!
//! The change-summary line is absent when a commit touches nothing outside
//! the excluded paths, and each of its three clauses is optional.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::LogStats;

#[allow(clippy::expect_used)]
static COMMIT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^commit ([0-9a-f]{7,64})\b.*$").expect("commit header regex")
});

#[allow(clippy::expect_used)]
static AUTHOR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Author:[ \t]*(.*?)[ \t]*<([^>\n]*)>[ \t]*$").expect("author regex")
});

#[allow(clippy::expect_used)]
static DATE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Date:[ \t]+(.+?)[ \t]*$").expect("date regex"));

#[allow(clippy::expect_used)]
static SUMMARY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^    (\S.*?)[ \t]*$").expect("summary regex"));

#[allow(clippy::expect_used)]
static SHORTSTAT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^ (\d+) files? changed(?:, (\d+) insertions?\(\+\))?(?:, (\d+) deletions?\(-\))?[ \t]*$",
    )
    .expect("shortstat regex")
});

/// One commit recognised in the log text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEntry {
    pub id: String,
    pub author_name: String,
    pub author_email: String,
    pub date: String,
    pub summary: Option<String>,
    pub files: u64,
    pub insertions: u64,
    pub deletions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLog {
    pub entries: Vec<CommitEntry>,
    /// Commit headers whose block did not have the expected shape.
    pub unmatched: usize,
}

impl ParsedLog {
    pub fn totals(&self) -> LogStats {
        self.entries
            .iter()
            .fold(LogStats::default(), |mut acc, entry| {
                acc.commits += 1;
                acc.files += entry.files;
                acc.insertions += entry.insertions;
                acc.deletions += entry.deletions;
                acc
            })
    }
}

pub trait LogParser {
    fn parse(&self, log: &str) -> ParsedLog;
}

/// Regex-based parser for git's default medium format with `--shortstat`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortstatParser;

impl LogParser for ShortstatParser {
    fn parse(&self, log: &str) -> ParsedLog {
        let starts: Vec<usize> = COMMIT_HEADER.find_iter(log).map(|m| m.start()).collect();
        let mut parsed = ParsedLog::default();

        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(log.len());
            match parse_block(&log[start..end]) {
                Some(entry) => parsed.entries.push(entry),
                None => parsed.unmatched += 1,
            }
        }

        parsed
    }
}

pub fn parse_log(log: &str) -> ParsedLog {
    ShortstatParser.parse(log)
}

fn parse_block(block: &str) -> Option<CommitEntry> {
    let id = COMMIT_HEADER.captures(block)?.get(1)?.as_str().to_string();
    let author = AUTHOR_LINE.captures(block)?;
    let date = DATE_LINE.captures(block)?;
    let date_end = date.get(0)?.end();
    let body = &block[date_end..];

    let summary = SUMMARY_LINE
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    let (files, insertions, deletions) = SHORTSTAT_LINE
        .captures_iter(body)
        .last()
        .map(|caps| (count(&caps, 1), count(&caps, 2), count(&caps, 3)))
        .unwrap_or_default();

    Some(CommitEntry {
        id,
        author_name: author.get(1)?.as_str().to_string(),
        author_email: author.get(2)?.as_str().to_string(),
        date: date.get(1)?.as_str().to_string(),
        summary,
        files,
        insertions,
        deletions,
    })
}

fn count(caps: &regex::Captures<'_>, group: usize) -> u64 {
    caps.get(group)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
