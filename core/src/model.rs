use serde::{Deserialize, Serialize};

/// Column names of a [`ContributionRecord`], in declaration order.
pub const FIELD_NAMES: [&str; 8] = [
    "username",
    "repository",
    "start_date",
    "end_date",
    "commits",
    "insertions",
    "deletions",
    "files",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRecord {
    pub username: String,
    pub repository: String,
    pub start_date: String,
    pub end_date: String,
    pub commits: u64,
    pub insertions: u64,
    pub deletions: u64,
    pub files: u64,
}

/// Totals extracted from one contributor's log text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogStats {
    pub commits: u64,
    pub files: u64,
    pub insertions: u64,
    pub deletions: u64,
}

impl ContributionRecord {
    pub fn new(
        username: impl Into<String>,
        repository: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        stats: LogStats,
    ) -> Self {
        Self {
            username: username.into(),
            repository: repository.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            commits: stats.commits,
            insertions: stats.insertions,
            deletions: stats.deletions,
            files: stats.files,
        }
    }

    /// Every numeric column is zero.
    pub fn is_empty(&self) -> bool {
        self.commits == 0 && self.insertions == 0 && self.deletions == 0 && self.files == 0
    }

    /// Stringified values, in the same order as [`FIELD_NAMES`].
    pub fn values(&self) -> [String; 8] {
        [
            self.username.clone(),
            self.repository.clone(),
            self.start_date.clone(),
            self.end_date.clone(),
            self.commits.to_string(),
            self.insertions.to_string(),
            self.deletions.to_string(),
            self.files.to_string(),
        ]
    }
}
