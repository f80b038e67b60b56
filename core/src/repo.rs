use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::error::{Result, StatsError};
use crate::git;

/// Human-ish repository name: `foo-bar` for `https://github.com/org/foo-bar.git`.
///
/// Trailing separators are ignored, the last path segment is kept and cut
/// at its first `.`.
pub fn repo_name_from_url(location: &str) -> String {
    let trimmed = location.trim().trim_end_matches(['/', '\\']);
    let last = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
    last.split('.').next().unwrap_or(last).to_string()
}

/// Reads repository locations, one per line. Blank lines and `#` comments
/// are skipped.
pub fn read_repository_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let locations = parse_repository_list(&content);
    if locations.is_empty() {
        return Err(StatsError::EmptyRepositoryList {
            path: path.to_path_buf(),
        });
    }
    Ok(locations)
}

fn parse_repository_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Directory holding clones of remote repositories, keyed by short name.
#[derive(Debug, Clone)]
pub struct RepoStore {
    root: PathBuf,
}

impl RepoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn checkout_path(&self, location: &str) -> PathBuf {
        self.root.join(repo_name_from_url(location))
    }

    /// Returns a local checkout for `location`.
    ///
    /// Existing directories are used in place. Remote locations are cloned
    /// on first use and pulled afterwards; a failed pull falls back to the
    /// checkout already on disk.
    pub fn materialize(&self, location: &str) -> Result<PathBuf> {
        let local = Path::new(location);
        if local.is_dir() {
            debug!(path = %local.display(), "using local repository");
            return Ok(local.to_path_buf());
        }

        let dest = self.checkout_path(location);
        if dest.exists() {
            let mut pull = Command::new("git");
            pull.arg("-C").arg(&dest).arg("pull");
            if let Err(e) = git::run(&mut pull) {
                warn!(repo = %dest.display(), "pull failed, using existing checkout: {e}");
            }
        } else {
            fs::create_dir_all(&self.root)?;
            let mut clone = Command::new("git");
            clone.arg("clone").arg(location).arg(&dest);
            git::run(&mut clone)?;
        }
        Ok(dest)
    }
}
