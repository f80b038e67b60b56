use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    Process {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Invalid date '{value}', expected mm/dd/yyyy")]
    InvalidDate { value: String },

    #[error("Start date {start} is after end date {end}")]
    InvalidRange { start: String, end: String },

    #[error("Unknown format '{0}'. Use: csv, json, markdown")]
    UnknownFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Repository list {path} is empty")]
    EmptyRepositoryList { path: PathBuf },

    #[error("Contributor '{username}' in {repository}: {source}")]
    Contributor {
        username: String,
        repository: String,
        #[source]
        source: Box<StatsError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_carries_its_message() {
        let err = StatsError::Config("exactly one of --repository or --repofile is required".into());
        assert!(err.to_string().contains("--repofile"));
    }

    #[test]
    fn contributor_error_names_who_failed() {
        let err = StatsError::Contributor {
            username: "Jane Doe".to_string(),
            repository: "foo-bar".to_string(),
            source: Box::new(StatsError::Process {
                command: "git log".to_string(),
                status: "exit status: 128".to_string(),
                stderr: "fatal: bad revision".to_string(),
            }),
        };
        let text = err.to_string();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("foo-bar"));
        assert!(text.contains("fatal: bad revision"));
    }
}
