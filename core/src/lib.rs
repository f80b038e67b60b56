//! Per-contributor commit statistics gathered from `git log`.
//!
//! The pipeline is: enumerate contributors (unless one is given), fetch
//! each contributor's `--shortstat` log, parse it into totals, collect
//! [`model::ContributionRecord`]s and render them with [`format`].

pub mod aggregate;
pub mod dates;
pub mod error;
pub mod format;
pub mod git;
pub mod model;
pub mod parser;
pub mod repo;

pub use aggregate::{Aggregator, Contributions, ContributorFailure, FailurePolicy, StatsRequest};
pub use error::{Result, StatsError};
