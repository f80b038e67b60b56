use tracing::debug;

use crate::dates::DateRange;
use crate::error::{Result, StatsError};
use crate::git::{AuthorFilter, LogSource};
use crate::model::ContributionRecord;
use crate::parser::{LogParser, ShortstatParser};

/// What to do when one contributor's log cannot be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure and move on to the next contributor.
    #[default]
    Skip,
    /// Stop and return the failure.
    Abort,
}

#[derive(Debug, Clone)]
pub struct StatsRequest {
    /// Short repository name echoed into every record.
    pub repository: String,
    pub range: DateRange,
    /// Restrict to one contributor; otherwise every author is reported.
    pub contributor: Option<String>,
    pub exclusions: Vec<String>,
    /// Drop contributors whose numbers are all zero.
    pub clean: bool,
    pub on_failure: FailurePolicy,
}

#[derive(Debug)]
pub struct ContributorFailure {
    pub username: String,
    pub repository: String,
    pub error: StatsError,
}

#[derive(Debug, Default)]
pub struct Contributions {
    pub records: Vec<ContributionRecord>,
    pub failures: Vec<ContributorFailure>,
}

impl Contributions {
    pub fn extend(&mut self, other: Contributions) {
        self.records.extend(other.records);
        self.failures.extend(other.failures);
    }
}

pub struct Aggregator<'a, S, P = ShortstatParser> {
    source: &'a S,
    parser: P,
}

impl<'a, S: LogSource> Aggregator<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            parser: ShortstatParser,
        }
    }
}

impl<'a, S: LogSource, P: LogParser> Aggregator<'a, S, P> {
    pub fn with_parser(source: &'a S, parser: P) -> Self {
        Self { source, parser }
    }

    /// Builds one record per contributor, in the order they are resolved.
    ///
    /// Fails outright only when the contributor list cannot be enumerated,
    /// or when a contributor fails under [`FailurePolicy::Abort`].
    pub fn collect(&self, request: &StatsRequest) -> Result<Contributions> {
        let authors = match &request.contributor {
            Some(name) => vec![AuthorFilter::Pattern(name.clone())],
            None => self
                .source
                .author_names()?
                .into_iter()
                .map(AuthorFilter::Literal)
                .collect(),
        };

        let window = request.range.git_window();
        let mut out = Contributions::default();

        for author in &authors {
            let log = match self
                .source
                .contributions_log(author, &window, &request.exclusions)
            {
                Ok(log) => log,
                Err(error) => match request.on_failure {
                    FailurePolicy::Abort => {
                        return Err(StatsError::Contributor {
                            username: author.name().to_string(),
                            repository: request.repository.clone(),
                            source: Box::new(error),
                        })
                    }
                    FailurePolicy::Skip => {
                        out.failures.push(ContributorFailure {
                            username: author.name().to_string(),
                            repository: request.repository.clone(),
                            error,
                        });
                        continue;
                    }
                },
            };

            let parsed = self.parser.parse(&log);
            if parsed.unmatched > 0 {
                debug!(
                    contributor = author.name(),
                    repository = %request.repository,
                    "{} commit block(s) did not match the expected log format",
                    parsed.unmatched
                );
            }

            let record = ContributionRecord::new(
                author.name(),
                request.repository.clone(),
                request.range.start_label(),
                request.range.end_label(),
                parsed.totals(),
            );

            if request.clean && record.is_empty() {
                debug!(contributor = author.name(), "no activity, dropped");
                continue;
            }
            out.records.push(record);
        }

        Ok(out)
    }
}
