//! Rendering of contribution records.
//!
//! Headers come from the fixed [`FIELD_NAMES`] schema but, as before, are
//! only written when there is at least one record: an empty list renders as
//! an empty string in CSV and Markdown and as `[]` in JSON.
//!
//! Cell values are not escaped. A display name containing `,` (CSV) or `|`
//! (Markdown) will shift the columns of its row.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StatsError};
use crate::model::{ContributionRecord, FIELD_NAMES};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = StatsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(StatsError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

impl OutputFormat {
    pub fn render(self, records: &[ContributionRecord]) -> Result<String> {
        match self {
            OutputFormat::Csv => Ok(render_csv(records)),
            OutputFormat::Json => render_json(records),
            OutputFormat::Markdown => Ok(render_markdown(records)),
        }
    }
}

pub fn render_csv(records: &[ContributionRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }
    let mut out = FIELD_NAMES.join(",");
    out.push('\n');
    for record in records {
        out.push_str(&record.values().join(","));
        out.push('\n');
    }
    out
}

pub fn render_json(records: &[ContributionRecord]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}

pub fn render_markdown(records: &[ContributionRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }
    let mut out = table_row(FIELD_NAMES.iter().copied());
    out.push_str(&table_row(FIELD_NAMES.iter().map(|_| ":----")));
    for record in records {
        out.push_str(&table_row(record.values().iter().map(String::as_str)));
    }
    out
}

fn table_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    format!("| {} |\n", cells.collect::<Vec<_>>().join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogStats;
    use pretty_assertions::assert_eq;

    fn record(name: &str, commits: u64) -> ContributionRecord {
        ContributionRecord::new(
            name,
            "foo-bar",
            "01/01/2021",
            "12/31/2021",
            LogStats {
                commits,
                files: 3,
                insertions: 10,
                deletions: 2,
            },
        )
    }

    #[test]
    fn csv_has_header_and_rows() {
        let out = render_csv(&[record("ann", 1), record("bob", 4)]);
        assert_eq!(
            out,
            "username,repository,start_date,end_date,commits,insertions,deletions,files\n\
             ann,foo-bar,01/01/2021,12/31/2021,1,10,2,3\n\
             bob,foo-bar,01/01/2021,12/31/2021,4,10,2,3\n"
        );
    }

    #[test]
    fn markdown_table() {
        let out = render_markdown(&[record("ann", 1)]);
        assert_eq!(
            out,
            "| username | repository | start_date | end_date | commits | insertions | deletions | files |\n\
             | :---- | :---- | :---- | :---- | :---- | :---- | :---- | :---- |\n\
             | ann | foo-bar | 01/01/2021 | 12/31/2021 | 1 | 10 | 2 | 3 |\n"
        );
    }

    #[test]
    fn empty_list_boundaries() {
        assert_eq!(render_csv(&[]), "");
        assert_eq!(render_markdown(&[]), "");
        assert_eq!(render_json(&[]).ok().as_deref(), Some("[]"));
    }

    #[test]
    fn json_round_trip_preserves_order_and_values() {
        let records = vec![record("ann", 1), record("bob", 2), record("cy", 3)];
        let json = render_json(&records).unwrap_or_else(|e| panic!("{e}"));
        let back: Vec<ContributionRecord> =
            serde_json::from_str(&json).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(back, records);
    }

    #[test]
    fn json_keeps_field_order() {
        let json = render_json(&[record("ann", 1)]).unwrap_or_else(|e| panic!("{e}"));
        assert!(json.starts_with(r#"[{"username":"ann","repository":"foo-bar","start_date""#));
        assert!(json.ends_with(r#""deletions":2,"files":3}]"#));
    }

    #[test]
    fn csv_does_not_escape_commas() {
        let out = render_csv(&[record("Doe, Jane", 1)]);
        assert!(out.contains("\nDoe, Jane,foo-bar,"));
    }

    #[test]
    fn format_parsing() {
        assert_eq!("csv".parse::<OutputFormat>().ok(), Some(OutputFormat::Csv));
        assert_eq!("JSON".parse::<OutputFormat>().ok(), Some(OutputFormat::Json));
        assert_eq!(
            "markdown".parse::<OutputFormat>().ok(),
            Some(OutputFormat::Markdown)
        );
        assert!(matches!(
            "xml".parse::<OutputFormat>(),
            Err(StatsError::UnknownFormat(_))
        ));
    }

    #[test]
    fn display_round_trips() {
        for format in [OutputFormat::Csv, OutputFormat::Json, OutputFormat::Markdown] {
            assert_eq!(format.to_string().parse::<OutputFormat>().ok(), Some(format));
        }
    }
}
