//! JSON and CSV interchange for problem collections
//!
//! JSON is the only format that round-trips: it carries every field,
//! including tags and both timestamps. CSV is export-only and flattens tags
//! into one `"; "`-joined column.

use crate::error::{Error, Result};
use crate::format;
use crate::types::Problem;
use serde::Serialize;
use std::io::{Read, Write};

/// Column headers of the CSV export.
pub const CSV_HEADER: [&str; 9] = [
    "ID",
    "Name",
    "Link",
    "Platform",
    "Difficulty",
    "SolveTime",
    "Tags",
    "Notes",
    "CreatedAt",
];

/// Supported interchange formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(Error::UnsupportedFormat(format!(
                "{} (use 'json' or 'csv')",
                other
            ))),
        }
    }
}

/// Write problems as a JSON array.
///
/// Pretty output uses two-space indentation.
pub fn write_json<W: Write>(mut writer: W, problems: &[Problem], pretty: bool) -> Result<()> {
    if pretty {
        let mut ser = serde_json::Serializer::with_formatter(
            &mut writer,
            serde_json::ser::PrettyFormatter::with_indent(b"  "),
        );
        problems.serialize(&mut ser)?;
    } else {
        serde_json::to_writer(&mut writer, problems)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read a JSON array of problems.
///
/// Identities in the input are cleared so every record becomes a new row.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<Problem>> {
    let mut problems: Vec<Problem> = serde_json::from_reader(reader)?;
    for problem in &mut problems {
        problem.id = 0;
    }
    Ok(problems)
}

/// Write problems as CSV with a header row.
pub fn write_csv<W: Write>(writer: W, problems: &[Problem]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(CSV_HEADER)?;

    for p in problems {
        let tags = p.tag_names().join("; ");
        out.write_record([
            p.id.to_string(),
            p.name.clone(),
            p.link.clone(),
            p.platform.clone(),
            p.difficulty.clone(),
            p.solve_time.to_string(),
            tags,
            p.notes.clone(),
            format::to_csv(p.created_at),
        ])?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> Problem {
        let mut p = Problem::new("Two Sum", "LeetCode", "Easy")
            .with_solve_time(20)
            .with_notes("line one,\nline two")
            .with_tags(["Array", "Hash Map"]);
        p.id = 7;
        p.created_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        p
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_csv_layout() {
        let mut out = Vec::new();
        write_csv(&mut out, &[sample()]).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "ID,Name,Link,Platform,Difficulty,SolveTime,Tags,Notes,CreatedAt"
        );

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "7");
        assert_eq!(&record[6], "Array; Hash Map");
        assert_eq!(&record[7], "line one,\nline two");
        assert_eq!(&record[8], "2024-03-01 09:30:00");
    }

    #[test]
    fn test_json_is_pretty_and_reimportable() {
        let mut out = Vec::new();
        write_json(&mut out, &[sample()], true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": 7,"));

        let back = read_json(text.as_bytes()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].id, 0);
        assert_eq!(back[0].name, "Two Sum");
        assert_eq!(back[0].created_at, sample().created_at);
        assert_eq!(back[0].tag_names(), vec!["Array", "Hash Map"]);
    }

    #[test]
    fn test_read_json_rejects_non_array() {
        assert!(matches!(
            read_json(r#"{"name":"x"}"#.as_bytes()),
            Err(Error::Json(_))
        ));
    }
}
