//! Core data types for timebucket.
//!
//! This module defines the plain configuration and output types:
//! - [`InputFormat`] - Record encodings understood by the record sources
//! - [`OutputFormat`] - Target encodings for the histogram
//! - [`FormatSpec`] - Per-format capability data
//! - [`OutputRow`] - One `{key, count}` row of table-shaped output

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, TimebucketError};

/// Record encoding of the input stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Comma-separated values with a header row
    #[default]
    Csv,
    /// One JSON object per line
    Jsonl,
    /// Whitespace-separated `name=value` pairs per line
    Tags,
    /// Tab-separated values with a header row
    Tsv,
}

impl InputFormat {
    pub const ALL: [InputFormat; 4] = [
        InputFormat::Csv,
        InputFormat::Jsonl,
        InputFormat::Tags,
        InputFormat::Tsv,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InputFormat::Csv => "csv",
            InputFormat::Jsonl => "jsonl",
            InputFormat::Tags => "tags",
            InputFormat::Tsv => "tsv",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InputFormat {
    type Err = TimebucketError;

    fn from_str(s: &str) -> Result<Self> {
        InputFormat::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                TimebucketError::Config(format!(
                    "input format '{}' is invalid. Expected one of: csv, jsonl, tags, tsv",
                    s
                ))
            })
    }
}

/// Capabilities of an output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    /// Name used on the command line.
    pub name: &'static str,
    /// Whether the format can encode an arbitrary mapping directly.
    pub native_object: bool,
}

/// Target encoding of the histogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Bson,
    #[default]
    Csv,
    Json,
    Jsonl,
    Properties,
    Tags,
    Tsv,
    Yaml,
}

impl OutputFormat {
    /// All output formats, in listing order.
    pub const ALL: [OutputFormat; 8] = [
        OutputFormat::Bson,
        OutputFormat::Csv,
        OutputFormat::Json,
        OutputFormat::Jsonl,
        OutputFormat::Properties,
        OutputFormat::Tags,
        OutputFormat::Tsv,
        OutputFormat::Yaml,
    ];

    /// Capability data for this format.
    pub const fn spec(self) -> FormatSpec {
        let (name, native_object) = match self {
            OutputFormat::Bson => ("bson", true),
            OutputFormat::Csv => ("csv", false),
            OutputFormat::Json => ("json", true),
            OutputFormat::Jsonl => ("jsonl", false),
            OutputFormat::Properties => ("properties", true),
            OutputFormat::Tags => ("tags", false),
            OutputFormat::Tsv => ("tsv", false),
            OutputFormat::Yaml => ("yaml", true),
        };
        FormatSpec {
            name,
            native_object,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn supports_native_object(self) -> bool {
        self.spec().native_object
    }

    /// All output formats, in listing order.
    pub fn all() -> impl Iterator<Item = OutputFormat> {
        Self::ALL.into_iter()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = TimebucketError;

    fn from_str(s: &str) -> Result<Self> {
        OutputFormat::all()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = OutputFormat::all().map(OutputFormat::name).collect();
                TimebucketError::Config(format!(
                    "output format '{}' is invalid. Expected one of: {}",
                    s,
                    names.join(", ")
                ))
            })
    }
}

/// One row of table-shaped output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow {
    pub key: String,
    pub count: u64,
}
