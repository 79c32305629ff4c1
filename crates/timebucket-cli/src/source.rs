//! Record sources for the supported input formats.
//!
//! Every source is a lazy iterator of records; `None` marks the end of the
//! stream. Blank lines and comment lines never produce records.

use std::io::BufRead;

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use serde_json::Value;
use timebucket_core::{InputFormat, Record};

/// Boxed record stream handed to the pipeline.
pub type RecordSource = Box<dyn Iterator<Item = Result<Record>>>;

#[derive(Debug, Clone, Copy, Default)]
pub struct SourceOptions {
    /// Lines starting with this byte are skipped.
    pub comment: Option<u8>,
}

/// Open a record source over `reader`.
///
/// Delimited formats read their header row here, so a broken header fails
/// before any record is processed.
pub fn open_source<R>(reader: R, format: InputFormat, options: SourceOptions) -> Result<RecordSource>
where
    R: BufRead + 'static,
{
    match format {
        InputFormat::Csv => delimited(reader, b',', options),
        InputFormat::Tsv => delimited(reader, b'\t', options),
        InputFormat::Jsonl => Ok(lines(reader, options, parse_json_line)),
        InputFormat::Tags => Ok(lines(reader, options, parse_tags_line)),
    }
}

fn delimited<R>(reader: R, delimiter: u8, options: SourceOptions) -> Result<RecordSource>
where
    R: BufRead + 'static,
{
    let mut csv = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .comment(options.comment)
        .from_reader(reader);
    let headers = csv.headers().context("Failed to read header row")?.clone();

    let records = csv.into_records().map(move |row| {
        let row = row.context("Failed to read row")?;
        Ok(headers
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
            .collect())
    });
    Ok(Box::new(records))
}

fn lines<R, F>(reader: R, options: SourceOptions, parse: F) -> RecordSource
where
    R: BufRead + 'static,
    F: Fn(&str) -> Result<Record> + 'static,
{
    let records = reader.lines().enumerate().filter_map(move |(index, line)| {
        let number = index + 1;
        let line = match line.with_context(|| format!("Failed to read line {number}")) {
            Ok(line) => line,
            Err(err) => return Some(Err(err)),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        if options
            .comment
            .is_some_and(|c| trimmed.as_bytes().first() == Some(&c))
        {
            return None;
        }
        Some(parse(trimmed).with_context(|| format!("line {number}")))
    });
    Box::new(records)
}

fn parse_json_line(line: &str) -> Result<Record> {
    serde_json::from_str(line).context("expected a JSON object")
}

/// Parse `name=value` pairs; values may be double-quoted with `\` escapes.
fn parse_tags_line(line: &str) -> Result<Record> {
    let mut record = Record::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut name = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=' && !c.is_whitespace()) {
            name.push(c);
        }
        if chars.next_if_eq(&'=').is_none() {
            bail!("tag {:?} is missing '='", name);
        }
        if name.is_empty() {
            bail!("tag name is empty");
        }

        let mut value = String::new();
        if chars.next_if_eq(&'"').is_some() {
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some(c) => value.push(c),
                        None => bail!("unterminated quoted value for tag {:?}", name),
                    },
                    Some(c) => value.push(c),
                    None => bail!("unterminated quoted value for tag {:?}", name),
                }
            }
            if chars.peek().is_some_and(|c| !c.is_whitespace()) {
                bail!("unexpected text after quoted value for tag {:?}", name);
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                value.push(c);
            }
        }

        record.insert(name, Value::String(value));
    }

    Ok(record)
}
