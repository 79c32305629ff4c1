//! Serializers for shaped histogram output.
//!
//! Object-native encoders (json, yaml, bson, properties) write a flat map as a
//! single object. Row encoders (csv, tsv, jsonl, tags) always write rows, with
//! a flat map rendered in key order under the standard header.

use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow, bail};
use bson::{Bson, Document};
use csv::{Terminator, WriterBuilder};
use timebucket_core::{OutputFormat, OutputRow, ShapedOutput, TABLE_HEADER};

/// Encode `output` as `format`.
pub fn encode(output: &ShapedOutput, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Bson => encode_bson(output),
        OutputFormat::Csv => encode_delimited(output, b','),
        OutputFormat::Json => encode_json(output),
        OutputFormat::Jsonl => encode_jsonl(output),
        OutputFormat::Properties => encode_properties(output),
        OutputFormat::Tags => encode_tags(output),
        OutputFormat::Tsv => encode_delimited(output, b'\t'),
        OutputFormat::Yaml => encode_yaml(output),
    }
}

/// Header and rows, whatever the shape.
fn rows(output: &ShapedOutput) -> ([&'static str; 2], Vec<(&str, u64)>) {
    match output {
        ShapedOutput::FlatMap(map) => (
            TABLE_HEADER,
            map.iter().map(|(k, v)| (k.as_str(), *v)).collect(),
        ),
        ShapedOutput::Table { header, rows } => (
            *header,
            rows.iter().map(|r| (r.key.as_str(), r.count)).collect(),
        ),
    }
}

fn encode_json(output: &ShapedOutput) -> Result<Vec<u8>> {
    let mut bytes = match output {
        ShapedOutput::FlatMap(map) => serde_json::to_vec(map),
        ShapedOutput::Table { rows, .. } => serde_json::to_vec(rows),
    }
    .context("Failed to serialize JSON")?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn encode_jsonl(output: &ShapedOutput) -> Result<Vec<u8>> {
    let (_, rows) = rows(output);
    let mut bytes = Vec::new();
    for (key, count) in rows {
        let row = OutputRow {
            key: key.to_string(),
            count,
        };
        serde_json::to_writer(&mut bytes, &row).context("Failed to serialize JSON line")?;
        bytes.push(b'\n');
    }
    Ok(bytes)
}

fn encode_delimited(output: &ShapedOutput, delimiter: u8) -> Result<Vec<u8>> {
    let (header, rows) = rows(output);
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(header).context("Failed to write header")?;
    for (key, count) in rows {
        writer
            .write_record([key, count.to_string().as_str()])
            .context("Failed to write row")?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush output: {}", e.error()))
}

fn encode_properties(output: &ShapedOutput) -> Result<Vec<u8>> {
    let ShapedOutput::FlatMap(map) = output else {
        bail!("properties output cannot encode a table; drop --table or pick another format");
    };
    let mut out = String::new();
    for (key, count) in map {
        out.push_str(&escape_property_key(key));
        out.push('=');
        out.push_str(&count.to_string());
        out.push('\n');
    }
    Ok(out.into_bytes())
}

fn escape_property_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        match c {
            '\\' | '=' | ':' | ' ' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

fn encode_tags(output: &ShapedOutput) -> Result<Vec<u8>> {
    let ([key_name, count_name], rows) = rows(output);
    let mut out = String::new();
    for (key, count) in rows {
        out.push_str(&format!(
            "{}={} {}={}\n",
            key_name,
            quote_tag_value(key),
            count_name,
            count
        ));
    }
    Ok(out.into_bytes())
}

fn quote_tag_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '=' || c == '\\');
    if !needs_quotes {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn encode_yaml(output: &ShapedOutput) -> Result<Vec<u8>> {
    let text = match output {
        ShapedOutput::FlatMap(map) => serde_yaml::to_string(map),
        ShapedOutput::Table { rows, .. } => serde_yaml::to_string(rows),
    }
    .context("Failed to serialize YAML")?;
    Ok(text.into_bytes())
}

/// BSON needs a top-level document; tables use the array layout (`"0"`, `"1"`, ...).
fn encode_bson(output: &ShapedOutput) -> Result<Vec<u8>> {
    let document = match output {
        ShapedOutput::FlatMap(map) => count_document(map)?,
        ShapedOutput::Table { header, rows } => {
            let mut document = Document::new();
            for (index, row) in rows.iter().enumerate() {
                let mut entry = Document::new();
                entry.insert(header[0], row.key.clone());
                entry.insert(header[1], bson_count(row.count)?);
                document.insert(index.to_string(), entry);
            }
            document
        }
    };

    let mut bytes = Vec::new();
    document
        .to_writer(&mut bytes)
        .context("Failed to serialize BSON")?;
    Ok(bytes)
}

fn count_document(map: &BTreeMap<String, u64>) -> Result<Document> {
    let mut document = Document::new();
    for (key, count) in map {
        document.insert(key.clone(), bson_count(*count)?);
    }
    Ok(document)
}

fn bson_count(count: u64) -> Result<Bson> {
    let count = i64::try_from(count).context("count exceeds the BSON int64 range")?;
    Ok(Bson::Int64(count))
}
