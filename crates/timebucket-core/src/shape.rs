//! Output shaping.
//!
//! Object-native formats receive the histogram as a flat mapping; everything
//! else (or any format in table mode) receives sorted `{key, count}` rows with
//! a fixed header.

use std::collections::BTreeMap;

use crate::accumulate::FrequencyTable;
use crate::models::{OutputFormat, OutputRow};

/// Column header attached to table-shaped output.
pub const TABLE_HEADER: [&str; 2] = ["key", "count"];

/// The finalized histogram, ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapedOutput {
    /// Bucket key to count.
    FlatMap(BTreeMap<String, u64>),
    /// Rows sorted by key, byte-wise ascending.
    Table {
        header: [&'static str; 2],
        rows: Vec<OutputRow>,
    },
}

impl ShapedOutput {
    pub fn is_table(&self) -> bool {
        matches!(self, ShapedOutput::Table { .. })
    }
}

/// Shape a finalized table for `format`.
pub fn shape(table: FrequencyTable, table_mode: bool, format: OutputFormat) -> ShapedOutput {
    if !table_mode && format.supports_native_object() {
        return ShapedOutput::FlatMap(table.into_inner());
    }

    let mut rows: Vec<OutputRow> = table
        .into_inner()
        .into_iter()
        .map(|(key, count)| OutputRow { key, count })
        .collect();
    rows.sort_by(|a, b| a.key.as_bytes().cmp(b.key.as_bytes()));

    ShapedOutput::Table {
        header: TABLE_HEADER,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FrequencyTable {
        [("2020-01-02", 2), ("2020-01-01", 5), ("2019-12-31", 1)]
            .into_iter()
            .collect()
    }

    fn row(key: &str, count: u64) -> OutputRow {
        OutputRow {
            key: key.to_string(),
            count,
        }
    }

    #[test]
    fn object_native_format_gets_flat_map() {
        match shape(sample(), false, OutputFormat::Json) {
            ShapedOutput::FlatMap(map) => {
                assert_eq!(map.len(), 3);
                assert_eq!(map["2020-01-01"], 5);
            }
            other => panic!("Expected FlatMap, got {other:?}"),
        }
    }

    #[test]
    fn tabular_format_gets_sorted_rows() {
        let shaped = shape(sample(), false, OutputFormat::Csv);
        assert_eq!(
            shaped,
            ShapedOutput::Table {
                header: ["key", "count"],
                rows: vec![
                    row("2019-12-31", 1),
                    row("2020-01-01", 5),
                    row("2020-01-02", 2),
                ],
            }
        );
    }

    #[test]
    fn table_mode_overrides_object_native_format() {
        for format in [OutputFormat::Json, OutputFormat::Yaml, OutputFormat::Bson] {
            assert!(shape(sample(), true, format).is_table(), "{format}");
        }
    }

    #[test]
    fn row_only_formats_always_get_tables() {
        for format in [
            OutputFormat::Csv,
            OutputFormat::Tsv,
            OutputFormat::Jsonl,
            OutputFormat::Tags,
        ] {
            assert!(shape(sample(), false, format).is_table(), "{format}");
        }
    }

    #[test]
    fn sort_is_bytewise() {
        let table: FrequencyTable = [("b", 1), ("B", 1), ("a", 1), ("10", 1), ("9", 1)]
            .into_iter()
            .collect();
        match shape(table, true, OutputFormat::Json) {
            ShapedOutput::Table { rows, .. } => {
                let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
                assert_eq!(keys, vec!["10", "9", "B", "a", "b"]);
            }
            other => panic!("Expected Table, got {other:?}"),
        }
    }

    #[test]
    fn empty_table_shapes_to_empty_rows() {
        let shaped = shape(FrequencyTable::new(), false, OutputFormat::Csv);
        assert_eq!(
            shaped,
            ShapedOutput::Table {
                header: TABLE_HEADER,
                rows: Vec::new(),
            }
        );
    }
}
