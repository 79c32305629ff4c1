//! # timebucket-core
//!
//! Histograms of records keyed by a time bucket.
//!
//! Each record is projected to a string with a [`Template`], parsed against an
//! ordered [`LayoutSet`] (first match wins), rendered into a bucket key with a
//! [`KeyFormat`] and counted in a [`FrequencyTable`]. The finished table is
//! shaped for output as either a flat mapping or sorted `{key, count}` rows.
//!
//! ## Features
//!
//! - **Strict Layouts**: A layout matches only when it consumes the whole value.
//! - **Ordered Fallback**: Layouts are tried in configured order; the built-in
//!   order is fixed so ambiguous inputs always resolve the same way.
//! - **Fixed Defaults**: Fields missing from a layout resolve to midnight UTC
//!   on January 1st of year 0, never to the current time.
//! - **Error Policy**: Per-record failures abort the run or are skipped.
//!
//! ## Example
//!
//! ```rust
//! use timebucket_core::prelude::*;
//! use serde_json::json;
//!
//! let pipeline = Pipeline::new(PipelineConfig {
//!     template: Template::field("t"),
//!     layouts: LayoutSet::default(),
//!     key_format: KeyFormat::new("day").unwrap(),
//!     limit: None,
//!     skip_errors: false,
//! });
//!
//! let records = vec![
//!     json!({"t": "2020-01-01T00:00:00"}),
//!     json!({"t": "2020-01-01T12:00:00"}),
//!     json!({"t": "2020-01-02T00:00:00"}),
//! ];
//! let summary = pipeline
//!     .run(records.into_iter().map(|r| Ok::<_, String>(r.as_object().unwrap().clone())))
//!     .unwrap();
//!
//! assert_eq!(summary.table.get("2020-01-01"), Some(2));
//!
//! match shape(summary.table, false, OutputFormat::Csv) {
//!     ShapedOutput::Table { rows, .. } => assert_eq!(rows[0].key, "2020-01-01"),
//!     ShapedOutput::FlatMap(_) => unreachable!("csv is row-only"),
//! }
//! ```

pub mod accumulate;
pub mod error;
pub mod extract;
pub mod key;
pub mod layout;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod shape;

// Re-export commonly used types at the crate root
pub use accumulate::FrequencyTable;
pub use error::{Result, TimebucketError};
pub use extract::{Record, Template};
pub use key::KeyFormat;
pub use layout::{DEFAULT_LAYOUTS, Layout, LayoutSet};
pub use models::{FormatSpec, InputFormat, OutputFormat, OutputRow};
pub use parse::{Instant, parse_instant};
pub use pipeline::{Pipeline, PipelineConfig, RunSummary};
pub use shape::{ShapedOutput, TABLE_HEADER, shape};

/// Prelude module for convenient imports.
///
/// ```
/// use timebucket_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::accumulate::FrequencyTable;
    pub use crate::error::{Result, TimebucketError};
    pub use crate::extract::{Record, Template};
    pub use crate::key::KeyFormat;
    pub use crate::layout::LayoutSet;
    pub use crate::models::*;
    pub use crate::parse::{Instant, parse_instant};
    pub use crate::pipeline::{Pipeline, PipelineConfig, RunSummary};
    pub use crate::shape::{ShapedOutput, shape};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> std::result::Result<Record, String> {
        Ok(value.as_object().unwrap().clone())
    }

    #[test]
    fn full_workflow_flat_map() {
        let pipeline = Pipeline::new(PipelineConfig {
            template: Template::field("t"),
            layouts: LayoutSet::default(),
            key_format: KeyFormat::new("%Y-%m-%d").unwrap(),
            limit: None,
            skip_errors: false,
        });

        let summary = pipeline
            .run(vec![
                record(json!({"t": "2020-01-01T00:00:00"})),
                record(json!({"t": "2020-01-01T12:00:00"})),
                record(json!({"t": "2020-01-02T00:00:00"})),
            ])
            .unwrap();

        let shaped = shape(summary.table, false, OutputFormat::Json);
        let expected = [("2020-01-01".to_string(), 2), ("2020-01-02".to_string(), 1)]
            .into_iter()
            .collect();
        assert_eq!(shaped, ShapedOutput::FlatMap(expected));
    }

    #[test]
    fn full_workflow_table() {
        let pipeline = Pipeline::new(PipelineConfig {
            template: Template::parse("{{.when}}").unwrap(),
            layouts: LayoutSet::default(),
            key_format: KeyFormat::new("hour").unwrap(),
            limit: None,
            skip_errors: true,
        });

        let summary = pipeline
            .run(vec![
                record(json!({"when": "2020-01-01T10:15:00Z"})),
                record(json!({"when": "not a time"})),
                record(json!({"when": "2020-01-01T09:59:59Z"})),
                record(json!({"when": "2020-01-01T10:45:00Z"})),
            ])
            .unwrap();
        assert_eq!(summary.skipped, 1);

        match shape(summary.table, true, OutputFormat::Json) {
            ShapedOutput::Table { header, rows } => {
                assert_eq!(header, TABLE_HEADER);
                let rendered: Vec<(String, u64)> =
                    rows.into_iter().map(|r| (r.key, r.count)).collect();
                assert_eq!(
                    rendered,
                    vec![
                        ("2020-01-01T09".to_string(), 1),
                        ("2020-01-01T10".to_string(), 2),
                    ]
                );
            }
            other => panic!("Expected Table, got {other:?}"),
        }
    }

    #[test]
    fn prelude_exports() {
        use crate::prelude::*;

        let _layouts = LayoutSet::default();
        let _format = OutputFormat::Json;
        let _input = InputFormat::Jsonl;
        let _table = FrequencyTable::new();
    }
}
