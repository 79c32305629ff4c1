//! The record-at-a-time bucketing pipeline.
//!
//! For every fetched record the driver extracts a value, parses it into an
//! instant, renders the bucket key and counts it. Per-record failures either
//! abort the run or, with `skip_errors`, drop the record. Source errors always
//! abort.

use std::fmt;

use tracing::{debug, trace};

use crate::accumulate::FrequencyTable;
use crate::error::{Result, TimebucketError};
use crate::extract::{Record, Template};
use crate::key::KeyFormat;
use crate::layout::LayoutSet;

/// Everything the driver needs for one run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Projects each record to the string that gets parsed.
    pub template: Template,
    /// Candidate layouts, tried in order.
    pub layouts: LayoutSet,
    /// Renders parsed instants into bucket keys.
    pub key_format: KeyFormat,
    /// Maximum number of records pulled from the source.
    pub limit: Option<usize>,
    /// Drop records that fail extraction, parsing or formatting.
    pub skip_errors: bool,
}

/// Per-record processing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Parse,
    Format,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extract => write!(f, "extract"),
            Stage::Parse => write!(f, "parse"),
            Stage::Format => write!(f, "format"),
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// The finalized histogram.
    pub table: FrequencyTable,
    /// Records pulled from the source.
    pub fetched: usize,
    /// Records dropped under the skip-errors policy.
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Pipeline { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Compute the bucket key for a single record.
    pub fn bucket_key(&self, record: &Record) -> Result<String> {
        self.process(record).map_err(|(_, err)| err)
    }

    fn process(&self, record: &Record) -> std::result::Result<String, (Stage, TimebucketError)> {
        let value = self
            .config
            .template
            .render(record)
            .map_err(|e| (Stage::Extract, e))?;

        let (layout, instant) = self.config.layouts.matching(&value).ok_or_else(|| {
            (
                Stage::Parse,
                TimebucketError::Parse {
                    value: value.clone(),
                    layouts: self.config.layouts.names(),
                },
            )
        })?;
        trace!(%value, layout, "parsed value");

        self.config
            .key_format
            .format(&instant)
            .map_err(|e| (Stage::Format, e))
    }

    /// Drain `records`, returning the histogram of bucket keys.
    ///
    /// At most `limit` records are pulled from the source. Source errors end
    /// the run regardless of the skip-errors policy.
    pub fn run<I, E>(&self, records: I) -> Result<RunSummary>
    where
        I: IntoIterator<Item = std::result::Result<Record, E>>,
        E: fmt::Display,
    {
        let limit = self.config.limit.unwrap_or(usize::MAX);
        let mut table = FrequencyTable::new();
        let mut fetched = 0;
        let mut skipped = 0;

        for next in records.into_iter().take(limit) {
            fetched += 1;
            let record = next.map_err(|e| TimebucketError::Ingest(format!("{e:#}")))?;

            match self.process(&record) {
                Ok(key) => {
                    trace!(record = fetched, %key, "counted");
                    table.increment(key);
                }
                Err((stage, err)) if self.config.skip_errors && err.is_record_error() => {
                    debug!(record = fetched, %stage, error = %err, "skipping record");
                    skipped += 1;
                }
                Err((_, err)) => {
                    return Err(TimebucketError::Record {
                        index: fetched,
                        source: Box::new(err),
                    });
                }
            }
        }

        debug!(
            fetched,
            skipped,
            buckets = table.len(),
            "finished reading records"
        );

        Ok(RunSummary {
            table,
            fetched,
            skipped,
        })
    }
}
