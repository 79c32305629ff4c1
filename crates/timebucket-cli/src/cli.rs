use clap::Parser;

/// Create histograms from temporal data.
///
/// Reads records from FILE (or stdin for `-`), extracts a date/time value per
/// record, parses it against an ordered list of layouts and counts records per
/// bucket key.
#[derive(Parser, Debug)]
#[command(name = "timebucket")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Input file path (use - for stdin)
    #[arg(default_value = "-")]
    pub input: String,

    /// Input format: csv, jsonl, tags, tsv
    #[arg(short = 'i', long, env = "TIMEBUCKET_INPUT_FORMAT", default_value = "csv")]
    pub input_format: String,

    /// Input column holding the date/time value
    #[arg(short = 'c', long, env = "TIMEBUCKET_INPUT_COLUMN")]
    pub input_column: Option<String>,

    /// Input value template, e.g. "{{.date}}T{{.time}}" (overrides --input-column)
    #[arg(short = 'v', long, env = "TIMEBUCKET_INPUT_VALUE")]
    pub input_value: Option<String>,

    /// Bucket key format: a strftime pattern or one of year, month, day, hour, minute, second
    #[arg(short = 'k', long, env = "TIMEBUCKET_KEY_FORMAT")]
    pub key_format: Option<String>,

    /// Output format: bson, csv, json, jsonl, properties, tags, tsv, yaml
    #[arg(short = 'o', long, env = "TIMEBUCKET_OUTPUT_FORMAT", default_value = "csv")]
    pub output_format: String,

    /// Comma-separated layouts replacing the built-in list
    #[arg(short = 'l', long, env = "TIMEBUCKET_LAYOUTS")]
    pub layouts: Option<String>,

    /// Maximum number of records to process
    #[arg(short = 'n', long, env = "TIMEBUCKET_LIMIT")]
    pub limit: Option<usize>,

    /// Skip records that cannot be extracted or parsed
    #[arg(short = 'e', long, env = "TIMEBUCKET_SKIP_ERRORS")]
    pub skip_errors: bool,

    /// Serialize the frequency distribution as a table
    #[arg(short = 't', long, env = "TIMEBUCKET_TABLE")]
    pub table: bool,

    /// Comment prefix for input lines (a single character; empty disables)
    #[arg(long, env = "TIMEBUCKET_COMMENT", default_value = "#")]
    pub comment: String,

    /// Enable verbose (debug) logging
    #[arg(long)]
    pub verbose: bool,
}
