use timebucket_core::{
    InputFormat, KeyFormat, LayoutSet, OutputFormat, PipelineConfig, Template, TimebucketError,
};

use crate::cli::Cli;
use crate::error::{CliError, CliResult};

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: String,
    pub input_format: InputFormat,
    pub output_format: OutputFormat,
    pub table_mode: bool,
    pub comment: Option<u8>,
    pub pipeline: PipelineConfig,
}

pub fn parse_input_format(s: &str) -> CliResult<InputFormat> {
    if s.is_empty() {
        return Err(CliError::input("input format is missing"));
    }
    s.parse().map_err(config_error)
}

pub fn parse_output_format(s: &str) -> CliResult<OutputFormat> {
    if s.is_empty() {
        return Err(CliError::input("output format is missing"));
    }
    s.parse().map_err(config_error)
}

/// The template wins over the column when both are set.
pub fn parse_template(column: Option<&str>, value: Option<&str>) -> CliResult<Template> {
    match (non_empty(value), non_empty(column)) {
        (Some(value), _) => Template::parse(value).map_err(config_error),
        (None, Some(column)) => Ok(Template::field(column)),
        (None, None) => Err(CliError::input(
            "input column and input value are missing, either must be set",
        )),
    }
}

pub fn parse_key_format(s: Option<&str>) -> CliResult<KeyFormat> {
    let spec = non_empty(s).ok_or_else(|| CliError::input("key format is missing"))?;
    KeyFormat::new(spec).map_err(config_error)
}

pub fn parse_layouts(s: Option<&str>) -> CliResult<LayoutSet> {
    match non_empty(s) {
        Some(list) => LayoutSet::from_list(list).map_err(config_error),
        None => Ok(LayoutSet::default()),
    }
}

pub fn parse_comment(s: &str) -> CliResult<Option<u8>> {
    match s.as_bytes() {
        [] => Ok(None),
        [b] if b.is_ascii() => Ok(Some(*b)),
        _ => Err(CliError::input(format!(
            "Invalid comment '{}'. Expected a single ASCII character or an empty string",
            s
        ))),
    }
}

/// Check every option and build the run configuration.
pub fn build_run_config(cli: &Cli) -> CliResult<RunConfig> {
    let input_format = parse_input_format(&cli.input_format)?;
    let template = parse_template(cli.input_column.as_deref(), cli.input_value.as_deref())?;
    let key_format = parse_key_format(cli.key_format.as_deref())?;
    let output_format = parse_output_format(&cli.output_format)?;
    let layouts = parse_layouts(cli.layouts.as_deref())?;
    let comment = parse_comment(&cli.comment)?;

    Ok(RunConfig {
        input: cli.input.clone(),
        input_format,
        output_format,
        table_mode: cli.table,
        comment,
        pipeline: PipelineConfig {
            template,
            layouts,
            key_format,
            limit: cli.limit,
            skip_errors: cli.skip_errors,
        },
    })
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn config_error(err: TimebucketError) -> CliError {
    CliError::input(err.to_string())
}
