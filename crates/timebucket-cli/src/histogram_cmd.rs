use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::process::ExitCode;

use timebucket_core::{Pipeline, shape};

use crate::encode::encode;
use crate::error::{CliError, CliResult, EXIT_SUCCESS};
use crate::shared::RunConfig;
use crate::source::{SourceOptions, open_source};

pub fn run_histogram(config: RunConfig) -> CliResult<ExitCode> {
    let reader: Box<dyn BufRead> = if config.input == "-" {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(&config.input).map_err(|e| {
            CliError::runtime(format!("Failed to open file '{}': {}", config.input, e))
        })?;
        Box::new(BufReader::new(file))
    };

    let options = SourceOptions {
        comment: config.comment,
    };
    let records = open_source(reader, config.input_format, options)
        .map_err(|e| CliError::runtime(format!("{e:#}")))?;

    let pipeline = Pipeline::new(config.pipeline);
    let summary = pipeline.run(records)?;

    let shaped = shape(summary.table, config.table_mode, config.output_format);
    let bytes = encode(&shaped, config.output_format).map_err(|e| {
        CliError::runtime(format!(
            "Failed to write {} output: {e:#}",
            config.output_format
        ))
    })?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&bytes)
        .and_then(|()| stdout.flush())
        .map_err(|e| CliError::runtime(format!("Failed to write output: {}", e)))?;

    Ok(ExitCode::from(EXIT_SUCCESS))
}
