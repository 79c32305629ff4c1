use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod encode;
mod error;
mod histogram_cmd;
mod shared;
mod source;

use cli::Cli;
use error::{CliError, render_error};
use histogram_cmd::run_histogram;
use shared::build_run_config;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => return render_error(&CliError::from(err)),
    };
    init_logging(cli.verbose);
    debug!("Parsed CLI args: {:?}", cli);

    let config = match build_run_config(&cli) {
        Ok(config) => config,
        Err(err) => return render_error(&err),
    };

    match run_histogram(config) {
        Ok(code) => code,
        Err(err) => render_error(&err),
    }
}

/// `--verbose` forces debug logging; otherwise `RUST_LOG` applies, defaulting to warnings.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
