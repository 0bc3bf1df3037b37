//! blossom-upload: upload one file to a Blossom server.
//!
//! Reads GitHub Action inputs from INPUT_* variables (see `--help` for flag
//! overrides) and writes url, hash, size, success and error to GITHUB_OUTPUT.
//! Exits 0 on a confirmed upload and 1 otherwise.

use std::path::PathBuf;
use std::process::ExitCode;

use blossom_cli::reporter::reporter_for;
use blossom_cli::{fail, init_tracing, run, Cli};
use blossom_core::config::ENV_GITHUB_OUTPUT;
use blossom_core::{UploadConfig, UploadError};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let reporter = reporter_for(env_output().as_deref());
            let message = err.to_string().trim_end().to_string();
            fail(UploadError::Validation(message), reporter.as_ref());
            return ExitCode::FAILURE;
        }
    };

    let result = match UploadConfig::from_env() {
        Ok(config) => {
            let config = cli.apply(config);
            let reporter = reporter_for(config.github_output.as_deref());
            run(&config, reporter.as_ref()).await
        }
        Err(err) => {
            let output = cli.github_output.or_else(env_output);
            let reporter = reporter_for(output.as_deref());
            fail(err, reporter.as_ref())
        }
    };

    if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn env_output() -> Option<PathBuf> {
    std::env::var_os(ENV_GITHUB_OUTPUT)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
