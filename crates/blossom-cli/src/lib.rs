//! Blossom upload CLI: wires configuration, the upload executor, and output
//! reporting together for the GitHub Action entry point.

pub mod reporter;

use std::path::PathBuf;
use std::time::Duration;

use blossom_auth::SchnorrSigner;
use blossom_client::{BlossomClient, UploadExecutor};
use blossom_core::{
    ErrorMetadata, LogLevel, UploadConfig, UploadError, UploadOutcome, UploadRequest, UploadResult,
};
use clap::Parser;

use crate::reporter::Reporter;

/// Command-line overrides. Every flag falls back to its `INPUT_*` variable.
/// The private key is only read from the environment.
#[derive(Parser, Debug)]
#[command(
    name = "blossom-upload",
    about = "Upload a file to a Blossom server with Nostr HTTP auth",
    version
)]
pub struct Cli {
    /// Path to the file to upload (INPUT_FILEPATH)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Blossom server URL (INPUT_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// MIME type for the uploaded part (INPUT_CONTENTTYPE)
    #[arg(long)]
    pub content_type: Option<String>,

    /// Base idempotency token (INPUT_UNIQUEID)
    #[arg(long)]
    pub unique_id: Option<String>,

    /// Maximum number of attempts (INPUT_RETRIES)
    #[arg(long)]
    pub retries: Option<u32>,

    /// Per-attempt request timeout in seconds (INPUT_TIMEOUT)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// File receiving key=value outputs (GITHUB_OUTPUT)
    #[arg(long)]
    pub github_output: Option<PathBuf>,
}

impl Cli {
    /// Layer flags given on the command line over `config`.
    pub fn apply(self, mut config: UploadConfig) -> UploadConfig {
        if let Some(file) = self.file {
            config.file_path = Some(file);
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(content_type) = self.content_type {
            config.content_type = Some(content_type);
        }
        if let Some(unique_id) = self.unique_id {
            config.unique_id = Some(unique_id);
        }
        if let Some(retries) = self.retries {
            config.retries = retries;
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(path) = self.github_output {
            config.github_output = Some(path);
        }
        config
    }
}

/// Run one upload and emit its result.
pub async fn run(config: &UploadConfig, reporter: &dyn Reporter) -> UploadResult {
    match upload(config).await {
        Ok(outcome) => {
            let result = UploadResult::succeeded(outcome);
            reporter.emit(&result);
            result
        }
        Err(err) => fail(err, reporter),
    }
}

/// Log a failure, emit it, and return the failed result.
pub fn fail(err: UploadError, reporter: &dyn Reporter) -> UploadResult {
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %err, code = err.error_code(), "Upload rejected")
        }
        LogLevel::Warn => {
            tracing::warn!(error = %err, code = err.error_code(), "Upload failed")
        }
        LogLevel::Error => {
            tracing::error!(error = %err, code = err.error_code(), "Upload failed")
        }
    }
    let result = UploadResult::failed(err.report_message());
    reporter.emit(&result);
    result
}

async fn upload(config: &UploadConfig) -> blossom_core::Result<UploadOutcome> {
    let request = UploadRequest::from_config(config)?;
    let client = BlossomClient::new(request.host(), config.request_timeout)
        .map_err(|e| UploadError::Validation(format!("{:#}", e)))?;

    UploadExecutor::new(client, SchnorrSigner)
        .execute(&request)
        .await
}

/// Initialize tracing for CLI binaries.
///
/// Logs go to stderr so stdout only carries reported outputs.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from([
            "blossom-upload",
            "--file",
            "out/app.bin",
            "--host",
            "https://files.example.com",
            "--retries",
            "5",
            "--timeout-secs",
            "15",
        ]);
        let config = cli.apply(UploadConfig::default());
        assert_eq!(config.file_path, Some(PathBuf::from("out/app.bin")));
        assert_eq!(config.host, "https://files.example.com");
        assert_eq!(config.retries, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn fail_reports_rejected_input() {
        let err = UploadError::KeyDecode("bad checksum".to_string());
        assert_eq!(err.log_level(), LogLevel::Debug);

        let reporter = crate::reporter::MemoryReporter::default();
        let result = fail(err, &reporter);

        assert!(!result.success);
        assert_eq!(reporter.get("success").as_deref(), Some("false"));
        assert_eq!(
            reporter.get("error").as_deref(),
            Some("Invalid private key: bad checksum")
        );
    }

    #[test]
    fn cli_without_flags_keeps_config() {
        let base = UploadConfig {
            unique_id: Some("from-env".to_string()),
            ..UploadConfig::default()
        };
        let config = Cli::parse_from(["blossom-upload"]).apply(base);
        assert_eq!(config.unique_id.as_deref(), Some("from-env"));
        assert_eq!(config.retries, 3);
    }
}
