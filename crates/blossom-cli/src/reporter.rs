//! Result reporting.
//!
//! GitHub Actions reads step outputs from the file named by `GITHUB_OUTPUT`,
//! one `key=value` line each. Multi-line values use the heredoc form
//! `key<<DELIMITER`, value, `DELIMITER`.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use blossom_core::UploadResult;

/// Sink for the terminal upload result. Emitting never fails outward.
pub trait Reporter: Send + Sync {
    fn emit(&self, result: &UploadResult);
}

/// Format one output entry.
pub fn format_output(key: &str, value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        format!("{key}<<{delimiter}\n{value}\n{delimiter}\n")
    } else {
        format!("{key}={value}\n")
    }
}

fn render(result: &UploadResult) -> String {
    result
        .outputs()
        .iter()
        .map(|(key, value)| format_output(key, value))
        .collect()
}

/// Appends outputs to the GitHub Actions output file.
#[derive(Debug, Clone)]
pub struct GithubOutputReporter {
    path: PathBuf,
}

impl GithubOutputReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn append(&self, contents: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(contents.as_bytes())?;
        file.flush()
    }
}

impl Reporter for GithubOutputReporter {
    fn emit(&self, result: &UploadResult) {
        if let Err(e) = self.append(&render(result)) {
            tracing::error!(
                error = %e,
                path = %self.path.display(),
                "Failed to write step outputs"
            );
        }
    }
}

/// Prints outputs on stdout, for runs outside GitHub Actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn emit(&self, result: &UploadResult) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout
            .write_all(render(result).as_bytes())
            .and_then(|_| stdout.flush())
        {
            tracing::error!(error = %e, "Failed to write outputs to stdout");
        }
    }
}

/// Keeps emitted entries in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<(String, String)>>,
}

impl MemoryReporter {
    pub fn entries(&self) -> Vec<(String, String)> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl Reporter for MemoryReporter {
    fn emit(&self, result: &UploadResult) {
        let outputs = result
            .outputs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v));
        match self.entries.lock() {
            Ok(mut entries) => entries.extend(outputs),
            Err(poisoned) => poisoned.into_inner().extend(outputs),
        }
    }
}

/// GitHub output file when configured, stdout otherwise.
pub fn reporter_for(github_output: Option<&Path>) -> Box<dyn Reporter> {
    match github_output {
        Some(path) => Box::new(GithubOutputReporter::new(path)),
        None => Box::new(StdoutReporter),
    }
}
