//! Configuration module
//!
//! Inputs arrive as `INPUT_*` environment variables, the way the GitHub
//! Actions runtime exposes action inputs. They are read once into an
//! [`UploadConfig`] at process entry and passed down explicitly.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, UploadError};

pub const DEFAULT_HOST: &str = "https://blossom.swissdash.site";
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

pub const ENV_FILE_PATH: &str = "INPUT_FILEPATH";
pub const ENV_PRIVATE_KEY: &str = "INPUT_NOSTRPRIVATEKEY";
pub const ENV_HOST: &str = "INPUT_HOST";
pub const ENV_CONTENT_TYPE: &str = "INPUT_CONTENTTYPE";
pub const ENV_UNIQUE_ID: &str = "INPUT_UNIQUEID";
pub const ENV_RETRIES: &str = "INPUT_RETRIES";
pub const ENV_TIMEOUT: &str = "INPUT_TIMEOUT";
pub const ENV_GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

/// Raw uploader inputs, before validation.
#[derive(Clone)]
pub struct UploadConfig {
    pub file_path: Option<PathBuf>,
    pub signing_key: Option<String>,
    pub host: String,
    pub unique_id: Option<String>,
    pub content_type: Option<String>,
    pub retries: u32,
    pub request_timeout: Duration,
    /// Append-only output file; `None` means report on stdout.
    pub github_output: Option<PathBuf>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            file_path: None,
            signing_key: None,
            host: DEFAULT_HOST.to_string(),
            unique_id: None,
            content_type: None,
            retries: DEFAULT_RETRIES,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            github_output: None,
        }
    }
}

impl std::fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadConfig")
            .field("file_path", &self.file_path)
            .field("signing_key", &self.signing_key.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("unique_id", &self.unique_id)
            .field("content_type", &self.content_type)
            .field("retries", &self.retries)
            .field("request_timeout", &self.request_timeout)
            .field("github_output", &self.github_output)
            .finish()
    }
}

impl UploadConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset, since the Actions runtime exports
    /// omitted inputs as empty strings.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let retries = match get(ENV_RETRIES) {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                UploadError::Validation(format!(
                    "{} must be a non-negative integer, got '{}'",
                    ENV_RETRIES, raw
                ))
            })?,
            None => DEFAULT_RETRIES,
        };

        let timeout_secs = match get(ENV_TIMEOUT) {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                UploadError::Validation(format!(
                    "{} must be a number of seconds, got '{}'",
                    ENV_TIMEOUT, raw
                ))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            file_path: get(ENV_FILE_PATH).map(PathBuf::from),
            signing_key: get(ENV_PRIVATE_KEY),
            host: get(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            unique_id: get(ENV_UNIQUE_ID),
            content_type: get(ENV_CONTENT_TYPE),
            retries,
            request_timeout: Duration::from_secs(timeout_secs),
            github_output: get(ENV_GITHUB_OUTPUT).map(PathBuf::from),
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.required_inputs().map(|_| ())
    }

    /// Validate every input and return the file path and raw key.
    pub fn required_inputs(&self) -> Result<(&Path, &str)> {
        let file_path = self
            .file_path
            .as_deref()
            .ok_or_else(|| UploadError::Validation("filePath is required".to_string()))?;
        let signing_key = self
            .signing_key
            .as_deref()
            .ok_or_else(|| UploadError::Validation("nostrPrivateKey is required".to_string()))?;
        if self.retries == 0 {
            return Err(UploadError::Validation(
                "retries must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(UploadError::Validation(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if !(self.host.starts_with("http://") || self.host.starts_with("https://")) {
            return Err(UploadError::Validation(format!(
                "host must be an http(s) URL, got '{}'",
                self.host
            )));
        }
        Ok((file_path, signing_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = UploadConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.retries, 3);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(config.file_path.is_none());
        assert!(config.github_output.is_none());
    }

    #[test]
    fn test_empty_inputs_count_as_unset() {
        let config = UploadConfig::from_lookup(lookup(&[
            (ENV_HOST, ""),
            (ENV_CONTENT_TYPE, "  "),
            (ENV_RETRIES, ""),
        ]))
        .unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert!(config.content_type.is_none());
        assert_eq!(config.retries, DEFAULT_RETRIES);
    }

    #[test]
    fn test_reads_all_inputs() {
        let config = UploadConfig::from_lookup(lookup(&[
            (ENV_FILE_PATH, "dist/app.tar.gz"),
            (ENV_PRIVATE_KEY, "nsec1abc"),
            (ENV_HOST, "https://cdn.example.com"),
            (ENV_CONTENT_TYPE, "application/gzip"),
            (ENV_UNIQUE_ID, "build-42"),
            (ENV_RETRIES, "5"),
            (ENV_TIMEOUT, "10"),
            (ENV_GITHUB_OUTPUT, "/tmp/out"),
        ]))
        .unwrap();
        assert_eq!(config.file_path, Some(PathBuf::from("dist/app.tar.gz")));
        assert_eq!(config.signing_key.as_deref(), Some("nsec1abc"));
        assert_eq!(config.host, "https://cdn.example.com");
        assert_eq!(config.content_type.as_deref(), Some("application/gzip"));
        assert_eq!(config.unique_id.as_deref(), Some("build-42"));
        assert_eq!(config.retries, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.github_output, Some(PathBuf::from("/tmp/out")));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_retries_is_validation_error() {
        let err = UploadConfig::from_lookup(lookup(&[(ENV_RETRIES, "three")])).unwrap_err();
        assert!(matches!(err, UploadError::Validation(_)));
    }

    #[test]
    fn test_validate_requires_file_and_key() {
        let config = UploadConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("filePath"));

        let config = UploadConfig {
            file_path: Some(PathBuf::from("a.txt")),
            ..UploadConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("nostrPrivateKey"));
    }

    #[test]
    fn test_validate_rejects_zero_retries_and_bad_host() {
        let base = UploadConfig {
            file_path: Some(PathBuf::from("a.txt")),
            signing_key: Some("key".to_string()),
            ..UploadConfig::default()
        };

        let zero = UploadConfig {
            retries: 0,
            ..base.clone()
        };
        assert!(zero.validate().is_err());

        let ftp = UploadConfig {
            host: "ftp://files.example.com".to_string(),
            ..base
        };
        assert!(ftp.validate().is_err());
    }

    #[test]
    fn test_required_inputs_returns_file_and_key() {
        let config = UploadConfig {
            file_path: Some(PathBuf::from("dist/a.bin")),
            signing_key: Some("key".to_string()),
            ..UploadConfig::default()
        };
        let (file, key) = config.required_inputs().unwrap();
        assert_eq!(file, Path::new("dist/a.bin"));
        assert_eq!(key, "key");

        let missing = UploadConfig {
            signing_key: None,
            ..config
        };
        let err = missing.required_inputs().unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: nostrPrivateKey is required");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = UploadConfig {
            signing_key: Some("nsec1supersecret".to_string()),
            ..UploadConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("supersecret"));
    }
}
