//! Upload with retries.

use blossom_auth::{AuthEventBuilder, Signer};
use blossom_core::{FileDigest, Result, UploadError, UploadOutcome, UploadRequest};

use crate::backoff::{backoff_delay, Sleeper, TokioSleeper};
use crate::BlossomClient;

/// Idempotency token for attempt `attempt` (0-indexed).
///
/// The first attempt uses the base token as-is; retries append `-{attempt}`
/// so each auth event has a distinct payload tag.
pub fn attempt_token(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

/// Runs the authenticated upload with exponential backoff.
pub struct UploadExecutor<S, Z = TokioSleeper> {
    client: BlossomClient,
    signer: S,
    sleeper: Z,
}

impl<S: Signer> UploadExecutor<S, TokioSleeper> {
    pub fn new(client: BlossomClient, signer: S) -> Self {
        Self {
            client,
            signer,
            sleeper: TokioSleeper,
        }
    }
}

impl<S: Signer, Z: Sleeper> UploadExecutor<S, Z> {
    pub fn with_sleeper<Z2: Sleeper>(self, sleeper: Z2) -> UploadExecutor<S, Z2> {
        UploadExecutor {
            client: self.client,
            signer: self.signer,
            sleeper,
        }
    }

    /// Upload the request's file, returning the first success.
    ///
    /// Local failures (unreadable file, bad key) abort before any request is
    /// sent. Retryable failures are retried up to `max_attempts` times with
    /// `2^i` second pauses; a 2xx without a `url` stops immediately.
    pub async fn execute(&self, request: &UploadRequest) -> Result<UploadOutcome> {
        let digest = FileDigest::compute(request.file_path()).await?;
        let pubkey = self.signer.public_key(request.signing_key())?;

        let upload_url = self.client.upload_url();
        let max_attempts = request.max_attempts();
        let builder = AuthEventBuilder::new(&self.signer, request.signing_key(), upload_url.as_str());

        tracing::info!(
            file = %request.file_path().display(),
            size = digest.size,
            sha256 = %digest.sha256,
            url = %upload_url,
            pubkey = %pubkey,
            "Uploading file to Blossom"
        );

        let mut last_error = None;

        for attempt in 0..max_attempts {
            tracing::info!("Upload attempt {}/{}...", attempt + 1, max_attempts);

            let token = attempt_token(request.idempotency_token(), attempt);
            match self.attempt(&builder, request, &digest, &token).await {
                Ok(outcome) => {
                    tracing::info!(
                        url = %outcome.url,
                        hash = %outcome.hash,
                        attempt = attempt + 1,
                        "Upload successful"
                    );
                    return Ok(outcome);
                }
                Err(err) if !err.is_retryable() => {
                    tracing::error!(error = %err, attempt = attempt + 1, "Upload failed, not retrying");
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(error = %err, attempt = attempt + 1, "Upload attempt failed");
                    last_error = Some(err);

                    if attempt + 1 < max_attempts {
                        let delay = backoff_delay(attempt);
                        tracing::info!(delay_secs = delay.as_secs(), "Retrying after backoff");
                        self.sleeper.sleep(delay).await;
                    }
                }
            }
        }

        match last_error {
            Some(last) => Err(UploadError::RetriesExhausted {
                attempts: max_attempts,
                last: Box::new(last),
            }),
            None => Err(UploadError::Validation(
                "retries must be at least 1".to_string(),
            )),
        }
    }

    async fn attempt(
        &self,
        builder: &AuthEventBuilder<'_, S>,
        request: &UploadRequest,
        digest: &FileDigest,
        token: &str,
    ) -> Result<UploadOutcome> {
        let event = builder.build(token)?;
        let authorization = event.authorization_header()?;

        let (url, descriptor) = self
            .client
            .upload_file(
                request.file_path(),
                &request.file_name(),
                digest.size,
                request.content_type(),
                &authorization,
            )
            .await?;

        Ok(UploadOutcome::from_descriptor(&url, &descriptor, digest))
    }
}
