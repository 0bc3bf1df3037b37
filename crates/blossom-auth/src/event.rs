//! NIP-98 HTTP auth events.
//!
//! An auth event binds one HTTP request (URL and method) to a signing key. The
//! `payload` tag carries the idempotency token, so every retry produces a
//! distinct event id and signature.

use blossom_core::{Result, SecretKey, UploadError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::signer::{verify_signature, Signer};

/// Event kind reserved for HTTP auth.
pub const KIND_HTTP_AUTH: u16 = 27235;

/// Scheme token that prefixes the serialized event in the `Authorization` header.
pub const AUTH_SCHEME: &str = "Nostr";

pub const TAG_URL: &str = "u";
pub const TAG_METHOD: &str = "method";
pub const TAG_PAYLOAD: &str = "payload";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEvent {
    pub id: String,
    pub pubkey: String,
    pub created_at: i64,
    pub kind: u16,
    pub tags: Vec<Vec<String>>,
    pub content: String,
    pub sig: String,
}

/// Compute the event id: SHA-256 of `[0, pubkey, created_at, kind, tags, content]`.
pub fn compute_id(
    pubkey: &str,
    created_at: i64,
    kind: u16,
    tags: &[Vec<String>],
    content: &str,
) -> Result<[u8; 32]> {
    let canonical = serde_json::to_string(&(0, pubkey, created_at, kind, tags, content))
        .map_err(|e| UploadError::Signing(format!("failed to serialize event: {}", e)))?;
    Ok(Sha256::digest(canonical.as_bytes()).into())
}

impl AuthEvent {
    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> Result<String> {
        let json = serde_json::to_string(self)
            .map_err(|e| UploadError::Signing(format!("failed to serialize event: {}", e)))?;
        Ok(format!("{} {}", AUTH_SCHEME, json))
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.first().map(String::as_str) == Some(name))
            .and_then(|t| t.get(1))
            .map(String::as_str)
    }

    /// Recompute the id and check the signature against `pubkey`.
    pub fn verify(&self) -> bool {
        let Ok(id) = compute_id(
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
            &self.content,
        ) else {
            return false;
        };
        hex::encode(id) == self.id && verify_signature(&self.pubkey, &id, &self.sig)
    }
}

/// Builds signed auth events for one URL and key.
pub struct AuthEventBuilder<'a, S: Signer> {
    signer: &'a S,
    key: &'a SecretKey,
    url: String,
    method: String,
    created_at: Option<i64>,
}

impl<'a, S: Signer> AuthEventBuilder<'a, S> {
    pub fn new(signer: &'a S, key: &'a SecretKey, url: impl Into<String>) -> Self {
        Self {
            signer,
            key,
            url: url.into(),
            method: "POST".to_string(),
            created_at: None,
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Pin the timestamp instead of reading the clock.
    pub fn created_at(mut self, created_at: i64) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn tags(&self, token: &str) -> Vec<Vec<String>> {
        vec![
            vec![TAG_URL.to_string(), self.url.clone()],
            vec![TAG_METHOD.to_string(), self.method.clone()],
            vec![TAG_PAYLOAD.to_string(), token.to_string()],
        ]
    }

    /// Build and sign an event carrying `token` in its payload tag.
    pub fn build(&self, token: &str) -> Result<AuthEvent> {
        let pubkey = self.signer.public_key(self.key)?;
        let created_at = self
            .created_at
            .unwrap_or_else(|| chrono::Utc::now().timestamp());
        let tags = self.tags(token);
        let content = String::new();

        let id = compute_id(&pubkey, created_at, KIND_HTTP_AUTH, &tags, &content)?;
        let sig = self.signer.sign(&id, self.key)?;

        tracing::debug!(
            event_id = %hex::encode(id),
            pubkey = %pubkey,
            token = %token,
            "Signed upload auth event"
        );

        Ok(AuthEvent {
            id: hex::encode(id),
            pubkey,
            created_at,
            kind: KIND_HTTP_AUTH,
            tags,
            content,
            sig,
        })
    }
}
