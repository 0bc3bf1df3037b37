//! Private key decoding.

use crate::error::{Result, UploadError};

const NSEC_HRP: &str = "nsec";

/// Raw 32-byte private key material.
///
/// Accepts a bech32 `nsec1…` string or 64 hex characters. Whether the bytes
/// form a valid curve scalar is checked by the signer.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let is_nsec = input
            .get(..NSEC_HRP.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(NSEC_HRP));
        if is_nsec {
            // bech32 allows all-uppercase strings but never mixed case.
            let has_lower = input.bytes().any(|b| b.is_ascii_lowercase());
            let has_upper = input.bytes().any(|b| b.is_ascii_uppercase());
            match (has_lower, has_upper) {
                (true, true) => Err(UploadError::KeyDecode("mixed-case nsec".to_string())),
                (false, true) => Self::from_nsec(&input.to_ascii_lowercase()),
                _ => Self::from_nsec(input),
            }
        } else {
            Self::from_hex(input)
        }
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    fn from_nsec(input: &str) -> Result<Self> {
        let (hrp, data) = bech32::decode(input)
            .map_err(|e| UploadError::KeyDecode(format!("malformed nsec: {}", e)))?;
        if hrp.as_str() != NSEC_HRP {
            return Err(UploadError::KeyDecode(format!(
                "expected '{}' prefix, got '{}'",
                NSEC_HRP,
                hrp.as_str()
            )));
        }
        Self::from_slice(&data)
    }

    fn from_hex(input: &str) -> Result<Self> {
        let data = hex::decode(input)
            .map_err(|e| UploadError::KeyDecode(format!("malformed hex key: {}", e)))?;
        Self::from_slice(&data)
    }

    fn from_slice(data: &[u8]) -> Result<Self> {
        let bytes: [u8; 32] = data.try_into().map_err(|_| {
            UploadError::KeyDecode(format!("expected 32 bytes of key material, got {}", data.len()))
        })?;
        Ok(Self(bytes))
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}
