//! Signing capability.
//!
//! The event builder only needs two primitives: derive the public key for a
//! private key, and sign a 32-byte digest. [`Signer`] exposes exactly those so
//! the curve library stays behind one seam.

use blossom_core::{Result, SecretKey, UploadError};
use k256::schnorr::{Signature, SigningKey, VerifyingKey};
use signature::hazmat::{PrehashSigner, PrehashVerifier};

pub trait Signer: Send + Sync {
    /// Hex-encoded x-only public key for `key`.
    fn public_key(&self, key: &SecretKey) -> Result<String>;

    /// Hex-encoded signature of `message` under `key`.
    fn sign(&self, message: &[u8; 32], key: &SecretKey) -> Result<String>;
}

/// BIP-340 Schnorr signatures over secp256k1, as used by Nostr.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchnorrSigner;

impl SchnorrSigner {
    fn signing_key(key: &SecretKey) -> Result<SigningKey> {
        SigningKey::from_bytes(key.as_bytes())
            .map_err(|_| UploadError::KeyDecode("not a valid secp256k1 private key".to_string()))
    }
}

impl Signer for SchnorrSigner {
    fn public_key(&self, key: &SecretKey) -> Result<String> {
        let signing_key = Self::signing_key(key)?;
        Ok(hex::encode(signing_key.verifying_key().to_bytes()))
    }

    fn sign(&self, message: &[u8; 32], key: &SecretKey) -> Result<String> {
        let signing_key = Self::signing_key(key)?;
        let signature: Signature = signing_key
            .sign_prehash(message)
            .map_err(|e| UploadError::Signing(e.to_string()))?;
        Ok(hex::encode(signature.to_bytes()))
    }
}

/// Check a hex signature of `message` against a hex x-only public key.
pub fn verify_signature(public_key: &str, message: &[u8; 32], signature: &str) -> bool {
    let (Ok(pk), Ok(sig)) = (hex::decode(public_key), hex::decode(signature)) else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(&pk) else {
        return false;
    };
    let Ok(signature) = Signature::try_from(sig.as_slice()) else {
        return false;
    };
    verifying_key.verify_prehash(message, &signature).is_ok()
}
