//! NIP-98 authorization for Blossom uploads.
//!
//! [`AuthEventBuilder`] produces a fresh signed [`AuthEvent`] per upload
//! attempt. Cryptography sits behind the [`Signer`] trait; [`SchnorrSigner`]
//! is the secp256k1 implementation.

pub mod event;
pub mod signer;

pub use event::{AuthEvent, AuthEventBuilder, AUTH_SCHEME, KIND_HTTP_AUTH};
pub use signer::{verify_signature, SchnorrSigner, Signer};
