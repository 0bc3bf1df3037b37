//! Blossom Uploader Core Library
//!
//! Shared types for the upload pipeline: configuration, the validated upload
//! request, private key decoding, the streaming file digest, server response
//! models, and the error taxonomy.

pub mod config;
pub mod digest;
pub mod error;
pub mod keys;
pub mod models;
pub mod request;

// Re-export commonly used types
pub use config::UploadConfig;
pub use digest::FileDigest;
pub use error::{ErrorMetadata, LogLevel, Result, UploadError};
pub use keys::SecretKey;
pub use models::{BlobDescriptor, UploadOutcome, UploadResult};
pub use request::UploadRequest;
