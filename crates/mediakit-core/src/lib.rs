//! Mediakit Core Library
//!
//! This crate provides the shared upload data model, acceptance policy,
//! error taxonomy, and the collaborator seams (filename sanitizer, MIME
//! sniffer) used by the resolver crate.

pub mod config;
pub mod error;
pub mod mime;
pub mod sanitize;
pub mod upload;

// Re-export commonly used types
pub use config::{UploadPolicy, UploadPolicyBuilder};
pub use error::{transport_code, UploadError};
pub use mime::{ContentSniffer, MimeSniffer};
pub use sanitize::{DefaultSanitizer, FilenameSanitizer};
pub use upload::{ResolvedUpload, TransportFile, TransportFiles, UploadRequest, UploadedMedia};
