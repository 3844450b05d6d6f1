//! Upload acceptance policy.
//!
//! The policy is immutable once built. The builder validates everything
//! eagerly, so a missing destination directory fails at construction rather
//! than at the first resolve.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::UploadError;

/// Caller-supplied upload configuration.
///
/// `None` for an allow-set means unrestricted: every value passes that check.
#[derive(Clone, Debug)]
pub struct UploadPolicy {
    allowed_mime_types: Option<HashSet<String>>,
    allowed_extensions: Option<HashSet<String>>,
    destination_directory: PathBuf,
    base_url: String,
}

impl UploadPolicy {
    pub fn builder(destination_directory: impl Into<PathBuf>) -> UploadPolicyBuilder {
        UploadPolicyBuilder {
            allowed_mime_types: None,
            allowed_extensions: None,
            destination_directory: destination_directory.into(),
            base_url: "/media".to_string(),
        }
    }

    /// Whether the policy restricts MIME types at all. When unrestricted,
    /// callers can skip MIME detection entirely.
    pub fn mime_types_restricted(&self) -> bool {
        self.allowed_mime_types.is_some()
    }

    pub fn mime_type_allowed(&self, mime: &str) -> bool {
        self.allowed_mime_types
            .as_ref()
            .map_or(true, |set| set.contains(mime))
    }

    pub fn extension_allowed(&self, extension: &str) -> bool {
        self.allowed_extensions
            .as_ref()
            .map_or(true, |set| set.contains(extension))
    }

    pub fn destination_directory(&self) -> &Path {
        &self.destination_directory
    }

    /// Base URL prefix used to build the public URL of a committed upload.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Builder for [`UploadPolicy`]. `build` fails fast when the destination
/// directory does not exist.
#[derive(Debug)]
pub struct UploadPolicyBuilder {
    allowed_mime_types: Option<HashSet<String>>,
    allowed_extensions: Option<HashSet<String>>,
    destination_directory: PathBuf,
    base_url: String,
}

impl UploadPolicyBuilder {
    pub fn allow_mime_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_mime_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn allow_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn build(self) -> Result<UploadPolicy, UploadError> {
        if !self.destination_directory.is_dir() {
            return Err(UploadError::InvalidUploadDirectory(
                self.destination_directory,
            ));
        }

        Ok(UploadPolicy {
            allowed_mime_types: self.allowed_mime_types,
            allowed_extensions: self.allowed_extensions,
            destination_directory: self.destination_directory,
            base_url: self.base_url,
        })
    }
}
