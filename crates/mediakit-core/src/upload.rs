//! Upload data model.
//!
//! The transport layer stages uploaded bytes to a temp location and hands the
//! per-field records over as an explicit [`TransportFiles`] value; nothing in
//! this crate reaches into ambient process state.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::UploadError;
use crate::mime::MimeSniffer;

/// One staged file as reported by the transport layer.
///
/// The transport-declared content type is deliberately absent: the MIME type
/// is always detected locally from the staged bytes.
#[derive(Clone, Debug)]
pub struct TransportFile {
    pub name: String,
    pub tmp_name: PathBuf,
    pub size: u64,
    pub error: i32,
}

/// The files the transport staged for the current request, keyed by form
/// field name.
#[derive(Clone, Debug, Default)]
pub struct TransportFiles {
    files: HashMap<String, TransportFile>,
}

impl TransportFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, file: TransportFile) {
        self.files.insert(field.into(), file);
    }

    pub fn field(&self, name: &str) -> Option<&TransportFile> {
        self.files.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Raw upload metadata for a single incoming file.
///
/// The detected MIME type and the extension are computed at most once per
/// request; the `OnceCell` state distinguishes "not yet computed" from
/// "computed empty".
#[derive(Debug)]
pub struct UploadRequest {
    original_name: String,
    temp_path: PathBuf,
    declared_size: u64,
    transport_error_code: i32,
    detected_mime_type: OnceCell<String>,
    extension: OnceCell<String>,
}

impl UploadRequest {
    pub fn new(
        original_name: impl Into<String>,
        temp_path: impl Into<PathBuf>,
        declared_size: u64,
        transport_error_code: i32,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            temp_path: temp_path.into(),
            declared_size,
            transport_error_code,
            detected_mime_type: OnceCell::new(),
            extension: OnceCell::new(),
        }
    }

    /// Build a request from the named transport field.
    ///
    /// Fails with `NoFilesUploaded` when the transport staged nothing at all
    /// or the field is absent.
    pub fn from_field(files: &TransportFiles, field: &str) -> Result<Self, UploadError> {
        if files.is_empty() {
            return Err(UploadError::NoFilesUploaded);
        }
        let file = files.field(field).ok_or(UploadError::NoFilesUploaded)?;
        Ok(Self::new(
            file.name.clone(),
            file.tmp_name.clone(),
            file.size,
            file.error,
        ))
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    pub fn declared_size(&self) -> u64 {
        self.declared_size
    }

    pub fn transport_error_code(&self) -> i32 {
        self.transport_error_code
    }

    /// MIME type detected from the staged bytes, sniffed at most once.
    pub fn detected_mime_type(&self, sniffer: &dyn MimeSniffer) -> Result<&str, UploadError> {
        if let Some(mime) = self.detected_mime_type.get() {
            return Ok(mime);
        }
        let mime = sniffer.sniff(&self.temp_path)?;
        Ok(self.detected_mime_type.get_or_init(|| mime).as_str())
    }

    /// Extension derived from the original name, computed at most once.
    /// Empty when the name carries no extension.
    pub fn extension(&self) -> &str {
        self.extension
            .get_or_init(|| {
                Path::new(&self.original_name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default()
                    .to_string()
            })
            .as_str()
    }

    /// Base name of the original file, directory components and extension
    /// stripped. Untrusted; run it through the sanitizer before use.
    pub fn base_name(&self) -> &str {
        Path::new(&self.original_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }
}

/// A validated, renamed, not-yet-moved upload.
///
/// Created by `resolve` once validation succeeds and consumed exactly once by
/// `commit`; the temp file stays where the transport put it until then.
#[derive(Debug)]
pub struct ResolvedUpload {
    pub safe_name: String,
    pub destination_path: PathBuf,
    pub temp_path: PathBuf,
    pub sanitized_base: String,
    pub extension: String,
}

/// Success payload handed to the media-persistence collaborator.
#[derive(Clone, Debug, Serialize)]
pub struct UploadedMedia {
    pub name: String,
    pub url: String,
    pub ext: String,
}
