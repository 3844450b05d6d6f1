//! Error types module
//!
//! Upload failures are terminal for the current request: nothing is retried
//! internally and no partial state is left in the destination directory.
//! Every variant maps onto a fixed client-facing message via
//! [`UploadError::client_message`], including pass-through messages for the
//! transport's own error codes.

use std::io;
use std::path::PathBuf;

/// Transport-level error codes reported alongside each staged file.
///
/// Code 0 means the transport staged the file without problems. The remaining
/// codes mirror the conditions a multipart transport reports: size limits,
/// partial transfers, missing temp directories, and write failures.
pub mod transport_code {
    pub const OK: i32 = 0;
    pub const SIZE_EXCEEDED: i32 = 1;
    pub const FORM_SIZE_EXCEEDED: i32 = 2;
    pub const PARTIAL: i32 = 3;
    pub const NO_FILE: i32 = 4;
    pub const NO_TMP_DIR: i32 = 6;
    pub const CANT_WRITE: i32 = 7;
    pub const STOPPED_BY_EXTENSION: i32 = 8;
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no files were uploaded")]
    NoFilesUploaded,

    #[error("upload directory does not exist: {0}")]
    InvalidUploadDirectory(PathBuf),

    #[error("wrong MIME type: {detected}")]
    WrongMimeType { detected: String },

    #[error("wrong extension: {extension}")]
    WrongExtension { extension: String },

    #[error("transport reported error code {0}")]
    TransportError(i32),

    #[error("cannot move uploaded file to {destination}")]
    CannotMoveFile {
        destination: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl UploadError {
    /// Client-facing message for this error.
    ///
    /// The table is fixed: one message per variant, with transport codes
    /// expanded to the transport's own size/partial/write conditions.
    pub fn client_message(&self) -> String {
        match self {
            UploadError::NoFilesUploaded => "No files were uploaded".to_string(),
            UploadError::InvalidUploadDirectory(_) => {
                "User set upload directory does not exist".to_string()
            }
            UploadError::WrongMimeType { .. } => "File is of the wrong MIME type".to_string(),
            UploadError::WrongExtension { .. } => "File is of the wrong extension".to_string(),
            UploadError::TransportError(code) => transport_message(*code).to_string(),
            UploadError::CannotMoveFile { .. } => "Can not move the uploaded file".to_string(),
            UploadError::Io(_) => "Unknown upload error".to_string(),
        }
    }
}

fn transport_message(code: i32) -> &'static str {
    match code {
        transport_code::SIZE_EXCEEDED => "The uploaded file exceeds the maximum upload size",
        transport_code::FORM_SIZE_EXCEEDED => {
            "The uploaded file exceeds the size limit declared by the form"
        }
        transport_code::PARTIAL => "The uploaded file was only partially uploaded",
        transport_code::NO_FILE => "No file was uploaded",
        transport_code::NO_TMP_DIR => "Missing a temporary folder",
        transport_code::CANT_WRITE => "Failed to write file to disk",
        transport_code::STOPPED_BY_EXTENSION => "File upload stopped by extension",
        _ => "Unknown upload error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_fixed_table() {
        let err = UploadError::NoFilesUploaded;
        assert_eq!(err.client_message(), "No files were uploaded");

        let err = UploadError::WrongMimeType {
            detected: "image/bmp".to_string(),
        };
        assert_eq!(err.client_message(), "File is of the wrong MIME type");

        let err = UploadError::WrongExtension {
            extension: "exe".to_string(),
        };
        assert_eq!(err.client_message(), "File is of the wrong extension");

        let err = UploadError::InvalidUploadDirectory(PathBuf::from("/nope"));
        assert_eq!(
            err.client_message(),
            "User set upload directory does not exist"
        );
    }

    #[test]
    fn test_transport_code_pass_through() {
        assert_eq!(
            UploadError::TransportError(transport_code::PARTIAL).client_message(),
            "The uploaded file was only partially uploaded"
        );
        assert_eq!(
            UploadError::TransportError(transport_code::NO_TMP_DIR).client_message(),
            "Missing a temporary folder"
        );
        assert_eq!(
            UploadError::TransportError(transport_code::CANT_WRITE).client_message(),
            "Failed to write file to disk"
        );
        // Unknown codes fall back to a generic message
        assert_eq!(
            UploadError::TransportError(99).client_message(),
            "Unknown upload error"
        );
    }
}
