//! Image processing errors.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// The file could not be read or decoded, or decodes to a format other
    /// than GIF/JPEG/PNG.
    #[error("not a valid image: {path}")]
    InvalidImage { path: PathBuf },

    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ImageError {
    /// Client-facing message for this error.
    pub fn client_message(&self) -> String {
        match self {
            ImageError::InvalidImage { .. } => "File is not a valid image".to_string(),
            ImageError::Encode(_) | ImageError::Io(_) => "Failed to process image".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_fixed_table() {
        let err = ImageError::InvalidImage {
            path: PathBuf::from("/uploads/broken.bin"),
        };
        assert_eq!(err.client_message(), "File is not a valid image");

        let err = ImageError::Encode("buffer too small".to_string());
        assert_eq!(err.client_message(), "Failed to process image");

        let err = ImageError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(err.client_message(), "Failed to process image");
    }
}
