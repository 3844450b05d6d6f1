//! Format-validated image sources.

use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader};

use crate::error::ImageError;

/// Raster formats derivatives may be produced from.
const SUPPORTED_FORMATS: [ImageFormat; 3] = [ImageFormat::Gif, ImageFormat::Jpeg, ImageFormat::Png];

/// An opened, format-validated image file with cached dimensions.
///
/// Properties are computed once at open time; a file that fails the format
/// gate never yields a source, so there is no stale or partial state to
/// observe on a later attempt.
#[derive(Clone, Debug)]
pub struct ImageSource {
    path: PathBuf,
    width: u32,
    height: u32,
    format: ImageFormat,
    max_width: Option<u32>,
    max_height: Option<u32>,
}

impl ImageSource {
    /// Open `path` and validate it decodes to GIF, JPEG, or PNG.
    ///
    /// `max_width`/`max_height` are the caller-level resize constraints
    /// consulted by the resize policy; they do not affect opening.
    pub fn open(
        path: impl AsRef<Path>,
        max_width: Option<u32>,
        max_height: Option<u32>,
    ) -> Result<Self, ImageError> {
        let path = path.as_ref().to_path_buf();

        // Any failure to read or decode the file is the same outcome for the
        // caller: not a valid image.
        let reader = ImageReader::open(&path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|_| ImageError::InvalidImage { path: path.clone() })?;
        let format = match reader.format() {
            Some(format) if SUPPORTED_FORMATS.contains(&format) => format,
            Some(format) => {
                tracing::debug!(format = ?format, path = %path.display(), "unsupported image format");
                return Err(ImageError::InvalidImage { path });
            }
            None => return Err(ImageError::InvalidImage { path }),
        };

        let (width, height) = reader
            .into_dimensions()
            .map_err(|_| ImageError::InvalidImage { path: path.clone() })?;

        Ok(Self {
            path,
            width,
            height,
            format,
            max_width,
            max_height,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn max_width(&self) -> Option<u32> {
        self.max_width
    }

    pub fn max_height(&self) -> Option<u32> {
        self.max_height
    }

    /// Aspect ratio: width over height.
    pub fn ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([12, 34, 56, 255]),
        ));
        img.save_with_format(&path, ImageFormat::Png).unwrap();
        path
    }

    #[test]
    fn test_open_reads_dimensions_and_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "fixture.png", 200, 100);

        let source = ImageSource::open(&path, None, None).unwrap();
        assert_eq!(source.width(), 200);
        assert_eq!(source.height(), 100);
        assert_eq!(source.format(), ImageFormat::Png);
    }

    #[test]
    fn test_ratio_of_known_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "fixture.png", 200, 100);

        let source = ImageSource::open(&path, None, None).unwrap();
        assert_eq!(source.ratio(), 2.0);
    }

    #[test]
    fn test_open_rejects_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.bmp");
        let img =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255])));
        img.save_with_format(&path, ImageFormat::Bmp).unwrap();

        let err = ImageSource::open(&path, None, None).unwrap_err();
        assert!(matches!(err, ImageError::InvalidImage { .. }));

        // A second attempt fails the same way: no stale state survives
        let err = ImageSource::open(&path, None, None).unwrap_err();
        assert!(matches!(err, ImageError::InvalidImage { .. }));
    }

    #[test]
    fn test_open_rejects_non_image_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "definitely not pixels").unwrap();

        let err = ImageSource::open(&path, None, None).unwrap_err();
        assert!(matches!(err, ImageError::InvalidImage { .. }));
    }

    #[test]
    fn test_open_missing_file_is_invalid_image() {
        let err = ImageSource::open("/no/such/image.png", None, None).unwrap_err();
        assert!(matches!(err, ImageError::InvalidImage { .. }));
    }
}
