//! Scaled and cropped derivatives.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat, ImageReader};
use img_parts::{jpeg::Jpeg, png::Png, ImageEXIF};

use crate::error::ImageError;
use crate::source::ImageSource;

impl ImageSource {
    /// Whether a resize to `width` × `height` is permitted.
    ///
    /// This reproduces a long-standing permissive policy: width feasibility
    /// against either the source width or the configured max width is enough
    /// on its own, and the height is only consulted when both a target height
    /// and a max height exist. Kept literal for compatibility; change it
    /// here, not at call sites.
    pub fn resize_permitted(&self, width: u32, height: Option<u32>) -> bool {
        if self.width() >= width || self.max_width().is_some_and(|max| max >= width) {
            return true;
        }
        match (height, self.max_height()) {
            (Some(height), Some(max_height)) => max_height >= height,
            _ => true,
        }
    }

    /// Scale or crop into `destination`.
    ///
    /// Returns `Ok(false)` without writing anything when the policy denies
    /// the operation. With `crop` and a height, the output is an exact
    /// `width` × `height` center-cropped thumbnail; otherwise the height is
    /// derived from the source aspect ratio. The output is re-encoded in the
    /// source format with embedded metadata stripped. The source file is
    /// never touched.
    pub fn resize(
        &self,
        destination: &Path,
        width: u32,
        height: Option<u32>,
        crop: bool,
    ) -> Result<bool, ImageError> {
        if !self.resize_permitted(width, height) {
            tracing::debug!(
                width,
                height = ?height,
                source_width = self.width(),
                "resize denied by policy"
            );
            return Ok(false);
        }

        let img = ImageReader::open(self.path())?
            .with_guessed_format()?
            .decode()
            .map_err(|_| ImageError::InvalidImage {
                path: self.path().to_path_buf(),
            })?;

        let resized = match (crop, height) {
            (true, Some(height)) => {
                let filter = select_filter(self.width(), self.height(), width, height);
                img.resize_to_fill(width, height, filter)
            }
            _ => {
                let height = ((width as f64 / self.ratio()).round() as u32).max(1);
                let filter = select_filter(self.width(), self.height(), width, height);
                img.resize_exact(width, height, filter)
            }
        };

        let mut buffer = Vec::new();
        resized
            .write_to(&mut Cursor::new(&mut buffer), self.format())
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        let buffer = strip_metadata(buffer, self.format());

        fs::write(destination, &buffer)?;
        tracing::debug!(
            destination = %destination.display(),
            width = resized.width(),
            height = resized.height(),
            "derivative written"
        );
        Ok(true)
    }

    /// Center-cropped thumbnail at exactly `width` × `height`.
    pub fn thumbnail(
        &self,
        destination: &Path,
        width: u32,
        height: u32,
    ) -> Result<bool, ImageError> {
        self.resize(destination, width, Some(height), true)
    }
}

/// Select the resampling filter from the downscale ratio: cheaper filters for
/// aggressive downscales, Lanczos for near-1:1 work.
fn select_filter(orig_width: u32, orig_height: u32, new_width: u32, new_height: u32) -> FilterType {
    let width_ratio = orig_width as f32 / new_width as f32;
    let height_ratio = orig_height as f32 / new_height as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

/// Drop EXIF from encoded JPEG/PNG bytes. GIF carries no EXIF, and the
/// re-encode already dropped everything else.
fn strip_metadata(data: Vec<u8>, format: ImageFormat) -> Vec<u8> {
    match format {
        ImageFormat::Jpeg => {
            if let Ok(mut jpeg) = Jpeg::from_bytes(data.clone().into()) {
                jpeg.set_exif(None);
                return jpeg.encoder().bytes().to_vec();
            }
            data
        }
        ImageFormat::Png => {
            if let Ok(mut png) = Png::from_bytes(data.clone().into()) {
                png.set_exif(None);
                return png.encoder().bytes().to_vec();
            }
            data
        }
        _ => data,
    }
}
