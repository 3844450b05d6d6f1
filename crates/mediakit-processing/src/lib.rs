//! Image derivative generation.
//!
//! An [`ImageSource`] is an opened, format-validated image file with cached
//! dimensions. Derivatives are written through [`ImageSource::resize`] and
//! [`ImageSource::thumbnail`]; the source file is never mutated.

pub mod error;
pub mod resizer;
pub mod source;

pub use error::ImageError;
pub use source::ImageSource;
