//! Upload resolution: validation, safe naming, and the single-move commit.
//!
//! A caller builds an [`mediakit_core::UploadPolicy`], wraps it in an
//! [`UploadResolver`], resolves an [`mediakit_core::UploadRequest`] into a
//! [`mediakit_core::ResolvedUpload`], and commits it through a [`TempStore`].

pub mod resolver;
pub mod store;

pub use resolver::UploadResolver;
pub use store::{FsTempStore, TempStore};
