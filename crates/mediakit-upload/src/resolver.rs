//! Upload validation and safe-name resolution.

use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

use mediakit_core::{
    ContentSniffer, DefaultSanitizer, FilenameSanitizer, MimeSniffer, ResolvedUpload, UploadError,
    UploadPolicy, UploadRequest, UploadedMedia,
};

use crate::store::TempStore;

/// How many times `commit` regenerates the name when the exclusive claim on
/// the destination loses a race.
const MAX_CLAIM_ATTEMPTS: u32 = 3;

/// Validates a single upload against a policy and computes a safe,
/// collision-free destination name.
pub struct UploadResolver {
    policy: UploadPolicy,
    sanitizer: Box<dyn FilenameSanitizer>,
    sniffer: Box<dyn MimeSniffer>,
}

impl UploadResolver {
    pub fn new(policy: UploadPolicy) -> Self {
        Self::with_collaborators(policy, Box::new(DefaultSanitizer), Box::new(ContentSniffer))
    }

    pub fn with_collaborators(
        policy: UploadPolicy,
        sanitizer: Box<dyn FilenameSanitizer>,
        sniffer: Box<dyn MimeSniffer>,
    ) -> Self {
        Self {
            policy,
            sanitizer,
            sniffer,
        }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Validate the request and compute the destination name.
    ///
    /// Checks run MIME first, then extension, then the transport error code.
    /// The transport error is surfaced last on purpose: when an oversized
    /// file also has a disallowed type, callers want the type error.
    ///
    /// The temp file is left untouched; [`UploadResolver::commit`] performs
    /// the single move. The existence check here is a best-effort collision
    /// breaker only; two concurrent resolutions of the same base name can
    /// both pass it, which the exclusive claim in `commit` catches.
    pub fn resolve(&self, request: &UploadRequest) -> Result<ResolvedUpload, UploadError> {
        // Sniffing only happens when the policy restricts MIME types. A temp
        // file a failed transport never staged cannot be read, so a sniff IO
        // error with a pending transport code reports the transport error.
        if self.policy.mime_types_restricted() {
            let mime = match request.detected_mime_type(self.sniffer.as_ref()) {
                Ok(mime) => mime,
                Err(err) if request.transport_error_code() != 0 => {
                    tracing::debug!(
                        error = %err,
                        code = request.transport_error_code(),
                        "temp file unreadable, reporting pending transport error"
                    );
                    return Err(UploadError::TransportError(request.transport_error_code()));
                }
                Err(err) => return Err(err),
            };
            if !self.policy.mime_type_allowed(mime) {
                tracing::debug!(mime = %mime, name = %request.original_name(), "upload rejected: MIME type not allowed");
                return Err(UploadError::WrongMimeType {
                    detected: mime.to_string(),
                });
            }
        }

        let extension = request.extension();
        if !self.policy.extension_allowed(extension) {
            tracing::debug!(extension = %extension, name = %request.original_name(), "upload rejected: extension not allowed");
            return Err(UploadError::WrongExtension {
                extension: extension.to_string(),
            });
        }

        if request.transport_error_code() != 0 {
            return Err(UploadError::TransportError(request.transport_error_code()));
        }

        let sanitized_base = self.sanitizer.sanitize(request.base_name());
        let mut safe_name = join_name(&sanitized_base, extension);
        if self
            .policy
            .destination_directory()
            .join(&safe_name)
            .exists()
        {
            safe_name = timestamped_name(&sanitized_base, extension);
            tracing::debug!(safe_name = %safe_name, "destination name taken, regenerated with timestamp");
        }

        let destination_path = self.policy.destination_directory().join(&safe_name);
        Ok(ResolvedUpload {
            safe_name,
            destination_path,
            temp_path: request.temp_path().to_path_buf(),
            sanitized_base,
            extension: extension.to_string(),
        })
    }

    /// Move the temp file into place.
    ///
    /// Consumes the resolution, so the move happens at most once. When
    /// another writer claims the destination between resolve and commit, the
    /// name is regenerated a bounded number of times before the failure is
    /// surfaced as `CannotMoveFile`.
    pub fn commit(
        &self,
        resolved: ResolvedUpload,
        store: &dyn TempStore,
    ) -> Result<UploadedMedia, UploadError> {
        let ResolvedUpload {
            mut safe_name,
            mut destination_path,
            temp_path,
            sanitized_base,
            extension,
        } = resolved;

        let mut attempt = 0;
        loop {
            match store.promote(&temp_path, &destination_path) {
                Ok(()) => {
                    tracing::debug!(name = %safe_name, "upload committed");
                    return Ok(UploadedMedia {
                        url: format!(
                            "{}/{}",
                            self.policy.base_url().trim_end_matches('/'),
                            safe_name
                        ),
                        name: safe_name,
                        ext: extension,
                    });
                }
                Err(err)
                    if err.kind() == io::ErrorKind::AlreadyExists
                        && attempt + 1 < MAX_CLAIM_ATTEMPTS =>
                {
                    attempt += 1;
                    safe_name = timestamped_name(&sanitized_base, &extension);
                    destination_path = self.policy.destination_directory().join(&safe_name);
                    tracing::debug!(name = %safe_name, attempt, "destination claimed concurrently, retrying with new name");
                }
                Err(err) => {
                    tracing::warn!(destination = %destination_path.display(), error = %err, "upload move failed");
                    return Err(UploadError::CannotMoveFile {
                        destination: destination_path,
                        source: err,
                    });
                }
            }
        }
    }
}

fn join_name(base: &str, extension: &str) -> String {
    if extension.is_empty() {
        base.to_string()
    } else {
        format!("{}.{}", base, extension)
    }
}

/// `base` + current unix time in microseconds, digits only.
fn timestamped_name(base: &str, extension: &str) -> String {
    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    join_name(&format!("{}{}", base, micros), extension)
}
