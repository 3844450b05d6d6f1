//! Temp-store seam: the move primitive supplied by the transport layer.

use std::fs;
use std::io;
use std::path::Path;

/// Promotes a transport-staged temp file to its final destination.
///
/// The claim must be create-exclusive: promoting onto a path that already
/// exists fails with `AlreadyExists` and leaves both files untouched. The
/// resolver relies on this to close the check-then-act window in name
/// resolution.
pub trait TempStore: Send + Sync {
    fn promote(&self, temp: &Path, destination: &Path) -> io::Result<()>;
}

/// Filesystem-backed temp store.
pub struct FsTempStore;

impl TempStore for FsTempStore {
    fn promote(&self, temp: &Path, destination: &Path) -> io::Result<()> {
        // Claim the destination exclusively so two resolutions racing on the
        // same name cannot both win the move.
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(destination)?;

        if let Err(err) = fs::rename(temp, destination) {
            // rename cannot cross filesystems; fall back to copy + remove
            tracing::debug!(
                temp = %temp.display(),
                destination = %destination.display(),
                error = %err,
                "rename failed, falling back to copy"
            );
            if let Err(err) = fs::copy(temp, destination).and_then(|_| fs::remove_file(temp)) {
                let _ = fs::remove_file(destination);
                return Err(err);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promote_moves_file() {
        let dir = tempfile::tempdir().unwrap();
        let temp = dir.path().join("staged");
        let destination = dir.path().join("final.png");
        fs::write(&temp, b"payload").unwrap();

        FsTempStore.promote(&temp, &destination).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read(&destination).unwrap(), b"payload");
    }

    #[test]
    fn test_promote_refuses_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let temp = dir.path().join("staged");
        let destination = dir.path().join("final.png");
        fs::write(&temp, b"payload").unwrap();
        fs::write(&destination, b"already here").unwrap();

        let err = FsTempStore.promote(&temp, &destination).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        // Both files untouched
        assert_eq!(fs::read(&temp).unwrap(), b"payload");
        assert_eq!(fs::read(&destination).unwrap(), b"already here");
    }

    #[test]
    fn test_promote_missing_temp_fails() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("final.png");

        let result = FsTempStore.promote(&dir.path().join("missing"), &destination);
        assert!(result.is_err());
    }
}
