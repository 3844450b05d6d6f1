//! Filename sanitization seam.
//!
//! Naming and collision handling live in the resolver; the sanitizer only
//! turns an untrusted base name into something safe to place on disk.

/// Produces a filesystem-safe base name from an untrusted string.
///
/// Implementations must be pure and deterministic. Collision avoidance is not
/// the sanitizer's concern.
pub trait FilenameSanitizer: Send + Sync {
    fn sanitize(&self, raw: &str) -> String;
}

/// Default sanitizer: keeps ASCII alphanumerics, `-` and `_`, maps spaces to
/// `-`, and drops everything else (path separators included).
pub struct DefaultSanitizer;

impl FilenameSanitizer for DefaultSanitizer {
    fn sanitize(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        for c in raw.chars() {
            match c {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => out.push(c),
                ' ' => out.push('-'),
                _ => {}
            }
        }
        if out.is_empty() {
            out.push_str("file");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_safe_characters() {
        let sanitizer = DefaultSanitizer;
        assert_eq!(sanitizer.sanitize("photo_2024-01"), "photo_2024-01");
    }

    #[test]
    fn test_sanitize_strips_path_separators() {
        let sanitizer = DefaultSanitizer;
        assert_eq!(sanitizer.sanitize("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitizer.sanitize("a\\b/c"), "abc");
    }

    #[test]
    fn test_sanitize_maps_spaces() {
        let sanitizer = DefaultSanitizer;
        assert_eq!(sanitizer.sanitize("my holiday photo"), "my-holiday-photo");
    }

    #[test]
    fn test_sanitize_never_returns_empty() {
        let sanitizer = DefaultSanitizer;
        assert_eq!(sanitizer.sanitize("!!!"), "file");
        assert_eq!(sanitizer.sanitize(""), "file");
    }

    #[test]
    fn test_sanitize_is_deterministic() {
        let sanitizer = DefaultSanitizer;
        assert_eq!(sanitizer.sanitize("föö bar"), sanitizer.sanitize("föö bar"));
    }
}
