//! Content-based MIME detection.
//!
//! The type a transport declares for an upload is untrusted and deliberately
//! not carried on the data model; the resolver always detects the type from
//! the staged bytes through this seam.

use std::io::Read;
use std::path::Path;

/// Detects the MIME type of a staged file from its content.
pub trait MimeSniffer: Send + Sync {
    fn sniff(&self, path: &Path) -> std::io::Result<String>;
}

/// Default sniffer: reads the leading bytes and matches well-known magic
/// numbers.
pub struct ContentSniffer;

impl MimeSniffer for ContentSniffer {
    fn sniff(&self, path: &Path) -> std::io::Result<String> {
        let mut head = [0u8; 16];
        let mut file = std::fs::File::open(path)?;
        let n = file.read(&mut head)?;
        Ok(sniff_bytes(&head[..n]).to_string())
    }
}

/// Match leading bytes against known file signatures.
pub fn sniff_bytes(head: &[u8]) -> &'static str {
    if head.starts_with(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]) {
        "image/png"
    } else if head.starts_with(&[0xff, 0xd8, 0xff]) {
        "image/jpeg"
    } else if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        "image/gif"
    } else if head.starts_with(b"RIFF") && head.len() >= 12 && &head[8..12] == b"WEBP" {
        "image/webp"
    } else if head.starts_with(b"BM") {
        "image/bmp"
    } else if head.starts_with(b"%PDF") {
        "application/pdf"
    } else if !head.is_empty()
        && head
            .iter()
            .all(|&b| !b.is_ascii_control() || matches!(b, b'\r' | b'\n' | b'\t'))
    {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}
