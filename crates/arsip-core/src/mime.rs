//! MIME type helpers
//!
//! Two deliberately different strategies live here, one per call site:
//!
//! - [`from_extension`] — the static lookup table used when only bytes plus a
//!   filename are available (device-tier and local-tier responses in the resolver).
//! - [`sniff`] — magic-byte detection used by the device server, which is about to
//!   read the file anyway and can afford to look at its head.
//!
//! The database tier uses neither; it trusts the `mime_type` column written at
//! upload time. The asymmetry is intentional and documented in DESIGN.md.

/// Fallback type when nothing better is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Map a filename's extension to a MIME type. Unknown or missing extensions map to
/// `application/octet-stream`.
pub fn from_extension(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "txt" => "text/plain",
        _ => OCTET_STREAM,
    }
}

/// Detect a MIME type from leading magic bytes, falling back to the extension
/// table when the head is unrecognized.
pub fn sniff(head: &[u8], filename: &str) -> &'static str {
    if head.starts_with(b"%PDF-") {
        return "application/pdf";
    }
    if head.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }
    if head.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return "image/png";
    }
    if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        return "image/gif";
    }
    if head.len() >= 12 && &head[0..4] == b"RIFF" && &head[8..12] == b"WEBP" {
        return "image/webp";
    }
    from_extension(filename)
}
