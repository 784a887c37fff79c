//! Filename sanitization
//!
//! Every filename crossing a boundary is reduced to its final path segment before
//! any database lookup or disk probe. Centralized here so all tiers agree on what
//! a key looks like.

/// Reduce a client-supplied filename to its final path segment.
///
/// Strips directory components on both separator conventions, so
/// `../../etc/passwd` and `C:\tmp\x.pdf` both reduce to their basename. Returns an
/// empty string for inputs that end in a separator.
pub fn sanitize_filename(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string()
}
