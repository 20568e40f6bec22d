//! Image reference classification
//!
//! An image reference is whatever a record stores in an image field: an
//! absolute URL (our own host or an external asset host) or a path under the
//! `/uploads/` route. This module turns references into bare storage
//! filenames and decides which references belong to local storage.

/// Route segment under which local images are served
pub const UPLOADS_SEGMENT: &str = "/uploads/";

const UPLOADS_DIR_PREFIX: &str = "uploads/";

/// Normalize an image reference into a bare storage filename
///
/// - `https://host/uploads/photo.jpg` -> `photo.jpg`
/// - `/uploads/photo.jpg` -> `photo.jpg`
/// - a malformed URL or an empty reference -> `None`
///
/// Query strings and fragments are dropped from absolute URLs only. The
/// result never starts with a slash, so `extract_filename("/uploads/" + name)`
/// returns `name` again.
pub fn extract_filename(reference: &str) -> Option<String> {
    if reference.is_empty() {
        return None;
    }

    let path = if is_absolute_url(reference) {
        let uri: http::Uri = reference.parse().ok()?;
        uri.path().to_string()
    } else {
        // Relative references name the stored file as-is; `?` and `#` are
        // part of the filename.
        reference.to_string()
    };

    let rest = path.trim_start_matches(is_leading_junk);
    let rest = rest.strip_prefix(UPLOADS_DIR_PREFIX).unwrap_or(rest);
    let name = rest.trim_start_matches(is_leading_junk).trim_end();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn is_absolute_url(reference: &str) -> bool {
    let lower = reference.get(..8).unwrap_or(reference).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn is_leading_junk(c: char) -> bool {
    c == '/' || c.is_whitespace()
}

/// Decides which references are owned by local storage and which point at
/// external hosts that must never be treated as local files.
#[derive(Debug, Clone)]
pub struct ImageRefClassifier {
    local_prefixes: Vec<String>,
    excluded_markers: Vec<String>,
}

impl Default for ImageRefClassifier {
    fn default() -> Self {
        Self::new(vec!["http://localhost".to_string()], vec!["unsplash".to_string()])
    }
}

impl ImageRefClassifier {
    /// `local_prefixes` are trusted URL prefixes for our own host,
    /// `excluded_markers` are substrings identifying external asset hosts
    /// (matched case-insensitively).
    pub fn new(local_prefixes: Vec<String>, excluded_markers: Vec<String>) -> Self {
        Self {
            local_prefixes: local_prefixes
                .into_iter()
                .filter(|p| !p.is_empty())
                .collect(),
            excluded_markers: excluded_markers
                .into_iter()
                .filter(|m| !m.is_empty())
                .map(|m| m.to_lowercase())
                .collect(),
        }
    }

    pub fn excluded_markers(&self) -> &[String] {
        &self.excluded_markers
    }

    /// A reference is local when it contains the uploads route segment or
    /// starts with one of the trusted local prefixes.
    pub fn is_local(&self, reference: &str) -> bool {
        if reference.is_empty() {
            return false;
        }
        reference.contains(UPLOADS_SEGMENT)
            || self
                .local_prefixes
                .iter()
                .any(|prefix| reference.starts_with(prefix.as_str()))
    }

    /// Keep only local references, preserving order and duplicates
    pub fn filter_local<'a, I>(&self, references: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        references
            .into_iter()
            .filter(|r| self.is_local(r))
            .collect()
    }

    /// Whether the reference (or the filename it resolves to) names an
    /// external asset host
    pub fn is_excluded(&self, reference: &str) -> bool {
        if self.excluded_markers.is_empty() {
            return false;
        }
        let raw = reference.to_lowercase();
        let name = extract_filename(reference)
            .map(|n| n.to_lowercase())
            .unwrap_or_default();
        self.excluded_markers
            .iter()
            .any(|marker| raw.contains(marker.as_str()) || name.contains(marker.as_str()))
    }

    /// Filename a reference keeps alive in storage, if any
    ///
    /// Used by the reconciliation scan: external-host references are
    /// dropped, everything else is kept whether or not it looks local.
    pub fn referenced_filename(&self, reference: &str) -> Option<String> {
        if self.is_excluded(reference) {
            return None;
        }
        extract_filename(reference)
    }
}
