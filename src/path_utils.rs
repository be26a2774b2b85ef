//! Path utilities shared by the walker, the cover resolver and the listing types.
//!
//! Comic, chapter and page names come straight from the filesystem and end up
//! embedded in URLs, so this module owns two concerns: deciding which entries are
//! pages at all, and turning names into URL segments. Segment encoding matches
//! ECMAScript's `encodeURIComponent` byte for byte so that existing links built by
//! other clients keep resolving.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::path::Path;

use crate::types::IMAGE_EXTENSIONS;

/// Characters left untouched by `encodeURIComponent`: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Gets the file name from a path with fallback to lossy conversion.
pub fn get_file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Checks if a name starts with a dot (hidden entry).
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Checks whether a file name carries one of the recognised image extensions.
///
/// The match is case-insensitive and only looks at the text after the last dot,
/// so a bare `.jpg` counts while `cover.jpg.txt` does not.
pub fn has_image_extension(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, extension)) => IMAGE_EXTENSIONS
            .iter()
            .any(|known| extension.eq_ignore_ascii_case(known)),
        None => false,
    }
}

/// Percent-encodes a single path segment the way `encodeURIComponent` does.
///
/// `/`, `%` and whitespace are all escaped, so any comic, chapter or file name
/// can be embedded as exactly one URL segment.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, URI_COMPONENT).to_string()
}

/// Encodes each segment independently and joins them with `/`.
pub fn join_encoded<'a, I>(segments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    segments
        .into_iter()
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Prefixes an already encoded relative path with a URL base segment such as `/manhua`.
pub fn url_under_base(base: &str, encoded_relative: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), encoded_relative)
}

/// Checks that a URL base is usable as a prefix: rooted, and without a trailing slash.
pub fn validate_url_base(base: &str) -> std::result::Result<(), String> {
    if !base.starts_with('/') {
        return Err(format!("URL base must start with '/': {}", base));
    }
    if base.len() > 1 && base.ends_with('/') {
        return Err(format!("URL base must not end with '/': {}", base));
    }
    Ok(())
}
