//! Naming rules for uploaded images.
//!
//! Stored files live in one flat directory and are published under
//! [`UPLOADS_PATH_PREFIX`]. Names start with the upload time in
//! milliseconds followed by a random suffix, so two uploads landing in the
//! same millisecond still get distinct files.

use chrono::Utc;

/// URL prefix under which stored uploads are served.
pub const UPLOADS_PATH_PREFIX: &str = "/uploads/";

const NAME_PREFIX: &str = "request-";

/// Generate a fresh file name for an upload whose client-side name was
/// `original_name`.
pub fn generate_filename(original_name: &str) -> String {
    filename_for(
        original_name,
        Utc::now().timestamp_millis(),
        rand::random::<u32>(),
    )
}

/// Deterministic core of [`generate_filename`].
pub fn filename_for(original_name: &str, millis: i64, suffix: u32) -> String {
    format!(
        "{NAME_PREFIX}{millis}-{suffix:08x}{}",
        extension_of(original_name)
    )
}

/// Public path for a stored upload, e.g. `/uploads/request-1700000000000-0000abcd.png`.
pub fn public_path(filename: &str) -> String {
    format!("{UPLOADS_PATH_PREFIX}{filename}")
}

/// Inverse of [`public_path`]. Returns `None` for anything that is not a
/// plain upload name under the prefix.
pub fn filename_from_public_path(path: &str) -> Option<&str> {
    path.strip_prefix(UPLOADS_PATH_PREFIX)
        .filter(|name| is_valid_filename(name))
}

/// Whether `name` can address a stored upload. Hidden names are never
/// produced by [`generate_filename`] and are refused.
pub fn is_valid_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}

/// Extension of the final path component including the leading dot.
///
/// Dotfiles and names without a dot have no extension. Extensions that
/// contain anything other than ASCII letters and digits are dropped.
pub fn extension_of(original_name: &str) -> &str {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    let Some(dot) = base.rfind('.') else {
        return "";
    };
    if base[..dot].chars().all(|c| c == '.') {
        return "";
    }
    let ext = &base[dot..];
    if ext[1..].chars().all(|c| c.is_ascii_alphanumeric()) {
        ext
    } else {
        ""
    }
}
