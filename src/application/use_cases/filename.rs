//! Filename rules for uploaded files.
//!
//! The browser's `accept` filter is only a hint, so every name that reaches the
//! server is checked against the extension allow-list and reduced to a safe,
//! flat ASCII name before it touches the filesystem.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static UNSAFE_CHARS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").unwrap());

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Lower-cased text after the last `.`, if any.
pub fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// True when the filename ends in one of `allowed` (compared case-insensitively).
pub fn has_allowed_extension(filename: &str, allowed: &[String]) -> bool {
    match extension_of(filename) {
        Some(ext) => allowed.iter().any(|item| item.eq_ignore_ascii_case(&ext)),
        None => false,
    }
}

/// Reduces a client-supplied filename to `[A-Za-z0-9_.-]` with no path
/// components. Accented letters are NFKD-decomposed first so `é` keeps its
/// base `e`. May return an empty string.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let stripped = UNSAFE_CHARS_PATTERN.replace_all(&joined, "");
    let trimmed = stripped.trim_matches(|c: char| c == '.' || c == '_');

    let stem = trimmed.split('.').next().unwrap_or_default();
    if !trimmed.is_empty()
        && WINDOWS_DEVICE_NAMES
            .iter()
            .any(|device| device.eq_ignore_ascii_case(stem))
    {
        return format!("_{}", trimmed);
    }

    trimmed.to_string()
}

/// The name an accepted upload is stored under.
///
/// Falls back to `upload-<8 hex>.<ext>` when sanitising strips the name down to
/// nothing or loses the allowed extension.
pub fn storage_name(filename: &str, allowed: &[String]) -> String {
    let secured = secure_filename(filename);
    if !secured.is_empty() && has_allowed_extension(&secured, allowed) {
        return secured;
    }

    let ext = extension_of(filename).unwrap_or_else(|| "bin".to_string());
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("upload-{}.{}", &id[..8], ext)
}
