//! Reconciliation policy.
//!
//! Pure decision functions, free of I/O: when a transfer is needed, when a
//! source is safe to delete, which folder names count as dated, and which
//! files count as documents.

use chrono::{DateTime, Utc};

/// A transfer is needed when the source exists and the destination is
/// absent or strictly older. Equal timestamps mean "already caught up."
pub fn needs_transfer(source: Option<DateTime<Utc>>, dest: Option<DateTime<Utc>>) -> bool {
    match (source, dest) {
        (Some(src), Some(dst)) => src > dst,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// The destination's modification time after this tick's work: a
/// successful transfer leaves it at least as new as the source.
pub fn effective_destination(
    source: DateTime<Utc>,
    dest: Option<DateTime<Utc>>,
    transferred: bool,
) -> Option<DateTime<Utc>> {
    if transferred {
        Some(dest.map_or(source, |d| d.max(source)))
    } else {
        dest
    }
}

/// A source may be deleted only once the destination has caught up to the
/// source's pre-transfer modification time.
pub fn safe_to_delete(source: DateTime<Utc>, effective_dest: Option<DateTime<Utc>>) -> bool {
    effective_dest.is_some_and(|d| d >= source)
}

/// Extracts the year from a dated folder name: the first `-`-delimited
/// segment, accepted only when it is `20` followed by two digits.
pub fn year_prefix(name: &str) -> Option<&str> {
    let segment = name.split('-').next().unwrap_or("");
    let mut chars = segment.chars();
    let dated = segment.len() == 4
        && chars.next() == Some('2')
        && chars.next() == Some('0')
        && chars.all(|c| c.is_ascii_digit());
    dated.then_some(segment)
}

/// Case-insensitive suffix match against the configured document
/// extensions.
pub fn is_document(name: &str, extensions: &[String]) -> bool {
    let lower = name.to_lowercase();
    extensions
        .iter()
        .any(|ext| lower.ends_with(&ext.to_lowercase()))
}

/// Joins a folder path and an entry name with exactly one separator.
pub fn join_path(folder: &str, name: &str) -> String {
    format!(
        "{}/{}",
        folder.trim_end_matches('/'),
        name.trim_start_matches('/')
    )
}
