//! Log sanitization utilities
//!
//! Keeps long rdata (DKIM keys, SPF policies, certificates) from being
//! written to debug logs in full.

use crate::types::RecordData;

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit,
/// otherwise returns the first `TRUNCATE_LIMIT` characters with a suffix
/// indicating the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Presentation form of `records`, `;`-separated and truncated for logging.
pub fn summarize_records(records: &[RecordData]) -> String {
    let joined = records
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    truncate_for_log(&joined)
}
