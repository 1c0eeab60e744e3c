//! Utility modules.

/// Owner-name conversions between relative and absolute form.
pub mod names;

/// Log sanitization utilities to keep long rdata out of logs.
pub mod log_sanitizer;
