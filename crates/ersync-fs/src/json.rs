//! Canonical JSON formatting
//!
//! Upstream ships minified JSON. Rewriting it with a stable two-space layout
//! keeps version-control diffs limited to semantic changes. Key order and the
//! textual form of numbers are preserved from the source document.

use serde_json::Value;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse raw JSON bytes, tolerating a leading UTF-8 byte order mark.
pub fn parse(bytes: &[u8]) -> serde_json::Result<Value> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    serde_json::from_slice(bytes)
}

/// Render a value with two-space indentation.
pub fn to_canonical_string(value: &Value) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Re-encode raw JSON bytes in canonical form.
pub fn canonicalize(bytes: &[u8]) -> serde_json::Result<String> {
    to_canonical_string(&parse(bytes)?)
}
