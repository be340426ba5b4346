//! Log truncation for response bodies.
//!
//! Fetch responses for subdomain or endpoint attributes can be hundreds of
//! kilobytes; only a prefix is worth logging.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Truncates `s` to at most [`TRUNCATE_LIMIT`] bytes on a char boundary,
/// appending the total length when anything was cut.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }

    let cut = s
        .char_indices()
        .map(|(idx, ch)| idx + ch.len_utf8())
        .take_while(|end| *end <= TRUNCATE_LIMIT)
        .last()
        .unwrap_or(0);

    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}
