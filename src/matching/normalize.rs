/// Canonicalize a free-text ward name for comparison: lower-case, strip
/// periods, collapse whitespace runs to a single space, trim.
///
/// Pure and total; empty or whitespace-only input yields the empty string.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .replace('.', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
