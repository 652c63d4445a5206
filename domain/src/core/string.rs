//! String utilities for the domain layer.

/// Short preview of a long text: the first `max_chars` characters followed by `...`.
///
/// Cuts on character boundaries, so multibyte text keeps its full count.
pub fn preview(s: &str, max_chars: usize) -> String {
    let end = s.char_indices().nth(max_chars).map_or(s.len(), |(i, _)| i);
    format!("{}...", &s[..end])
}
