/// Cut `s` to at most `max_chars` characters, appending `...` when anything
/// was dropped. Counts chars, not bytes, so multi-byte text never splits.
#[must_use]
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    let Some((cut, _)) = s.char_indices().nth(max_chars) else {
        return s.to_string();
    };
    let mut out = s[..cut].trim_end().to_string();
    out.push_str("...");
    out
}
