use crate::utils::text::truncate_with_ellipsis;
use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Prefixes of credentials that can show up in provider error bodies.
const PREFIX_PATTERNS: [&str; 3] = ["AIza", "ya29.", "eyJ"];

/// Markers followed directly by a secret value.
const MARKER_PATTERNS: [&str; 8] = [
    "key=",
    "Bearer ",
    "bearer ",
    "api_key=",
    "\"api_key\":\"",
    "\"access_token\":\"",
    "\"password\":\"",
    "password=",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | '/' | '=')
}

/// Replace the token following every occurrence of `marker`, including the
/// marker itself. Bare markers with nothing after them are left alone.
fn redact_after(scrubbed: &mut String, marker: &str) {
    let mut from = 0;
    while let Some(rel) = scrubbed[from..].find(marker) {
        let start = from + rel;
        let value_start = start + marker.len();
        let value_len: usize = scrubbed[value_start..]
            .chars()
            .take_while(|c| is_secret_char(*c))
            .map(char::len_utf8)
            .sum();

        if value_len == 0 {
            from = value_start;
            continue;
        }

        scrubbed.replace_range(start..value_start + value_len, REDACTED);
        from = start + REDACTED.len();
    }
}

/// Redact API keys, bearer tokens, and passwords from provider output.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    let hit = PREFIX_PATTERNS
        .iter()
        .chain(MARKER_PATTERNS.iter())
        .any(|pattern| input.contains(pattern));
    if !hit {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in MARKER_PATTERNS.iter().chain(PREFIX_PATTERNS.iter()) {
        redact_after(&mut scrubbed, marker);
    }
    Cow::Owned(scrubbed)
}

/// Scrub secrets and bound the length of provider error text.
pub fn sanitize_api_error(input: &str) -> String {
    truncate_with_ellipsis(&scrub_secret_patterns(input), MAX_API_ERROR_CHARS)
}
