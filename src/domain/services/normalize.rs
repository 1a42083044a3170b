//! Normalisation helpers shared by component definitions.

/// Turn free text into a resource-name-safe identifier.
///
/// Lowercases ASCII, maps separators (space, `_`, `.`, `/`) to `-`, drops
/// every other character outside `[a-z0-9-]`, collapses repeated dashes,
/// trims dashes from both ends and clamps to `max_len` characters.
pub fn sanitize_resource_name(input: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        let mapped = match c {
            'a'..='z' | '0'..='9' => Some(c),
            'A'..='Z' => Some(c.to_ascii_lowercase()),
            ' ' | '_' | '.' | '/' | '-' => Some('-'),
            _ => None,
        };
        if let Some(c) = mapped {
            if c == '-' && (out.is_empty() || out.ends_with('-')) {
                continue;
            }
            out.push(c);
        }
    }

    let mut clamped: String = out.chars().take(max_len).collect();
    while clamped.ends_with('-') {
        clamped.pop();
    }
    clamped
}
