//! Extraction of a JSON object from generative reply text
//!
//! Even with structured output requested, providers sometimes wrap the
//! object in prose or markdown fences. This scanner finds the first
//! balanced `{ ... }` block, tracking string literals and escapes so
//! braces inside strings do not unbalance the count.

/// The first balanced JSON object in `text`, or `None` when there is no
/// opening brace or the braces never balance.
#[must_use]
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
