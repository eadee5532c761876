//! Greedy word wrapping.

use super::LayoutError;
use crate::imaging::{Font, TextBackend};

/// Split `text` into lines no wider than `max_width` pixels.
///
/// Tokens are whitespace-delimited and packed greedily: each token is appended
/// to the current line (with one space) when the result still fits, otherwise
/// it opens a new line. A token wider than `max_width` gets a line of its own
/// and is never broken. The result has at least one line.
pub fn wrap_text(
    backend: &impl TextBackend,
    text: &str,
    font: &Font,
    max_width: f32,
) -> Result<Vec<String>, LayoutError> {
    let mut tokens = text.split_whitespace();
    let first = tokens
        .next()
        .ok_or_else(|| LayoutError::InvalidInput("caption text is empty".into()))?;

    let mut lines = Vec::new();
    let mut current = first.to_string();
    for token in tokens {
        let candidate = format!("{current} {token}");
        if backend.text_width(font, &candidate)? <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, token.to_string()));
        }
    }
    lines.push(current);
    Ok(lines)
}
