//! Sanitizing of API-sourced text before it reaches the terminal
//!
//! ratatui draws strings literally, so markup such as `<script>` is harmless,
//! but raw control characters (ESC in particular) would be passed through to
//! the terminal. Line breaks become spaces; any other control character is
//! shown in its escaped form.

use std::borrow::Cow;

/// Makes `text` safe to draw as a single line
pub fn sanitize(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\r' => {}
            '\n' | '\t' => out.push(' '),
            c if c.is_control() => out.extend(c.escape_default()),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
