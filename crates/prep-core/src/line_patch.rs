//! Single-line edits to line-oriented config files.
//!
//! The descriptor files this is used on mix scalar fields with comments the
//! user wrote by hand. Parsing and re-serializing them would drop those
//! comments, so edits replace exactly one matched line and leave every other
//! byte alone.

use regex::Regex;

/// Result of [`patch_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub text: String,
    pub matched: bool,
}

/// Replace the first line matched by `pattern` with `replacement`.
///
/// `pattern` should be compiled in multiline mode and anchored with `^` and
/// `$`. When nothing matches, `text` is returned unchanged with
/// `matched == false`.
pub fn patch_line(text: &str, pattern: &Regex, replacement: &str) -> Patched {
    let Some(m) = pattern.find(text) else {
        return Patched {
            text: text.to_string(),
            matched: false,
        };
    };

    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..m.start()]);
    out.push_str(replacement);
    out.push_str(&text[m.end()..]);
    Patched {
        text: out,
        matched: true,
    }
}

/// First capture group of `pattern` in `text`, typically the field value.
pub fn captured_value<'a>(text: &'a str, pattern: &Regex) -> Option<&'a str> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
