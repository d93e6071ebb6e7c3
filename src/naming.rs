//! String helpers shared by the loader, renderer and writer.
//!
//! Three small, pure transforms:
//!
//! - [`sanitize_filename`]: turns a state code or file stem into a path
//!   component that is safe on every filesystem and stable across runs.
//!   `"Los Angeles"` → `"los_angeles"`, `"St. Louis"` → `"st_louis"`.
//! - [`escape_yaml`]: prepares a value for a double-quoted YAML scalar in
//!   front matter. Newlines collapse to spaces so every value stays on one line.
//! - [`capitalize`]: first character upper-cased, rest unchanged. Used for
//!   layer-type headings and conform labels in Markdown bodies.

use std::fmt::Write;

/// Sanitize a name for use as a directory or file name.
///
/// Spaces become underscores, everything outside `[A-Za-z0-9_-]` is removed,
/// and the result is lower-cased.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect::<String>()
        .to_lowercase()
}

/// Escape a string for the inside of a double-quoted YAML scalar.
///
/// Control characters other than CR/LF become `\t`, `\xNN` or `\uNNNN`
/// escapes; YAML readers reject them raw.
pub fn escape_yaml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.trim().chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' | '\r' => out.push(' '),
            '\t' => out.push_str("\\t"),
            c if c.is_control() && (c as u32) <= 0xFF => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c if c.is_control() || c == '\u{FFFE}' || c == '\u{FFFF}' => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Wrap a string in double quotes after escaping it.
pub fn quote_yaml(value: &str) -> String {
    format!("\"{}\"", escape_yaml(value))
}

/// Words a YAML reader resolves to null or a boolean when left bare.
const RESERVED_KEYS: &[&str] = &[
    "null", "true", "false", "yes", "no", "on", "off", "y", "n",
];

/// Render a mapping key for YAML. Plain identifiers stay bare. Anything else
/// is quoted, so `:` or `#` inside a key cannot change the document shape and
/// keys like `null`, `true` or `10` still read back as strings.
pub fn yaml_key(key: &str) -> String {
    let mut chars = key.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !RESERVED_KEYS.contains(&key.to_ascii_lowercase().as_str());
    if plain { key.to_string() } else { quote_yaml(key) }
}

/// Upper-case the first character, leave the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
