//! String escaping for the text dump.
//!
//! Anything outside printable ASCII becomes `\xHH`, one escape per UTF-8
//! byte. `%` is always escaped as well: the log sink that receives text
//! dumps interprets it as a format directive.

use std::fmt::Write;

/// Escapes `input` in full.
pub fn escape_text(input: &str) -> String {
    escape_preview(input, usize::MAX).0
}

/// Escapes at most `limit` output characters of `input`.
///
/// Returns the escaped text and whether anything was cut off. An escape
/// sequence is never split.
pub fn escape_preview(input: &str, limit: usize) -> (String, bool) {
    let mut out = String::with_capacity(input.len().min(limit));
    let mut piece = String::with_capacity(16);
    for ch in input.chars() {
        piece.clear();
        escape_char(ch, &mut piece);
        if out.len().saturating_add(piece.len()) > limit {
            return (out, true);
        }
        out.push_str(&piece);
    }
    (out, false)
}

fn escape_char(ch: char, out: &mut String) {
    match ch {
        '%' => out.push_str("\\x25"),
        '\\' => out.push_str("\\\\"),
        '"' => out.push_str("\\\""),
        ' '..='~' => out.push(ch),
        _ => {
            let mut buf = [0u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                let _ = write!(out, "\\x{byte:02x}");
            }
        }
    }
}
