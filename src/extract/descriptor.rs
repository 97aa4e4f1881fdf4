//! Reassembly of multi-line descriptor text from a `children` array.
//!
//! The code block in the compiled chunk is an array of per-line elements
//! separated by literal `"\n"` entries. Each line element holds one or
//! more `children:"…"` string fragments (syntax-highlight spans) that
//! concatenate back into the original source line.

use std::sync::LazyLock;

use regex::Regex;

use crate::extract::decode::decode_js_string;

/// Separator between line elements: a comma-delimited escaped-newline
/// string literal, as it appears verbatim in the chunk source.
const LINE_SEPARATOR: &str = r#","\n","#;

static FRAGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"children:"((?:\\.|[^"\\])*)""#).expect("static regex must compile")
});

/// Reconstructs descriptor text from the bracketed-list body.
///
/// Segments with no string fragments become empty lines. Trailing empty
/// lines are stripped; line endings normalize to `\n`, tabs to two
/// spaces, and the result ends with exactly one newline. Returns `None`
/// when no line survives, in which case the caller proceeds to fallback
/// synthesis.
#[must_use]
pub fn assemble_descriptor(array_text: &str) -> Option<String> {
    let mut lines: Vec<String> = Vec::new();
    for segment in array_text.split(LINE_SEPARATOR) {
        let mut line = String::new();
        let mut matched = false;
        for captures in FRAGMENT_RE.captures_iter(segment) {
            matched = true;
            line.push_str(&decode_js_string(&captures[1]));
        }
        if matched {
            lines.push(line);
        } else {
            lines.push(String::new());
        }
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    if lines.is_empty() {
        return None;
    }

    let text = lines.join("\n") + "\n";
    Some(text.replace("\r\n", "\n").replace('\r', "\n").replace('\t', "  "))
}
