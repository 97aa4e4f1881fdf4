//! Quote-aware bracket scanner for embedded `children:[...]` arrays.
//!
//! Balanced-bracket matching with quoted delimiters inside is not regular,
//! so this is an explicit character-by-character state machine rather than
//! a pattern match.

/// Literal token that opens the element array in the compiled chunk.
const ARRAY_OPEN: &str = "children:[";

/// Scanner state while walking the array body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside any string literal; brackets are structural.
    Normal,
    /// Inside a string literal opened by `quote`.
    InString { quote: char },
    /// Inside a string, immediately after a backslash; the next character
    /// is never special.
    EscapedInString { quote: char },
}

/// Returns the verbatim text of the `children:[...]` array that follows
/// `marker` in the payload, exclusive of the terminating `]`.
///
/// Brackets inside string literals (single- or double-quoted, with
/// backslash escapes honored) do not affect nesting depth. Returns `None`
/// when the marker or the array-open token is absent, or when the payload
/// ends before the array closes (truncated or malformed chunk).
#[must_use]
pub fn extract_children_array(payload: &str, marker: &str) -> Option<String> {
    let marker_index = payload.find(marker)?;
    let open_offset = payload[marker_index..].find(ARRAY_OPEN)?;
    let body = &payload[marker_index + open_offset + ARRAY_OPEN.len()..];

    let mut state = ScanState::Normal;
    let mut depth: usize = 1;
    let mut out = String::new();

    for ch in body.chars() {
        match state {
            ScanState::Normal => match ch {
                '"' | '\'' => state = ScanState::InString { quote: ch },
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(out);
                    }
                }
                _ => {}
            },
            ScanState::InString { quote } => {
                if ch == '\\' {
                    state = ScanState::EscapedInString { quote };
                } else if ch == quote {
                    state = ScanState::Normal;
                }
            }
            ScanState::EscapedInString { quote } => state = ScanState::InString { quote },
        }
        out.push(ch);
    }

    None
}
