//! Decoder for backslash escapes in embedded JS string literals.

/// Resolves source-level backslash escapes to their literal characters.
///
/// Handles the simple escapes (`\n`, `\t`, `\r`, `\"`, `\'`, `\\`, `\/`,
/// backspace and form feed) plus 4-hex-digit `\uXXXX` escapes, including
/// surrogate pairs. Unrecognized escapes pass through unchanged; a
/// `\uXXXX` that cannot form a valid character becomes U+FFFD. A lone
/// trailing backslash is kept as-is. Decoding never fails.
#[must_use]
pub fn decode_js_string(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '\\' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        let Some(&next) = chars.get(i + 1) else {
            out.push('\\');
            break;
        };
        match next {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '/' => out.push('/'),
            '\\' => out.push('\\'),
            'u' => {
                if let Some(units) = decode_unicode_escape(&chars, i, &mut out) {
                    i += units;
                    continue;
                }
                // Malformed \u escape: keep it verbatim.
                out.push('\\');
                out.push('u');
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        i += 2;
    }

    out
}

/// Decodes a `\uXXXX` escape starting at `chars[start]` (the backslash).
///
/// Returns the number of characters consumed, or `None` when the hex
/// digits are missing or malformed. High surrogates consume a following
/// low-surrogate escape when present; unpaired surrogates decode to
/// U+FFFD.
fn decode_unicode_escape(chars: &[char], start: usize, out: &mut String) -> Option<usize> {
    let first = hex_unit(chars, start + 2)?;

    if (0xD800..=0xDBFF).contains(&first) {
        // High surrogate: look for the paired \uDC00..\uDFFF escape.
        if chars.get(start + 6) == Some(&'\\') && chars.get(start + 7) == Some(&'u') {
            if let Some(second) = hex_unit(chars, start + 8) {
                if (0xDC00..=0xDFFF).contains(&second) {
                    let combined = 0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00);
                    out.push(char::from_u32(combined).unwrap_or('\u{FFFD}'));
                    return Some(12);
                }
            }
        }
        out.push('\u{FFFD}');
        return Some(6);
    }

    out.push(char::from_u32(first).unwrap_or('\u{FFFD}'));
    Some(6)
}

/// Reads four hex digits at `chars[at..at + 4]` as a UTF-16 code unit.
fn hex_unit(chars: &[char], at: usize) -> Option<u32> {
    let digits = chars.get(at..at + 4)?;
    let mut value = 0u32;
    for &d in digits {
        value = value.checked_mul(16)?.checked_add(d.to_digit(16)?)?;
    }
    Some(value)
}
