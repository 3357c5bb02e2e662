//! Literal cooking: turns scanned literal text into values.

/// Decodes a string literal token (quotes included) into its value.
/// The scanner has already rejected malformed `\x` and `\u` escapes.
pub fn cook_string(raw: &str) -> String {
    let body = &raw[1..raw.len() - 1];
    let mut value = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    // pending high surrogate from a `\uD8xx` escape
    let mut high_surrogate: Option<u32> = None;

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            flush_surrogate(&mut value, &mut high_surrogate);
            value.push(ch);
            continue;
        }
        let escaped = match chars.next() {
            Some(escaped) => escaped,
            None => break,
        };
        let code_unit = match escaped {
            'x' => hex_value(&mut chars, 2),
            'u' => hex_value(&mut chars, 4),
            _ => None,
        };
        if let Some(unit) = code_unit {
            push_code_unit(&mut value, &mut high_surrogate, unit);
            continue;
        }
        flush_surrogate(&mut value, &mut high_surrogate);
        match escaped {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'b' => value.push('\u{8}'),
            'f' => value.push('\u{c}'),
            'v' => value.push('\u{b}'),
            '0' if !chars.peek().map_or(false, char::is_ascii_digit) => value.push('\0'),
            // line continuations
            '\r' => {
                chars.next_if_eq(&'\n');
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => value.push(other),
        }
    }
    flush_surrogate(&mut value, &mut high_surrogate);
    value
}

fn hex_value(chars: &mut std::iter::Peekable<std::str::Chars>, digits: usize) -> Option<u32> {
    let mut value = 0;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}

/// Pushes a UTF-16 code unit, pairing surrogates. Unpaired surrogates become U+FFFD.
fn push_code_unit(value: &mut String, high_surrogate: &mut Option<u32>, unit: u32) {
    match (high_surrogate.take(), unit) {
        (Some(high), 0xDC00..=0xDFFF) => {
            let code_point = 0x10000 + ((high - 0xD800) << 10) + (unit - 0xDC00);
            value.push(char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
        (previous, 0xD800..=0xDBFF) => {
            if previous.is_some() {
                value.push(char::REPLACEMENT_CHARACTER);
            }
            *high_surrogate = Some(unit);
        }
        (previous, _) => {
            if previous.is_some() {
                value.push(char::REPLACEMENT_CHARACTER);
            }
            value.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
    }
}

fn flush_surrogate(value: &mut String, high_surrogate: &mut Option<u32>) {
    if high_surrogate.take().is_some() {
        value.push(char::REPLACEMENT_CHARACTER);
    }
}

/// Parses a numeric literal: decimal, hexadecimal (`0x`) or legacy octal (`017`).
pub fn parse_number(text: &str) -> Option<f64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return radix_value(hex, 16);
    }
    if text.len() > 1 && text.starts_with('0') && text.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return radix_value(&text[1..], 8);
    }
    text.parse().ok()
}

fn radix_value(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0, |acc, c| {
        c.to_digit(radix).map(|digit| acc * radix as f64 + digit as f64)
    })
}

/// Splits a regex literal token (`/pattern/flags`) into pattern and flags.
pub fn split_regex(raw: &str) -> (&str, &str) {
    let close = raw.rfind('/').unwrap_or(0);
    if close == 0 {
        return (&raw[1.min(raw.len())..], "");
    }
    (&raw[1..close], &raw[close + 1..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cook_simple_escapes() {
        assert_eq!(cook_string(r#""foo""#), "foo");
        assert_eq!(cook_string(r#""foo\"bar""#), "foo\"bar");
        assert_eq!(cook_string(r"'a\nb\tc\\d'"), "a\nb\tc\\d");
        assert_eq!(cook_string(r"'\q\-'"), "q-");
        assert_eq!(cook_string(r"'\0'"), "\0");
    }

    #[test]
    fn test_cook_hex_and_unicode() {
        assert_eq!(cook_string(r"'\x41B'"), "AB");
        assert_eq!(cook_string(r"'é'"), "é");
        assert_eq!(cook_string(r"'\uD83D\uDE00'"), "\u{1F600}");
        assert_eq!(cook_string(r"'\uD83Dx'"), "\u{FFFD}x");
    }

    #[test]
    fn test_cook_line_continuation() {
        assert_eq!(cook_string("'a\\\nb'"), "ab");
        assert_eq!(cook_string("'a\\\r\nb'"), "ab");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1000.0020"), Some(1000.002));
        assert_eq!(parse_number(".2e00"), Some(0.2));
        assert_eq!(parse_number("2.e10"), Some(2e10));
        assert_eq!(parse_number("0xFF"), Some(255.0));
        assert_eq!(parse_number("017"), Some(15.0));
        assert_eq!(parse_number("019"), Some(19.0));
        assert_eq!(parse_number("0"), Some(0.0));
    }

    #[test]
    fn test_split_regex() {
        assert_eq!(split_regex("/foo/g"), ("foo", "g"));
        assert_eq!(split_regex("/a\\/b/"), ("a\\/b", ""));
        assert_eq!(split_regex("/[/]/gi"), ("[/]", "gi"));
    }
}
