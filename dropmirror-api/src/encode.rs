//! ASCII-safe escaping for HTTP header values.
//!
//! The content endpoints take their JSON argument in the `Dropbox-API-Arg`
//! header, and header values must stay within ASCII. Every UTF-16 code unit
//! at or above U+007F is escaped as a 4-hex-digit `\uXXXX` sequence; code
//! points outside the BMP become surrogate pairs, two escapes each. The
//! escaping applies only to header-carried arguments, never to paths placed
//! in URLs or request bodies.

use std::fmt::Write as _;

/// Escapes a string for use as an HTTP header value.
pub fn header_safe(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for unit in s.encode_utf16() {
        if unit >= 0x7f {
            let _ = write!(out, "\\u{unit:04x}");
        } else {
            out.push(unit as u8 as char);
        }
    }
    out
}

/// Reverses [`header_safe`], turning `\uXXXX` escapes back into text.
/// Input that is not a well-formed escape passes through unchanged.
pub fn unescape(s: &str) -> String {
    let mut units: Vec<u16> = Vec::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'u') {
            chars.next();
            let hex: String = chars.by_ref().take(4).collect();
            if hex.len() == 4 {
                if let Ok(unit) = u16::from_str_radix(&hex, 16) {
                    units.push(unit);
                    continue;
                }
            }
            units.push(u16::from(b'\\'));
            units.push(u16::from(b'u'));
            units.extend(hex.encode_utf16());
            continue;
        }
        let mut buf = [0u16; 2];
        units.extend_from_slice(c.encode_utf16(&mut buf));
    }
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        assert_eq!(header_safe("/maps/course-a.jpg"), "/maps/course-a.jpg");
    }

    #[test]
    fn non_ascii_escapes_to_four_hex_digits() {
        assert_eq!(header_safe("Järvi"), "J\\u00e4rvi");
    }

    #[test]
    fn delete_char_is_escaped() {
        assert_eq!(header_safe("\u{7f}"), "\\u007f");
    }

    #[test]
    fn astral_plane_escapes_as_surrogate_pair() {
        assert_eq!(header_safe("🗺"), "\\ud83d\\uddfa");
    }

    #[test]
    fn round_trip_restores_original() {
        for s in [
            "/plain/ascii.jpg",
            "/tulokset/2024-vårlopp/plan ö.pdf",
            "mäp 🗺 märk",
            "",
        ] {
            assert_eq!(unescape(&header_safe(s)), s);
        }
    }

    #[test]
    fn unescape_leaves_plain_backslashes() {
        assert_eq!(unescape("a\\b"), "a\\b");
        assert_eq!(unescape("tail\\"), "tail\\");
    }

    #[test]
    fn unescape_leaves_malformed_escapes() {
        assert_eq!(unescape("\\uZZZZ"), "\\uZZZZ");
    }
}
