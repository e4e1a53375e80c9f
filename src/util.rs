//! Input decoding helpers.

use std::borrow::Cow;

/// How far into the document to look for an encoding declaration.
const SNIFF_LEN: usize = 1024;

/// Decode HTML bytes to a string.
///
/// 1. UTF-8 (a BOM is honored and stripped)
/// 2. the encoding declared by `<meta charset>`, `<meta http-equiv>` or an
///    XML declaration in the first kilobyte
/// 3. Windows-1252, the de-facto default for legacy pages
///
/// Valid UTF-8 input is returned without copying.
pub fn decode_html(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    if let Some(label) = sniff_charset(bytes)
        && let Some(encoding) = encoding_rs::Encoding::for_label(label.as_bytes())
    {
        tracing::debug!(encoding = encoding.name(), "decoding with declared charset");
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    tracing::debug!("input is not UTF-8; falling back to windows-1252");
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Find a declared charset label near the start of the document.
///
/// ```
/// use pagenav::util::sniff_charset;
///
/// assert_eq!(sniff_charset(br#"<meta charset="iso-8859-2">"#), Some("iso-8859-2"));
/// assert_eq!(sniff_charset(b"<?xml version='1.0' encoding='koi8-r'?>"), Some("koi8-r"));
/// assert_eq!(sniff_charset(b"<p>no declaration</p>"), None);
/// ```
pub fn sniff_charset(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(SNIFF_LEN)];

    for key in [&b"charset="[..], &b"encoding="[..]] {
        let Some(pos) = prefix
            .windows(key.len())
            .position(|w| w.eq_ignore_ascii_case(key))
        else {
            continue;
        };
        if let Some(value) = attribute_value(&prefix[pos + key.len()..]) {
            return Some(value);
        }
    }
    None
}

/// Read a quoted or bare attribute value at the start of `rest`.
fn attribute_value(rest: &[u8]) -> Option<&str> {
    let (&first, tail) = rest.split_first()?;
    let value = if first == b'"' || first == b'\'' {
        let end = tail.iter().position(|&b| b == first)?;
        &tail[..end]
    } else {
        let end = rest
            .iter()
            .position(|&b| b.is_ascii_whitespace() || matches!(b, b'"' | b'\'' | b';' | b'>' | b'/'))
            .unwrap_or(rest.len());
        &rest[..end]
    };

    let value = std::str::from_utf8(value).ok()?.trim();
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_borrowed() {
        let decoded = decode_html("<p>héllo</p>".as_bytes());
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(decoded, "<p>héllo</p>");
    }

    #[test]
    fn test_declared_charset_wins_over_fallback() {
        // 0xB1 is "ą" in ISO-8859-2 and "±" in Windows-1252.
        let bytes = b"<meta charset=iso-8859-2><p>\xb1</p>";
        assert!(decode_html(bytes).contains('\u{105}'));
    }

    #[test]
    fn test_http_equiv_content_type() {
        let bytes = br#"<meta http-equiv="Content-Type" content="text/html; charset=Shift_JIS">"#;
        assert_eq!(sniff_charset(bytes), Some("Shift_JIS"));
    }

    #[test]
    fn test_windows_1252_fallback() {
        assert_eq!(decode_html(b"\x93quoted\x94"), "\u{201c}quoted\u{201d}");
    }

    #[test]
    fn test_unknown_label_falls_back() {
        assert_eq!(decode_html(b"<meta charset=bogus>\xe9"), "<meta charset=bogus>\u{e9}");
    }
}
