use crate::error::ParseError;
use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static XML_DECL_ENCODING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*<\?xml\s[^>]*?encoding\s*=\s*["']([A-Za-z0-9._:\-]+)["']"#)
        .expect("valid regex")
});

/// Encoding named by the `<?xml ... encoding="..."?>` declaration, if any.
pub fn declared_encoding(bytes: &[u8]) -> Option<&[u8]> {
    let head = &bytes[..bytes.len().min(512)];
    let head = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
    XML_DECL_ENCODING
        .captures(head)
        .and_then(|c| c.get(1))
        .map(|m| m.as_bytes())
}

/// Pick the encoding for a document: BOM first, then the declaration,
/// then UTF-8 when the declared label is absent or unknown.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    match declared_encoding(bytes).and_then(Encoding::for_label) {
        Some(encoding) => encoding,
        None => {
            if let Some(label) = declared_encoding(bytes) {
                tracing::warn!(
                    label = %String::from_utf8_lossy(label),
                    "unrecognized document encoding, assuming UTF-8"
                );
            }
            UTF_8
        }
    }
}

/// Decode raw document bytes to UTF-8 text ahead of XML parsing.
pub fn normalize(bytes: &[u8]) -> Result<Cow<'_, str>, ParseError> {
    let encoding = detect_encoding(bytes);
    let (text, used, malformed) = encoding.decode(bytes);
    if malformed {
        return Err(ParseError::Encoding {
            label: used.name(),
        });
    }
    tracing::debug!(encoding = used.name(), "decoded FB2 input");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_encoding_found() {
        let xml = br#"<?xml version="1.0" encoding="windows-1251"?><FictionBook/>"#;
        assert_eq!(declared_encoding(xml), Some(&b"windows-1251"[..]));
    }

    #[test]
    fn declared_encoding_single_quotes() {
        let xml = b"<?xml version='1.0' encoding='koi8-r'?><FictionBook/>";
        assert_eq!(declared_encoding(xml), Some(&b"koi8-r"[..]));
    }

    #[test]
    fn declared_encoding_absent() {
        assert_eq!(declared_encoding(b"<?xml version=\"1.0\"?><a/>"), None);
        assert_eq!(declared_encoding(b"<FictionBook/>"), None);
        assert_eq!(declared_encoding(b""), None);
    }

    #[test]
    fn unknown_label_defaults_to_utf8() {
        let xml = br#"<?xml version="1.0" encoding="x-made-up"?><a/>"#;
        assert_eq!(detect_encoding(xml), UTF_8);
    }

    #[test]
    fn decodes_windows_1251() {
        // "Привет" in windows-1251
        let mut xml = br#"<?xml version="1.0" encoding="windows-1251"?><p>"#.to_vec();
        xml.extend_from_slice(&[0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2]);
        xml.extend_from_slice(b"</p>");
        let text = normalize(&xml).unwrap();
        assert!(text.contains("<p>Привет</p>"));
    }

    #[test]
    fn strips_utf8_bom() {
        let mut xml = b"\xEF\xBB\xBF".to_vec();
        xml.extend_from_slice(b"<a>x</a>");
        assert_eq!(normalize(&xml).unwrap(), "<a>x</a>");
    }

    #[test]
    fn malformed_utf8_is_error() {
        let xml = b"<a>\xFF\xFE\xFD</a>";
        assert!(matches!(
            normalize(xml),
            Err(ParseError::Encoding { label: "UTF-8" })
        ));
    }
}
