/// Escape text for XML/XHTML content and attribute values.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shared date/time calculation from system clock.
///
/// Returns `(year, month, day, hour, minute, second)` in UTC.
fn now_components() -> (u64, u64, u64, u64, u64, u64) {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    civil_from_unix(secs)
}

/// Split a Unix timestamp into calendar components (proleptic Gregorian, UTC).
fn civil_from_unix(secs: u64) -> (u64, u64, u64, u64, u64, u64) {
    let mut days = secs / 86400;
    let mut year = 1970;
    loop {
        let year_days = if is_leap(year) { 366 } else { 365 };
        if days < year_days {
            break;
        }
        days -= year_days;
        year += 1;
    }
    let month_days: [u64; 12] = if is_leap(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };
    let mut month = 12;
    for (i, &md) in month_days.iter().enumerate() {
        if days < md {
            month = i as u64 + 1;
            break;
        }
        days -= md;
    }
    let day_secs = secs % 86400;
    (
        year,
        month,
        days + 1,
        day_secs / 3600,
        (day_secs % 3600) / 60,
        day_secs % 60,
    )
}

fn is_leap(year: u64) -> bool {
    (year.is_multiple_of(4) && !year.is_multiple_of(100)) || year.is_multiple_of(400)
}

/// Current UTC timestamp as `YYYY-MM-DDThh:mm:ssZ`, the form `dcterms:modified` requires.
pub fn format_iso8601() -> String {
    let (year, month, day, hour, min, sec) = now_components();
    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{min:02}:{sec:02}Z")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("<>&\"'"), "&lt;&gt;&amp;&quot;&#39;");
        assert_eq!(xml_escape("plain text"), "plain text");
        assert_eq!(xml_escape("Привет & пока"), "Привет &amp; пока");
    }

    #[test]
    fn test_civil_from_unix() {
        assert_eq!(civil_from_unix(0), (1970, 1, 1, 0, 0, 0));
        // 2000-02-29T12:34:56Z
        assert_eq!(civil_from_unix(951_827_696), (2000, 2, 29, 12, 34, 56));
        // 2024-12-31T23:59:59Z
        assert_eq!(civil_from_unix(1_735_689_599), (2024, 12, 31, 23, 59, 59));
    }

    #[test]
    fn test_format_iso8601_format() {
        let ts = format_iso8601();
        let re = regex::Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$").unwrap();
        assert!(re.is_match(&ts), "bad timestamp format: {ts}");
    }
}
