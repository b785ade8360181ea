use crate::fb2::Metadata;
use crate::util::xml_escape;

const CONTENT_CSS: &str = "\
    body { font-family: serif; padding: 1em; line-height: 1.6; }
    h1, h2, h3, h4, h5, h6 { margin-top: 1.5em; }
    p { margin: 1em 0; text-align: justify; }
    .empty-line { height: 1em; }
    .poem { margin: 1em 2em; }
    .stanza { margin: 1em 0; }
    p.verse { margin: 0; text-align: left; }
    blockquote.cite { margin: 1em 2em; font-style: italic; }
    img { max-width: 100%; }
";

/// Title and author splash page.
pub fn cover_page(meta: &Metadata) -> String {
    let title = xml_escape(meta.display_title());
    let authors = xml_escape(&meta.display_authors());
    let lang = xml_escape(meta.display_language());
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{lang}" lang="{lang}">
<head>
  <title>{title}</title>
  <style type="text/css">
    body {{ text-align: center; padding: 2em; font-family: serif; }}
    h1 {{ margin-top: 3em; }}
    h2 {{ margin-top: 2em; color: #666; }}
  </style>
</head>
<body epub:type="cover">
  <h1>{title}</h1>
  <h2>{authors}</h2>
</body>
</html>
"#
    )
}

/// Wrap rendered body markup in the main content document.
pub fn content_document(meta: &Metadata, body_html: &str) -> String {
    let lang = xml_escape(meta.display_language());
    let title = xml_escape(meta.display_title());
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{lang}" lang="{lang}">
<head>
  <title>{title}</title>
  <style type="text/css">
{CONTENT_CSS}  </style>
</head>
<body>
{body_html}</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb2::Author;

    #[test]
    fn cover_shows_title_and_authors() {
        let meta = Metadata {
            title: "Fathers & Sons".to_string(),
            authors: vec![Author {
                first_name: "Ivan".to_string(),
                last_name: "Turgenev".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let page = cover_page(&meta);
        assert!(page.contains("<title>Fathers &amp; Sons</title>"));
        assert!(page.contains("<h1>Fathers &amp; Sons</h1>"));
        assert!(page.contains("<h2>Ivan Turgenev</h2>"));
        assert!(page.contains("xml:lang=\"en\""));
    }

    #[test]
    fn cover_defaults() {
        let page = cover_page(&Metadata::default());
        assert!(page.contains("<h1>Untitled</h1>"));
        assert!(page.contains("<h2>Unknown</h2>"));
    }

    #[test]
    fn content_wraps_body() {
        let doc = content_document(&Metadata::default(), "<p>Hello</p>\n");
        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(doc.contains("<body>\n<p>Hello</p>\n</body>"));
        assert!(doc.contains(".empty-line { height: 1em; }"));
    }

    #[test]
    fn content_with_empty_body_is_well_formed() {
        let doc = content_document(&Metadata::default(), "");
        assert!(doc.contains("<body>\n</body>"));
    }
}
