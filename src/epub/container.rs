use super::{OEBPS_DIR, OPF_HREF};

/// `META-INF/container.xml` pointing at the package document.
pub fn generate_container_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="{OEBPS_DIR}/{OPF_HREF}" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_container_xml() {
        insta::assert_snapshot!(generate_container_xml().trim_end(), @r###"
        <?xml version="1.0" encoding="UTF-8"?>
        <container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
          <rootfiles>
            <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
          </rootfiles>
        </container>
        "###);
    }
}
