use super::resources::ResourceMap;
use super::{CONTENT_HREF, COVER_HREF, NAV_HREF, NCX_HREF, PackageInfo};
use crate::fb2::Metadata;
use crate::util::xml_escape;

/// Package document: Dublin Core metadata, manifest and spine.
pub fn generate_opf(meta: &Metadata, info: &PackageInfo, resources: &ResourceMap) -> String {
    let mut opf = String::new();
    opf.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    opf.push_str("<package xmlns=\"http://www.idpf.org/2007/opf\" version=\"3.0\" unique-identifier=\"bookid\">\n");

    // Metadata
    opf.push_str("  <metadata xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\n");
    opf.push_str(&format!("    <dc:title>{}</dc:title>\n", xml_escape(meta.display_title())));
    opf.push_str(&format!(
        "    <dc:creator>{}</dc:creator>\n",
        xml_escape(&meta.display_authors())
    ));
    opf.push_str(&format!(
        "    <dc:language>{}</dc:language>\n",
        xml_escape(meta.display_language())
    ));
    opf.push_str(&format!(
        "    <dc:identifier id=\"bookid\">{}</dc:identifier>\n",
        xml_escape(&info.identifier)
    ));
    for genre in &meta.genres {
        opf.push_str(&format!("    <dc:subject>{}</dc:subject>\n", xml_escape(genre)));
    }
    if let Some(ref annotation) = meta.annotation {
        opf.push_str(&format!("    <dc:description>{}</dc:description>\n", xml_escape(annotation)));
    }
    if let Some(ref publisher) = meta.publisher {
        opf.push_str(&format!("    <dc:publisher>{}</dc:publisher>\n", xml_escape(publisher)));
    }
    if let Some(ref date) = meta.date {
        opf.push_str(&format!("    <dc:date>{}</dc:date>\n", xml_escape(date)));
    }
    let cover = meta.cover_image.as_deref().and_then(|id| resources.get(id));
    if let Some(resource) = cover {
        opf.push_str(&format!(
            "    <meta name=\"cover\" content=\"{}\"/>\n",
            xml_escape(&ResourceMap::manifest_id(resource))
        ));
    }
    opf.push_str(&format!(
        "    <meta property=\"dcterms:modified\">{}</meta>\n",
        xml_escape(&info.modified)
    ));
    opf.push_str("  </metadata>\n");

    // Manifest
    opf.push_str("  <manifest>\n");
    opf.push_str(&format!(
        "    <item id=\"ncx\" href=\"{NCX_HREF}\" media-type=\"application/x-dtbncx+xml\"/>\n"
    ));
    opf.push_str(&format!(
        "    <item id=\"nav\" href=\"{NAV_HREF}\" media-type=\"application/xhtml+xml\" properties=\"nav\"/>\n"
    ));
    opf.push_str(&format!(
        "    <item id=\"cover\" href=\"{COVER_HREF}\" media-type=\"application/xhtml+xml\"/>\n"
    ));
    opf.push_str(&format!(
        "    <item id=\"content\" href=\"{CONTENT_HREF}\" media-type=\"application/xhtml+xml\"/>\n"
    ));
    for resource in resources.iter() {
        let props = if cover.is_some_and(|c| c.id == resource.id) {
            " properties=\"cover-image\""
        } else {
            ""
        };
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"{props}/>\n",
            xml_escape(&ResourceMap::manifest_id(resource)),
            xml_escape(&ResourceMap::href_of(resource)),
            xml_escape(&resource.content_type)
        ));
    }
    opf.push_str("  </manifest>\n");

    // Spine
    opf.push_str("  <spine toc=\"ncx\">\n");
    opf.push_str("    <itemref idref=\"cover\"/>\n");
    opf.push_str("    <itemref idref=\"content\"/>\n");
    opf.push_str("  </spine>\n");

    opf.push_str("</package>\n");
    opf
}
