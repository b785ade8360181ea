use super::toc::{CONTENT_PLAY_ORDER, COVER_PLAY_ORDER, nav_depth};
use super::{CONTENT_HREF, COVER_HREF, NavPoint};
use crate::util::xml_escape;

/// Legacy NCX navigation: cover and content landmarks, then the section tree.
pub fn generate_toc_ncx(points: &[NavPoint], title: &str, uid: &str) -> String {
    let mut ncx = String::new();
    ncx.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    ncx.push_str("<ncx xmlns=\"http://www.daisy.org/z3986/2005/ncx/\" version=\"2005-1\">\n");
    ncx.push_str("<head>\n");
    ncx.push_str(&format!("  <meta name=\"dtb:uid\" content=\"{}\"/>\n", xml_escape(uid)));
    ncx.push_str(&format!("  <meta name=\"dtb:depth\" content=\"{}\"/>\n", nav_depth(points)));
    ncx.push_str("  <meta name=\"dtb:totalPageCount\" content=\"0\"/>\n");
    ncx.push_str("  <meta name=\"dtb:maxPageNumber\" content=\"0\"/>\n");
    ncx.push_str("</head>\n");
    ncx.push_str(&format!("<docTitle><text>{}</text></docTitle>\n", xml_escape(title)));
    ncx.push_str("<navMap>\n");
    write_ncx_point(
        &mut ncx,
        &format!("navpoint-{COVER_PLAY_ORDER}"),
        COVER_PLAY_ORDER,
        "Cover",
        COVER_HREF,
        1,
    );
    ncx.push_str("</navPoint>\n");
    write_ncx_point(
        &mut ncx,
        &format!("navpoint-{CONTENT_PLAY_ORDER}"),
        CONTENT_PLAY_ORDER,
        "Content",
        CONTENT_HREF,
        1,
    );
    ncx.push_str("</navPoint>\n");
    write_ncx_points(&mut ncx, points, 1);
    ncx.push_str("</navMap>\n");
    ncx.push_str("</ncx>\n");
    ncx
}

fn write_ncx_points(ncx: &mut String, points: &[NavPoint], level: usize) {
    for point in points {
        write_ncx_point(
            ncx,
            &format!("navpoint-{}", point.id),
            point.play_order,
            &point.label,
            &point.href,
            level,
        );
        write_ncx_points(ncx, &point.children, level + 1);
        ncx.push_str(&format!("{}</navPoint>\n", "  ".repeat(level - 1)));
    }
}

/// Opening tag, label and content of a navPoint; the caller closes it.
fn write_ncx_point(
    ncx: &mut String,
    id: &str,
    play_order: usize,
    label: &str,
    href: &str,
    level: usize,
) {
    let indent = "  ".repeat(level - 1);
    ncx.push_str(&format!(
        "{indent}<navPoint id=\"{}\" playOrder=\"{play_order}\">\n",
        xml_escape(id)
    ));
    ncx.push_str(&format!("{indent}  <navLabel><text>{}</text></navLabel>\n", xml_escape(label)));
    ncx.push_str(&format!("{indent}  <content src=\"{}\"/>\n", xml_escape(href)));
}

/// EPUB 3 navigation document with a `toc` and a `landmarks` nav.
pub fn generate_nav_xhtml(points: &[NavPoint], title: &str) -> String {
    let mut html = String::new();
    html.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html xmlns=\"http://www.w3.org/1999/xhtml\" xmlns:epub=\"http://www.idpf.org/2007/ops\">\n");
    html.push_str(&format!("<head><title>{}</title>\n", xml_escape(title)));
    html.push_str("<style type=\"text/css\">\n");
    html.push_str("  nav { font-family: serif; }\n");
    html.push_str("  ol { list-style-type: none; padding-left: 1em; }\n");
    html.push_str("  li { margin: 0.5em 0; }\n");
    html.push_str("  a { text-decoration: none; color: inherit; }\n");
    html.push_str("</style>\n");
    html.push_str("</head>\n");
    html.push_str("<body>\n");
    html.push_str("<nav epub:type=\"toc\" id=\"toc\">\n");
    html.push_str("<h1>Table of Contents</h1>\n");
    html.push_str("<ol>\n");
    html.push_str(&format!("<li><a href=\"{COVER_HREF}\">Cover</a></li>\n"));
    html.push_str(&format!("<li><a href=\"{CONTENT_HREF}\">Content</a></li>\n"));
    write_nav_items(&mut html, points);
    html.push_str("</ol>\n");
    html.push_str("</nav>\n");
    html.push_str("<nav epub:type=\"landmarks\" id=\"landmarks\" hidden=\"hidden\">\n");
    html.push_str("<ol>\n");
    html.push_str(&format!("<li><a epub:type=\"cover\" href=\"{COVER_HREF}\">Cover</a></li>\n"));
    html.push_str(&format!(
        "<li><a epub:type=\"bodymatter\" href=\"{CONTENT_HREF}\">Start of Content</a></li>\n"
    ));
    html.push_str("</ol>\n");
    html.push_str("</nav>\n");
    html.push_str("</body>\n</html>\n");
    html
}

fn write_nav_items(html: &mut String, points: &[NavPoint]) {
    for point in points {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a>",
            xml_escape(&point.href),
            xml_escape(&point.label)
        ));
        if !point.children.is_empty() {
            html.push_str("\n<ol>\n");
            write_nav_items(html, &point.children);
            html.push_str("</ol>\n");
        }
        html.push_str("</li>\n");
    }
}
