pub mod container;
pub mod navigation;
pub mod opf;
pub mod pages;
pub mod resources;
pub mod toc;
pub mod writer;

use crate::util::format_iso8601;

/// Directory holding the package document and all content.
pub const OEBPS_DIR: &str = "OEBPS";
pub const OPF_HREF: &str = "content.opf";
pub const NCX_HREF: &str = "toc.ncx";
pub const NAV_HREF: &str = "nav.xhtml";
pub const COVER_HREF: &str = "cover.xhtml";
pub const CONTENT_HREF: &str = "content.xhtml";

/// A navigation point shared by the NCX and the nav document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPoint {
    pub id: String,
    pub label: String,
    pub href: String,
    pub play_order: usize,
    pub children: Vec<NavPoint>,
}

/// Per-package values that are not derived from the document.
#[derive(Debug, Clone)]
pub struct PackageInfo {
    /// Unique identifier, shared by `dc:identifier` and the NCX `dtb:uid`.
    pub identifier: String,
    /// `dcterms:modified` timestamp.
    pub modified: String,
}

impl PackageInfo {
    /// Fresh `urn:uuid:` identifier and the current UTC time.
    pub fn generate() -> Self {
        Self {
            identifier: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
            modified: format_iso8601(),
        }
    }
}
