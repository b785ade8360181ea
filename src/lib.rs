//! FictionBook 2.0 to EPUB 3 conversion.
//!
//! The pipeline has two halves: [`parse_document`] builds a typed
//! [`Document`] from raw FB2 bytes, and [`generate_epub`] renders that model
//! into a packaged EPUB archive. [`convert`] runs both.

pub mod epub;
pub mod error;
pub mod fb2;
pub mod render;
pub mod util;

use std::path::Path;

pub use epub::PackageInfo;
pub use epub::writer::{generate_epub, generate_epub_with, write_package};
pub use error::{ConvertError, PackagingError, ParseError, Result};
pub use fb2::Document;
pub use fb2::parser::{parse_document, parse_file, parse_reader};

/// Parse FB2 bytes and write the resulting EPUB to `output`.
pub fn convert(bytes: &[u8], output: &Path) -> Result<()> {
    let doc = parse_document(bytes)?;
    tracing::debug!(
        title = doc.metadata.display_title(),
        sections = doc.section_count(),
        binaries = doc.binaries.len(),
        "parsed FB2 document"
    );
    generate_epub(&doc, output)?;
    Ok(())
}
