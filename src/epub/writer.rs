use super::container::generate_container_xml;
use super::navigation::{generate_nav_xhtml, generate_toc_ncx};
use super::opf::generate_opf;
use super::pages::{content_document, cover_page};
use super::resources::ResourceMap;
use super::toc::{build_toc, nav_points};
use super::{CONTENT_HREF, COVER_HREF, NAV_HREF, NCX_HREF, OEBPS_DIR, OPF_HREF, PackageInfo};
use crate::error::PackagingError;
use crate::fb2::Document;
use crate::render::section::render_body;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const MIMETYPE: &[u8] = b"application/epub+zip";

/// Write `doc` as an EPUB file at `path` with a fresh identifier and timestamp.
pub fn generate_epub(doc: &Document, path: &Path) -> Result<(), PackagingError> {
    generate_epub_with(doc, &PackageInfo::generate(), path)
}

/// Write `doc` as an EPUB file at `path`, creating missing parent directories.
pub fn generate_epub_with(
    doc: &Document,
    info: &PackageInfo,
    path: &Path,
) -> Result<(), PackagingError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| PackagingError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(path).map_err(|source| PackagingError::CreateFile {
        path: path.to_path_buf(),
        source,
    })?;
    write_package(doc, info, file)?;
    tracing::debug!(path = %path.display(), "EPUB written");
    Ok(())
}

/// Stream the whole package into `sink` and hand the sink back.
///
/// Entry order is fixed: `mimetype` (stored), container, package document,
/// NCX, nav, cover, content, then one entry per image.
pub fn write_package<W: Write + Seek>(
    doc: &Document,
    info: &PackageInfo,
    sink: W,
) -> Result<W, PackagingError> {
    let resources = ResourceMap::new(&doc.binaries);
    let points = nav_points(&build_toc(&doc.body));
    let title = doc.metadata.display_title();

    let mut zip = ZipWriter::new(sink);

    // mimetype must be first and uncompressed
    let stored = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    add_entry(&mut zip, "mimetype", stored, MIMETYPE)?;

    let deflate = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    add_entry(
        &mut zip,
        "META-INF/container.xml",
        deflate,
        generate_container_xml().as_bytes(),
    )?;
    add_entry(
        &mut zip,
        &format!("{OEBPS_DIR}/{OPF_HREF}"),
        deflate,
        generate_opf(&doc.metadata, info, &resources).as_bytes(),
    )?;
    add_entry(
        &mut zip,
        &format!("{OEBPS_DIR}/{NCX_HREF}"),
        deflate,
        generate_toc_ncx(&points, title, &info.identifier).as_bytes(),
    )?;
    add_entry(
        &mut zip,
        &format!("{OEBPS_DIR}/{NAV_HREF}"),
        deflate,
        generate_nav_xhtml(&points, title).as_bytes(),
    )?;
    add_entry(
        &mut zip,
        &format!("{OEBPS_DIR}/{COVER_HREF}"),
        deflate,
        cover_page(&doc.metadata).as_bytes(),
    )?;
    let body_html = render_body(&doc.body, &resources);
    add_entry(
        &mut zip,
        &format!("{OEBPS_DIR}/{CONTENT_HREF}"),
        deflate,
        content_document(&doc.metadata, &body_html).as_bytes(),
    )?;

    for resource in resources.iter() {
        let name = format!("{OEBPS_DIR}/{}", ResourceMap::href_of(resource));
        add_entry(&mut zip, &name, deflate, &resource.data)?;
    }

    zip.finish().map_err(PackagingError::Finish)
}

fn add_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    options: SimpleFileOptions,
    data: &[u8],
) -> Result<(), PackagingError> {
    zip.start_file(name, options)
        .map_err(|source| PackagingError::Entry {
            name: name.to_string(),
            source,
        })?;
    zip.write_all(data).map_err(|source| PackagingError::Write {
        name: name.to_string(),
        source,
    })?;
    tracing::debug!(entry = name, bytes = data.len(), "archive entry written");
    Ok(())
}
