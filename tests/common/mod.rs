use fb2epub::PackageInfo;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Resolve a fixture FB2 by name from tests/fixtures/
pub fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    assert!(path.exists(), "fixture not found: {}", path.display());
    path
}

#[allow(dead_code)]
pub fn read_fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).expect("read fixture")
}

/// Fixed identifier and timestamp for reproducible packages.
#[allow(dead_code)]
pub fn fixed_info() -> PackageInfo {
    PackageInfo {
        identifier: "urn:uuid:00000000-0000-4000-8000-000000000000".to_string(),
        modified: "2024-01-01T00:00:00Z".to_string(),
    }
}

/// Parse FB2 bytes and package them into a temp directory.
/// Returns (TempDir, path_to_epub). TempDir must be kept alive.
#[allow(dead_code)]
pub fn build_epub(bytes: &[u8]) -> (tempfile::TempDir, PathBuf) {
    let doc = fb2epub::parse_document(bytes).expect("parse fb2");
    let tmp = tempfile::TempDir::new().expect("create temp dir");
    let path = tmp.path().join("book.epub");
    fb2epub::generate_epub_with(&doc, &fixed_info(), &path).expect("generate epub");
    (tmp, path)
}

/// Entry names in archive order.
#[allow(dead_code)]
pub fn entry_names(path: &Path) -> Vec<String> {
    let file = std::fs::File::open(path).expect("open epub");
    let mut archive = zip::ZipArchive::new(file).expect("open zip");
    (0..archive.len())
        .map(|i| archive.by_index(i).expect("entry").name().to_string())
        .collect()
}

/// Read one archive entry as UTF-8 text.
#[allow(dead_code)]
pub fn read_entry(path: &Path, name: &str) -> String {
    let file = std::fs::File::open(path).expect("open epub");
    let mut archive = zip::ZipArchive::new(file).expect("open zip");
    let mut entry = archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("missing entry {name}"));
    let mut content = String::new();
    entry.read_to_string(&mut content).expect("read entry");
    content
}

/// Basic structural validation of an EPUB file
#[allow(dead_code)]
pub fn assert_valid_epub(path: &Path) {
    let file = std::fs::File::open(path).expect("open epub");
    let mut archive = zip::ZipArchive::new(file).expect("open zip");

    // Check mimetype is first entry and stored
    let mut mimetype = archive.by_index(0).expect("first entry");
    assert_eq!(mimetype.name(), "mimetype");
    assert_eq!(mimetype.compression(), zip::CompressionMethod::Stored);
    let mut content = String::new();
    mimetype.read_to_string(&mut content).expect("read mimetype");
    assert_eq!(content, "application/epub+zip");
    drop(mimetype);

    for name in [
        "META-INF/container.xml",
        "OEBPS/content.opf",
        "OEBPS/toc.ncx",
        "OEBPS/nav.xhtml",
        "OEBPS/cover.xhtml",
        "OEBPS/content.xhtml",
    ] {
        archive
            .by_name(name)
            .unwrap_or_else(|_| panic!("missing entry {name}"));
    }
}
