use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn input bytes into a [`crate::fb2::Document`].
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to read FB2 input: {0}")]
    Io(#[from] std::io::Error),

    #[error("input is not valid {label} text")]
    Encoding { label: &'static str },

    #[error("failed to parse FB2 XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unexpected root element <{0}>, expected <FictionBook>")]
    UnexpectedRoot(String),

    #[error("no root element found")]
    MissingRoot,

    #[error("document ended inside <{0}>")]
    UnexpectedEof(String),

    #[error("elements nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Failure while writing the EPUB archive.
#[derive(Error, Debug)]
pub enum PackagingError {
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create EPUB file {}: {source}", path.display())]
    CreateFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create archive entry {name}: {source}")]
    Entry {
        name: String,
        source: zip::result::ZipError,
    },

    #[error("failed to write archive entry {name}: {source}")]
    Write {
        name: String,
        source: std::io::Error,
    },

    #[error("failed to finalize EPUB archive: {0}")]
    Finish(zip::result::ZipError),
}

/// Either half of a full conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Package(#[from] PackagingError),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
