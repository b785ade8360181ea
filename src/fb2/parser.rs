use super::encoding;
use super::{
    Author, BinaryResource, Body, Citation, Document, ImageRef, Link, Paragraph, Poem, Section,
    Span, SpanKind, Stanza, Title,
};
use crate::error::ParseError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::Read;
use std::path::Path;

/// Deepest element nesting accepted. The rendering and navigation passes
/// recurse over the section and span trees, so depth is bounded here.
pub const MAX_DEPTH: usize = 1024;

/// Parse FB2 bytes into a [`Document`].
///
/// Empty or whitespace-only input yields an empty document.
pub fn parse_document(bytes: &[u8]) -> Result<Document, ParseError> {
    let text = encoding::normalize(bytes)?;
    if text.trim().is_empty() {
        return Ok(Document::default());
    }
    parse_str(&text)
}

/// Read a whole stream, then parse it.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Document, ParseError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_document(&bytes)
}

pub fn parse_file(path: &Path) -> Result<Document, ParseError> {
    let bytes = std::fs::read(path)?;
    parse_document(&bytes)
}

fn parse_str(xml: &str) -> Result<Document, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut builder = Builder::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => builder.open(e)?,
            Event::Empty(ref e) => {
                builder.open(e)?;
                builder.close();
            }
            Event::End(_) => builder.close(),
            Event::Text(ref e) => builder.text(&e.unescape()?),
            Event::CData(e) => builder.text(&String::from_utf8_lossy(&e.into_inner())),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    builder.finish()
}

/// Simple text-valued elements.
#[derive(Debug, Clone, Copy)]
enum Field {
    BookTitle,
    Lang,
    Genre,
    Date,
    Publisher,
    FirstName,
    MiddleName,
    LastName,
    Nickname,
    AnnotationLine,
    Verse,
    TextAuthor,
}

/// One open element and the value being built for it.
enum Frame {
    FictionBook,
    Description,
    TitleInfo,
    PublishInfo,
    Coverpage,
    Annotation(Vec<String>),
    Author(Author),
    Field(Field, String),
    /// Element nested in a field; its text flows to the field.
    Passthrough,
    Body(Body),
    Section(Section),
    Title(Title),
    Paragraph(Paragraph),
    Span(Span),
    Link(Link),
    Poem(Poem),
    Stanza(Stanza),
    Citation(Citation),
    Binary {
        id: String,
        content_type: String,
        data: String,
    },
    /// Unsupported element; content ignored.
    Skip,
}

#[derive(Default)]
struct Builder {
    doc: Document,
    stack: Vec<Frame>,
    names: Vec<String>,
    seen_root: bool,
    seen_body: bool,
}

fn attr(e: &BytesStart, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == local)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

impl Builder {
    fn open(&mut self, e: &BytesStart) -> Result<(), ParseError> {
        if self.stack.len() >= MAX_DEPTH {
            return Err(ParseError::TooDeep(MAX_DEPTH));
        }
        let local = e.local_name();
        let name = local.as_ref();

        let frame = match self.stack.last_mut() {
            None => {
                if name != b"FictionBook" || self.seen_root {
                    return Err(ParseError::UnexpectedRoot(
                        String::from_utf8_lossy(name).into_owned(),
                    ));
                }
                self.seen_root = true;
                Frame::FictionBook
            }
            Some(Frame::FictionBook) => match name {
                b"description" => Frame::Description,
                b"body" => Frame::Body(Body::default()),
                b"binary" => Frame::Binary {
                    id: attr(e, b"id").unwrap_or_default(),
                    content_type: attr(e, b"content-type").unwrap_or_default(),
                    data: String::new(),
                },
                _ => Frame::Skip,
            },
            Some(Frame::Description) => match name {
                b"title-info" => Frame::TitleInfo,
                b"publish-info" => Frame::PublishInfo,
                _ => Frame::Skip,
            },
            Some(Frame::TitleInfo) => match name {
                b"book-title" => Frame::Field(Field::BookTitle, String::new()),
                b"author" => Frame::Author(Author::default()),
                b"lang" => Frame::Field(Field::Lang, String::new()),
                b"genre" => Frame::Field(Field::Genre, String::new()),
                b"date" => Frame::Field(Field::Date, String::new()),
                b"annotation" => Frame::Annotation(Vec::new()),
                b"coverpage" => Frame::Coverpage,
                _ => Frame::Skip,
            },
            Some(Frame::PublishInfo) => match name {
                b"publisher" => Frame::Field(Field::Publisher, String::new()),
                _ => Frame::Skip,
            },
            Some(Frame::Coverpage) => {
                if name == b"image"
                    && self.doc.metadata.cover_image.is_none()
                    && let Some(href) = attr(e, b"href")
                {
                    let id = href.strip_prefix('#').unwrap_or(&href).to_string();
                    self.doc.metadata.cover_image = Some(id);
                }
                Frame::Skip
            }
            Some(Frame::Author(_)) => match name {
                b"first-name" => Frame::Field(Field::FirstName, String::new()),
                b"middle-name" => Frame::Field(Field::MiddleName, String::new()),
                b"last-name" => Frame::Field(Field::LastName, String::new()),
                b"nickname" => Frame::Field(Field::Nickname, String::new()),
                _ => Frame::Skip,
            },
            Some(Frame::Annotation(_)) => Frame::Field(Field::AnnotationLine, String::new()),
            Some(Frame::Field(..)) | Some(Frame::Passthrough) => Frame::Passthrough,
            Some(Frame::Body(_)) => match name {
                b"title" => Frame::Title(Title::default()),
                b"section" => Frame::Section(Section::default()),
                _ => Frame::Skip,
            },
            Some(Frame::Section(section)) => match name {
                b"title" => Frame::Title(Title::default()),
                b"section" => Frame::Section(Section::default()),
                b"p" => Frame::Paragraph(Paragraph::default()),
                b"poem" => Frame::Poem(Poem::default()),
                b"cite" => Frame::Citation(Citation::default()),
                b"empty-line" => {
                    section.empty_lines += 1;
                    Frame::Skip
                }
                _ => Frame::Skip,
            },
            Some(Frame::Title(_)) => match name {
                b"p" => Frame::Paragraph(Paragraph::default()),
                _ => Frame::Skip,
            },
            Some(Frame::Paragraph(paragraph)) => match name {
                b"strong" => Frame::Span(Span::new(SpanKind::Strong)),
                b"emphasis" => Frame::Span(Span::new(SpanKind::Emphasis)),
                b"a" => Frame::Link(Link {
                    href: attr(e, b"href").unwrap_or_default(),
                    text: String::new(),
                }),
                b"image" => {
                    paragraph.images.push(ImageRef {
                        href: attr(e, b"href").unwrap_or_default(),
                    });
                    Frame::Skip
                }
                _ => Frame::Skip,
            },
            Some(Frame::Span(_)) => match name {
                b"strong" => Frame::Span(Span::new(SpanKind::Strong)),
                b"emphasis" => Frame::Span(Span::new(SpanKind::Emphasis)),
                b"a" => Frame::Link(Link {
                    href: attr(e, b"href").unwrap_or_default(),
                    text: String::new(),
                }),
                _ => Frame::Skip,
            },
            Some(Frame::Poem(_)) => match name {
                b"title" => Frame::Title(Title::default()),
                b"stanza" => Frame::Stanza(Stanza::default()),
                _ => Frame::Skip,
            },
            Some(Frame::Stanza(_)) => match name {
                b"v" => Frame::Field(Field::Verse, String::new()),
                _ => Frame::Skip,
            },
            Some(Frame::Citation(_)) => match name {
                b"p" => Frame::Paragraph(Paragraph::default()),
                b"text-author" => Frame::Field(Field::TextAuthor, String::new()),
                _ => Frame::Skip,
            },
            Some(Frame::Link(_)) | Some(Frame::Binary { .. }) | Some(Frame::Skip) => Frame::Skip,
        };

        self.names.push(String::from_utf8_lossy(name).into_owned());
        self.stack.push(frame);
        Ok(())
    }

    fn text(&mut self, text: &str) {
        let target = self
            .stack
            .iter_mut()
            .rev()
            .find(|f| !matches!(f, Frame::Passthrough));
        match target {
            Some(Frame::Paragraph(p)) => p.text.push_str(text),
            Some(Frame::Span(s)) => s.text.push_str(text),
            Some(Frame::Link(l)) => l.text.push_str(text),
            Some(Frame::Field(_, buf)) => buf.push_str(text),
            Some(Frame::Binary { data, .. }) => data.push_str(text),
            _ => {}
        }
    }

    fn close(&mut self) {
        self.names.pop();
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let meta = &mut self.doc.metadata;

        match (frame, self.stack.last_mut()) {
            (Frame::Field(field, value), parent) => {
                let trimmed = value.trim();
                match (field, parent) {
                    (Field::BookTitle, _) => meta.title = trimmed.to_string(),
                    (Field::Lang, _) => meta.language = trimmed.to_string(),
                    (Field::Genre, _) if !trimmed.is_empty() => {
                        meta.genres.push(trimmed.to_string())
                    }
                    (Field::Date, _) if !trimmed.is_empty() => {
                        meta.date = Some(trimmed.to_string())
                    }
                    (Field::Publisher, _) if !trimmed.is_empty() => {
                        meta.publisher = Some(trimmed.to_string())
                    }
                    (Field::FirstName, Some(Frame::Author(a))) => {
                        a.first_name = trimmed.to_string()
                    }
                    (Field::MiddleName, Some(Frame::Author(a))) => {
                        a.middle_name = trimmed.to_string()
                    }
                    (Field::LastName, Some(Frame::Author(a))) => a.last_name = trimmed.to_string(),
                    (Field::Nickname, Some(Frame::Author(a))) => a.nickname = trimmed.to_string(),
                    (Field::AnnotationLine, Some(Frame::Annotation(lines)))
                        if !trimmed.is_empty() =>
                    {
                        lines.push(trimmed.to_string())
                    }
                    (Field::Verse, Some(Frame::Stanza(stanza))) => stanza.verses.push(value.clone()),
                    (Field::TextAuthor, Some(Frame::Citation(cite))) if !trimmed.is_empty() => {
                        cite.text_authors.push(trimmed.to_string())
                    }
                    _ => {}
                }
            }
            (Frame::Author(author), _) => meta.authors.push(author),
            (Frame::Annotation(lines), _) => {
                if !lines.is_empty() {
                    meta.annotation = Some(lines.join(" "));
                }
            }
            (Frame::Body(body), _) => {
                if self.seen_body {
                    self.doc.body.sections.extend(body.sections);
                } else {
                    self.seen_body = true;
                    self.doc.body = body;
                }
            }
            (Frame::Section(section), Some(Frame::Body(body))) => body.sections.push(section),
            (Frame::Section(section), Some(Frame::Section(parent))) => {
                parent.sections.push(section)
            }
            (Frame::Title(title), Some(Frame::Body(body))) => body.title = Some(title),
            (Frame::Title(title), Some(Frame::Section(section))) => section.title = Some(title),
            (Frame::Title(title), Some(Frame::Poem(poem))) => poem.title = Some(title),
            (Frame::Paragraph(p), Some(Frame::Section(section))) => section.paragraphs.push(p),
            (Frame::Paragraph(p), Some(Frame::Title(title))) => title.paragraphs.push(p),
            (Frame::Paragraph(p), Some(Frame::Citation(cite))) => cite.paragraphs.push(p),
            (Frame::Span(span), Some(Frame::Paragraph(p))) => p.spans.push(span),
            (Frame::Span(span), Some(Frame::Span(parent))) => parent.children.push(span),
            (Frame::Link(link), Some(Frame::Paragraph(p))) => p.links.push(link),
            (Frame::Link(link), Some(Frame::Span(parent))) => parent.links.push(link),
            (Frame::Poem(poem), Some(Frame::Section(section))) => section.poems.push(poem),
            (Frame::Stanza(stanza), Some(Frame::Poem(poem))) => poem.stanzas.push(stanza),
            (Frame::Citation(cite), Some(Frame::Section(section))) => section.citations.push(cite),
            (
                Frame::Binary {
                    id,
                    content_type,
                    data,
                },
                _,
            ) => {
                if let Some(resource) = decode_binary(id, content_type, &data) {
                    self.doc.binaries.push(resource);
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Result<Document, ParseError> {
        if let Some(open) = self.names.last() {
            return Err(ParseError::UnexpectedEof(open.clone()));
        }
        if !self.seen_root {
            return Err(ParseError::MissingRoot);
        }
        Ok(self.doc)
    }
}

/// Decode a base64 `<binary>` payload, dropping it on failure.
fn decode_binary(id: String, content_type: String, data: &str) -> Option<BinaryResource> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    match STANDARD.decode(compact.as_bytes()) {
        Ok(bytes) => {
            tracing::debug!(id = %id, content_type = %content_type, size = bytes.len(), "decoded binary");
            Some(BinaryResource {
                id,
                content_type,
                data: bytes,
            })
        }
        Err(err) => {
            tracing::warn!(id = %id, error = %err, "dropping binary with invalid base64 payload");
            None
        }
    }
}
