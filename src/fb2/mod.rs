pub mod encoding;
pub mod parser;

/// Substituted when the book has no title.
pub const DEFAULT_TITLE: &str = "Untitled";
/// Substituted when no author yields a display name.
pub const DEFAULT_AUTHOR: &str = "Unknown";
/// Substituted when the book declares no language.
pub const DEFAULT_LANGUAGE: &str = "en";

/// A parsed FictionBook document
#[derive(Debug, Default, Clone)]
pub struct Document {
    pub metadata: Metadata,
    pub body: Body,
    pub binaries: Vec<BinaryResource>,
}

/// Book-level metadata from `<description>`
#[derive(Debug, Default, Clone)]
pub struct Metadata {
    pub title: String,
    pub authors: Vec<Author>,
    pub language: String,
    pub genres: Vec<String>,
    pub annotation: Option<String>,
    pub date: Option<String>,
    pub publisher: Option<String>,
    /// Binary id named by `<coverpage>`, without the leading `#`.
    pub cover_image: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Author {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub nickname: String,
}

#[derive(Debug, Default, Clone)]
pub struct Body {
    pub title: Option<Title>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Default, Clone)]
pub struct Section {
    pub title: Option<Title>,
    pub sections: Vec<Section>,
    pub paragraphs: Vec<Paragraph>,
    pub poems: Vec<Poem>,
    pub citations: Vec<Citation>,
    pub empty_lines: usize,
}

/// A heading made of paragraph-like lines
#[derive(Debug, Default, Clone)]
pub struct Title {
    pub paragraphs: Vec<Paragraph>,
}

/// Mixed content of a `<p>`.
///
/// Plain character data and each inline span kind are kept in separate
/// ordered collections; the original interleaving is not preserved.
#[derive(Debug, Default, Clone)]
pub struct Paragraph {
    pub text: String,
    pub links: Vec<Link>,
    pub spans: Vec<Span>,
    pub images: Vec<ImageRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Strong,
    Emphasis,
}

/// `<strong>` or `<emphasis>`, nestable to any depth
#[derive(Debug, Clone)]
pub struct Span {
    pub kind: SpanKind,
    pub text: String,
    pub links: Vec<Link>,
    pub children: Vec<Span>,
}

#[derive(Debug, Default, Clone)]
pub struct Link {
    pub href: String,
    pub text: String,
}

#[derive(Debug, Default, Clone)]
pub struct ImageRef {
    pub href: String,
}

#[derive(Debug, Default, Clone)]
pub struct Poem {
    pub title: Option<Title>,
    pub stanzas: Vec<Stanza>,
}

#[derive(Debug, Default, Clone)]
pub struct Stanza {
    pub verses: Vec<String>,
}

#[derive(Debug, Default, Clone)]
pub struct Citation {
    pub paragraphs: Vec<Paragraph>,
    pub text_authors: Vec<String>,
}

/// A decoded `<binary>` payload
#[derive(Debug, Clone)]
pub struct BinaryResource {
    pub id: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Metadata {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            DEFAULT_TITLE
        } else {
            &self.title
        }
    }

    pub fn display_language(&self) -> &str {
        if self.language.is_empty() {
            DEFAULT_LANGUAGE
        } else {
            &self.language
        }
    }

    /// Comma-joined author names, or [`DEFAULT_AUTHOR`].
    pub fn display_authors(&self) -> String {
        let names: Vec<String> = self
            .authors
            .iter()
            .map(Author::display_name)
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            DEFAULT_AUTHOR.to_string()
        } else {
            names.join(", ")
        }
    }
}

impl Author {
    /// First, middle and last name joined by spaces, else the nickname.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [&self.first_name, &self.middle_name, &self.last_name]
            .into_iter()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            self.nickname.clone()
        } else {
            parts.join(" ")
        }
    }
}

impl Title {
    pub fn has_text(&self) -> bool {
        !self.paragraphs.is_empty()
    }
}

impl Section {
    /// Title, if it carries at least one text block.
    pub fn heading(&self) -> Option<&Title> {
        self.title.as_ref().filter(|t| t.has_text())
    }
}

impl Span {
    pub fn new(kind: SpanKind) -> Self {
        Self {
            kind,
            text: String::new(),
            links: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Concatenated text of the span and everything nested in it.
    ///
    /// Nested children are visited in the same kind order the renderer uses.
    pub fn plain_text(&self) -> String {
        let mut out = self.text.clone();
        for link in &self.links {
            out.push_str(&link.text);
        }
        for child in self.nested_in_render_order() {
            out.push_str(&child.plain_text());
        }
        out
    }

    /// Children of the opposite kind first, then children of the same kind.
    pub fn nested_in_render_order(&self) -> impl Iterator<Item = &Span> {
        let other = match self.kind {
            SpanKind::Strong => SpanKind::Emphasis,
            SpanKind::Emphasis => SpanKind::Strong,
        };
        let same = self.kind;
        self.children
            .iter()
            .filter(move |c| c.kind == other)
            .chain(self.children.iter().filter(move |c| c.kind == same))
    }
}

impl Paragraph {
    pub fn spans_of(&self, kind: SpanKind) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(move |s| s.kind == kind)
    }
}

impl ImageRef {
    /// Referenced binary id with the leading `#` stripped.
    pub fn target_id(&self) -> &str {
        self.href.strip_prefix('#').unwrap_or(&self.href)
    }
}

impl Document {
    /// Count of sections at every depth.
    pub fn section_count(&self) -> usize {
        self.sections().count()
    }

    /// Count of body paragraphs in every section, titles excluded.
    pub fn paragraph_count(&self) -> usize {
        self.sections().map(|s| s.paragraphs.len()).sum()
    }

    fn sections(&self) -> impl Iterator<Item = &Section> {
        let mut stack: Vec<&Section> = self.body.sections.iter().collect();
        std::iter::from_fn(move || {
            let section = stack.pop()?;
            stack.extend(section.sections.iter());
            Some(section)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(first: &str, middle: &str, last: &str, nick: &str) -> Author {
        Author {
            first_name: first.to_string(),
            middle_name: middle.to_string(),
            last_name: last.to_string(),
            nickname: nick.to_string(),
        }
    }

    #[test]
    fn author_full_name() {
        assert_eq!(
            author("Lev", "Nikolayevich", "Tolstoy", "").display_name(),
            "Lev Nikolayevich Tolstoy"
        );
        assert_eq!(author("Anton", "", "Chekhov", "").display_name(), "Anton Chekhov");
    }

    #[test]
    fn author_nickname_fallback() {
        assert_eq!(author("", "", "", "Sasha").display_name(), "Sasha");
        assert_eq!(author("", "", "", "").display_name(), "");
        assert_eq!(author("", "", "Gogol", "Nick").display_name(), "Gogol");
    }

    #[test]
    fn metadata_defaults() {
        let meta = Metadata::default();
        assert_eq!(meta.display_title(), "Untitled");
        assert_eq!(meta.display_language(), "en");
        assert_eq!(meta.display_authors(), "Unknown");
    }

    #[test]
    fn metadata_joins_authors() {
        let meta = Metadata {
            authors: vec![
                author("Ilya", "", "Ilf", ""),
                author("", "", "", ""),
                author("Yevgeny", "", "Petrov", ""),
            ],
            ..Default::default()
        };
        assert_eq!(meta.display_authors(), "Ilya Ilf, Yevgeny Petrov");
    }

    #[test]
    fn span_plain_text_follows_render_order() {
        let mut strong = Span::new(SpanKind::Strong);
        strong.text = "a".to_string();
        let mut inner_strong = Span::new(SpanKind::Strong);
        inner_strong.text = "b".to_string();
        let mut inner_em = Span::new(SpanKind::Emphasis);
        inner_em.text = "c".to_string();
        strong.children = vec![inner_strong, inner_em];
        assert_eq!(strong.plain_text(), "acb");
    }

    #[test]
    fn image_ref_strips_hash() {
        let img = ImageRef {
            href: "#cover.jpg".to_string(),
        };
        assert_eq!(img.target_id(), "cover.jpg");
        let bare = ImageRef {
            href: "pic".to_string(),
        };
        assert_eq!(bare.target_id(), "pic");
    }

    #[test]
    fn section_count_walks_tree() {
        let doc = Document {
            body: Body {
                title: None,
                sections: vec![
                    Section {
                        sections: vec![Section::default(), Section::default()],
                        ..Default::default()
                    },
                    Section::default(),
                ],
            },
            ..Default::default()
        };
        assert_eq!(doc.section_count(), 4);
        assert_eq!(doc.paragraph_count(), 0);
    }

    #[test]
    fn paragraph_count_skips_titles() {
        let para = || Paragraph {
            text: "x".to_string(),
            ..Default::default()
        };
        let doc = Document {
            body: Body {
                title: None,
                sections: vec![Section {
                    title: Some(Title {
                        paragraphs: vec![para()],
                    }),
                    paragraphs: vec![para(), para()],
                    sections: vec![Section {
                        paragraphs: vec![para()],
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
            },
            ..Default::default()
        };
        assert_eq!(doc.paragraph_count(), 3);
    }
}
