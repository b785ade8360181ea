//! Paragraph-level markup.
//!
//! A paragraph's character data and its inline spans arrive in separate
//! collections, so their original interleaving is lost. Reading order is
//! rebuilt with a fixed heuristic: start from the plain text, then for each
//! link, strong span and emphasis span (in that kind order, parse order
//! within a kind) replace the first occurrence of the span's text with its
//! markup, or append the markup after a space when the text is not found.
//! Images are appended last. When a span's text also occurs earlier in the
//! paragraph, the earlier occurrence is the one wrapped.

use crate::epub::resources::ResourceMap;
use crate::fb2::{Link, Paragraph, Span, SpanKind};
use crate::util::xml_escape;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Html,
    Plain,
}

impl Mode {
    fn escape<'s>(self, s: &'s str) -> Cow<'s, str> {
        match self {
            Mode::Html => Cow::Owned(xml_escape(s)),
            Mode::Plain => Cow::Borrowed(s),
        }
    }
}

/// Render a paragraph's mixed content as an XHTML fragment.
pub fn render_paragraph(paragraph: &Paragraph, resources: &ResourceMap) -> String {
    render(paragraph, Mode::Html, Some(resources))
}

/// The same reconstruction without markup; used for TOC labels.
pub fn plain_text(paragraph: &Paragraph) -> String {
    render(paragraph, Mode::Plain, None)
}

fn render(paragraph: &Paragraph, mode: Mode, resources: Option<&ResourceMap>) -> String {
    let mut out = mode.escape(&paragraph.text).into_owned();

    for link in &paragraph.links {
        let markup = link_markup(link, mode);
        if link.text.is_empty() {
            append_spaced(&mut out, &markup);
        } else {
            place(&mut out, &mode.escape(&link.text), &markup);
        }
    }

    for kind in [SpanKind::Strong, SpanKind::Emphasis] {
        for span in paragraph.spans_of(kind) {
            let markup = span_markup(span, mode);
            let text = span.plain_text();
            if text.is_empty() {
                append_spaced(&mut out, &markup);
            } else {
                place(&mut out, &mode.escape(&text), &markup);
            }
        }
    }

    if let (Mode::Html, Some(resources)) = (mode, resources) {
        for image in &paragraph.images {
            let src = resources.image_href(image.target_id());
            out.push_str(&format!(" <img src=\"{}\" alt=\"\"/>", xml_escape(&src)));
        }
    }

    out
}

/// Replace the first occurrence of `needle` with `markup`, else append.
fn place(out: &mut String, needle: &str, markup: &str) {
    if !needle.is_empty() && out.contains(needle) {
        *out = out.replacen(needle, markup, 1);
    } else {
        append_spaced(out, markup);
    }
}

fn append_spaced(out: &mut String, markup: &str) {
    out.push(' ');
    out.push_str(markup);
}

fn link_markup(link: &Link, mode: Mode) -> String {
    let label = if link.text.is_empty() {
        &link.href
    } else {
        &link.text
    };
    match mode {
        Mode::Html => format!(
            "<a href=\"{}\">{}</a>",
            xml_escape(&link.href),
            xml_escape(label)
        ),
        Mode::Plain => label.clone(),
    }
}

/// Nested spans are rendered first and appended inside the wrapper.
fn span_markup(span: &Span, mode: Mode) -> String {
    let mut inner = mode.escape(&span.text).into_owned();

    for link in &span.links {
        let markup = link_markup(link, mode);
        if !span.text.is_empty() && !link.text.is_empty() {
            place(&mut inner, &mode.escape(&link.text), &markup);
        } else {
            inner.push_str(&markup);
        }
    }

    for child in span.nested_in_render_order() {
        inner.push_str(&span_markup(child, mode));
    }

    match (mode, span.kind) {
        (Mode::Plain, _) => inner,
        (Mode::Html, SpanKind::Strong) => format!("<strong>{inner}</strong>"),
        (Mode::Html, SpanKind::Emphasis) => format!("<em>{inner}</em>"),
    }
}
