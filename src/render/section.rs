use super::inline::{plain_text, render_paragraph};
use crate::epub::resources::ResourceMap;
use crate::fb2::{Body, Citation, Paragraph, Poem, Section};
use crate::util::xml_escape;

/// Anchor id of a section: `section-<i>` at the top level, `<parent>-sub-<i>` below.
pub fn section_id(parent: Option<&str>, index: usize) -> String {
    match parent {
        Some(parent) => format!("{parent}-sub-{index}"),
        None => format!("section-{index}"),
    }
}

/// Heading tag for a section at `depth` (0 = top level), capped at `h6`.
pub fn heading_level(depth: usize) -> usize {
    (depth + 1).min(6)
}

enum Task<'a> {
    Open {
        section: &'a Section,
        depth: usize,
        id: String,
    },
    /// Poems and citations, emitted after the nested sections.
    Close(&'a Section),
}

/// Render the book body as the inner markup of the content document.
///
/// Within a section the order is: title, paragraphs, empty lines, nested
/// sections, poems, citations. The walk uses an explicit stack, so section
/// depth is bounded by memory only.
pub fn render_body(body: &Body, resources: &ResourceMap) -> String {
    let mut out = String::new();

    if let Some(title) = &body.title {
        for p in &title.paragraphs {
            let text = render_paragraph(p, resources);
            if !text.is_empty() {
                out.push_str(&format!("<h1>{text}</h1>\n"));
            }
        }
    }

    let mut tasks: Vec<Task> = body
        .sections
        .iter()
        .enumerate()
        .rev()
        .map(|(i, section)| Task::Open {
            section,
            depth: 0,
            id: section_id(None, i),
        })
        .collect();

    while let Some(task) = tasks.pop() {
        match task {
            Task::Open { section, depth, id } => {
                write_section_head(&mut out, section, depth, &id, resources);
                tasks.push(Task::Close(section));
                for (i, child) in section.sections.iter().enumerate().rev() {
                    tasks.push(Task::Open {
                        section: child,
                        depth: depth + 1,
                        id: section_id(Some(&id), i),
                    });
                }
            }
            Task::Close(section) => {
                for poem in &section.poems {
                    write_poem(&mut out, poem);
                }
                for cite in &section.citations {
                    write_citation(&mut out, cite, resources);
                }
            }
        }
    }

    out
}

fn write_section_head(
    out: &mut String,
    section: &Section,
    depth: usize,
    id: &str,
    resources: &ResourceMap,
) {
    if let Some(title) = section.heading() {
        let tag = format!("h{}", heading_level(depth));
        for (i, p) in title.paragraphs.iter().enumerate() {
            let text = render_paragraph(p, resources);
            // The anchor goes on the first line so the TOC target always exists.
            if i == 0 {
                out.push_str(&format!("<{tag} id=\"{}\">{text}</{tag}>\n", xml_escape(id)));
            } else if !text.is_empty() {
                out.push_str(&format!("<{tag}>{text}</{tag}>\n"));
            }
        }
    }

    write_paragraphs(out, &section.paragraphs, resources);

    for _ in 0..section.empty_lines {
        out.push_str("<div class=\"empty-line\"></div>\n");
    }
}

fn write_paragraphs(out: &mut String, paragraphs: &[Paragraph], resources: &ResourceMap) {
    for p in paragraphs {
        let text = render_paragraph(p, resources);
        if !text.is_empty() {
            out.push_str(&format!("<p>{text}</p>\n"));
        }
    }
}

fn write_poem(out: &mut String, poem: &Poem) {
    out.push_str("<div class=\"poem\">\n");
    if let Some(title) = &poem.title {
        let text: Vec<String> = title
            .paragraphs
            .iter()
            .map(plain_text)
            .filter(|t| !t.trim().is_empty())
            .collect();
        if !text.is_empty() {
            out.push_str(&format!("<h3>{}</h3>\n", xml_escape(&text.join(" "))));
        }
    }
    for stanza in &poem.stanzas {
        out.push_str("<div class=\"stanza\">\n");
        for verse in &stanza.verses {
            out.push_str(&format!("<p class=\"verse\">{}</p>\n", xml_escape(verse)));
        }
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n");
}

fn write_citation(out: &mut String, cite: &Citation, resources: &ResourceMap) {
    out.push_str("<blockquote class=\"cite\">\n");
    write_paragraphs(out, &cite.paragraphs, resources);
    out.push_str("</blockquote>\n");
}
