use crate::epub::{CONTENT_HREF, NavPoint};
use crate::fb2::{Body, Section};
use crate::render::inline::plain_text;
use crate::render::section::section_id;

/// Label for a titled section whose title text is blank.
pub const UNTITLED_SECTION: &str = "Untitled Section";

/// Play order of the cover page.
pub const COVER_PLAY_ORDER: usize = 1;
/// Play order of the main content landmark.
pub const CONTENT_PLAY_ORDER: usize = 2;

/// A node of the table of contents derived from the section tree.
///
/// An empty `title` marks a pass-through node: an untitled section kept only
/// to carry titled descendants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub id: String,
    pub title: String,
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    pub fn is_pass_through(&self) -> bool {
        self.title.is_empty()
    }
}

/// Build the TOC tree for a body. Sections with neither a title nor titled
/// descendants contribute nothing.
pub fn build_toc(body: &Body) -> Vec<TocEntry> {
    body.sections
        .iter()
        .enumerate()
        .filter_map(|(i, section)| build_entry(section, section_id(None, i)))
        .collect()
}

fn build_entry(section: &Section, id: String) -> Option<TocEntry> {
    let children: Vec<TocEntry> = section
        .sections
        .iter()
        .enumerate()
        .filter_map(|(i, child)| build_entry(child, section_id(Some(&id), i)))
        .collect();

    match section.heading() {
        Some(title) => {
            let parts: Vec<String> = title
                .paragraphs
                .iter()
                .map(|p| plain_text(p).trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            let title = if parts.is_empty() {
                UNTITLED_SECTION.to_string()
            } else {
                parts.join(" ")
            };
            Some(TocEntry {
                id,
                title,
                children,
            })
        }
        None if !children.is_empty() => Some(TocEntry {
            id,
            title: String::new(),
            children,
        }),
        None => None,
    }
}

/// Flatten pass-through nodes into their parents' level and number the
/// remaining nodes in pre-order, starting right after the cover and content
/// landmarks.
pub fn nav_points(entries: &[TocEntry]) -> Vec<NavPoint> {
    let mut next = CONTENT_PLAY_ORDER + 1;
    let mut out = Vec::new();
    collect_points(entries, &mut next, &mut out);
    out
}

fn collect_points(entries: &[TocEntry], next: &mut usize, out: &mut Vec<NavPoint>) {
    for entry in entries {
        if entry.is_pass_through() {
            collect_points(&entry.children, next, out);
            continue;
        }
        let play_order = *next;
        *next += 1;
        let mut children = Vec::new();
        collect_points(&entry.children, next, &mut children);
        out.push(NavPoint {
            id: entry.id.clone(),
            label: entry.title.clone(),
            href: format!("{CONTENT_HREF}#{}", entry.id),
            play_order,
            children,
        });
    }
}

/// Deepest nesting of the visible navigation tree, at least 1.
///
/// Pass-through entries are not counted: `dtb:depth` reports the levels a
/// reader actually shows, which can be fewer than the levels of the
/// [`TocEntry`] tree.
pub fn nav_depth(points: &[NavPoint]) -> usize {
    fn depth(points: &[NavPoint]) -> usize {
        points
            .iter()
            .map(|p| 1 + depth(&p.children))
            .max()
            .unwrap_or(0)
    }
    depth(points).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb2::{Paragraph, Title};

    fn title(s: &str) -> Option<Title> {
        Some(Title {
            paragraphs: vec![Paragraph {
                text: s.to_string(),
                ..Default::default()
            }],
        })
    }

    fn section(t: Option<Title>, sections: Vec<Section>) -> Section {
        Section {
            title: t,
            sections,
            ..Default::default()
        }
    }

    #[test]
    fn titled_sections_become_entries() {
        let body = Body {
            title: None,
            sections: vec![
                section(title("One"), vec![section(title("One.A"), vec![])]),
                section(title("Two"), vec![]),
            ],
        };
        let toc = build_toc(&body);
        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].id, "section-0");
        assert_eq!(toc[0].title, "One");
        assert_eq!(toc[0].children[0].id, "section-0-sub-0");
        assert_eq!(toc[0].children[0].title, "One.A");
        assert_eq!(toc[1].id, "section-1");
    }

    #[test]
    fn untitled_leaf_is_skipped() {
        let body = Body {
            title: None,
            sections: vec![
                section(None, vec![]),
                section(title("Kept"), vec![section(None, vec![])]),
            ],
        };
        let toc = build_toc(&body);
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].id, "section-1");
        assert!(toc[0].children.is_empty());
    }

    #[test]
    fn untitled_parent_passes_children_through() {
        let body = Body {
            title: None,
            sections: vec![section(
                None,
                vec![section(None, vec![]), section(title("Deep"), vec![])],
            )],
        };
        let toc = build_toc(&body);
        assert_eq!(toc.len(), 1);
        assert!(toc[0].is_pass_through());
        assert_eq!(toc[0].children.len(), 1);
        assert_eq!(toc[0].children[0].id, "section-0-sub-1");

        let points = nav_points(&toc);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].label, "Deep");
        assert_eq!(points[0].href, "content.xhtml#section-0-sub-1");
        assert_eq!(points[0].play_order, 3);
    }

    #[test]
    fn blank_title_is_relabeled() {
        let body = Body {
            title: None,
            sections: vec![section(title("   "), vec![])],
        };
        let toc = build_toc(&body);
        assert_eq!(toc[0].title, "Untitled Section");
    }

    #[test]
    fn multi_line_title_joined_with_space() {
        let mut t = title("Part I").unwrap();
        t.paragraphs.push(Paragraph {
            text: "The Beginning".to_string(),
            ..Default::default()
        });
        let body = Body {
            title: None,
            sections: vec![section(Some(t), vec![])],
        };
        assert_eq!(build_toc(&body)[0].title, "Part I The Beginning");
    }

    #[test]
    fn play_order_is_preorder_and_monotonic() {
        let body = Body {
            title: None,
            sections: vec![
                section(
                    title("A"),
                    vec![
                        section(title("A1"), vec![]),
                        section(None, vec![section(title("A2x"), vec![])]),
                    ],
                ),
                section(title("B"), vec![]),
            ],
        };
        let points = nav_points(&build_toc(&body));
        let mut orders = Vec::new();
        fn walk(points: &[NavPoint], out: &mut Vec<(String, usize)>) {
            for p in points {
                out.push((p.label.clone(), p.play_order));
                walk(&p.children, out);
            }
        }
        walk(&points, &mut orders);
        assert_eq!(
            orders,
            vec![
                ("A".to_string(), 3),
                ("A1".to_string(), 4),
                ("A2x".to_string(), 5),
                ("B".to_string(), 6),
            ]
        );
        assert_eq!(points[0].children.len(), 2);
    }

    #[test]
    fn depth_counts_visible_levels() {
        assert_eq!(nav_depth(&[]), 1);
        let body = Body {
            title: None,
            sections: vec![section(
                title("1"),
                vec![section(None, vec![section(title("3"), vec![])])],
            )],
        };
        let points = nav_points(&build_toc(&body));
        assert_eq!(nav_depth(&points), 2);
    }

    #[test]
    fn empty_body_has_empty_toc() {
        assert!(build_toc(&Body::default()).is_empty());
    }
}
