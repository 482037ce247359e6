//! Tree repair
//!
//! Restores the tree invariants after an edit or a decode: no element is
//! empty, lists hold list items only, code, separators and links hold text
//! only, inline nodes never sit at the top level, and adjacent text leaves
//! with the same marks are merged. Every repair records where the content of
//! each old leaf ended up, so the selection can follow it.

use super::Anchor;
use crate::model::{Content, Element, Fragment, Kind, Node, Text};
use std::mem;

/// Maps old leaf ordinals to a new ordinal plus an offset shift
#[derive(Debug, Default)]
pub(crate) struct Remap(Vec<(usize, usize)>);

impl Remap {
    pub fn apply(&self, anchor: Anchor) -> Anchor {
        match self.0.get(anchor.ordinal) {
            Some(&(ordinal, shift)) => Anchor::new(ordinal, anchor.offset + shift),
            None => anchor,
        }
    }
}

/// Intermediate tree that remembers which old leaves a node came from
#[derive(Debug)]
enum Draft {
    Leaf {
        text: Text,
        /// Old ordinals and the offset at which their text starts in `text`
        origins: Vec<(usize, usize)>,
    },
    Element {
        kind: Kind,
        children: Vec<Draft>,
    },
    /// Content that was dropped, its old leaves map to the previous position
    Gone(Vec<usize>),
}

impl Draft {
    fn blank() -> Self {
        Draft::Leaf {
            text: Text::default(),
            origins: Vec::new(),
        }
    }

    fn has_content(&self) -> bool {
        !matches!(self, Draft::Gone(_))
    }

    fn is_inline(&self) -> bool {
        match self {
            Draft::Leaf { .. } | Draft::Gone(_) => true,
            Draft::Element { kind, .. } => kind.is_inline(),
        }
    }

    /// Text that can be dropped between blocks
    fn is_blank_text(&self) -> bool {
        match self {
            Draft::Leaf { text, .. } => text.text.trim().is_empty(),
            Draft::Gone(_) => true,
            Draft::Element { .. } => false,
        }
    }

    fn into_origins(self) -> Vec<usize> {
        match self {
            Draft::Leaf { origins, .. } => origins.into_iter().map(|(o, _)| o).collect(),
            Draft::Element { children, .. } => {
                children.into_iter().flat_map(Draft::into_origins).collect()
            }
            Draft::Gone(origins) => origins,
        }
    }
}

pub(crate) fn normalize(children: Fragment) -> (Fragment, Remap) {
    let mut next = 0;
    let drafts = children.into_iter().map(|n| draft(n, &mut next)).collect();
    let drafts = fix_root(drafts);
    let mut tracker = Tracker {
        remap: Remap(vec![(0, 0); next]),
        ..Tracker::default()
    };
    let children = build(drafts, &mut tracker);
    (children, tracker.finish())
}

fn draft(node: Node, next: &mut usize) -> Draft {
    match node {
        Node::Text(text) => {
            let origin = *next;
            *next += 1;
            Draft::Leaf {
                text,
                origins: vec![(origin, 0)],
            }
        }
        Node::Element(Element { kind, children }) => Draft::Element {
            kind,
            children: children.into_iter().map(|n| draft(n, next)).collect(),
        },
    }
}

fn fix_root(children: Vec<Draft>) -> Vec<Draft> {
    let mut out = Vec::new();
    let mut run = Vec::new();
    for child in children.into_iter().map(fix_element) {
        match child {
            Draft::Element {
                kind: Kind::ListItem,
                children,
            } => {
                flush_root_run(&mut run, &mut out);
                out.push(Draft::Element {
                    kind: Kind::paragraph(),
                    children,
                });
            }
            child if child.is_inline() => run.push(child),
            child => {
                flush_root_run(&mut run, &mut out);
                out.push(child);
            }
        }
    }
    flush_root_run(&mut run, &mut out);
    if !out.iter().any(Draft::has_content) {
        out.insert(
            0,
            Draft::Element {
                kind: Kind::paragraph(),
                children: vec![Draft::blank()],
            },
        );
    }
    out
}

/// Wrap a run of top-level inline nodes in a paragraph, or drop it if it is
/// only whitespace between blocks
fn flush_root_run(run: &mut Vec<Draft>, out: &mut Vec<Draft>) {
    if run.is_empty() {
        return;
    }
    let run = mem::take(run);
    if run.iter().all(Draft::is_blank_text) {
        out.push(Draft::Gone(
            run.into_iter().flat_map(Draft::into_origins).collect(),
        ));
    } else {
        out.push(Draft::Element {
            kind: Kind::paragraph(),
            children: merge_texts(run),
        });
    }
}

fn fix_element(draft: Draft) -> Draft {
    let (kind, children) = match draft {
        Draft::Element { kind, children } => (kind, children),
        other => return other,
    };
    let children: Vec<Draft> = children.into_iter().map(fix_element).collect();
    let mut children = match kind.content() {
        Content::Text => merge_texts(children.into_iter().flat_map(flatten_text).collect()),
        Content::Inline => merge_texts(children.into_iter().flat_map(flatten_inline).collect()),
        Content::Items => fix_items(children),
    };
    if !children.iter().any(Draft::has_content) {
        let filler = match kind.content() {
            Content::Items => Draft::Element {
                kind: Kind::ListItem,
                children: vec![Draft::blank()],
            },
            Content::Text | Content::Inline => Draft::blank(),
        };
        children.insert(0, filler);
    }
    Draft::Element { kind, children }
}

/// Leaves only, for code, separators and links
fn flatten_text(draft: Draft) -> Vec<Draft> {
    match draft {
        Draft::Element { children, .. } => children.into_iter().flat_map(flatten_text).collect(),
        other => vec![other],
    }
}

/// Leaves and links, for paragraphs, headings and list items
fn flatten_inline(draft: Draft) -> Vec<Draft> {
    match draft {
        Draft::Element { kind, children } if !kind.is_inline() => {
            children.into_iter().flat_map(flatten_inline).collect()
        }
        other => vec![other],
    }
}

fn fix_items(children: Vec<Draft>) -> Vec<Draft> {
    let mut out = Vec::new();
    let mut run: Vec<Draft> = Vec::new();
    let flush = |run: &mut Vec<Draft>, out: &mut Vec<Draft>| {
        if run.is_empty() {
            return;
        }
        let run = mem::take(run);
        if run.iter().all(Draft::is_blank_text) {
            out.push(Draft::Gone(
                run.into_iter().flat_map(Draft::into_origins).collect(),
            ));
        } else {
            out.push(Draft::Element {
                kind: Kind::ListItem,
                children: merge_texts(run),
            });
        }
    };
    for child in children {
        match child {
            Draft::Element {
                kind: Kind::ListItem,
                children,
            } => {
                flush(&mut run, &mut out);
                out.push(Draft::Element {
                    kind: Kind::ListItem,
                    children,
                });
            }
            Draft::Element {
                kind: Kind::List,
                children,
            } => {
                flush(&mut run, &mut out);
                out.extend(children);
            }
            Draft::Element { kind, children } if !kind.is_inline() => {
                flush(&mut run, &mut out);
                out.push(Draft::Element {
                    kind: Kind::ListItem,
                    children: merge_texts(children.into_iter().flat_map(flatten_inline).collect()),
                });
            }
            inline => run.push(inline),
        }
    }
    flush(&mut run, &mut out);
    out
}

/// Merge adjacent leaves with equal marks and fold empty leaves into a
/// neighbouring leaf
fn merge_texts(children: Vec<Draft>) -> Vec<Draft> {
    let mut out: Vec<Draft> = Vec::with_capacity(children.len());
    for child in children {
        let (text, origins) = match child {
            Draft::Leaf { text, origins } => (text, origins),
            other => {
                out.push(other);
                continue;
            }
        };
        let (merge, replace) = match out.last() {
            Some(Draft::Leaf { text: prev, .. }) => (
                prev.marks == text.marks || text.is_empty(),
                prev.is_empty(),
            ),
            _ => (false, false),
        };
        match out.last_mut() {
            Some(Draft::Leaf {
                text: prev,
                origins: prev_origins,
            }) if merge => {
                let shift = prev.len();
                prev.text.push_str(&text.text);
                prev_origins.extend(origins.into_iter().map(|(o, s)| (o, s + shift)));
            }
            Some(Draft::Leaf {
                text: prev,
                origins: prev_origins,
            }) if replace => {
                prev_origins.extend(origins);
                *prev = text;
            }
            _ => out.push(Draft::Leaf { text, origins }),
        }
    }
    out
}

#[derive(Debug, Default)]
struct Tracker {
    next: usize,
    remap: Remap,
    /// The most recently built leaf and its length
    last: Option<(usize, usize)>,
    /// Dropped leaves seen before any leaf was built
    pending: Vec<usize>,
}

impl Tracker {
    fn leaf(&mut self, text: &Text, origins: Vec<(usize, usize)>) {
        let ordinal = self.next;
        self.next += 1;
        for (origin, shift) in origins {
            self.set(origin, (ordinal, shift));
        }
        for origin in mem::take(&mut self.pending) {
            self.set(origin, (ordinal, 0));
        }
        self.last = Some((ordinal, text.len()));
    }

    fn gone(&mut self, origins: Vec<usize>) {
        match self.last {
            Some(end) => origins.into_iter().for_each(|o| self.set(o, end)),
            None => self.pending.extend(origins),
        }
    }

    fn set(&mut self, origin: usize, target: (usize, usize)) {
        if let Some(slot) = self.remap.0.get_mut(origin) {
            *slot = target;
        }
    }

    fn finish(self) -> Remap {
        self.remap
    }
}

fn build(drafts: Vec<Draft>, tracker: &mut Tracker) -> Fragment {
    let mut out = Vec::with_capacity(drafts.len());
    for draft in drafts {
        match draft {
            Draft::Leaf { text, origins } => {
                tracker.leaf(&text, origins);
                out.push(Node::Text(text));
            }
            Draft::Element { kind, children } => {
                let children = build(children, tracker);
                out.push(Node::Element(Element::new(kind, children)));
            }
            Draft::Gone(origins) => tracker.gone(origins),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::normalize;
    use crate::editor::Anchor;
    use crate::model::{Align, Element, Kind, Marks, Node, Text};

    fn bold(text: &str) -> Node {
        Node::Text(Text::with_marks(
            text,
            Marks {
                bold: true,
                ..Marks::default()
            },
        ))
    }

    #[test]
    fn test_merge_and_remap() {
        let (nodes, remap) = normalize(vec![Node::paragraph(
            Align::Unset,
            vec![Node::text("ab"), Node::text("cd"), bold("e"), Node::text("")],
        )]);
        assert_eq!(
            nodes,
            vec![Node::paragraph(Align::Unset, vec![Node::text("abcd"), bold("e")])]
        );
        assert_eq!(remap.apply(Anchor::new(1, 1)), Anchor::new(0, 3));
        assert_eq!(remap.apply(Anchor::new(2, 1)), Anchor::new(1, 1));
        assert_eq!(remap.apply(Anchor::new(3, 0)), Anchor::new(1, 1));
    }

    #[test]
    fn test_empty_elements_are_filled() {
        let (nodes, _) = normalize(vec![
            Node::paragraph(Align::Left, vec![]),
            Node::list(vec![]),
        ]);
        assert_eq!(
            nodes,
            vec![
                Node::paragraph(Align::Left, vec![Node::text("")]),
                Node::list(vec![Node::list_item(vec![Node::text("")])]),
            ]
        );
    }

    #[test]
    fn test_top_level_inlines() {
        let (nodes, remap) = normalize(vec![
            Node::text("\n"),
            Node::paragraph(Align::Unset, vec![Node::text("a")]),
            Node::text("loose "),
            Node::link("https://x.org", vec![Node::text("link")]),
        ]);
        assert_eq!(
            nodes,
            vec![
                Node::paragraph(Align::Unset, vec![Node::text("a")]),
                Node::paragraph(
                    Align::Unset,
                    vec![
                        Node::text("loose "),
                        Node::link("https://x.org", vec![Node::text("link")])
                    ]
                ),
            ]
        );
        assert_eq!(remap.apply(Anchor::new(0, 0)), Anchor::new(0, 0));
        assert_eq!(remap.apply(Anchor::new(3, 2)), Anchor::new(2, 2));
    }

    #[test]
    fn test_list_contents() {
        let (nodes, _) = normalize(vec![Node::list(vec![
            Node::text("\n  "),
            Node::list_item(vec![Node::paragraph(Align::Unset, vec![Node::text("a")])]),
            Node::paragraph(Align::Center, vec![Node::text("b")]),
            Node::text("c"),
        ])]);
        assert_eq!(
            nodes,
            vec![Node::list(vec![
                Node::list_item(vec![Node::text("a")]),
                Node::list_item(vec![Node::text("b")]),
                Node::list_item(vec![Node::text("c")]),
            ])]
        );
    }

    #[test]
    fn test_code_holds_text_only() {
        let (nodes, _) = normalize(vec![Node::Element(Element::new(
            Kind::Code,
            vec![
                Node::text("see "),
                Node::link("https://x.org", vec![Node::text("x")]),
            ],
        ))]);
        assert_eq!(
            nodes,
            vec![Node::Element(Element::new(Kind::Code, vec![Node::text("see x")]))]
        );
    }

    #[test]
    fn test_empty_document() {
        let (nodes, _) = normalize(vec![Node::text("")]);
        assert_eq!(nodes, vec![Node::paragraph(Align::Unset, vec![Node::text("")])]);
    }
}
