//! HTML to tree
//!
//! The HTML string is parsed into a DOM with `html5ever` first, the DOM is then
//! walked from `<body>` down. Unknown elements never fail the walk, they are
//! replaced by their decoded children.

use crate::model::{Align, Element, HeadingLevel, Kind, Marks, Node, Text};
use html5ever::tendril::TendrilSink as _;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use log::*;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Decode a stored HTML string into the top-level nodes of a document
///
/// The result is exactly what the `<body>` element decodes to, no
/// normalization is applied here.
pub fn deserialize(html: &str) -> Vec<Node> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            exact_errors: false,
            scripting_enabled: false,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    };
    let dom = parse_document(RcDom::default(), opts).one(html);

    match find_body(&dom.document) {
        Some(body) => deserialize_node(&body, Marks::default()),
        None => {
            warn!("Parsed document has no <body>");
            Vec::new()
        }
    }
}

fn find_body(handle: &Handle) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &handle.data {
        if &*name.local == "body" {
            return Some(handle.clone());
        }
    }
    handle.children.borrow().iter().find_map(find_body)
}

/// Decode one DOM node, with the marks inherited from its ancestors
///
/// A dropped node yields no nodes, a known element yields one and a
/// pass-through element yields its children.
pub fn deserialize_node(handle: &Handle, marks: Marks) -> Vec<Node> {
    let (name, attrs) = match &handle.data {
        NodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            return vec![Node::Text(Text::with_marks(text, marks))];
        }
        NodeData::Element { name, attrs, .. } => (name, attrs),
        _ => return Vec::new(),
    };

    let tag: &str = &name.local;
    let mut marks = marks;
    match tag {
        "strong" => marks.bold = true,
        "em" => marks.italic = true,
        "u" => marks.underline = true,
        _ => {}
    }

    let mut children: Vec<Node> = handle
        .children
        .borrow()
        .iter()
        .flat_map(|child| deserialize_node(child, marks))
        .collect();
    if children.is_empty() {
        children.push(Node::Text(Text::with_marks("", marks)));
    }

    let attr = |key: &str| -> Option<String> {
        attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == key)
            .map(|a| a.value.to_string())
    };

    let kind = match tag {
        "body" => return children,
        "br" => Kind::paragraph(),
        "hr" => Kind::Separator,
        "code" => Kind::Code,
        "a" => Kind::Link {
            url: attr("href").unwrap_or_default(),
        },
        "li" => Kind::ListItem,
        "ul" => Kind::List,
        "p" => Kind::Paragraph {
            align: text_align(attr("style").as_deref()),
        },
        _ => match heading_level(tag) {
            Some(level) => Kind::Heading {
                level,
                align: text_align(attr("style").as_deref()),
            },
            None => return children,
        },
    };
    vec![Node::Element(Element::new(kind, children))]
}

fn heading_level(tag: &str) -> Option<HeadingLevel> {
    let digits = tag.strip_prefix('h')?;
    HeadingLevel::new(digits.parse().ok()?)
}

/// The `text-align` declaration of an inline style, if any
fn text_align(style: Option<&str>) -> Align {
    style
        .into_iter()
        .flat_map(|s| s.split(';'))
        .filter_map(|decl| decl.split_once(':'))
        .filter(|(prop, _)| prop.trim().eq_ignore_ascii_case("text-align"))
        .map(|(_, value)| Align::from_css(value))
        .last()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::deserialize;
    use crate::html::serialize_fragment;
    use crate::model::{Align, Element, HeadingLevel, Kind, Marks, Node, Text};

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
    fn test_heading() {
        assert_eq!(
            deserialize(r#"<h2 style="text-align:center">Title</h2>"#),
            vec![Node::heading(
                HeadingLevel::new(2).unwrap(),
                Align::Center,
                vec![Node::text("Title")]
            )]
        );
    }

    #[test]
    fn test_mark_inheritance() {
        let all = Marks {
            bold: true,
            italic: true,
            underline: true,
        };
        assert_eq!(
            deserialize("<p><u><em><strong>x</strong></em></u>y</p>"),
            vec![Node::paragraph(
                Align::Unset,
                vec![Node::Text(Text::with_marks("x", all)), Node::text("y")]
            )]
        );
        assert_eq!(
            deserialize("<p><strong><span>a</span><em></em></strong></p>"),
            vec![Node::paragraph(
                Align::Unset,
                vec![
                    bold("a"),
                    Node::Text(Text::with_marks(
                        "",
                        Marks {
                            bold: true,
                            italic: true,
                            underline: false
                        }
                    ))
                ]
            )]
        );
    }

    #[test]
    fn test_unknown_passthrough() {
        assert_eq!(deserialize("<span>hi</span>"), deserialize("hi"));
        assert_eq!(deserialize("hi"), vec![Node::text("hi")]);
        assert_eq!(
            deserialize("<section><p>a</p><!-- note --></section>"),
            vec![Node::paragraph(Align::Unset, vec![Node::text("a")])]
        );
    }

    #[test]
    fn test_line_break_is_paragraph() {
        assert_eq!(
            deserialize("<br />"),
            vec![Node::paragraph(Align::Unset, vec![Node::text("")])]
        );
        assert_eq!(
            deserialize("<strong><br/></strong>"),
            vec![Node::paragraph(Align::Unset, vec![bold("")])]
        );
    }

    #[test]
    fn test_blocks() {
        let html = concat!(
            r#"<div id="code-block-div"><code>a &lt; b</code></div>"#,
            r#"<div><hr style="border-bottom:2px solid #999999" /></div>"#,
            r#"<ul><li><a target="_blank" href="https://x.org">x</a></li></ul>"#,
        );
        assert_eq!(
            deserialize(html),
            vec![
                Node::Element(Element::new(Kind::Code, vec![Node::text("a < b")])),
                Node::Element(Element::blank(Kind::Separator)),
                Node::list(vec![Node::list_item(vec![Node::link(
                    "https://x.org",
                    vec![Node::text("x")]
                )])]),
            ]
        );
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(deserialize(""), vec![Node::text("")]);
    }

    #[test]
    fn test_round_trip() {
        let doc = vec![
            Node::heading(
                HeadingLevel::new(3).unwrap(),
                Align::Right,
                vec![bold("Dear diary")],
            ),
            Node::paragraph(
                Align::Justify,
                vec![
                    Node::text("see "),
                    Node::link("https://example.com/?q=1&r=2", vec![Node::text("this")]),
                    Node::Text(Text::with_marks(
                        " & that",
                        Marks {
                            italic: true,
                            underline: true,
                            ..Marks::default()
                        },
                    )),
                ],
            ),
            Node::Element(Element::new(Kind::Code, vec![Node::text("let x = 1 < 2;")])),
            Node::list(vec![
                Node::list_item(vec![Node::text("one")]),
                Node::list_item(vec![bold("two")]),
            ]),
            Node::paragraph(Align::Unset, vec![Node::text("end")]),
        ];
        assert_eq!(deserialize(&serialize_fragment(&doc)), doc);
    }
}
