//! Tree to HTML

use crate::model::{Element, Kind, Node, Text};

const SEPARATOR_RULE: &str = r#"<hr style="border-bottom:2px solid #999999" />"#;

/// Escape text for use in element content and double-quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Encode a sequence of nodes, e.g. a whole document
pub fn serialize_fragment(nodes: &[Node]) -> String {
    nodes.iter().map(serialize).collect()
}

/// Encode a single node and everything below it
pub fn serialize(node: &Node) -> String {
    match node {
        Node::Text(text) => serialize_text(text),
        Node::Element(element) => serialize_element(element),
    }
}

fn serialize_text(text: &Text) -> String {
    let mut string = escape_html(&text.text);
    if text.marks.bold {
        string = format!("<strong>{}</strong>", string);
    }
    if text.marks.italic {
        string = format!("<em>{}</em>", string);
    }
    if text.marks.underline {
        string = format!("<u>{}</u>", string);
    }
    string
}

fn serialize_element(element: &Element) -> String {
    if element.is_void() {
        return String::from("<br />");
    }
    let children = serialize_fragment(&element.children);
    match &element.kind {
        Kind::Code => format!(r#"<div id="code-block-div"><code>{}</code></div>"#, children),
        Kind::Link { url } => format!(
            r#"<a target="_blank" href="{}">{}</a>"#,
            escape_html(url),
            children
        ),
        Kind::Paragraph { align } => {
            format!(r#"<p style="text-align:{}">{}</p>"#, align.as_str(), children)
        }
        Kind::Separator => format!("<div>{}{}</div>", children, SEPARATOR_RULE),
        Kind::List => format!("<ul>{}</ul>", children),
        Kind::ListItem => format!("<li>{}</li>", children),
        Kind::Heading { level, align } => format!(
            r#"<h{level} style="text-align:{align}">{children}</h{level}>"#,
            level = level.get(),
            align = align.as_str(),
            children = children
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{serialize, serialize_fragment};
    use crate::model::{Align, Element, HeadingLevel, Kind, Marks, Node, Text};

    fn marked(text: &str, bold: bool, italic: bool, underline: bool) -> Node {
        Node::Text(Text::with_marks(
            text,
            Marks {
                bold,
                italic,
                underline,
            },
        ))
    }

    #[test]
    fn test_mark_nesting() {
        assert_eq!(
            serialize(&marked("x", true, true, true)),
            "<u><em><strong>x</strong></em></u>"
        );
        assert_eq!(serialize(&marked("x", true, false, true)), "<u><strong>x</strong></u>");
        assert_eq!(serialize(&marked("x", false, true, false)), "<em>x</em>");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(
            serialize(&Node::text("a < b & \"c\"")),
            "a &lt; b &amp; &quot;c&quot;"
        );
        assert_eq!(
            serialize(&Node::link("https://x.org/?a=1&b=2", vec![Node::text("x")])),
            r#"<a target="_blank" href="https://x.org/?a=1&amp;b=2">x</a>"#
        );
    }

    #[test]
    fn test_void_collapse() {
        assert_eq!(
            serialize(&Node::paragraph(Align::Left, vec![Node::text("")])),
            "<br />"
        );
        let level = HeadingLevel::new(1).unwrap();
        assert_eq!(
            serialize(&Node::heading(level, Align::Center, vec![Node::text("")])),
            "<br />"
        );
        assert_eq!(serialize(&Element::blank(Kind::Code).into()), "<br />");
    }

    #[test]
    fn test_blocks() {
        let level = HeadingLevel::new(2).unwrap();
        let doc = vec![
            Node::heading(level, Align::Center, vec![Node::text("Title")]),
            Node::paragraph(Align::Unset, vec![Node::text("body")]),
            Node::Element(Element::new(Kind::Code, vec![Node::text("fn main() {}")])),
            Node::Element(Element::blank(Kind::Separator)),
            Node::list(vec![Node::list_item(vec![Node::text("one")])]),
        ];
        assert_eq!(
            serialize_fragment(&doc),
            concat!(
                r#"<h2 style="text-align:center">Title</h2>"#,
                r#"<p style="text-align:">body</p>"#,
                r#"<div id="code-block-div"><code>fn main() {}</code></div>"#,
                r#"<div><hr style="border-bottom:2px solid #999999" /></div>"#,
                "<ul><li>one</li></ul>",
            )
        );
    }
}
