//! # The document model
//!
//! A journal entry is an ordered list of block nodes. Blocks own inline
//! content (text leaves and links), lists own list items. The JSON form of
//! these types matches the one the editor frontend stores in its state.
pub mod de;
mod path;

pub use path::{Path, PathParseError, Point, Range};

use displaydoc::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The marks that can be set on a text leaf
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Marks {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One of the three toggleable marks
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
pub enum Mark {
    /// bold
    Bold,
    /// italic
    Italic,
    /// underline
    Underline,
}

impl Marks {
    pub fn has(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
        }
    }

    pub fn set(&mut self, mark: Mark, value: bool) {
        match mark {
            Mark::Bold => self.bold = value,
            Mark::Italic => self.italic = value,
            Mark::Underline => self.underline = value,
        }
    }

    /// The marks present in both sets
    pub fn intersect(self, other: Marks) -> Marks {
        Marks {
            bold: self.bold && other.bold,
            italic: self.italic && other.italic,
            underline: self.underline && other.underline,
        }
    }
}

/// A text leaf
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Text {
    pub text: String,
    #[serde(flatten)]
    pub marks: Marks,
}

impl Text {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            marks: Marks::default(),
        }
    }

    pub fn with_marks<S: Into<String>>(text: S, marks: Marks) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    /// Length in chars, which is the unit of point offsets
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Text alignment of paragraphs and headings
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[serde(rename = "")]
    Unset,
    Left,
    Center,
    Right,
    Justify,
}

impl Default for Align {
    fn default() -> Self {
        Align::Unset
    }
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Unset => "",
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
            Align::Justify => "justify",
        }
    }

    /// Parse a CSS `text-align` value, anything unknown is [`Align::Unset`]
    pub fn from_css(value: &str) -> Align {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Align::Left,
            "center" => Align::Center,
            "right" => Align::Right,
            "justify" => Align::Justify,
            _ => Align::Unset,
        }
    }
}

/// Heading level {0} is not within 1..=6
#[derive(Debug, Display, Error, Copy, Clone, PartialEq, Eq)]
pub struct InvalidHeadingLevel(pub u8);

/// The level of a heading, always within `1..=6`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub fn new(level: u8) -> Option<Self> {
        if (1..=6).contains(&level) {
            Some(Self(level))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = InvalidHeadingLevel;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        HeadingLevel::new(level).ok_or(InvalidHeadingLevel(level))
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> u8 {
        level.0
    }
}

/// The type of an element, with the attributes that belong to it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Kind {
    Paragraph {
        #[serde(default, deserialize_with = "de::deserialize_or_default")]
        align: Align,
    },
    Heading {
        level: HeadingLevel,
        #[serde(default, deserialize_with = "de::deserialize_or_default")]
        align: Align,
    },
    Code,
    Separator,
    Link {
        url: String,
    },
    List,
    ListItem,
}

/// What an element may contain
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Content {
    /// Text and links
    Inline,
    /// Text only
    Text,
    /// List items only
    Items,
}

impl Kind {
    pub fn paragraph() -> Self {
        Kind::Paragraph {
            align: Align::Unset,
        }
    }

    /// Links are the only inline elements
    pub fn is_inline(&self) -> bool {
        match self {
            Kind::Link { .. } => true,
            Kind::Paragraph { .. }
            | Kind::Heading { .. }
            | Kind::Code
            | Kind::Separator
            | Kind::List
            | Kind::ListItem => false,
        }
    }

    pub fn content(&self) -> Content {
        match self {
            Kind::Paragraph { .. } | Kind::Heading { .. } | Kind::ListItem => Content::Inline,
            Kind::Code | Kind::Separator | Kind::Link { .. } => Content::Text,
            Kind::List => Content::Items,
        }
    }

    /// Whether this block collapses to a line break when it is empty
    pub fn can_be_void(&self) -> bool {
        matches!(
            self,
            Kind::Paragraph { .. } | Kind::Heading { .. } | Kind::Code
        )
    }

    pub fn align(&self) -> Option<Align> {
        match self {
            Kind::Paragraph { align } | Kind::Heading { align, .. } => Some(*align),
            _ => None,
        }
    }
}

/// An element with its children
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Element {
    #[serde(flatten)]
    pub kind: Kind,
    #[serde(default)]
    pub children: Fragment,
}

impl Element {
    pub fn new(kind: Kind, children: Fragment) -> Self {
        Self { kind, children }
    }

    /// An element holding a single empty text leaf
    pub fn blank(kind: Kind) -> Self {
        Self::new(kind, vec![Node::Text(Text::default())])
    }

    /// Exactly one child, which is an empty text leaf
    pub fn is_void(&self) -> bool {
        self.kind.can_be_void()
            && matches!(self.children.as_slice(), [Node::Text(t)] if t.is_empty())
    }
}

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Node {
    Text(Text),
    Element(Element),
}

pub type Fragment = Vec<Node>;

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Node::Text(Text::new(text))
    }

    pub fn paragraph(align: Align, children: Fragment) -> Self {
        Node::Element(Element::new(Kind::Paragraph { align }, children))
    }

    pub fn heading(level: HeadingLevel, align: Align, children: Fragment) -> Self {
        Node::Element(Element::new(Kind::Heading { level, align }, children))
    }

    pub fn link<S: Into<String>>(url: S, children: Fragment) -> Self {
        Node::Element(Element::new(Kind::Link { url: url.into() }, children))
    }

    pub fn list(children: Fragment) -> Self {
        Node::Element(Element::new(Kind::List, children))
    }

    pub fn list_item(children: Fragment) -> Self {
        Node::Element(Element::new(Kind::ListItem, children))
    }

    pub fn is_inline(&self) -> bool {
        match self {
            Node::Text(_) => true,
            Node::Element(e) => e.kind.is_inline(),
        }
    }

    pub fn kind(&self) -> Option<&Kind> {
        match self {
            Node::Text(_) => None,
            Node::Element(e) => Some(&e.kind),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Text(_) => &[],
            Node::Element(e) => &e.children,
        }
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children().get(index)
    }

    /// The concatenated text of all leaves below this node
    pub fn string(&self) -> String {
        let mut out = String::new();
        self.push_string(&mut out);
        out
    }

    fn push_string(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&t.text),
            Node::Element(e) => e.children.iter().for_each(|c| c.push_string(out)),
        }
    }
}

/// The document created for a new journal entry
pub fn blank_document() -> Fragment {
    vec![Node::Element(Element::blank(Kind::paragraph()))]
}
