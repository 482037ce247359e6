//! # The editing session
//!
//! An [`Editor`] owns the document tree of one editing session together with
//! the current selection. Toolbar queries (`is_*_active`) read the tree at the
//! selection, toolbar actions (`toggle_*`) mutate it in place and report an
//! [`Outcome`].
//!
//! Points handed out to callers are plain paths into the tree. Internally
//! every mutation first converts the selection into [`Anchor`]s (the index of
//! the text leaf in document order plus an offset) and turns them back into
//! paths once the tree has its new shape, so a path is never used across an
//! edit that may have moved the node it points to.
mod block;
mod link;
mod list;
mod marks;
mod normalize;
mod transforms;

pub use link::{validate_url, LinkDetails};

use crate::html;
use crate::model::{self, Content, Element, Fragment, Kind, Node, Path, Point, Range, Text};
use displaydoc::Display;
use log::*;
use normalize::Remap;
use std::cmp::Ordering;
use thiserror::Error;

/// The result of a toolbar action
#[must_use]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The document (or the pending cursor marks) changed
    Applied,
    /// The action does not apply to the selected content
    Ignored,
    /// The action needs a selection and there is none
    NoSelection,
}

/// Error when moving the selection
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    /// There is no text leaf at {0}
    NoLeaf(Path),
    /// Offset {offset} is past the end of the {len} chars at {path}
    OffsetOutOfBounds {
        /// The path of the leaf
        path: Path,
        /// The requested offset
        offset: usize,
        /// The length of the leaf
        len: usize,
    },
}

/// A position that survives structural edits
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Anchor {
    /// Index of the text leaf in document order
    pub ordinal: usize,
    /// Offset in chars within that leaf
    pub offset: usize,
}

impl Anchor {
    pub fn new(ordinal: usize, offset: usize) -> Self {
        Self { ordinal, offset }
    }
}

/// The selection, expressed in anchors
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Anchors {
    pub anchor: Anchor,
    pub focus: Anchor,
}

impl Anchors {
    pub fn collapsed(at: Anchor) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn is_backward(&self) -> bool {
        self.anchor > self.focus
    }

    pub fn edges(&self) -> (Anchor, Anchor) {
        if self.is_backward() {
            (self.focus, self.anchor)
        } else {
            (self.anchor, self.focus)
        }
    }

    /// A selection from `start` to `end` in the same direction as `self`
    pub fn with_edges(&self, start: Anchor, end: Anchor) -> Self {
        if self.is_backward() {
            Self {
                anchor: end,
                focus: start,
            }
        } else {
            Self {
                anchor: start,
                focus: end,
            }
        }
    }

    fn remap(self, remap: &Remap) -> Self {
        Self {
            anchor: remap.apply(self.anchor),
            focus: remap.apply(self.focus),
        }
    }
}

/// A document being edited
#[derive(Debug, Clone)]
pub struct Editor {
    children: Fragment,
    selection: Option<Range>,
    /// Marks for the next inserted text, set by toggling at a collapsed cursor
    marks: Option<model::Marks>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(model::blank_document())
    }
}

impl Editor {
    /// Start a session on the given top-level nodes
    pub fn new(children: Fragment) -> Self {
        let mut editor = Self {
            children,
            selection: None,
            marks: None,
        };
        editor.normalize();
        editor
    }

    /// Start a session on a stored HTML string, an empty string is a new entry
    pub fn from_html(content: &str) -> Self {
        if content.trim().is_empty() {
            return Self::default();
        }
        Self::new(html::deserialize(content))
    }

    /// The HTML string to persist
    pub fn to_html(&self) -> String {
        html::serialize_fragment(&self.children)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn selection(&self) -> Option<&Range> {
        self.selection.as_ref()
    }

    /// The marks for text typed at a collapsed cursor, if they were toggled
    pub fn pending_marks(&self) -> Option<model::Marks> {
        self.marks
    }

    /// Move the selection, both points must lie within text leaves
    pub fn select(&mut self, range: Range) -> Result<(), EditError> {
        self.anchor_of(&range.anchor)?;
        self.anchor_of(&range.focus)?;
        trace!("Select {}", range);
        self.selection = Some(range);
        self.marks = None;
        Ok(())
    }

    pub fn set_cursor(&mut self, point: Point) -> Result<(), EditError> {
        self.select(Range::collapsed(point))
    }

    /// Select everything from the start of the document to its end
    pub fn select_all(&mut self) {
        let leaves = self.leaf_paths();
        if let (Some(first), Some(last)) = (leaves.first(), leaves.last()) {
            let len = self.leaf(last).map_or(0, Text::len);
            self.selection = Some(Range::new(
                Point::new(first.clone(), 0),
                Point::new(last.clone(), len),
            ));
            self.marks = None;
        }
    }

    pub fn deselect(&mut self) {
        self.selection = None;
        self.marks = None;
    }

    pub fn node(&self, path: &Path) -> Option<&Node> {
        let (first, rest) = path.0.split_first()?;
        let mut node = self.children.get(*first)?;
        for index in rest {
            node = node.child(*index)?;
        }
        Some(node)
    }

    pub(crate) fn node_mut(&mut self, path: &Path) -> Option<&mut Node> {
        let (first, rest) = path.0.split_first()?;
        let mut node = self.children.get_mut(*first)?;
        for index in rest {
            node = match node {
                Node::Element(e) => e.children.get_mut(*index)?,
                Node::Text(_) => return None,
            };
        }
        Some(node)
    }

    pub(crate) fn element_mut(&mut self, path: &Path) -> Option<&mut Element> {
        match self.node_mut(path)? {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// The children of the node at `parent`, or the top-level nodes for the empty path
    pub(crate) fn children_mut(&mut self, parent: &Path) -> Option<&mut Fragment> {
        if parent.is_empty() {
            return Some(&mut self.children);
        }
        self.element_mut(parent).map(|e| &mut e.children)
    }

    pub fn leaf(&self, path: &Path) -> Option<&Text> {
        match self.node(path)? {
            Node::Text(t) => Some(t),
            Node::Element(_) => None,
        }
    }

    /// Paths of all text leaves in document order
    pub fn leaf_paths(&self) -> Vec<Path> {
        fn collect(nodes: &[Node], prefix: &mut Vec<usize>, out: &mut Vec<Path>) {
            for (index, node) in nodes.iter().enumerate() {
                prefix.push(index);
                match node {
                    Node::Text(_) => out.push(Path(prefix.clone())),
                    Node::Element(e) => collect(&e.children, prefix, out),
                }
                prefix.pop();
            }
        }
        let mut out = Vec::new();
        collect(&self.children, &mut Vec::new(), &mut out);
        out
    }

    /// The first leaf ordinal and the number of leaves below `path`
    pub(crate) fn leaf_span(&self, path: &Path) -> Option<(usize, usize)> {
        let leaves = self.leaf_paths();
        let first = leaves
            .iter()
            .position(|p| p == path || path.is_ancestor_of(p))?;
        let count = leaves[first..]
            .iter()
            .take_while(|p| *p == path || path.is_ancestor_of(p))
            .count();
        Some((first, count))
    }

    pub(crate) fn leaf_len(&self, ordinal: usize) -> usize {
        self.leaf_paths()
            .get(ordinal)
            .and_then(|p| self.leaf(p))
            .map_or(0, Text::len)
    }

    pub(crate) fn anchor_of(&self, point: &Point) -> Result<Anchor, EditError> {
        let ordinal = self
            .leaf_paths()
            .iter()
            .position(|p| *p == point.path)
            .ok_or_else(|| EditError::NoLeaf(point.path.clone()))?;
        let len = self.leaf(&point.path).map_or(0, Text::len);
        if point.offset > len {
            return Err(EditError::OffsetOutOfBounds {
                path: point.path.clone(),
                offset: point.offset,
                len,
            });
        }
        Ok(Anchor::new(ordinal, point.offset))
    }

    pub(crate) fn point_of(&self, anchor: Anchor) -> Option<Point> {
        let leaves = self.leaf_paths();
        let path = leaves.get(anchor.ordinal).or_else(|| leaves.last())?;
        let len = self.leaf(path).map_or(0, Text::len);
        let offset = if anchor.ordinal < leaves.len() {
            anchor.offset.min(len)
        } else {
            len
        };
        Some(Point::new(path.clone(), offset))
    }

    /// The current selection in anchors, `None` if nothing is selected
    pub(crate) fn anchors(&self) -> Option<Anchors> {
        let range = self.selection.as_ref()?;
        match (self.anchor_of(&range.anchor), self.anchor_of(&range.focus)) {
            (Ok(anchor), Ok(focus)) => Some(Anchors { anchor, focus }),
            _ => {
                warn!("Selection {} does not match the document", range);
                None
            }
        }
    }

    pub(crate) fn set_anchors(&mut self, anchors: Anchors) {
        self.selection = match (self.point_of(anchors.anchor), self.point_of(anchors.focus)) {
            (Some(anchor), Some(focus)) => Some(Range::new(anchor, focus)),
            _ => None,
        };
    }

    /// Repair the tree after an edit, keeping the selection on the same text
    pub(crate) fn normalize(&mut self) {
        let anchors = self.anchors();
        let children = std::mem::take(&mut self.children);
        let (children, remap) = normalize::normalize(children);
        self.children = children;
        match anchors {
            Some(anchors) => self.set_anchors(anchors.remap(&remap)),
            None => self.selection = None,
        }
    }

    /// Paths of all elements that intersect the range, in document order
    pub fn nodes_in(&self, range: &Range) -> Vec<Path> {
        fn walk(nodes: &[Node], prefix: &mut Vec<usize>, start: &Path, end: &Path, out: &mut Vec<Path>) {
            for (index, node) in nodes.iter().enumerate() {
                prefix.push(index);
                let path = Path(prefix.clone());
                let inside = path.compare(start) != Ordering::Less
                    && path.compare(end) != Ordering::Greater;
                if let (true, Node::Element(e)) = (inside, node) {
                    out.push(path);
                    walk(&e.children, prefix, start, end, out);
                }
                prefix.pop();
            }
        }
        let (start, end) = range.edges();
        let mut out = Vec::new();
        walk(&self.children, &mut Vec::new(), &start.path, &end.path, &mut out);
        out
    }

    /// Elements intersecting the selection
    pub fn selected_elements(&self) -> Vec<(Path, &Element)> {
        let range = match &self.selection {
            Some(range) => range,
            None => return Vec::new(),
        };
        self.nodes_in(range)
            .into_iter()
            .filter_map(|path| match self.node(&path) {
                Some(Node::Element(e)) => Some((path, e)),
                _ => None,
            })
            .collect()
    }

    /// Existential match over the elements intersecting the selection
    pub fn any_selected<F: Fn(&Kind) -> bool>(&self, pred: F) -> bool {
        self.selected_elements().iter().any(|(_, e)| pred(&e.kind))
    }

    /// Selected blocks whose children are inline content
    pub(crate) fn lowest_blocks(&self) -> Vec<Path> {
        self.selected_elements()
            .into_iter()
            .filter(|(_, e)| !e.kind.is_inline() && e.kind.content() != Content::Items)
            .map(|(path, _)| path)
            .collect()
    }

    /// The path of the nearest non-inline element above a leaf
    pub(crate) fn block_of(&self, leaf: &Path) -> Option<Path> {
        let mut path = leaf.parent()?;
        loop {
            match self.node(&path)?.kind() {
                Some(kind) if !kind.is_inline() => return Some(path),
                _ => path = path.parent()?,
            }
        }
    }

    /// The text between two anchors
    pub(crate) fn string_between(&self, start: Anchor, end: Anchor) -> String {
        let leaves = self.leaf_paths();
        let mut out = String::new();
        for ordinal in start.ordinal..=end.ordinal {
            let text = match leaves.get(ordinal).and_then(|p| self.leaf(p)) {
                Some(text) => &text.text,
                None => break,
            };
            let from = if ordinal == start.ordinal { start.offset } else { 0 };
            let to = if ordinal == end.ordinal {
                end.offset
            } else {
                usize::MAX
            };
            out.extend(text.chars().skip(from).take(to.saturating_sub(from)));
        }
        out
    }

    /// The selected text
    pub fn selected_string(&self) -> String {
        match self.anchors() {
            Some(anchors) => {
                let (start, end) = anchors.edges();
                self.string_between(start, end)
            }
            None => String::new(),
        }
    }
}
