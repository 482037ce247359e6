//! Structural edits shared by the toolbar engines

use super::{Anchor, Anchors, Editor, Outcome};
use crate::model::{Content, Element, Kind, Node, Path, Text};
use log::*;

/// Byte index of the char at `offset`, or the end of the string
pub(crate) fn byte_index(s: &str, offset: usize) -> usize {
    s.char_indices().nth(offset).map_or(s.len(), |(i, _)| i)
}

/// Split a node along the path to one of its leaves
///
/// Both halves keep the kind (and attributes) of every element on the way.
fn split_node(node: &Node, rel: &[usize], offset: usize) -> Option<(Node, Node)> {
    match node {
        Node::Text(text) => {
            let at = byte_index(&text.text, offset);
            Some((
                Node::Text(Text::with_marks(&text.text[..at], text.marks)),
                Node::Text(Text::with_marks(&text.text[at..], text.marks)),
            ))
        }
        Node::Element(element) => {
            let (&index, rest) = rel.split_first()?;
            let (left, right) = split_node(element.children.get(index)?, rest, offset)?;
            let mut before = element.children[..index].to_vec();
            before.push(left);
            let mut after = vec![right];
            after.extend_from_slice(&element.children[index + 1..]);
            Some((
                Node::Element(Element::new(element.kind.clone(), before)),
                Node::Element(Element::new(element.kind.clone(), after)),
            ))
        }
    }
}

impl Editor {
    /// Split the text leaf at `ordinal` so that `offset` becomes the start of
    /// a new leaf right after it. Returns false when `offset` is at either end.
    pub(crate) fn split_leaf(&mut self, ordinal: usize, offset: usize) -> bool {
        let path = match self.leaf_paths().get(ordinal) {
            Some(path) => path.clone(),
            None => return false,
        };
        let (parent, index) = match (path.parent(), path.last()) {
            (Some(parent), Some(index)) => (parent, index),
            _ => return false,
        };
        let siblings = match self.children_mut(&parent) {
            Some(siblings) => siblings,
            None => return false,
        };
        let tail = match siblings.get_mut(index) {
            Some(Node::Text(text)) if offset > 0 && offset < text.len() => {
                let at = byte_index(&text.text, offset);
                let tail = text.text.split_off(at);
                Text::with_marks(tail, text.marks)
            }
            _ => return false,
        };
        siblings.insert(index + 1, Node::Text(tail));
        true
    }

    /// Remove the content between two anchors
    ///
    /// When the anchors lie in different blocks, whatever is left of the end
    /// block moves into the start block. The returned anchor is the collapsed
    /// position where the content used to be; the tree is not normalized yet.
    pub(crate) fn delete_range(&mut self, start: Anchor, end: Anchor) -> Anchor {
        let leaves = self.leaf_paths();
        let (start_path, end_path) = match (leaves.get(start.ordinal), leaves.get(end.ordinal)) {
            (Some(s), Some(e)) => (s.clone(), e.clone()),
            _ => return start,
        };

        if start.ordinal == end.ordinal {
            if let Some(Node::Text(text)) = self.node_mut(&start_path) {
                let from = byte_index(&text.text, start.offset);
                let to = byte_index(&text.text, end.offset);
                text.text.replace_range(from..to, "");
            }
            return start;
        }

        if let Some(Node::Text(text)) = self.node_mut(&end_path) {
            let to = byte_index(&text.text, end.offset);
            text.text.replace_range(..to, "");
        }
        if let Some(Node::Text(text)) = self.node_mut(&start_path) {
            let from = byte_index(&text.text, start.offset);
            text.text.truncate(from);
        }
        for path in leaves[start.ordinal + 1..end.ordinal].iter().rev() {
            self.remove_node(path);
        }
        prune_empty(&mut self.children);

        // the end leaf now directly follows the start leaf
        let leaves = self.leaf_paths();
        let (start_leaf, end_leaf) = match (leaves.get(start.ordinal), leaves.get(start.ordinal + 1)) {
            (Some(s), Some(e)) => (s.clone(), e.clone()),
            _ => return start,
        };
        let (start_block, end_block) = match (self.block_of(&start_leaf), self.block_of(&end_leaf)) {
            (Some(s), Some(e)) => (s, e),
            _ => return start,
        };
        if start_block != end_block {
            trace!("Merging block {} into {}", end_block, start_block);
            let moved = match self.remove_node(&end_block) {
                Some(Node::Element(e)) => e.children,
                _ => Vec::new(),
            };
            prune_empty(&mut self.children);
            if let Some(e) = self.element_mut(&start_block) {
                e.children.extend(moved);
            }
        }
        start
    }

    pub(crate) fn remove_node(&mut self, path: &Path) -> Option<Node> {
        let parent = path.parent()?;
        let index = path.last()?;
        let siblings = self.children_mut(&parent)?;
        if index < siblings.len() {
            Some(siblings.remove(index))
        } else {
            None
        }
    }

    /// Insert an inline node at a collapsed position
    ///
    /// Returns the position at the end of the inserted node, or `None` when
    /// the block at that position can't hold inline elements.
    pub(crate) fn insert_inline(&mut self, at: Anchor, node: Node) -> Option<Anchor> {
        let leaf = self.leaf_paths().get(at.ordinal)?.clone();
        let block = self.block_of(&leaf)?;
        match self.node(&block)?.kind() {
            Some(kind) if kind.content() == Content::Inline => {}
            _ => return None,
        }

        let mut target = leaf.clone();
        while target.len() > block.len() + 1 {
            target = target.parent()?;
        }
        let mut index = target.last()?;
        if target == leaf {
            let len = self.leaf(&leaf).map_or(0, Text::len);
            if at.offset >= len {
                index += 1;
            } else if at.offset > 0 {
                self.split_leaf(at.ordinal, at.offset);
                index += 1;
            }
        } else {
            // the position is inside an inline element, never nest into it
            let (first, _) = self.leaf_span(&target)?;
            if at.ordinal != first || at.offset > 0 {
                index += 1;
            }
        }

        let siblings = self.children_mut(&block)?;
        let index = index.min(siblings.len());
        siblings.insert(index, node);
        let (first, count) = self.leaf_span(&block.child(index))?;
        let last = first + count - 1;
        Some(Anchor::new(last, self.leaf_len(last)))
    }

    /// Delete the selected content, the cursor ends up where it started
    pub fn delete_selection(&mut self) -> Outcome {
        let anchors = match self.anchors() {
            Some(anchors) => anchors,
            None => return Outcome::NoSelection,
        };
        if anchors.is_collapsed() {
            return Outcome::Ignored;
        }
        let (start, end) = anchors.edges();
        let at = self.delete_range(start, end);
        self.set_anchors(Anchors::collapsed(at));
        self.normalize();
        Outcome::Applied
    }

    /// Type text at the cursor, replacing the selected content
    ///
    /// Uses the marks toggled at the cursor for the new text if there are any.
    pub fn insert_text(&mut self, input: &str) -> Outcome {
        let anchors = match self.anchors() {
            Some(anchors) => anchors,
            None => return Outcome::NoSelection,
        };
        if input.is_empty() {
            return Outcome::Ignored;
        }
        let pending = self.marks.take();
        let at = if anchors.is_collapsed() {
            anchors.anchor
        } else {
            let (start, end) = anchors.edges();
            self.delete_range(start, end)
        };
        let path = match self.leaf_paths().get(at.ordinal) {
            Some(path) => path.clone(),
            None => return Outcome::Ignored,
        };
        let inserted = input.chars().count();

        let leaf_marks = self.leaf(&path).map(|t| t.marks);
        let cursor = match pending {
            Some(marks) if Some(marks) != leaf_marks => {
                let len = self.leaf(&path).map_or(0, Text::len);
                let (parent, mut index) = match (path.parent(), path.last()) {
                    (Some(parent), Some(index)) => (parent, index),
                    _ => return Outcome::Ignored,
                };
                let mut ordinal = at.ordinal;
                if at.offset > 0 {
                    if at.offset < len {
                        self.split_leaf(at.ordinal, at.offset);
                    }
                    index += 1;
                    ordinal += 1;
                }
                if let Some(siblings) = self.children_mut(&parent) {
                    siblings.insert(index, Node::Text(Text::with_marks(input, marks)));
                }
                Anchor::new(ordinal, inserted)
            }
            _ => {
                if let Some(Node::Text(text)) = self.node_mut(&path) {
                    let i = byte_index(&text.text, at.offset);
                    text.text.insert_str(i, input);
                }
                Anchor::new(at.ordinal, at.offset + inserted)
            }
        };
        self.set_anchors(Anchors::collapsed(cursor));
        self.normalize();
        Outcome::Applied
    }

    /// Insert a blank paragraph at the cursor and move into it
    ///
    /// The top-level block around the cursor is split in two when the cursor
    /// is neither at its start nor at its end.
    pub fn insert_paragraph(&mut self) -> Outcome {
        let anchors = match self.anchors() {
            Some(anchors) => anchors,
            None => return Outcome::NoSelection,
        };
        let at = if anchors.is_collapsed() {
            anchors.anchor
        } else {
            let (start, end) = anchors.edges();
            let at = self.delete_range(start, end);
            self.set_anchors(Anchors::collapsed(at));
            self.normalize();
            match self.anchors() {
                Some(anchors) => anchors.anchor,
                None => return Outcome::Ignored,
            }
        };
        let leaf = match self.leaf_paths().get(at.ordinal) {
            Some(leaf) => leaf.clone(),
            None => return Outcome::Ignored,
        };
        let top = match leaf.root_index() {
            Some(top) => top,
            None => return Outcome::Ignored,
        };
        let (first, count) = match self.leaf_span(&Path::new(vec![top])) {
            Some(span) => span,
            None => return Outcome::Ignored,
        };
        let last = first + count - 1;

        let index = if at.ordinal == first && at.offset == 0 {
            top
        } else if at.ordinal == last && at.offset >= self.leaf_len(last) {
            top + 1
        } else {
            let split = self.children.get(top).and_then(|node| split_node(node, &leaf.0[1..], at.offset));
            match split {
                Some((left, right)) => {
                    self.children[top] = left;
                    self.children.insert(top + 1, right);
                    top + 1
                }
                None => return Outcome::Ignored,
            }
        };
        debug!("Inserting paragraph at {}", index);
        self.children
            .insert(index, Node::Element(Element::blank(Kind::paragraph())));
        match self.leaf_span(&Path::new(vec![index])) {
            Some((ordinal, _)) => self.set_anchors(Anchors::collapsed(Anchor::new(ordinal, 0))),
            None => return Outcome::Ignored,
        }
        self.normalize();
        Outcome::Applied
    }
}

/// Remove elements that lost all of their children
fn prune_empty(nodes: &mut Vec<Node>) {
    nodes.retain_mut(|node| match node {
        Node::Text(_) => true,
        Node::Element(e) => {
            if e.children.is_empty() {
                return false;
            }
            prune_empty(&mut e.children);
            !e.children.is_empty()
        }
    });
}

#[cfg(test)]
mod tests {
    use crate::editor::tests::{cursor, paragraph, select};
    use crate::editor::{Editor, Outcome};
    use crate::model::{Align, Marks, Node, Point, Range, Text};

    #[test]
    fn test_delete_within_leaf() {
        let mut editor = Editor::new(vec![paragraph("hello world")]);
        select(&mut editor, &[0, 0], 5, &[0, 0], 11);
        assert_eq!(editor.delete_selection(), Outcome::Applied);
        assert_eq!(editor.children(), &[paragraph("hello")]);
        assert_eq!(
            editor.selection(),
            Some(&Range::collapsed(Point::new(vec![0, 0], 5)))
        );
    }

    #[test]
    fn test_delete_across_blocks() {
        let mut editor = Editor::new(vec![
            paragraph("first"),
            paragraph("middle"),
            Node::list(vec![Node::list_item(vec![Node::text("item")])]),
            paragraph("last"),
        ]);
        select(&mut editor, &[0, 0], 2, &[2, 0, 0], 2);
        assert_eq!(editor.delete_selection(), Outcome::Applied);
        assert_eq!(editor.children(), &[paragraph("fiem"), paragraph("last")]);
    }

    #[test]
    fn test_insert_text_uses_pending_marks() {
        let mut editor = Editor::new(vec![paragraph("ab")]);
        cursor(&mut editor, &[0, 0], 1);
        assert_eq!(editor.toggle_bold(), Outcome::Applied);
        assert!(editor.is_bold_active());
        assert_eq!(editor.insert_text("X"), Outcome::Applied);
        let bold = Marks {
            bold: true,
            ..Marks::default()
        };
        assert_eq!(
            editor.children(),
            &[Node::paragraph(
                Align::Unset,
                vec![
                    Node::text("a"),
                    Node::Text(Text::with_marks("X", bold)),
                    Node::text("b")
                ]
            )]
        );
        assert_eq!(
            editor.selection(),
            Some(&Range::collapsed(Point::new(vec![0, 1], 1)))
        );
        assert!(editor.pending_marks().is_none());
    }

    #[test]
    fn test_insert_text_replaces_selection() {
        let mut editor = Editor::new(vec![paragraph("good day")]);
        select(&mut editor, &[0, 0], 5, &[0, 0], 8);
        assert_eq!(editor.insert_text("night"), Outcome::Applied);
        assert_eq!(editor.children(), &[paragraph("good night")]);
    }

    #[test]
    fn test_insert_paragraph_splits_block() {
        let mut editor = Editor::new(vec![paragraph("onetwo")]);
        cursor(&mut editor, &[0, 0], 3);
        assert_eq!(editor.insert_paragraph(), Outcome::Applied);
        assert_eq!(
            editor.children(),
            &[paragraph("one"), paragraph(""), paragraph("two")]
        );
        assert_eq!(
            editor.selection(),
            Some(&Range::collapsed(Point::new(vec![1, 0], 0)))
        );
    }

    #[test]
    fn test_insert_paragraph_at_end() {
        let mut editor = Editor::new(vec![paragraph("one")]);
        cursor(&mut editor, &[0, 0], 3);
        assert_eq!(editor.insert_paragraph(), Outcome::Applied);
        assert_eq!(editor.children(), &[paragraph("one"), paragraph("")]);
        editor.deselect();
        assert_eq!(editor.insert_paragraph(), Outcome::NoSelection);
    }
}
