use super::{Anchor, Editor, Outcome};
use crate::model::{Mark, Marks, Node};
use log::*;

impl Editor {
    /// The marks present on all of the selected text
    ///
    /// At a collapsed cursor these are the marks toggled for the next input,
    /// or the marks of the leaf the cursor is in. A cursor at the start of a
    /// leaf takes the marks of the previous leaf in the same block.
    pub fn marks(&self) -> Option<Marks> {
        if let Some(pending) = self.marks {
            return Some(pending);
        }
        let anchors = self.anchors()?;
        let leaves = self.leaf_paths();
        if anchors.is_collapsed() {
            let at = anchors.anchor;
            let current = leaves.get(at.ordinal)?;
            let leaf = match at.ordinal.checked_sub(1).and_then(|prev| leaves.get(prev)) {
                Some(prev) if at.offset == 0 && self.block_of(prev) == self.block_of(current) => prev,
                _ => current,
            };
            return self.leaf(leaf).map(|t| t.marks);
        }

        let (start, end) = anchors.edges();
        let mut first = start.ordinal;
        let mut last = end.ordinal;
        if first < last && start.offset >= self.leaf_len(first) {
            first += 1;
        }
        if first < last && end.offset == 0 {
            last -= 1;
        }
        leaves[first..=last]
            .iter()
            .filter_map(|path| self.leaf(path))
            .map(|text| text.marks)
            .reduce(Marks::intersect)
    }

    pub fn is_mark_active(&self, mark: Mark) -> bool {
        self.marks().map_or(false, |marks| marks.has(mark))
    }

    pub fn is_bold_active(&self) -> bool {
        self.is_mark_active(Mark::Bold)
    }

    pub fn is_italic_active(&self) -> bool {
        self.is_mark_active(Mark::Italic)
    }

    pub fn is_underline_active(&self) -> bool {
        self.is_mark_active(Mark::Underline)
    }

    /// Set the mark on the selected text if it is not active, remove it otherwise
    ///
    /// With a collapsed cursor only the marks for the next input change.
    pub fn toggle_mark(&mut self, mark: Mark) -> Outcome {
        let anchors = match self.anchors() {
            Some(anchors) => anchors,
            None => return Outcome::NoSelection,
        };
        let value = !self.is_mark_active(mark);
        debug!("Toggle {} to {}", mark, value);

        if anchors.is_collapsed() {
            let mut marks = self.marks().unwrap_or_default();
            marks.set(mark, value);
            self.marks = Some(marks);
            return Outcome::Applied;
        }

        // split the end first, so the start ordinal stays valid
        let (start, end) = anchors.edges();
        self.split_leaf(end.ordinal, end.offset);
        let (start, end) = if self.split_leaf(start.ordinal, start.offset) {
            let end_offset = if start.ordinal == end.ordinal {
                end.offset - start.offset
            } else {
                end.offset
            };
            (
                Anchor::new(start.ordinal + 1, 0),
                Anchor::new(end.ordinal + 1, end_offset),
            )
        } else {
            (start, end)
        };

        let mut first = start.ordinal;
        if start.offset > 0 {
            first += 1;
        }
        let last = match end.offset {
            0 => end.ordinal.checked_sub(1),
            _ => Some(end.ordinal),
        };

        let leaves = self.leaf_paths();
        let mut outcome = Outcome::Ignored;
        if let Some(last) = last.filter(|last| first <= *last) {
            for path in &leaves[first..=last] {
                if let Some(Node::Text(text)) = self.node_mut(path) {
                    text.marks.set(mark, value);
                    outcome = Outcome::Applied;
                }
            }
        }
        self.set_anchors(anchors.with_edges(start, end));
        self.normalize();
        outcome
    }

    pub fn toggle_bold(&mut self) -> Outcome {
        self.toggle_mark(Mark::Bold)
    }

    pub fn toggle_italic(&mut self) -> Outcome {
        self.toggle_mark(Mark::Italic)
    }

    pub fn toggle_underline(&mut self) -> Outcome {
        self.toggle_mark(Mark::Underline)
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::tests::{cursor, paragraph, select};
    use crate::editor::{Editor, Outcome};
    use crate::model::{Align, Mark, Marks, Node, Point, Range, Text};

    fn marked(text: &str, bold: bool, italic: bool) -> Node {
        Node::Text(Text::with_marks(
            text,
            Marks {
                bold,
                italic,
                underline: false,
            },
        ))
    }

    #[test]
    fn test_toggle_part_of_leaf() {
        let mut editor = Editor::new(vec![paragraph("hello world")]);
        select(&mut editor, &[0, 0], 6, &[0, 0], 11);
        assert!(!editor.is_bold_active());
        assert_eq!(editor.toggle_bold(), Outcome::Applied);
        assert!(editor.is_bold_active());
        assert_eq!(
            editor.children(),
            &[Node::paragraph(
                Align::Unset,
                vec![Node::text("hello "), marked("world", true, false)]
            )]
        );
        assert_eq!(
            editor.selection(),
            Some(&Range::new(
                Point::new(vec![0, 1], 0),
                Point::new(vec![0, 1], 5)
            ))
        );
    }

    #[test]
    fn test_involution() {
        let mut editor = Editor::new(vec![Node::paragraph(
            Align::Unset,
            vec![Node::text("ab"), marked("cd", true, false), Node::text("ef")],
        )]);
        select(&mut editor, &[0, 2], 1, &[0, 0], 1);
        let before = editor.is_bold_active();
        assert_eq!(editor.toggle_bold(), Outcome::Applied);
        assert_ne!(editor.is_bold_active(), before);
        assert_eq!(editor.toggle_bold(), Outcome::Applied);
        assert_eq!(editor.is_bold_active(), before);
        assert!(editor.selection().unwrap().is_backward());

        let mut editor = Editor::new(vec![paragraph("abcdef")]);
        select(&mut editor, &[0, 0], 2, &[0, 0], 4);
        assert_eq!(editor.toggle_bold(), Outcome::Applied);
        assert_eq!(editor.toggle_bold(), Outcome::Applied);
        assert_eq!(editor.children(), &[paragraph("abcdef")]);
        assert_eq!(editor.selected_string(), "cd");
    }

    #[test]
    fn test_active_ignores_touching_leaves() {
        let mut editor = Editor::new(vec![Node::paragraph(
            Align::Unset,
            vec![Node::text("ab"), marked("cd", false, true)],
        )]);
        select(&mut editor, &[0, 0], 2, &[0, 1], 2);
        assert!(editor.is_italic_active());
        select(&mut editor, &[0, 0], 1, &[0, 1], 2);
        assert!(!editor.is_italic_active());
    }

    #[test]
    fn test_across_blocks() {
        let mut editor = Editor::new(vec![paragraph("one"), paragraph("two")]);
        select(&mut editor, &[0, 0], 1, &[1, 0], 1);
        assert_eq!(editor.toggle_italic(), Outcome::Applied);
        assert_eq!(
            editor.children(),
            &[
                Node::paragraph(Align::Unset, vec![Node::text("o"), marked("ne", false, true)]),
                Node::paragraph(Align::Unset, vec![marked("t", false, true), Node::text("wo")]),
            ]
        );
    }

    #[test]
    fn test_collapsed_sets_pending() {
        let mut editor = Editor::new(vec![paragraph("x")]);
        cursor(&mut editor, &[0, 0], 1);
        assert_eq!(editor.toggle_underline(), Outcome::Applied);
        assert!(editor.is_mark_active(Mark::Underline));
        assert_eq!(editor.children(), &[paragraph("x")]);
        assert_eq!(editor.toggle_underline(), Outcome::Applied);
        assert!(!editor.is_underline_active());
    }

    #[test]
    fn test_cursor_at_leaf_start_reads_previous_leaf() {
        let mut editor = Editor::new(vec![
            Node::paragraph(
                Align::Unset,
                vec![marked("ab", true, false), Node::text("cd")],
            ),
            Node::paragraph(Align::Unset, vec![marked("ef", false, true)]),
        ]);
        cursor(&mut editor, &[0, 1], 0);
        assert!(editor.is_bold_active());
        cursor(&mut editor, &[0, 1], 1);
        assert!(!editor.is_bold_active());
        cursor(&mut editor, &[0, 0], 0);
        assert!(editor.is_bold_active());

        // the previous leaf is in another block
        cursor(&mut editor, &[1, 0], 0);
        assert!(editor.is_italic_active());
        assert!(!editor.is_bold_active());

        cursor(&mut editor, &[0, 1], 0);
        assert_eq!(editor.toggle_bold(), Outcome::Applied);
        assert!(!editor.is_bold_active());
    }

    #[test]
    fn test_no_selection() {
        let mut editor = Editor::new(vec![paragraph("x")]);
        assert_eq!(editor.toggle_bold(), Outcome::NoSelection);
        assert!(!editor.is_bold_active());
    }
}
