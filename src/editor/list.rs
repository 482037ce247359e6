use super::{Editor, Outcome};
use crate::model::{Element, Kind, Node};
use log::*;

impl Editor {
    pub fn is_list_active(&self) -> bool {
        self.any_selected(|kind| matches!(kind, Kind::List))
    }

    /// Turn the selected blocks into a list, or the selected items back into paragraphs
    pub fn toggle_list(&mut self) -> Outcome {
        let anchors = match self.anchors() {
            Some(anchors) => anchors,
            None => return Outcome::NoSelection,
        };
        if self.is_list_active() {
            self.lift_list_items();
        } else {
            let (start, end) = match self.selection.as_ref().map(|range| range.edges()) {
                Some((start, end)) => (start.path.root_index(), end.path.root_index()),
                None => return Outcome::NoSelection,
            };
            let (start, end) = match (start, end) {
                (Some(start), Some(end)) => (start, end),
                _ => return Outcome::Ignored,
            };
            debug!("Wrapping blocks {}..={} in a list", start, end);
            let items = self
                .children
                .drain(start..=end)
                .map(|node| match node {
                    Node::Element(e) => Node::Element(Element::new(Kind::ListItem, e.children)),
                    text => text,
                })
                .collect();
            self.children.insert(start, Node::list(items));
        }
        // neither direction adds, drops or reorders a leaf
        self.set_anchors(anchors);
        self.normalize();
        Outcome::Applied
    }

    /// Move the selected list items out of their lists as paragraphs
    ///
    /// A list is split around the selected items, the items before and after
    /// the selection stay in lists of their own.
    pub(crate) fn lift_list_items(&mut self) {
        let mut lifts: Vec<(usize, usize, usize)> = Vec::new();
        for (path, element) in self.selected_elements() {
            let index = match path.0.as_slice() {
                [_, index] => *index,
                _ => continue,
            };
            let root = match path.root_index() {
                Some(root) if element.kind == Kind::ListItem => root,
                _ => continue,
            };
            match lifts.last_mut() {
                Some(lift) if lift.0 == root => lift.2 = index,
                _ => lifts.push((root, index, index)),
            }
        }

        for (list, first, last) in lifts.into_iter().rev() {
            trace!("Lifting items {}..={} of list {}", first, last, list);
            let mut items = match self.children.get_mut(list) {
                Some(Node::Element(e)) if e.kind == Kind::List => std::mem::take(&mut e.children),
                _ => continue,
            };
            let after = items.split_off((last + 1).min(items.len()));
            let lifted = items.split_off(first.min(items.len()));
            let before = items;

            let mut replacement = Vec::new();
            if !before.is_empty() {
                replacement.push(Node::list(before));
            }
            replacement.extend(lifted.into_iter().map(|item| match item {
                Node::Element(e) => Node::Element(Element::new(Kind::paragraph(), e.children)),
                text => text,
            }));
            if !after.is_empty() {
                replacement.push(Node::list(after));
            }
            self.children.splice(list..=list, replacement);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::tests::{cursor, paragraph, select};
    use crate::editor::{Editor, Outcome};
    use crate::model::Node;

    fn items(texts: &[&str]) -> Node {
        Node::list(
            texts
                .iter()
                .map(|text| Node::list_item(vec![Node::text(*text)]))
                .collect(),
        )
    }

    #[test]
    fn test_wrap_paragraph() {
        let mut editor = Editor::new(vec![paragraph("Item")]);
        cursor(&mut editor, &[0, 0], 2);
        assert!(!editor.is_list_active());
        assert_eq!(editor.toggle_list(), Outcome::Applied);
        assert_eq!(editor.children(), &[items(&["Item"])]);
        assert!(editor.is_list_active());
        assert_eq!(editor.selected_string(), "");
        assert_eq!(editor.selection().unwrap().anchor.path.0, vec![0, 0, 0]);
    }

    #[test]
    fn test_wrap_only_selected_blocks() {
        let mut editor = Editor::new(vec![
            paragraph("a"),
            paragraph("b"),
            paragraph("c"),
            paragraph("d"),
        ]);
        select(&mut editor, &[1, 0], 0, &[2, 0], 1);
        assert_eq!(editor.toggle_list(), Outcome::Applied);
        assert_eq!(
            editor.children(),
            &[paragraph("a"), items(&["b", "c"]), paragraph("d")]
        );
    }

    #[test]
    fn test_unwrap_splits_list() {
        let mut editor = Editor::new(vec![items(&["a", "b", "c"])]);
        cursor(&mut editor, &[0, 1, 0], 1);
        assert!(editor.is_list_active());
        assert_eq!(editor.toggle_list(), Outcome::Applied);
        assert_eq!(
            editor.children(),
            &[items(&["a"]), paragraph("b"), items(&["c"])]
        );
        assert_eq!(editor.selection().unwrap().anchor.path.0, vec![1, 0]);
        assert!(!editor.is_list_active());
    }

    #[test]
    fn test_unwrap_whole_list() {
        let mut editor = Editor::new(vec![paragraph("x"), items(&["a", "b"])]);
        select(&mut editor, &[0, 0], 0, &[1, 1, 0], 1);
        assert_eq!(editor.toggle_list(), Outcome::Applied);
        assert_eq!(
            editor.children(),
            &[paragraph("x"), paragraph("a"), paragraph("b")]
        );
    }
}
