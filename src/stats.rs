//! # Document statistics

use crate::model::Node;
use displaydoc::Display;
use serde::Serialize;

/// {words} words, {characters} characters
#[derive(Debug, Display, Default, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    /// Whitespace separated tokens
    pub words: usize,
    /// Characters other than whitespace
    pub characters: usize,
}

impl DocumentStats {
    /// Count the text of the top-level blocks, with blocks separated by a space
    pub fn read(nodes: &[Node]) -> Self {
        let text = nodes
            .iter()
            .map(Node::string)
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            words: text.split_whitespace().count(),
            characters: text.chars().filter(|c| !c.is_whitespace()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DocumentStats;
    use crate::model::{Align, Node};

    #[test]
    fn test_read() {
        let doc = vec![
            Node::paragraph(Align::Unset, vec![Node::text("Dear  diary,")]),
            Node::paragraph(Align::Unset, vec![Node::text("")]),
            Node::list(vec![
                Node::list_item(vec![Node::text("one")]),
                Node::list_item(vec![Node::text("two")]),
            ]),
        ];
        let stats = DocumentStats::read(&doc);
        assert_eq!(
            stats,
            DocumentStats {
                words: 3,
                characters: 16
            }
        );
        assert_eq!(stats.to_string(), "3 words, 16 characters");
        assert_eq!(DocumentStats::read(&[]), DocumentStats::default());
    }
}
