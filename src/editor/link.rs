//! Inline links
//!
//! [`Editor::toggle_link`] is driven by the link dialog, which submits a url
//! and a text. Depending on the selection and the url it inserts, replaces,
//! unwraps or removes a link.

use super::{Anchor, Anchors, Editor, Outcome};
use crate::model::{Content, Kind, Node, Path, Text};
use derive_new::new;
use log::*;
use serde::Serialize;
use url::Url;

/// Schemes a link may point to
const SCHEMES: &[&str] = &["http", "https", "ftp", "ftps"];

/// Whether `url` is an absolute URL with one of the supported schemes
pub fn validate_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(url) => SCHEMES.contains(&url.scheme()),
        Err(_) => false,
    }
}

/// The contents of the link dialog
#[derive(new, Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LinkDetails {
    pub url: String,
    pub text: String,
}

impl LinkDetails {
    fn of(node: &Node) -> Option<Self> {
        match node.kind()? {
            Kind::Link { url } => Some(Self::new(url.clone(), node.string())),
            _ => None,
        }
    }
}

impl Editor {
    pub fn is_link_active(&self) -> bool {
        self.any_selected(|kind| matches!(kind, Kind::Link { .. }))
    }

    /// The path of the link around a leaf
    fn link_around(&self, leaf: &Path) -> Option<Path> {
        let mut path = leaf.parent()?;
        loop {
            match self.node(&path)?.kind() {
                Some(Kind::Link { .. }) => return Some(path),
                _ => path = path.parent()?,
            }
        }
    }

    /// The link at the selection, if there is one
    ///
    /// Looks at the link around the cursor, then at the first child of the
    /// top-level block, and for lists at the first child of the list item.
    pub fn link_details(&self) -> Option<LinkDetails> {
        let range = self.selection.as_ref()?;
        let point = &range.anchor.path;
        if let Some(link) = self.link_around(point) {
            return self.node(&link).and_then(LinkDetails::of);
        }
        let root = point.root_index()?;
        let block = self.children.get(root)?;
        match block.kind()? {
            Kind::List => {
                let item = block.child(*point.0.get(1)?)?;
                LinkDetails::of(item.child(0)?)
            }
            _ => LinkDetails::of(block.child(0)?),
        }
    }

    /// What the link dialog shows when it opens
    pub fn link_draft(&self) -> LinkDetails {
        self.link_details()
            .unwrap_or_else(|| LinkDetails::new(String::new(), self.selected_string()))
    }

    /// Insert, replace, unwrap or remove a link
    ///
    /// With a url, the selected content is replaced by a link showing `text`
    /// (or the url itself), and a link around the cursor is replaced by the
    /// new one. Without a url, the selected links are unwrapped into plain
    /// text, or removed altogether if `text` is empty as well.
    pub fn toggle_link(&mut self, text: &str, url: &str) -> Outcome {
        let anchors = match self.anchors() {
            Some(anchors) => anchors,
            None => return Outcome::NoSelection,
        };

        if url.is_empty() {
            let links = self.selected_links();
            if links.is_empty() {
                return Outcome::Ignored;
            }
            let anchors = if text.is_empty() {
                debug!("Removing {} link(s)", links.len());
                links
                    .iter()
                    .rev()
                    .fold(anchors, |anchors, path| self.remove_inline(path, anchors))
            } else {
                debug!("Unwrapping {} link(s)", links.len());
                self.unwrap_links(&links);
                anchors
            };
            self.set_anchors(anchors);
            self.normalize();
            return Outcome::Applied;
        }

        if !self.accepts_links(anchors.anchor) || !self.accepts_links(anchors.focus) {
            debug!("Links are not allowed here");
            return Outcome::Ignored;
        }
        let label = if text.is_empty() { url } else { text };
        let node = Node::link(url, vec![Node::text(label)]);

        let at = if !anchors.is_collapsed() {
            let links = self.selected_links();
            self.unwrap_links(&links);
            let (start, end) = anchors.edges();
            self.delete_range(start, end)
        } else {
            let around = self
                .leaf_paths()
                .get(anchors.anchor.ordinal)
                .and_then(|leaf| self.link_around(leaf));
            match around {
                Some(link) => {
                    debug!("Replacing link at {}", link);
                    self.remove_inline(&link, anchors).anchor
                }
                None => anchors.anchor,
            }
        };

        match self.insert_inline(at, node) {
            Some(end) => {
                self.set_anchors(Anchors::collapsed(end));
                self.normalize();
                Outcome::Applied
            }
            None => {
                warn!("Could not insert link at {:?}", at);
                self.set_anchors(Anchors::collapsed(at));
                self.normalize();
                Outcome::Ignored
            }
        }
    }

    fn selected_links(&self) -> Vec<Path> {
        self.selected_elements()
            .into_iter()
            .filter(|(_, e)| matches!(e.kind, Kind::Link { .. }))
            .map(|(path, _)| path)
            .collect()
    }

    fn accepts_links(&self, at: Anchor) -> bool {
        self.leaf_paths()
            .get(at.ordinal)
            .and_then(|leaf| self.block_of(leaf))
            .and_then(|block| self.node(&block))
            .and_then(Node::kind)
            .map_or(false, |kind| kind.content() == Content::Inline)
    }

    /// Replace links by their text, leaves keep their order
    fn unwrap_links(&mut self, links: &[Path]) {
        for path in links.iter().rev() {
            let (parent, index) = match (path.parent(), path.last()) {
                (Some(parent), Some(index)) => (parent, index),
                _ => continue,
            };
            if let Some(siblings) = self.children_mut(&parent) {
                if let Some(Node::Element(link)) = siblings.get(index).cloned() {
                    siblings.splice(index..=index, link.children);
                }
            }
        }
    }

    /// Remove an inline node and move the points that were inside of it
    ///
    /// A point inside the node ends up at the end of the previous sibling, or
    /// at the start of the parent if the node was its first child.
    fn remove_inline(&mut self, path: &Path, anchors: Anchors) -> Anchors {
        let (first, count) = match self.leaf_span(path) {
            Some(span) => span,
            None => return anchors,
        };
        let (parent, index) = match (path.parent(), path.last()) {
            (Some(parent), Some(index)) => (parent, index),
            _ => return anchors,
        };
        let mut filled = false;
        if let Some(siblings) = self.children_mut(&parent) {
            siblings.remove(index);
            if siblings.is_empty() {
                siblings.push(Node::Text(Text::default()));
                filled = true;
            }
        }
        let removed = if filled { count - 1 } else { count };
        let inside = if filled || index == 0 {
            Anchor::new(first, 0)
        } else {
            Anchor::new(first - 1, self.leaf_len(first - 1))
        };
        let relocate = |at: Anchor| {
            if at.ordinal < first {
                at
            } else if at.ordinal < first + count {
                inside
            } else {
                Anchor::new(at.ordinal - removed, at.offset)
            }
        };
        Anchors {
            anchor: relocate(anchors.anchor),
            focus: relocate(anchors.focus),
        }
    }
}
