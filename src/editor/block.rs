//! Block types and alignment
//!
//! All queries here match existentially: a kind counts as active as soon as
//! one selected element has it.

use super::{Editor, Outcome};
use crate::model::{Align, HeadingLevel, Kind};
use log::*;

impl Editor {
    pub fn is_code_active(&self) -> bool {
        self.any_selected(|kind| matches!(kind, Kind::Code))
    }

    pub fn is_separator_active(&self) -> bool {
        self.any_selected(|kind| matches!(kind, Kind::Separator))
    }

    pub fn is_heading_active(&self) -> bool {
        self.any_selected(|kind| matches!(kind, Kind::Heading { .. }))
    }

    pub fn is_heading_level_active(&self, level: HeadingLevel) -> bool {
        self.any_selected(|kind| matches!(kind, Kind::Heading { level: l, .. } if *l == level))
    }

    pub fn is_align_active(&self, align: Align) -> bool {
        self.any_selected(|kind| kind.align() == Some(align))
    }

    /// Align the selected paragraphs and headings, or clear an active alignment
    ///
    /// Does nothing when the selection starts in a block that can't be aligned.
    pub fn toggle_align(&mut self, align: Align) -> Outcome {
        if self.anchors().is_none() {
            return Outcome::NoSelection;
        }
        let first = self
            .selected_elements()
            .into_iter()
            .find(|(path, _)| path.len() == 1)
            .and_then(|(_, element)| element.kind.align());
        if first.is_none() {
            debug!("Alignment does not apply to the selected block");
            return Outcome::Ignored;
        }
        let value = if self.is_align_active(align) {
            Align::Unset
        } else {
            align
        };

        for path in self.lowest_blocks() {
            if let Some(element) = self.element_mut(&path) {
                match &mut element.kind {
                    Kind::Paragraph { align } | Kind::Heading { align, .. } => *align = value,
                    _ => {}
                }
            }
        }
        Outcome::Applied
    }

    /// Turn the selected blocks into headings of `level`
    ///
    /// Blocks that already are headings of that level go back to paragraphs.
    pub fn toggle_heading(&mut self, level: HeadingLevel) -> Outcome {
        let revert = self.is_heading_level_active(level);
        self.set_block_kind(|kind| {
            let align = kind.align().unwrap_or_default();
            if revert {
                Kind::Paragraph { align }
            } else {
                Kind::Heading { level, align }
            }
        })
    }

    pub fn toggle_code(&mut self) -> Outcome {
        let revert = self.is_code_active();
        self.set_block_kind(|_| if revert { Kind::paragraph() } else { Kind::Code })
    }

    pub fn toggle_separator(&mut self) -> Outcome {
        let revert = self.is_separator_active();
        self.set_block_kind(|_| {
            if revert {
                Kind::paragraph()
            } else {
                Kind::Separator
            }
        })
    }

    /// Change the kind of every selected block, selected list items leave their list first
    fn set_block_kind<F: Fn(&Kind) -> Kind>(&mut self, f: F) -> Outcome {
        let anchors = match self.anchors() {
            Some(anchors) => anchors,
            None => return Outcome::NoSelection,
        };
        self.lift_list_items();
        self.set_anchors(anchors);

        let blocks = self.lowest_blocks();
        for path in &blocks {
            if let Some(element) = self.element_mut(path) {
                let kind = f(&element.kind);
                trace!("Block {} becomes {:?}", path, kind);
                element.kind = kind;
            }
        }
        self.normalize();
        if blocks.is_empty() {
            Outcome::Ignored
        } else {
            Outcome::Applied
        }
    }
}
