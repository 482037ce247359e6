//! # Toolbar state
//!
//! A snapshot of every `is_*_active` query, i.e. which toolbar buttons are
//! pressed for the current selection.

use crate::editor::Editor;
use crate::model::{Align, HeadingLevel};
use serde::Serialize;

const ALIGNMENTS: [Align; 4] = [Align::Left, Align::Center, Align::Right, Align::Justify];

/// Which buttons are pressed
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ToolbarState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Every alignment found in the selection
    pub align: Vec<Align>,
    pub heading: bool,
    /// Every heading level found in the selection
    pub heading_levels: Vec<HeadingLevel>,
    pub code: bool,
    pub separator: bool,
    pub list: bool,
    pub link: bool,
}

impl ToolbarState {
    pub fn read(editor: &Editor) -> Self {
        Self {
            bold: editor.is_bold_active(),
            italic: editor.is_italic_active(),
            underline: editor.is_underline_active(),
            align: ALIGNMENTS
                .iter()
                .copied()
                .filter(|align| editor.is_align_active(*align))
                .collect(),
            heading: editor.is_heading_active(),
            heading_levels: (1..=6)
                .filter_map(HeadingLevel::new)
                .filter(|level| editor.is_heading_level_active(*level))
                .collect(),
            code: editor.is_code_active(),
            separator: editor.is_separator_active(),
            list: editor.is_list_active(),
            link: editor.is_link_active(),
        }
    }
}
