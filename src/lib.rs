//! # Journal editor
//!
//! The rich-text engine behind the journal: a document tree, its HTML form,
//! and a selection-aware [`Editor`](editor::Editor) that implements every
//! toolbar action on that tree.
pub mod command;
pub mod config;
pub mod editor;
pub mod html;
pub mod model;
pub mod session;
pub mod stats;
pub mod toolbar;

pub use editor::{EditError, Editor, Outcome};
