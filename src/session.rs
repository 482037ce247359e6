//! # Editing sessions on stored entries
//!
//! Loads an entry from its HTML file, replays editor commands on it and
//! writes the result back.

use crate::command::Command;
use crate::editor::{Editor, Outcome};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::*;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::instrument;

/// What happened to the lines of a script
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptReport {
    pub applied: usize,
    pub ignored: usize,
    pub no_selection: usize,
    /// Lines that could not be parsed or moved the selection out of the document
    pub failed: usize,
}

/// An editor together with the file it was loaded from
#[derive(Debug, Default)]
pub struct Session {
    editor: Editor,
}

impl Session {
    pub fn new(editor: Editor) -> Self {
        Self { editor }
    }

    /// Load an entry, a missing or empty file is a new entry
    #[instrument]
    pub async fn open(path: &Path) -> Result<Self> {
        let html = match fs::read_to_string(path).await {
            Ok(html) => html,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("{} does not exist yet, starting a new entry", path.display());
                String::new()
            }
            Err(e) => return Err(e).wrap_err("Could not read document"),
        };
        Ok(Self::new(Editor::from_html(&html)))
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// Run one command per line, blank lines and lines starting with `#` are skipped
    pub fn apply_script(&mut self, script: &str) -> ScriptReport {
        let mut report = ScriptReport::default();
        for (number, line) in script.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let command: Command = match line.parse() {
                Ok(command) => command,
                Err(e) => {
                    warn!("Line {}: {}", number + 1, e);
                    report.failed += 1;
                    continue;
                }
            };
            match command.apply(&mut self.editor) {
                Ok(Outcome::Applied) => report.applied += 1,
                Ok(Outcome::Ignored) => {
                    debug!("Line {}: {:?} did not apply", number + 1, command);
                    report.ignored += 1;
                }
                Ok(Outcome::NoSelection) => {
                    warn!("Line {}: {:?} needs a selection", number + 1, command);
                    report.no_selection += 1;
                }
                Err(e) => {
                    warn!("Line {}: {}", number + 1, e);
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Write the entry as HTML
    #[instrument(skip(self))]
    pub async fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.editor.to_html())
            .await
            .wrap_err("Could not write document")?;
        info!("Saved {}", path.display());
        Ok(())
    }
}
