//! # Editor commands
//!
//! Every toolbar affordance and keyboard shortcut has a text form, one
//! command per line, with arguments separated by `|`:
//!
//! ```text
//! select|0.0:0-0.0:5
//! bold
//! heading|2
//! link|https://example.com|a link
//! key|ctrl+enter
//! ```

use crate::editor::{validate_url, EditError, Editor, Outcome};
use crate::model::{Align, HeadingLevel, Mark, Point, Range};
use displaydoc::Display;
use std::str::FromStr;
use thiserror::Error;

/// Error when parsing a command
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    /// The command expected an argument (e.g. `{0}|foo`)
    MissingArg(CommandKind),
    /// `{1}` is not a valid argument for `{0}`
    InvalidArg(CommandKind, String),
    /// The command `{0}` is not known
    UnknownCommand(String),
    /// `{0}` is not a http(s) or ftp(s) URL
    InvalidUrl(String),
    /// The key combination `{0}` is not known
    UnknownHotkey(String),
}

/// A kind of command
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
pub enum CommandKind {
    /// bold
    Bold,
    /// italic
    Italic,
    /// underline
    Underline,
    /// align
    Align,
    /// heading
    Heading,
    /// code
    Code,
    /// separator
    Separator,
    /// list
    List,
    /// link
    Link,
    /// select
    Select,
    /// cursor
    Cursor,
    /// type
    Type,
    /// delete
    Delete,
    /// paragraph
    Paragraph,
    /// key
    Key,
}

/// A keyboard shortcut
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
pub enum Hotkey {
    /// ctrl+b
    Bold,
    /// ctrl+i
    Italic,
    /// ctrl+u
    Underline,
    /// ctrl+enter
    Paragraph,
}

/// A command for the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Toggle a mark
    Mark(Mark),
    /// Toggle an alignment
    Align(Align),
    /// Toggle a heading level
    Heading(HeadingLevel),
    /// Toggle a code block
    Code,
    /// Toggle a separator
    Separator,
    /// Toggle a list
    List,
    /// Submit the link dialog
    Link {
        /// The link target, empty to unwrap or remove
        url: String,
        /// The text to show
        text: String,
    },
    /// Move the selection
    Select(Range),
    /// Select the whole document
    SelectAll,
    /// Move the cursor
    Cursor(Point),
    /// Type some text
    Type(String),
    /// Delete the selected content
    Delete,
    /// Insert a blank paragraph
    Paragraph,
    /// Press a keyboard shortcut
    Key(Hotkey),
}

impl FromStr for CommandKind {
    type Err = ParseCommandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bold" => Ok(Self::Bold),
            "italic" => Ok(Self::Italic),
            "underline" => Ok(Self::Underline),
            "align" => Ok(Self::Align),
            "heading" => Ok(Self::Heading),
            "code" => Ok(Self::Code),
            "separator" => Ok(Self::Separator),
            "list" => Ok(Self::List),
            "link" => Ok(Self::Link),
            "select" => Ok(Self::Select),
            "cursor" => Ok(Self::Cursor),
            "type" => Ok(Self::Type),
            "delete" => Ok(Self::Delete),
            "paragraph" => Ok(Self::Paragraph),
            "key" => Ok(Self::Key),
            _ => Err(ParseCommandError::UnknownCommand(s.to_owned())),
        }
    }
}

impl FromStr for Hotkey {
    type Err = ParseCommandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ctrl+b" => Ok(Self::Bold),
            "ctrl+i" => Ok(Self::Italic),
            "ctrl+u" => Ok(Self::Underline),
            "ctrl+enter" => Ok(Self::Paragraph),
            _ => Err(ParseCommandError::UnknownHotkey(s.to_owned())),
        }
    }
}

fn split_arg(input: &str) -> (&str, Option<&str>) {
    match input.split_once('|') {
        Some((cmd, arg)) => (cmd, Some(arg)),
        None => (input, None),
    }
}

fn parse_align(arg: &str) -> Option<Align> {
    match arg {
        "left" => Some(Align::Left),
        "center" => Some(Align::Center),
        "right" => Some(Align::Right),
        "justify" => Some(Align::Justify),
        _ => None,
    }
}

impl FromStr for Command {
    type Err = ParseCommandError;
    fn from_str(input: &str) -> Result<Command, ParseCommandError> {
        let (cmd, arg) = split_arg(input);
        let kind: CommandKind = cmd.trim().parse()?;
        let required = || arg.ok_or(ParseCommandError::MissingArg(kind));
        let invalid = |text: &str| ParseCommandError::InvalidArg(kind, text.to_owned());

        match kind {
            CommandKind::Bold => Ok(Command::Mark(Mark::Bold)),
            CommandKind::Italic => Ok(Command::Mark(Mark::Italic)),
            CommandKind::Underline => Ok(Command::Mark(Mark::Underline)),
            CommandKind::Code => Ok(Command::Code),
            CommandKind::Separator => Ok(Command::Separator),
            CommandKind::List => Ok(Command::List),
            CommandKind::Delete => Ok(Command::Delete),
            CommandKind::Paragraph => Ok(Command::Paragraph),
            CommandKind::Align => {
                let text = required()?;
                parse_align(text.trim())
                    .map(Command::Align)
                    .ok_or_else(|| invalid(text))
            }
            CommandKind::Heading => {
                let text = required()?;
                text.trim()
                    .parse()
                    .ok()
                    .and_then(HeadingLevel::new)
                    .map(Command::Heading)
                    .ok_or_else(|| invalid(text))
            }
            CommandKind::Link => {
                let (url, text) = split_arg(required()?);
                let url = url.trim();
                if !url.is_empty() && !validate_url(url) {
                    return Err(ParseCommandError::InvalidUrl(url.to_owned()));
                }
                Ok(Command::Link {
                    url: url.to_owned(),
                    text: text.unwrap_or_default().to_owned(),
                })
            }
            CommandKind::Select => {
                let text = match arg {
                    Some(text) => text,
                    None => return Ok(Command::SelectAll),
                };
                text.trim()
                    .parse()
                    .map(Command::Select)
                    .map_err(|_| invalid(text))
            }
            CommandKind::Cursor => {
                let text = required()?;
                text.trim()
                    .parse()
                    .map(Command::Cursor)
                    .map_err(|_| invalid(text))
            }
            CommandKind::Type => Ok(Command::Type(required()?.to_owned())),
            CommandKind::Key => Ok(Command::Key(required()?.parse()?)),
        }
    }
}

impl Hotkey {
    pub fn apply(self, editor: &mut Editor) -> Outcome {
        match self {
            Hotkey::Bold => editor.toggle_bold(),
            Hotkey::Italic => editor.toggle_italic(),
            Hotkey::Underline => editor.toggle_underline(),
            Hotkey::Paragraph => editor.insert_paragraph(),
        }
    }
}

impl Command {
    /// Run the command, only moving the selection can fail
    pub fn apply(&self, editor: &mut Editor) -> Result<Outcome, EditError> {
        let outcome = match self {
            Command::Mark(mark) => editor.toggle_mark(*mark),
            Command::Align(align) => editor.toggle_align(*align),
            Command::Heading(level) => editor.toggle_heading(*level),
            Command::Code => editor.toggle_code(),
            Command::Separator => editor.toggle_separator(),
            Command::List => editor.toggle_list(),
            Command::Link { url, text } => editor.toggle_link(text, url),
            Command::Select(range) => {
                editor.select(range.clone())?;
                Outcome::Applied
            }
            Command::SelectAll => {
                editor.select_all();
                Outcome::Applied
            }
            Command::Cursor(point) => {
                editor.set_cursor(point.clone())?;
                Outcome::Applied
            }
            Command::Type(text) => editor.insert_text(text),
            Command::Delete => editor.delete_selection(),
            Command::Paragraph => editor.insert_paragraph(),
            Command::Key(key) => key.apply(editor),
        };
        Ok(outcome)
    }
}
