//! # HTML codec
//!
//! Journal entries are persisted (and rendered to PDF) as a single HTML string.
//! [`serialize_fragment`] turns a document into that string and [`deserialize`]
//! reads it back. Empty paragraphs, headings and code blocks are stored as a
//! bare `<br />`, which always reads back as an empty paragraph.
mod de;
mod ser;

pub use de::{deserialize, deserialize_node};
pub use ser::{escape_html, serialize, serialize_fragment};
