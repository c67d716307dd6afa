//! Permissive markup parsing for the quokka toolkit.
//!
//! # Scope
//!
//! This crate implements:
//! - **Scanner** - a single-pass, character-driven state machine with
//!   one-character lookahead that turns raw text into a
//!   [`Document`] tree or a structured diagnostic
//!   - elements, attributes in single or double quotes, nesting, text
//!   - comments and `<![CDATA[...]]>` literal blocks
//!   - a skipped `<?...?>` declaration/processing-instruction line
//! - **Facade** - [`parse`], [`load`] and [`save`] convenience entry
//!   points
//!
//! # Not Supported
//!
//! - Schema or DTD validation
//! - Namespaces
//! - Streaming/event-based parsing (one in-memory tree per call)
//! - External entity declarations; only the five named references and
//!   numeric character references are understood
//!
//! # Example
//!
//! ```
//! let document = quokka_markup::parse("<config retries=\"3\"><host>db1</host></config>")
//!     .expect("well-formed input");
//! let root = document.root();
//! assert_eq!(document.attribute(root, "retries"), Some("3"));
//! let host = document.child_by_name(root, "host").expect("host element");
//! assert_eq!(document.value(host), "db1");
//! ```

use std::fs;
use std::io;
use std::path::Path;

/// Error types for parsing and loading.
pub mod error;
/// The scanner state machine.
pub mod scanner;

pub use error::{LoadError, ParseError, ScanError};
pub use scanner::{ScanState, Scanner};

pub use quokka_tree::{Attribute, Document, NodeId};

/// Parse markup text into a document tree.
///
/// Every outcome is a tagged success or failure; malformed input never
/// panics, and a failed parse never yields a partial tree.
///
/// # Errors
///
/// Returns a [`ParseError`] whose display text is the scanner's full
/// diagnostic.
pub fn parse(text: &str) -> Result<Document, ParseError> {
    Scanner::new(text.to_string()).run().map_err(ParseError::from)
}

/// Read the complete file at `path` into memory, then parse it.
///
/// # Errors
///
/// I/O failures (missing file, permission denied) propagate unchanged as
/// [`LoadError::Io`]; parse failures carry the diagnostic as
/// [`LoadError::Parse`].
pub fn load(path: impl AsRef<Path>) -> Result<Document, LoadError> {
    let text = fs::read_to_string(path)?;
    Ok(parse(&text)?)
}

/// Serialize the document in compact form and overwrite the file at
/// `path` with it.
///
/// No atomic-replace or backup semantics: concurrent writers to the same
/// path are not coordinated, and the last one wins.
///
/// # Errors
///
/// Returns the underlying I/O error unchanged.
pub fn save(path: impl AsRef<Path>, document: &Document) -> io::Result<()> {
    fs::write(path, document.as_text(document.root()))
}
