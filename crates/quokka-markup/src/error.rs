//! Error types for parsing and the load/save facade.
//!
//! A structural grammar violation produces a [`ScanError`]: a full
//! diagnostic bundle rather than a bare failure flag, because the caller
//! of a hand-edited configuration file needs to know *where* and *in
//! what context* the scan went wrong. The facade wraps it into
//! [`ParseError`]; file loading adds the transparent I/O variant in
//! [`LoadError`].

use core::fmt;

use thiserror::Error;

use crate::scanner::ScanState;

/// A structural grammar violation, with everything the scanner knew at
/// the offending character.
///
/// A failed parse discards all partial state — the serializations held
/// here are diagnostic snapshots, not a partial result.
#[derive(Debug, Clone)]
pub struct ScanError {
    /// Byte index of the offending character in the input.
    pub position: usize,
    /// The offending character; `None` at end of input.
    pub current: Option<char>,
    /// The character after the offending one, if any.
    pub next: Option<char>,
    /// State the scanner was in.
    pub state: ScanState,
    /// State the scanner was in before the current one.
    pub previous_state: ScanState,
    /// The quote character delimiting the attribute value being read,
    /// if any.
    pub quote: Option<char>,
    /// The partially accumulated token.
    pub buffer: String,
    /// Compact serialization of the furthest-completed subtree.
    pub parsed: String,
    /// Opening tag of the element that was open at the failure.
    pub open_element: String,
    /// Human-readable description of what went wrong.
    pub hint: String,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "markup error at index {}: {}", self.position, self.hint)?;
        write!(f, "  state: {} (previous: {})", self.state, self.previous_state)?;
        match self.current {
            Some(ch) => write!(f, "\n  current character: {}", printable(ch))?,
            None => write!(f, "\n  current character: end of input")?,
        }
        if let Some(ch) = self.next {
            write!(f, "\n  next character: {}", printable(ch))?;
        }
        if let Some(quote) = self.quote {
            write!(f, "\n  active quote: `{quote}`")?;
        }
        if !self.buffer.is_empty() {
            write!(f, "\n  partial token: `{}`", self.buffer)?;
        }
        if !self.open_element.is_empty() {
            write!(f, "\n  open element: {}", self.open_element)?;
        }
        if !self.parsed.is_empty() {
            write!(f, "\n  parsed so far: {}", self.parsed)?;
        }
        Ok(())
    }
}

impl std::error::Error for ScanError {}

/// Render a character for the diagnostic, spelling out the ones that
/// would vanish in terminal output.
fn printable(ch: char) -> String {
    match ch {
        '\n' => "`\\n`".to_string(),
        '\r' => "`\\r`".to_string(),
        '\t' => "`\\t`".to_string(),
        ' ' => "space".to_string(),
        other => format!("`{other}`"),
    }
}

/// A parse failure as reported by the facade.
///
/// Displays as the full scanner diagnostic; use [`ParseError::details`]
/// for the structured fields.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ParseError(#[from] ScanError);

impl ParseError {
    /// The underlying diagnostic bundle.
    #[must_use]
    pub fn details(&self) -> &ScanError {
        &self.0
    }
}

/// A failure while loading a document from disk.
///
/// I/O errors pass through unchanged from the underlying file read; they
/// are not wrapped in the parser's own error shape.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The file was read but did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
