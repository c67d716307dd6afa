//! Helper methods for the scanner.
//!
//! This module contains the utilities the state handlers lean on:
//! - Input handling (consume, one-character lookahead, bounded prefix
//!   matching for `<!--` and `<![CDATA[`)
//! - State transitions
//! - Diagnostic assembly

use super::machine::{ScanState, Scanner};
use crate::error::ScanError;

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl Scanner {
    /// Consume the next input character, or `None` at end of input.
    ///
    /// Raw CR/LF is handed to the state handlers as a single space,
    /// except inside text, attribute values and literal blocks, where
    /// the original characters must survive verbatim.
    pub(super) fn consume(&mut self) -> Option<char> {
        let ch = self.input[self.current_pos..].chars().next()?;
        self.current_char_pos = self.current_pos;
        self.current_pos += ch.len_utf8();
        if matches!(ch, '\r' | '\n') && self.folds_line_breaks() {
            return Some(' ');
        }
        Some(ch)
    }

    /// Whether the current state folds raw line breaks to spaces.
    pub(super) fn folds_line_breaks(&self) -> bool {
        !matches!(
            self.state,
            ScanState::Text | ScanState::AttributeValue | ScanState::Cdata
        )
    }

    /// Peek at the code point `offset` characters past the current
    /// position without consuming it.
    #[must_use]
    pub(super) fn peek(&self, offset: usize) -> Option<char> {
        self.input[self.current_pos..].chars().nth(offset)
    }

    /// Check whether the next few characters match `target` exactly.
    #[must_use]
    pub(super) fn next_few_characters_are(&self, target: &str) -> bool {
        for (offset, target_char) in target.chars().enumerate() {
            match self.peek(offset) {
                Some(input_char) if input_char == target_char => {}
                _ => return false,
            }
        }
        true
    }

    /// Consume `target` from the input. The caller must have verified
    /// the characters are present; the targets are all ASCII, so
    /// advancing by byte length is exact.
    pub(super) fn consume_string(&mut self, target: &str) {
        self.current_pos += target.len();
    }
}

// =============================================================================
// State Transition Helpers
// =============================================================================

impl Scanner {
    /// Transition to a new state, remembering the one being left for
    /// diagnostics.
    pub(super) fn switch_to(&mut self, new_state: ScanState) {
        self.previous_state = self.state;
        self.state = new_state;
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

impl Scanner {
    /// Assemble the full diagnostic bundle for a structural violation at
    /// the current character.
    pub(super) fn error_with_hint(&self, hint: &str) -> ScanError {
        let position = if self.current_input_character.is_some() {
            self.current_char_pos
        } else {
            self.input.len()
        };
        let parsed = self
            .document
            .as_ref()
            .map(|document| document.as_text(document.root()))
            .unwrap_or_default();
        let open_element = match (self.document.as_ref(), self.cursor) {
            (Some(document), Some(cursor)) => document.open_tag_text(cursor),
            _ => String::new(),
        };
        ScanError {
            position,
            current: self.current_input_character,
            next: self.peek(0),
            state: self.state,
            previous_state: self.previous_state,
            quote: self.quote,
            buffer: self.buffer.clone(),
            parsed,
            open_element,
            hint: hint.to_string(),
        }
    }
}
