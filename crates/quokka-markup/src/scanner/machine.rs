use strum_macros::Display;

use quokka_common::warning::warn_once;
use quokka_escape::decode;
use quokka_tree::{Attribute, Document, NameError, NodeId, TreeError};

use crate::error::ScanError;

/// The scanner state machine. One state per kind of token being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ScanState {
    /// Outside any element, before the root has opened. Stray
    /// whitespace and text here are discarded.
    Outside,
    /// Inside a skipped `<?...?>` declaration or processing instruction.
    Prolog,
    /// Inside a `<!--...-->` comment. The state that was active before
    /// the comment resumes at `-->`.
    Comment,
    /// Inside a `<![CDATA[...]]>` literal block, copied verbatim.
    Cdata,
    /// Reading the name of a start tag.
    TagName,
    /// Reading the name of a closing tag.
    EndTagName,
    /// Inside a start tag, before an attribute name (or the closing
    /// `>` / `/>`).
    BeforeAttributeName,
    /// Reading an attribute name.
    AttributeName,
    /// Attribute name complete, expecting `=`.
    AfterAttributeName,
    /// After `=`, expecting the opening quote of the value.
    BeforeAttributeValue,
    /// Reading an attribute value; only the quote that opened it
    /// terminates it.
    AttributeValue,
    /// Reading text content of the open element.
    Text,
    /// The root element's closing tag has been fully consumed.
    Done,
}

/// Single-use scanner over one input string.
///
/// A scanner holds mutable scan state for exactly one call: construct,
/// [`run`](Self::run), done. `run` consumes the scanner, so an instance
/// cannot be shared across calls or reused after a failure.
pub struct Scanner {
    pub(super) state: ScanState,
    pub(super) previous_state: ScanState,
    // Set on entering a comment; the state to resume at `-->`.
    pub(super) return_state: Option<ScanState>,
    pub(super) input: String,
    pub(super) current_pos: usize,
    // Byte index of the character currently being handled.
    pub(super) current_char_pos: usize,
    pub(super) current_input_character: Option<char>,
    // Accumulates the token being read: a name, an attribute value, a
    // text run, or the body of a literal block.
    pub(super) buffer: String,
    // Completed attribute name, held until its value terminates.
    pub(super) attribute_name: String,
    // The quote character that opened the attribute value being read.
    pub(super) quote: Option<char>,
    pub(super) document: Option<Document>,
    // The element currently being extended.
    pub(super) cursor: Option<NodeId>,
}

impl Scanner {
    /// Create a scanner over the given input. The initial state expects
    /// the root element (or prolog/comments before it).
    #[must_use]
    pub fn new(input: String) -> Self {
        Scanner {
            state: ScanState::Outside,
            previous_state: ScanState::Outside,
            return_state: None,
            input,
            current_pos: 0,
            current_char_pos: 0,
            current_input_character: None,
            buffer: String::new(),
            attribute_name: String::new(),
            quote: None,
            document: None,
            cursor: None,
        }
    }

    /// Run the scan to completion and return the document.
    ///
    /// The loop ends when the root element's closing tag has been
    /// consumed; anything after it is ignored (with a warning if it is
    /// more than whitespace).
    ///
    /// # Errors
    ///
    /// Returns the full [`ScanError`] diagnostic on the first structural
    /// violation, including end of input with an element still open or
    /// with no root element at all.
    pub fn run(mut self) -> Result<Document, ScanError> {
        while self.state != ScanState::Done {
            self.current_input_character = self.consume();
            match self.state {
                ScanState::Outside => self.handle_outside_state()?,
                ScanState::Prolog => self.handle_prolog_state()?,
                ScanState::Comment => self.handle_comment_state()?,
                ScanState::Cdata => self.handle_cdata_state()?,
                ScanState::TagName => self.handle_tag_name_state()?,
                ScanState::EndTagName => self.handle_end_tag_name_state()?,
                ScanState::BeforeAttributeName => self.handle_before_attribute_name_state()?,
                ScanState::AttributeName => self.handle_attribute_name_state()?,
                ScanState::AfterAttributeName => self.handle_after_attribute_name_state()?,
                ScanState::BeforeAttributeValue => self.handle_before_attribute_value_state()?,
                ScanState::AttributeValue => self.handle_attribute_value_state()?,
                ScanState::Text => self.handle_text_state()?,
                ScanState::Done => {}
            }
        }
        if self.input[self.current_pos..].chars().any(|ch| !ch.is_whitespace()) {
            warn_once("Markup", "ignoring content after the root element's closing tag");
        }
        match self.document.take() {
            Some(document) => Ok(document),
            None => Err(self.error_with_hint("the input contains no root element")),
        }
    }

    // ------------------------------------------------------------------
    // State handlers
    // ------------------------------------------------------------------

    fn handle_outside_state(&mut self) -> Result<(), ScanError> {
        match self.current_input_character {
            Some('<') => {
                if self.next_few_characters_are("!--") {
                    self.enter_comment();
                    return Ok(());
                }
                if self.next_few_characters_are("![CDATA[") {
                    return Err(
                        self.error_with_hint("a literal block must appear inside an element")
                    );
                }
                match self.peek(0) {
                    Some('?') => {
                        self.consume_string("?");
                        self.switch_to(ScanState::Prolog);
                        Ok(())
                    }
                    Some('/') => {
                        Err(self.error_with_hint("closing tag before any element was opened"))
                    }
                    Some('!') => Err(self.error_with_hint("declarations are not supported")),
                    _ => {
                        self.buffer.clear();
                        self.switch_to(ScanState::TagName);
                        Ok(())
                    }
                }
            }
            Some('>') => Err(self.error_with_hint("`>` with no tag open")),
            Some(ch) => {
                // Stray top-level characters are discarded.
                if !ch.is_whitespace() {
                    warn_once("Markup", "ignoring stray text outside the root element");
                }
                Ok(())
            }
            None => Err(self.error_with_hint("the input contains no root element")),
        }
    }

    fn handle_prolog_state(&mut self) -> Result<(), ScanError> {
        match self.current_input_character {
            Some('?') if self.peek(0) == Some('>') => {
                self.consume_string(">");
                self.switch_to(ScanState::Outside);
                Ok(())
            }
            Some(_) => Ok(()),
            None => Err(self.error_with_hint("the declaration is never terminated; expected `?>`")),
        }
    }

    fn handle_comment_state(&mut self) -> Result<(), ScanError> {
        match self.current_input_character {
            Some('-') if self.next_few_characters_are("->") => {
                self.consume_string("->");
                let resume = self.return_state.take().unwrap_or(ScanState::Outside);
                self.switch_to(resume);
                Ok(())
            }
            // Comment bodies are skipped outright: no nesting, no
            // decoding, no tag detection.
            Some(_) => Ok(()),
            None => Err(self.error_with_hint("the comment is never terminated; expected `-->`")),
        }
    }

    fn handle_cdata_state(&mut self) -> Result<(), ScanError> {
        match self.current_input_character {
            Some(']') if self.next_few_characters_are("]>") => {
                self.consume_string("]>");
                let raw = std::mem::take(&mut self.buffer);
                self.append_to_cursor_value(&raw);
                self.switch_to(ScanState::Text);
                Ok(())
            }
            Some(ch) => {
                self.buffer.push(ch);
                Ok(())
            }
            None => {
                Err(self.error_with_hint("the literal block is never terminated; expected `]]>`"))
            }
        }
    }

    fn handle_tag_name_state(&mut self) -> Result<(), ScanError> {
        match self.current_input_character {
            Some('<') if self.next_few_characters_are("!--") => {
                self.enter_comment();
                Ok(())
            }
            Some(' ') => {
                self.open_element()?;
                self.switch_to(ScanState::BeforeAttributeName);
                Ok(())
            }
            Some('>') => {
                self.open_element()?;
                self.begin_text();
                Ok(())
            }
            Some('/') if self.peek(0) == Some('>') => {
                self.open_element()?;
                self.consume_string(">");
                self.close_current_element()
            }
            Some('/') => Err(self.error_with_hint("`/` is only allowed immediately before `>`")),
            Some('<') => Err(self.error_with_hint("`<` may not appear inside a tag")),
            Some('=') => Err(self.error_with_hint("`=` before the tag name is complete")),
            Some('"' | '\'') => Err(self.error_with_hint("a quote may not appear in a tag name")),
            Some(ch) => {
                self.buffer.push(ch);
                Ok(())
            }
            None => Err(self.error_with_hint("the document ends inside a tag")),
        }
    }

    fn handle_end_tag_name_state(&mut self) -> Result<(), ScanError> {
        match self.current_input_character {
            Some('<') if self.next_few_characters_are("!--") => {
                self.enter_comment();
                Ok(())
            }
            Some('>') => {
                let name = self.buffer.trim().to_string();
                let open_name = match (self.document.as_ref(), self.cursor) {
                    (Some(document), Some(cursor)) => document.name(cursor).to_string(),
                    _ => {
                        return Err(self.error_with_hint("closing tag with no open element"));
                    }
                };
                if name != open_name {
                    let hint = format!(
                        "closing tag `</{name}>` does not match the open element `<{open_name}>`"
                    );
                    return Err(self.error_with_hint(&hint));
                }
                self.buffer.clear();
                self.close_current_element()
            }
            Some('<') => Err(self.error_with_hint("`<` may not appear inside a closing tag")),
            Some(ch) => {
                self.buffer.push(ch);
                Ok(())
            }
            None => Err(self.error_with_hint("the document ends inside a closing tag")),
        }
    }

    fn handle_before_attribute_name_state(&mut self) -> Result<(), ScanError> {
        match self.current_input_character {
            Some('<') if self.next_few_characters_are("!--") => {
                self.enter_comment();
                Ok(())
            }
            Some(' ') => Ok(()),
            Some('>') => {
                self.begin_text();
                Ok(())
            }
            Some('/') if self.peek(0) == Some('>') => {
                self.consume_string(">");
                self.close_current_element()
            }
            Some('/') => Err(self.error_with_hint("`/` is only allowed immediately before `>`")),
            Some('=') => Err(self.error_with_hint("expected an attribute name before `=`")),
            Some('"' | '\'') => {
                Err(self.error_with_hint("expected an attribute name, found a quote"))
            }
            Some('<') => Err(self.error_with_hint("`<` may not appear inside a tag")),
            Some(ch) => {
                self.buffer.clear();
                self.buffer.push(ch);
                self.switch_to(ScanState::AttributeName);
                Ok(())
            }
            None => Err(self.error_with_hint("the document ends inside a tag")),
        }
    }

    fn handle_attribute_name_state(&mut self) -> Result<(), ScanError> {
        match self.current_input_character {
            Some(' ') => {
                self.attribute_name = std::mem::take(&mut self.buffer);
                self.switch_to(ScanState::AfterAttributeName);
                Ok(())
            }
            Some('=') => {
                self.attribute_name = std::mem::take(&mut self.buffer);
                self.switch_to(ScanState::BeforeAttributeValue);
                Ok(())
            }
            Some('>' | '/') => {
                let hint = format!("attribute `{}` has no value; expected `=`", self.buffer);
                Err(self.error_with_hint(&hint))
            }
            Some('<') => Err(self.error_with_hint("`<` may not appear in an attribute name")),
            Some('"' | '\'') => {
                Err(self.error_with_hint("a quote may not appear in an attribute name"))
            }
            Some(ch) => {
                self.buffer.push(ch);
                Ok(())
            }
            None => Err(self.error_with_hint("the document ends inside a tag")),
        }
    }

    fn handle_after_attribute_name_state(&mut self) -> Result<(), ScanError> {
        match self.current_input_character {
            Some(' ') => Ok(()),
            Some('=') => {
                self.switch_to(ScanState::BeforeAttributeValue);
                Ok(())
            }
            Some(_) | None => {
                let hint = format!("expected `=` after attribute name `{}`", self.attribute_name);
                Err(self.error_with_hint(&hint))
            }
        }
    }

    fn handle_before_attribute_value_state(&mut self) -> Result<(), ScanError> {
        match self.current_input_character {
            Some(' ') => Ok(()),
            Some(quote @ ('"' | '\'')) => {
                // The first quote after `=` fixes this value's quote
                // style; only the same character terminates it.
                self.quote = Some(quote);
                self.buffer.clear();
                self.switch_to(ScanState::AttributeValue);
                Ok(())
            }
            Some(_) | None => Err(self.error_with_hint("attribute values must be quoted")),
        }
    }

    fn handle_attribute_value_state(&mut self) -> Result<(), ScanError> {
        match self.current_input_character {
            Some(ch) if Some(ch) == self.quote => self.finish_attribute(),
            // Everything else is data, including the other quote
            // character, `<`, `>` and `=`.
            Some(ch) => {
                self.buffer.push(ch);
                Ok(())
            }
            None => Err(self.error_with_hint("the document ends inside a quoted attribute value")),
        }
    }

    fn handle_text_state(&mut self) -> Result<(), ScanError> {
        match self.current_input_character {
            Some('<') => {
                if self.next_few_characters_are("!--") {
                    self.enter_comment();
                    return Ok(());
                }
                if self.next_few_characters_are("![CDATA[") {
                    self.flush_text();
                    self.consume_string("![CDATA[");
                    self.switch_to(ScanState::Cdata);
                    return Ok(());
                }
                if self.peek(0) == Some('/') {
                    self.flush_text();
                    self.consume_string("/");
                    self.switch_to(ScanState::EndTagName);
                    return Ok(());
                }
                self.flush_text();
                self.switch_to(ScanState::TagName);
                Ok(())
            }
            Some(ch) => {
                self.buffer.push(ch);
                Ok(())
            }
            None => {
                let open = match (self.document.as_ref(), self.cursor) {
                    (Some(document), Some(cursor)) => document.name(cursor).to_string(),
                    _ => String::new(),
                };
                let hint = format!("the document ends while `<{open}>` is still open");
                Err(self.error_with_hint(&hint))
            }
        }
    }

    // ------------------------------------------------------------------
    // Tree building
    // ------------------------------------------------------------------

    /// Complete the name in the buffer and open it as an element: the
    /// root if none exists yet, a child of the cursor otherwise. The new
    /// element becomes the cursor.
    fn open_element(&mut self) -> Result<(), ScanError> {
        let name = std::mem::take(&mut self.buffer);
        let opened: Result<NodeId, NameError> = match self.document.take() {
            None => Document::with_root(&name).map(|document| {
                self.document = Some(document);
                NodeId::ROOT
            }),
            Some(mut document) => {
                let parent = self.cursor.unwrap_or(NodeId::ROOT);
                let result = document
                    .alloc(&name, "")
                    .map(|child| document.append_child(parent, child));
                self.document = Some(document);
                result
            }
        };
        match opened {
            Ok(id) => {
                self.cursor = Some(id);
                Ok(())
            }
            Err(err) => {
                let hint = format!("invalid element name: {err}");
                Err(self.error_with_hint(&hint))
            }
        }
    }

    /// Close the cursor element: pop to its parent and continue reading
    /// the parent's text, or finish the scan if the cursor was the root.
    fn close_current_element(&mut self) -> Result<(), ScanError> {
        let Some(cursor) = self.cursor else {
            return Err(self.error_with_hint("there is no open element to close"));
        };
        let parent = self.document.as_ref().and_then(|document| document.parent(cursor));
        match parent {
            Some(parent) => {
                self.cursor = Some(parent);
                self.begin_text();
            }
            None => {
                self.cursor = None;
                self.switch_to(ScanState::Done);
            }
        }
        Ok(())
    }

    /// Switch to reading text content of the cursor element.
    fn begin_text(&mut self) {
        self.buffer.clear();
        self.switch_to(ScanState::Text);
    }

    /// Complete the text run in the buffer: trim, decode, and append it
    /// to the cursor's value. Interior whitespace survives; only the
    /// run's edges are trimmed, and decoding happens after the trim so
    /// whitespace written as references is kept.
    fn flush_text(&mut self) {
        let raw = std::mem::take(&mut self.buffer);
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }
        let decoded = decode(trimmed);
        self.append_to_cursor_value(&decoded);
    }

    fn append_to_cursor_value(&mut self, segment: &str) {
        if segment.is_empty() {
            return;
        }
        if let (Some(document), Some(cursor)) = (self.document.as_mut(), self.cursor) {
            document.append_value(cursor, segment);
        }
    }

    /// Complete the attribute whose value just terminated and attach it
    /// to the cursor element.
    fn finish_attribute(&mut self) -> Result<(), ScanError> {
        let raw = std::mem::take(&mut self.buffer);
        let name = std::mem::take(&mut self.attribute_name);
        let value = decode(raw.trim());
        if self.document.is_none() || self.cursor.is_none() {
            return Err(self.error_with_hint("no element is open to receive this attribute"));
        }
        let cursor = self.cursor.unwrap_or(NodeId::ROOT);
        let attached: Result<(), TreeError> = match Attribute::new(&name, value) {
            Ok(attribute) => self
                .document
                .as_mut()
                .map_or(Ok(()), |document| document.append_attribute(cursor, attribute)),
            Err(err) => Err(TreeError::Name(err)),
        };
        match attached {
            Ok(()) => {
                self.quote = None;
                self.switch_to(ScanState::BeforeAttributeName);
                Ok(())
            }
            Err(err) => {
                let hint = format!("invalid attribute: {err}");
                Err(self.error_with_hint(&hint))
            }
        }
    }

    /// Enter a comment from the current state; the scan resumes in that
    /// state at `-->`. The token buffer survives untouched, so a comment
    /// splits nothing.
    fn enter_comment(&mut self) {
        self.consume_string("!--");
        self.return_state = Some(self.state);
        self.switch_to(ScanState::Comment);
    }
}
