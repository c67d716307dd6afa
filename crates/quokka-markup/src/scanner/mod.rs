//! Single-pass markup scanner.
//!
//! The scanner walks the input once, character by character with
//! one-character lookahead, and builds the document tree directly as
//! tags open and close. There is no intermediate token stream: the
//! element currently being extended (the cursor) lives in the tree from
//! the moment its name completes.

/// Helper methods for input handling and state transitions.
mod helpers;
/// The state machine implementation.
mod machine;

pub use machine::{ScanState, Scanner};
