//! Common utilities for the quokka markup toolkit.
//!
//! This crate provides shared infrastructure used by the other components:
//! - **Warning System** - colored terminal output for lenient-mode fallbacks

pub mod warning;
