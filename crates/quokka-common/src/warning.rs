//! Toolkit warnings with colored terminal output.
//!
//! Lenient operations (typed value coercion, reference fallback) succeed
//! with a default instead of failing; this module is how they leave a
//! trace. Messages are deduplicated so a conversion retried in a loop
//! prints once.

use std::collections::HashSet;
use std::sync::Mutex;

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Global set of warnings already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Report a lenient fallback (prints once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("Tree", "value `abc` is not an integer, using 0");
/// ```
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap()
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{YELLOW}[quokka {component}] ⚠ {message}{RESET}");
    }
}

/// Number of distinct warnings recorded since the last clear.
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
#[must_use]
pub fn warning_count() -> usize {
    WARNED
        .lock()
        .unwrap()
        .as_ref()
        .map_or(0, HashSet::len)
}

/// Clear all recorded warnings (call before processing a new document)
///
/// # Panics
/// Panics if the global warning set mutex is poisoned.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap();
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
