//! Deduplicated warnings.
//!
//! Tokenizer and tree-builder problems are recoverable, and the same problem
//! tends to repeat across a page. Each distinct message is logged once through
//! `tracing` until [`clear_warnings`] is called.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Warnings already logged, keyed by `[component] message`.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

fn warned() -> MutexGuard<'static, Option<HashSet<String>>> {
    // A panic while holding the lock leaves the set intact, so keep using it.
    WARNED.lock().unwrap_or_else(PoisonError::into_inner)
}

fn key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Warn about a recoverable problem (logged once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("Tokenizer", "unexpected null character");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let should_log = warned()
        .get_or_insert_with(HashSet::new)
        .insert(key(component, message));

    if should_log {
        tracing::warn!(component, "{message}");
    }
}

/// Returns true if this exact warning has been logged since the last clear.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    warned()
        .as_ref()
        .is_some_and(|set| set.contains(&key(component, message)))
}

/// Forget all recorded warnings (call before loading a new document).
pub fn clear_warnings() {
    if let Some(set) = warned().as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_is_recorded() {
        warn_once("Test", "recorded once");
        warn_once("Test", "recorded once");
        assert!(was_warned("Test", "recorded once"));
        assert!(!was_warned("Other", "recorded once"));
    }
}
