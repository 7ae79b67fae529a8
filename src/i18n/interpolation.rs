//! `%{name}` interpolation placeholders.
//!
//! Override text must keep exactly the placeholder set of the default it
//! replaces. A renamed, dropped, or invented placeholder would break
//! rendering at send time, so edits are checked here before anything is
//! written.

use std::collections::BTreeSet;

use thiserror::Error;

/// The placeholder sets of an edited text and its default differ.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid interpolation keys: {}", joined_keys(.missing, .unexpected))]
pub struct PlaceholderMismatch {
    /// Placeholders in the default that the edited text lost.
    pub missing: Vec<String>,

    /// Placeholders in the edited text that the default does not have.
    pub unexpected: Vec<String>,
}

fn joined_keys(missing: &[String], unexpected: &[String]) -> String {
    let mut keys: Vec<&str> = missing.iter().chain(unexpected).map(String::as_str).collect();
    keys.sort_unstable();
    keys.join(", ")
}

/// Extract the set of `%{name}` placeholders from a text.
///
/// A placeholder name is one or more ASCII alphanumerics or underscores,
/// closed by `}`. Anything else after `%{` is treated as literal text.
pub fn placeholders(text: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let bytes = text.as_bytes();

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 1 < bytes.len() && bytes[i + 1] == b'{' {
            let start = i + 2;
            let mut end = start;
            while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
                end += 1;
            }
            if end > start && end < bytes.len() && bytes[end] == b'}' {
                // The scanned range is pure ASCII, so slicing is safe.
                names.insert(text[start..end].to_string());
                i = end + 1;
                continue;
            }
        }
        i += 1;
    }

    names
}

/// Check that `candidate` carries exactly the placeholders of `reference`.
pub fn check_placeholders(reference: &str, candidate: &str) -> Result<(), PlaceholderMismatch> {
    let expected = placeholders(reference);
    let found = placeholders(candidate);

    if expected == found {
        return Ok(());
    }

    Err(PlaceholderMismatch {
        missing: expected.difference(&found).cloned().collect(),
        unexpected: found.difference(&expected).cloned().collect(),
    })
}
