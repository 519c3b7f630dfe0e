//! # Validation Reports
//!
//! A [`ValidationReport`] collects everything that keeps a start notation
//! from being submitted to a model:
//! - characters the lexer could not classify (by byte offset)
//! - header values the model does not declare
//! - tokens outside the model's vocabulary
//!
//! None of these stop processing. The report also renders the message shown
//! next to the input field, see [`ValidationReport::message`].

use serde::Serialize;

use crate::api::ParsedAbc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub parsed: ParsedAbc,
    pub invalid_headers: Vec<String>,
    pub invalid_tokens: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.parsed.invalid_indexes.is_empty()
            && self.invalid_headers.is_empty()
            && self.invalid_tokens.is_empty()
    }

    /// Invalid header values followed by invalid tokens.
    pub fn invalid_items(&self) -> Vec<&str> {
        self.invalid_headers
            .iter()
            .chain(self.invalid_tokens.iter())
            .map(String::as_str)
            .collect()
    }

    /// User-facing message for `source`, the text this report was built from.
    ///
    /// Invalid tokens and headers take precedence over invalid characters:
    /// - `Invalid token: X` for exactly one invalid item
    /// - `Invalid tokens: X, Y` for several
    /// - `Invalid: ` followed by [`mark_invalid`] output when only characters
    ///   are invalid
    ///
    /// Returns `None` for a valid report.
    pub fn message(&self, source: &str) -> Option<String> {
        let items = self.invalid_items();
        match items.len() {
            0 if self.parsed.invalid_indexes.is_empty() => None,
            0 => Some(format!(
                "Invalid: {}",
                mark_invalid(source, &self.parsed.invalid_indexes)
            )),
            1 => Some(format!("Invalid token: {}", items[0])),
            _ => Some(format!("Invalid tokens: {}", items.join(", "))),
        }
    }

    /// Header meter that should replace the meter selection, if any.
    ///
    /// Only a header whose values are all valid locks a selection.
    pub fn locked_meter(&self) -> Option<&str> {
        if self.invalid_headers.is_empty() {
            self.parsed.header.m.as_deref()
        } else {
            None
        }
    }

    /// Header key that should replace the key selection, if any.
    pub fn locked_key(&self) -> Option<&str> {
        if self.invalid_headers.is_empty() {
            self.parsed.header.k.as_deref()
        } else {
            None
        }
    }
}

/// Wrap each character at `invalid_indexes` in `" >"` and `"< "`.
///
/// Offsets that are out of range, not ascending, or not on a character
/// boundary are skipped.
///
/// # Example
/// ```
/// use folkabc::mark_invalid;
///
/// assert_eq!(mark_invalid("AB?C", &[2]), "AB >?< C");
/// ```
pub fn mark_invalid(source: &str, invalid_indexes: &[usize]) -> String {
    let mut marked = String::with_capacity(source.len() + invalid_indexes.len() * 4);
    let mut pos = 0;
    for &index in invalid_indexes {
        let (Some(before), Some(c)) = (
            source.get(pos..index),
            source.get(index..).and_then(|rest| rest.chars().next()),
        ) else {
            log::warn!("skipping invalid index {} outside of {:?}", index, source);
            continue;
        };
        marked.push_str(before);
        marked.push_str(" >");
        marked.push(c);
        marked.push_str("< ");
        pos = index + c.len_utf8();
    }
    marked.push_str(&source[pos..]);
    marked
}
