//! # Public API
//!
//! This module contains the main entry points for the folkabc library.
//!
//! ## Functions
//!
//! - [`parse_abc()`] - Header extraction, lexing and normalization
//! - [`validate_start_abc()`] - Parse and check against one vocabulary
//! - [`validate_with_registry()`] - Same, looking the vocabulary up by model
//!
//! ## Pipeline
//! ```text
//! text ──extract_header──▶ header + body ──Lexer──▶ raw tokens + invalid offsets
//!                                                        │
//!                                  vocabulary check ◀──normalize
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use folkabc::{parse_abc, validate_start_abc, Vocabulary};
//!
//! let parsed = parse_abc("M:4/4\nK:Cmaj\n|: G2 AB :||: c2 d2 :|");
//! assert_eq!(parsed.header.m.as_deref(), Some("M:4/4"));
//! assert_eq!(parsed.start_abc(), "|: G 2 A B :| |: c 2 d 2 :|");
//!
//! let vocab = Vocabulary::from_tokens(["|:", ":|", "G", "A", "B", "c", "d", "2", "M:4/4", "K:Cmaj"], "4/4", "Cmaj");
//! let report = validate_start_abc("M:4/4\nK:Cmaj\n|: G2 AB :|", &vocab);
//! assert!(report.is_valid());
//! ```

use serde::Serialize;

use crate::error::AbcError;
use crate::header::{extract_header, Header};
use crate::lexer::tokenize_body;
use crate::normalize::normalize;
use crate::report::ValidationReport;
use crate::vocab::{Vocabulary, VocabularyRegistry};

/// A start notation split into header and canonical body tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedAbc {
    pub header: Header,
    /// Byte offset where the body begins
    pub body_start: usize,
    /// Normalized body tokens
    pub tokens: Vec<String>,
    /// Byte offsets (into the full text) of unrecognized characters
    pub invalid_indexes: Vec<usize>,
}

impl ParsedAbc {
    /// Tokens joined by single spaces: the `start_abc` sent with a request.
    pub fn start_abc(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Parse a start notation.
///
/// Never fails: unrecognized characters are reported in
/// [`ParsedAbc::invalid_indexes`].
///
/// # Example
/// ```rust
/// use folkabc::parse_abc;
///
/// let parsed = parse_abc("A::B");
/// assert_eq!(parsed.tokens, vec!["A", ":|", "|:", "B"]);
/// ```
pub fn parse_abc(abc: &str) -> ParsedAbc {
    let found = extract_header(abc);
    let raw = tokenize_body(&abc[found.body_start..], found.body_start);
    let tokens = normalize(raw.tokens.as_slice());
    log::debug!(
        "parsed {} bytes: {} raw tokens, {} tokens, {} invalid characters",
        abc.len(),
        raw.tokens.len(),
        tokens.len(),
        raw.invalid_indexes.len()
    );

    ParsedAbc {
        header: found.header,
        body_start: found.body_start,
        tokens,
        invalid_indexes: raw.invalid_indexes,
    }
}

/// Parse `abc` and check its tokens and header against `vocabulary`.
pub fn validate_start_abc(abc: &str, vocabulary: &Vocabulary) -> ValidationReport {
    let parsed = parse_abc(abc);
    let invalid_headers = vocabulary.invalid_headers(&parsed.header);
    let invalid_tokens = vocabulary.invalid_tokens(&parsed.tokens);
    ValidationReport {
        parsed,
        invalid_headers,
        invalid_tokens,
    }
}

/// Validate against the vocabulary of the model named `model`.
///
/// # Errors
/// Returns [`AbcError::UnknownVocabulary`] when the registry has no such model.
pub fn validate_with_registry(
    abc: &str,
    registry: &VocabularyRegistry,
    model: &str,
) -> Result<ValidationReport, AbcError> {
    let vocabulary = registry.get(model)?;
    Ok(validate_start_abc(abc, vocabulary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_header() {
        let parsed = parse_abc("ABC|");
        assert!(parsed.header.is_empty());
        assert_eq!(parsed.body_start, 0);
        assert_eq!(parsed.tokens, vec!["A", "B", "C", "|"]);
    }

    #[test]
    fn test_invalid_indexes_are_relative_to_full_text() {
        let abc = "M:4/4\nK:Cmaj\nA?B";
        let parsed = parse_abc(abc);
        assert_eq!(parsed.invalid_indexes, vec![14]);
        assert_eq!(&abc[14..15], "?");
    }

    #[test]
    fn test_validate_flags_missing_token() {
        let vocab = Vocabulary::from_tokens(["A", "B", "|"], "4/4", "Cmaj");
        let report = validate_start_abc("ABC|", &vocab);
        assert_eq!(report.invalid_tokens, vec!["C"]);
        assert!(!report.is_valid());
    }

    #[test]
    fn test_validate_with_unknown_model() {
        let registry = VocabularyRegistry::new();
        assert_eq!(
            validate_with_registry("ABC", &registry, "nope"),
            Err(AbcError::UnknownVocabulary("nope".to_string()))
        );
    }
}
