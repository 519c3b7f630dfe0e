//! # folkabc
//!
//! Turns ABC start notation typed by a user into the token stream a folk-rnn
//! model is primed with, and checks it against the model's vocabulary.
//!
//! ## Modules
//! - `header` - Optional `L:`/`M:`/`K:` preamble
//! - `lexer` - Body text to raw tokens, collecting unrecognized characters
//! - `normalize` - Ordered rewrite rules for repeat and volta spellings
//! - `vocab` - Model vocabularies and the registry that holds them
//! - `report` - Validation results and user-facing messages
//! - `request` - Compose request payloads
//! - `layout` - Line breaking for streamed tunes
//!
//! All functions are pure; state such as the lexer's buffers or a tune's bar
//! count is owned by the caller or local to a call.

pub mod api;
pub mod error;
pub mod header;
pub mod layout;
pub mod lexer;
pub mod normalize;
pub mod report;
pub mod request;
pub mod vocab;

pub use api::*;
pub use error::*;
pub use header::{extract_header, Header, HeaderField, HeaderMatch};
pub use layout::{BarLayout, TuneText};
pub use lexer::{tokenize_body, Lexer, Tokenized};
pub use normalize::normalize;
pub use report::{mark_invalid, ValidationReport};
pub use request::{compose_request, ComposeRequest, ComposeSettings};
pub use vocab::{ModelEntry, Vocabulary, VocabularyRegistry};

/// Lex and normalize body text that carries no header.
///
/// Shorthand for [`tokenize_body`] followed by [`normalize`].
pub fn tokenize(body: &str) -> Tokenized {
    let raw = tokenize_body(body, 0);
    Tokenized {
        tokens: normalize(raw.tokens.as_slice()),
        invalid_indexes: raw.invalid_indexes,
    }
}
