//! # Error Types
//!
//! This module defines the error type for the folkabc library.
//!
//! Most problems with user-entered notation are *not* errors: unrecognized
//! characters, out-of-vocabulary tokens and unknown header values are reported
//! as data in a [`ValidationReport`](crate::ValidationReport) so the caller can
//! highlight them while the user keeps typing. `AbcError` is reserved for
//! conditions the caller has to fix in code or configuration.
//!
//! ## Error Types
//! - `UnknownVocabulary` - A model identifier that is not in the registry
//! - `RegistryError` - A registry document that could not be loaded
//! - `RequestError` - A compose request that cannot be assembled
//!
//! ## Usage
//! ```rust
//! use folkabc::{validate_with_registry, AbcError, VocabularyRegistry};
//!
//! let registry = VocabularyRegistry::from_yaml("models: []").unwrap();
//! match validate_with_registry("ABC|", &registry, "missing.pickle") {
//!     Ok(report) => println!("valid: {}", report.is_valid()),
//!     Err(AbcError::UnknownVocabulary(model)) => eprintln!("No model named {}", model),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AbcError {
    /// The requested model is not declared by the registry.
    ///
    /// # Example
    /// ```
    /// # use folkabc::AbcError;
    /// let err = AbcError::UnknownVocabulary("test_model.pickle".to_string());
    /// assert_eq!(err.to_string(), "Unknown vocabulary: no model named 'test_model.pickle'");
    /// ```
    #[error("Unknown vocabulary: no model named '{0}'")]
    UnknownVocabulary(String),

    /// A registry document failed to deserialize or declares an unusable model.
    ///
    /// # Example
    /// ```
    /// # use folkabc::AbcError;
    /// let err = AbcError::RegistryError("models: invalid type".to_string());
    /// assert_eq!(err.to_string(), "Invalid vocabulary registry: models: invalid type");
    /// ```
    #[error("Invalid vocabulary registry: {0}")]
    RegistryError(String),

    /// A compose request is missing a field that neither the header, the
    /// settings nor the model defaults could supply.
    #[error("Cannot build compose request: {0}")]
    RequestError(String),
}
