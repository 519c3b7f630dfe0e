//! # Model Vocabularies
//!
//! Every folk-rnn model is trained on a fixed token set. Start notation is only
//! usable as priming input when each of its tokens, and each of its header
//! values, belongs to the selected model's vocabulary.
//!
//! ## Registry documents
//! Vocabularies are declared in YAML and collected in a [`VocabularyRegistry`]
//! keyed by model file name:
//!
//! ```yaml
//! models:
//!   - display_name: default
//!     file_name: test_model.pickle
//!     default_meter: 4/4
//!     default_mode: Cmaj
//!     tokens: ["A", "B", "|", "M:4/4", "K:Cmaj"]
//! ```
//!
//! Tokens prefixed `L:`, `M:` or `K:` are header values; they are moved to
//! the corresponding header set, which the optional `header_l_tokens`,
//! `header_m_tokens` and `header_k_tokens` lists extend.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::AbcError;
use crate::header::{Header, HeaderField};

/// The token set of one model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    pub tokens: BTreeSet<String>,
    pub header_l_tokens: BTreeSet<String>,
    pub header_m_tokens: BTreeSet<String>,
    pub header_k_tokens: BTreeSet<String>,
    /// Meter without its prefix, e.g. `4/4`
    pub default_meter: String,
    /// Key and mode without its prefix, e.g. `Cmaj`
    pub default_mode: String,
}

impl Vocabulary {
    /// Build a vocabulary from a flat token list, sorting header values into
    /// their sets by prefix.
    pub fn from_tokens<I, S>(tokens: I, default_meter: &str, default_mode: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = Vocabulary {
            default_meter: default_meter.to_string(),
            default_mode: default_mode.to_string(),
            ..Default::default()
        };
        for token in tokens {
            vocabulary.insert(token.into());
        }
        vocabulary
    }

    fn insert(&mut self, token: String) {
        let set = if token.starts_with(HeaderField::UnitNoteLength.prefix()) {
            &mut self.header_l_tokens
        } else if token.starts_with(HeaderField::Meter.prefix()) {
            &mut self.header_m_tokens
        } else if token.starts_with(HeaderField::Key.prefix()) {
            &mut self.header_k_tokens
        } else {
            &mut self.tokens
        };
        set.insert(token);
    }

    pub fn header_tokens(&self, field: HeaderField) -> &BTreeSet<String> {
        match field {
            HeaderField::UnitNoteLength => &self.header_l_tokens,
            HeaderField::Meter => &self.header_m_tokens,
            HeaderField::Key => &self.header_k_tokens,
        }
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Tokens that are not in the vocabulary, in input order.
    ///
    /// Duplicates are kept; empty strings are skipped.
    pub fn invalid_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        tokens
            .iter()
            .map(|t| t.as_ref())
            .filter(|t| !t.is_empty() && !self.contains_token(t))
            .map(str::to_string)
            .collect()
    }

    /// Present header values that are not in their header set, in L, M, K order.
    pub fn invalid_headers(&self, header: &Header) -> Vec<String> {
        header
            .fields()
            .filter(|(field, value)| !self.header_tokens(*field).contains(*value))
            .map(|(_, value)| value.to_string())
            .collect()
    }

    /// Default meter as a header value (`M:4/4`).
    pub fn default_meter_header(&self) -> String {
        format!("{}{}", HeaderField::Meter.prefix(), self.default_meter)
    }

    /// Default key as a header value (`K:Cmaj`).
    pub fn default_key_header(&self) -> String {
        format!("{}{}", HeaderField::Key.prefix(), self.default_mode)
    }
}

/// A model declared by a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelEntry {
    /// Identifier used to select the model
    pub file_name: String,
    pub display_name: String,
    pub vocabulary: Vocabulary,
}

/// Raw registry document for YAML deserialization
#[derive(Deserialize, Debug, Default)]
struct RawRegistry {
    #[serde(default)]
    models: Vec<RawModel>,
}

#[derive(Deserialize, Debug)]
struct RawModel {
    file_name: String,
    display_name: Option<String>,
    default_meter: String,
    default_mode: String,
    tokens: Vec<String>,
    #[serde(default)]
    header_l_tokens: Vec<String>,
    #[serde(default)]
    header_m_tokens: Vec<String>,
    #[serde(default)]
    header_k_tokens: Vec<String>,
}

impl RawModel {
    fn into_entry(self) -> ModelEntry {
        let mut vocabulary = Vocabulary::from_tokens(self.tokens, &self.default_meter, &self.default_mode);
        vocabulary.header_l_tokens.extend(self.header_l_tokens);
        vocabulary.header_m_tokens.extend(self.header_m_tokens);
        vocabulary.header_k_tokens.extend(self.header_k_tokens);
        ModelEntry {
            display_name: self.display_name.unwrap_or_else(|| self.file_name.clone()),
            file_name: self.file_name,
            vocabulary,
        }
    }
}

/// Model vocabularies keyed by model file name, in declaration order.
///
/// The first model registered is the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VocabularyRegistry {
    models: Vec<ModelEntry>,
}

impl VocabularyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry document.
    ///
    /// # Errors
    /// Returns [`AbcError::RegistryError`] for malformed YAML, a model without
    /// a file name, or a file name declared twice.
    pub fn from_yaml(source: &str) -> Result<Self, AbcError> {
        let raw: RawRegistry =
            serde_yaml::from_str(source).map_err(|e| AbcError::RegistryError(e.to_string()))?;

        let mut registry = Self::new();
        for model in raw.models {
            if model.file_name.trim().is_empty() {
                return Err(AbcError::RegistryError("model without a file_name".to_string()));
            }
            if registry.model(&model.file_name).is_some() {
                return Err(AbcError::RegistryError(format!(
                    "model '{}' is declared more than once",
                    model.file_name
                )));
            }
            registry.models.push(model.into_entry());
        }
        log::debug!("loaded vocabulary registry with {} models", registry.models.len());
        Ok(registry)
    }

    /// Add a model, replacing any model with the same file name.
    pub fn register(&mut self, entry: ModelEntry) {
        match self.models.iter_mut().find(|m| m.file_name == entry.file_name) {
            Some(existing) => *existing = entry,
            None => self.models.push(entry),
        }
    }

    /// Add every model of `other`, replacing models with the same file name.
    pub fn extend(&mut self, other: VocabularyRegistry) {
        for entry in other.models {
            self.register(entry);
        }
    }

    pub fn model(&self, file_name: &str) -> Option<&ModelEntry> {
        self.models.iter().find(|m| m.file_name == file_name)
    }

    /// Look up a model's vocabulary.
    ///
    /// # Errors
    /// Returns [`AbcError::UnknownVocabulary`] when no model has this file name.
    pub fn get(&self, file_name: &str) -> Result<&Vocabulary, AbcError> {
        self.model(file_name)
            .map(|m| &m.vocabulary)
            .ok_or_else(|| AbcError::UnknownVocabulary(file_name.to_string()))
    }

    pub fn default_model(&self) -> Option<&ModelEntry> {
        self.models.first()
    }

    /// `(file_name, display_name)` pairs in declaration order.
    pub fn choices(&self) -> impl Iterator<Item = (&str, &str)> {
        self.models
            .iter()
            .map(|m| (m.file_name.as_str(), m.display_name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
