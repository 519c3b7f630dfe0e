//! # Compose Requests
//!
//! Turns a validated start notation plus the user's selections into the
//! payload of a generation request.
//!
//! ## Field precedence
//! - `meter`: header `M:` value, else the selected meter, else the model's
//!   default meter
//! - `key`: header `K:` value, else the selected key, else the model's
//!   default mode
//! - `unitnotelength`: header `L:` value, else empty
//! - `start_abc`: the canonical tokens joined by single spaces
//!
//! A request is only built for input that passes validation; anything else is
//! an [`AbcError::RequestError`].

use serde::{Deserialize, Serialize};

use crate::api::validate_start_abc;
use crate::error::AbcError;
use crate::report::ValidationReport;
use crate::vocab::{Vocabulary, VocabularyRegistry};

/// Selections made next to the start notation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ComposeSettings {
    pub model: String,
    pub temp: f64,
    pub seed: u64,
    /// Selected meter header value, e.g. `M:6/8`
    #[serde(default)]
    pub meter: Option<String>,
    /// Selected key header value, e.g. `K:Cdor`
    #[serde(default)]
    pub key: Option<String>,
}

/// Payload of a `compose` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposeRequest {
    pub model: String,
    pub temp: f64,
    pub seed: u64,
    pub unitnotelength: String,
    pub meter: String,
    pub key: String,
    pub start_abc: String,
}

fn pick(header: Option<&str>, selected: Option<&str>, default: String) -> String {
    header
        .or(selected.filter(|s| !s.trim().is_empty()))
        .map(str::to_string)
        .unwrap_or(default)
}

impl ComposeRequest {
    /// Build a request from a validation report.
    ///
    /// # Errors
    /// Returns [`AbcError::RequestError`] when the report is not valid or when
    /// no meter or key can be determined.
    pub fn from_report(
        report: &ValidationReport,
        settings: &ComposeSettings,
        vocabulary: &Vocabulary,
    ) -> Result<Self, AbcError> {
        if !report.is_valid() {
            let reason = if report.invalid_items().is_empty() {
                format!(
                    "{} unrecognized characters in start notation",
                    report.parsed.invalid_indexes.len()
                )
            } else {
                format!("invalid tokens: {}", report.invalid_items().join(", "))
            };
            return Err(AbcError::RequestError(reason));
        }

        let header = &report.parsed.header;
        let default_meter = if vocabulary.default_meter.is_empty() {
            String::new()
        } else {
            vocabulary.default_meter_header()
        };
        let default_key = if vocabulary.default_mode.is_empty() {
            String::new()
        } else {
            vocabulary.default_key_header()
        };
        let meter = pick(header.m.as_deref(), settings.meter.as_deref(), default_meter);
        let key = pick(header.k.as_deref(), settings.key.as_deref(), default_key);
        if meter.is_empty() {
            return Err(AbcError::RequestError("no meter selected and model has no default".to_string()));
        }
        if key.is_empty() {
            return Err(AbcError::RequestError("no key selected and model has no default".to_string()));
        }

        Ok(ComposeRequest {
            model: settings.model.clone(),
            temp: settings.temp,
            seed: settings.seed,
            unitnotelength: header.l.clone().unwrap_or_default(),
            meter,
            key,
            start_abc: report.parsed.start_abc(),
        })
    }

    /// Tokens the model is primed with: meter, key, then the start notation.
    pub fn prime_tokens(&self) -> String {
        if self.start_abc.is_empty() {
            format!("{} {}", self.meter, self.key)
        } else {
            format!("{} {} {}", self.meter, self.key, self.start_abc)
        }
    }
}

/// Validate `abc` against the model chosen in `settings` and build a request.
///
/// # Example
/// ```rust
/// use folkabc::{compose_request, ComposeSettings, VocabularyRegistry};
///
/// let registry = VocabularyRegistry::from_yaml(r#"
/// models:
///   - file_name: test_model.pickle
///     default_meter: 4/4
///     default_mode: Cmaj
///     tokens: ["A", "B", "|", "M:4/4", "M:6/8", "K:Cmaj"]
/// "#)?;
/// let settings = ComposeSettings {
///     model: "test_model.pickle".to_string(),
///     temp: 1.0,
///     seed: 42,
///     meter: Some("M:6/8".to_string()),
///     key: None,
/// };
/// let request = compose_request("AB|", &settings, &registry)?;
/// assert_eq!(request.prime_tokens(), "M:6/8 K:Cmaj A B |");
/// # Ok::<(), folkabc::AbcError>(())
/// ```
///
/// # Errors
/// [`AbcError::UnknownVocabulary`] for an unknown model, otherwise as
/// [`ComposeRequest::from_report`].
pub fn compose_request(
    abc: &str,
    settings: &ComposeSettings,
    registry: &VocabularyRegistry,
) -> Result<ComposeRequest, AbcError> {
    let vocabulary = registry.get(&settings.model)?;
    let report = validate_start_abc(abc, vocabulary);
    ComposeRequest::from_report(&report, settings, vocabulary)
}
