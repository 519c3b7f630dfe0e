//! Model vocabularies shipped with folkabc.
//!
//! Every `models/*.yaml` file is embedded at build time. The documents are
//! merged in file name order into one registry; the first model of the first
//! document is the default model.

use folkabc::{AbcError, VocabularyRegistry};

include!(concat!(env!("OUT_DIR"), "/models.rs"));

/// Names of the embedded registry documents
pub fn list_documents() -> Vec<&'static str> {
    REGISTRY_DOCUMENTS.iter().map(|(name, _)| *name).collect()
}

/// Get an embedded registry document by name
pub fn get_document(name: &str) -> Option<&'static str> {
    REGISTRY_DOCUMENTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, content)| *content)
}

/// Registry holding every embedded model.
///
/// # Errors
/// Returns [`AbcError::RegistryError`] naming the document that failed to load.
pub fn builtin_registry() -> Result<VocabularyRegistry, AbcError> {
    let mut registry = VocabularyRegistry::new();
    for (name, content) in REGISTRY_DOCUMENTS {
        let document = VocabularyRegistry::from_yaml(content)
            .map_err(|e| AbcError::RegistryError(format!("{}: {}", name, e)))?;
        log::debug!("embedded registry {} declares {} models", name, document.len());
        registry.extend(document);
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_is_embedded() {
        assert!(list_documents().contains(&"default.yaml"));
        assert!(get_document("default.yaml").is_some());
        assert!(get_document("missing.yaml").is_none());
    }

    #[test]
    fn test_builtin_registry_loads() {
        let registry = builtin_registry().unwrap();
        let default = registry.default_model().unwrap();
        assert_eq!(default.file_name, "test_model.pickle");
        assert_eq!(default.display_name, "default");

        let vocab = &default.vocabulary;
        assert_eq!(vocab.default_meter_header(), "M:4/4");
        assert_eq!(vocab.default_key_header(), "K:Cmaj");
        assert!(vocab.header_m_tokens.contains("M:6/8"));
        assert!(vocab.header_k_tokens.contains("K:Cdor"));
        assert!(vocab.contains_token("|:"));
        assert!(vocab.contains_token("=A,"));
        assert!(!vocab.contains_token("M:4/4"));
    }

    #[test]
    fn test_builtin_registry_validates_start_notation() {
        let registry = builtin_registry().unwrap();
        let report =
            folkabc::validate_with_registry("M:6/8\nK:Cmix\n|: A>B c2 :|", &registry, "test_model.pickle")
                .unwrap();
        assert!(report.is_valid(), "{:?}", report);
    }
}
