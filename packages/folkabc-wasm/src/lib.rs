use folkabc::{AbcError, ComposeSettings, TuneText, VocabularyRegistry};
use once_cell::sync::Lazy;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct BindingError {
    message: String,
    kind: &'static str,
}

#[derive(Serialize)]
struct Validation<'a> {
    valid: bool,
    message: Option<String>,
    locked_meter: Option<&'a str>,
    locked_key: Option<&'a str>,
    report: &'a folkabc::ValidationReport,
}

#[derive(Serialize)]
struct ModelChoice<'a> {
    file_name: &'a str,
    display_name: &'a str,
    default_meter: String,
    default_key: String,
    header_m_tokens: Vec<&'a str>,
    header_k_tokens: Vec<&'a str>,
}

static BUILTIN: Lazy<Result<VocabularyRegistry, AbcError>> = Lazy::new(folkabc_models::builtin_registry);

/// Route the library's `log` records to the browser console.
#[wasm_bindgen(start)]
pub fn start() {
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("folkabc WASM module initialized");
    }
}

fn error_to_js(e: &AbcError) -> JsValue {
    let kind = match e {
        AbcError::UnknownVocabulary(_) => "unknown_vocabulary",
        AbcError::RegistryError(_) => "registry",
        AbcError::RequestError(_) => "request",
    };
    let error = BindingError {
        message: e.to_string(),
        kind,
    };
    JsValue::from_str(&serde_json::to_string(&error).unwrap_or_else(|_| e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn builtin() -> Result<&'static VocabularyRegistry, JsValue> {
    BUILTIN.as_ref().map_err(error_to_js)
}

/// Resolve `model`, falling back to the registry's default model.
fn resolve_model<'r>(registry: &'r VocabularyRegistry, model: Option<&'r str>) -> Result<&'r str, JsValue> {
    match model.filter(|m| !m.is_empty()) {
        Some(model) => Ok(model),
        None => registry
            .default_model()
            .map(|m| m.file_name.as_str())
            .ok_or_else(|| error_to_js(&AbcError::UnknownVocabulary(String::new()))),
    }
}

fn validate_in(registry: &VocabularyRegistry, source: &str, model: Option<&str>) -> Result<String, JsValue> {
    let model = resolve_model(registry, model)?;
    let report = folkabc::validate_with_registry(source, registry, model).map_err(|e| error_to_js(&e))?;
    to_json(&Validation {
        valid: report.is_valid(),
        message: report.message(source),
        locked_meter: report.locked_meter(),
        locked_key: report.locked_key(),
        report: &report,
    })
}

/// Parse start notation: header, tokens and invalid character offsets as JSON
#[wasm_bindgen]
pub fn parse_abc(source: &str) -> Result<String, JsValue> {
    to_json(&folkabc::parse_abc(source))
}

/// Validate start notation against a built-in model (the default model when `model` is empty)
#[wasm_bindgen]
pub fn validate_start_abc(source: &str, model: Option<String>) -> Result<String, JsValue> {
    validate_in(builtin()?, source, model.as_deref())
}

/// Validate start notation against a model from a caller-supplied registry document
#[wasm_bindgen]
pub fn validate_with_registry(source: &str, registry_yaml: &str, model: Option<String>) -> Result<String, JsValue> {
    let registry = VocabularyRegistry::from_yaml(registry_yaml).map_err(|e| error_to_js(&e))?;
    validate_in(&registry, source, model.as_deref())
}

/// Build a compose request from start notation and JSON-encoded settings
#[wasm_bindgen]
pub fn compose_request(source: &str, settings_json: &str) -> Result<String, JsValue> {
    let settings: ComposeSettings =
        serde_json::from_str(settings_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let request = folkabc::compose_request(source, &settings, builtin()?).map_err(|e| error_to_js(&e))?;
    to_json(&request)
}

/// Built-in models with their meter and key options, as a JSON array
#[wasm_bindgen]
pub fn models() -> Result<String, JsValue> {
    let registry = builtin()?;
    let choices: Vec<ModelChoice> = registry
        .choices()
        .filter_map(|(file_name, display_name)| {
            let vocab = registry.get(file_name).ok()?;
            Some(ModelChoice {
                file_name,
                display_name,
                default_meter: vocab.default_meter_header(),
                default_key: vocab.default_key_header(),
                header_m_tokens: vocab.header_m_tokens.iter().map(String::as_str).collect(),
                header_k_tokens: vocab.header_k_tokens.iter().map(String::as_str).collect(),
            })
        })
        .collect();
    to_json(&choices)
}

/// Text of a tune whose tokens arrive one at a time
#[wasm_bindgen]
#[derive(Default)]
pub struct TuneStream {
    inner: TuneText,
}

#[wasm_bindgen]
impl TuneStream {
    #[wasm_bindgen(constructor)]
    pub fn new() -> TuneStream {
        TuneStream::default()
    }

    pub fn push(&mut self, token: &str) {
        self.inner.push(token);
    }

    pub fn text(&self) -> String {
        self.inner.as_str().to_string()
    }

    pub fn line_count(&self) -> usize {
        self.inner.line_count()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}
