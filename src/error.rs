#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    #[error("no element matches {0}")]
    MissingTarget(&'static str),
    #[error("canvas context unavailable: {0}")]
    CanvasContext(String),
    #[error("product catalog rejected: {0}")]
    Catalog(String),
    #[error("product catalog is not valid JSON: {0}")]
    CatalogFormat(#[from] serde_json::Error),
    #[error("script error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for EffectError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_convert_with_their_source() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = EffectError::from(parse_error);

        assert!(matches!(error, EffectError::CatalogFormat(_)));
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_string().starts_with("product catalog is not valid JSON"));
    }

    #[test]
    fn missing_target_names_the_selector() {
        let error = EffectError::MissingTarget("#product-modal-root");
        assert_eq!(error.to_string(), "no element matches #product-modal-root");
    }
}
