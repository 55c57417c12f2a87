//! Parameter-value maps carried by specific overrides.

use crate::error::MockError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Parameter name to concrete value, ordered by name.
pub type ParamBindings = BTreeMap<String, String>;

/// Accepted wire forms for override parameters.
///
/// - a JSON object: `{"id": "42", "sku": "abc"}`
/// - the text form: `"id: 42, sku: abc"`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ParamBindingsInput {
    Map(BTreeMap<String, String>),
    Text(String),
}

impl ParamBindingsInput {
    pub fn into_bindings(self) -> Result<ParamBindings, MockError> {
        match self {
            ParamBindingsInput::Map(map) => Ok(map
                .into_iter()
                .map(|(name, value)| (name.trim().to_string(), value))
                .collect()),
            ParamBindingsInput::Text(text) => parse_text(&text),
        }
    }
}

/// Parse `name: value` pairs separated by commas.
pub fn parse_text(text: &str) -> Result<ParamBindings, MockError> {
    let mut bindings = ParamBindings::new();
    for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, value) = part.split_once(':').ok_or_else(|| {
            MockError::invalid(format!("path param [{part}] must look like name: value"))
        })?;
        let name = name.trim();
        if bindings
            .insert(name.to_string(), value.trim().to_string())
            .is_some()
        {
            return Err(MockError::invalid(format!(
                "path param [{name}] is given more than once"
            )));
        }
    }
    Ok(bindings)
}

/// Text form of a binding map; also its ordering key among overrides.
pub fn format_params(bindings: &ParamBindings) -> String {
    bindings
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join(", ")
}
