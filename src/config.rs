//! Element ids and selectors the controller binds to.
//!
//! Defaults match the server-rendered planner template. A page can override
//! any subset by passing a JSON object to the wasm entrypoint.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{FIELD_CUSTOM_NAME, FIELD_PROCEDURE_NAME};
use crate::selector::{Selector, SelectorError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid form config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid selector for {field}: {source}")]
    Selector {
        field: &'static str,
        #[source]
        source: SelectorError,
    },
}

/// Raw, user-facing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormSelectors {
    pub form_id: String,
    pub container_id: String,
    pub add_button_id: String,
    pub toggle_all_id: String,
    pub toggle_terms_id: String,
    pub terms_panel_id: String,
    pub row: String,
    pub procedure_select: String,
    pub custom_field: String,
    pub custom_input: String,
    pub no_finance: String,
    pub remove_button: String,
    /// `data-*` key (without the prefix) that marks a prefilled form.
    pub prefill_key: String,
}

impl Default for FormSelectors {
    fn default() -> Self {
        Self {
            form_id: "planner-form".into(),
            container_id: "rows".into(),
            add_button_id: "add-row".into(),
            toggle_all_id: "toggle-all-monthly".into(),
            toggle_terms_id: "toggle-finance-terms".into(),
            terms_panel_id: "finance-terms".into(),
            row: "[data-row]".into(),
            procedure_select: format!(r#"select[name="{FIELD_PROCEDURE_NAME}"]"#),
            custom_field: ".custom-field".into(),
            custom_input: format!(r#"input[name="{FIELD_CUSTOM_NAME}"]"#),
            no_finance: "input[data-no-finance]".into(),
            remove_button: "[data-remove]".into(),
            prefill_key: "prefill".into(),
        }
    }
}

impl FormSelectors {
    /// Parse overrides from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON or unknown keys.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse every selector field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Selector`] naming the first field that fails to parse.
    pub fn compile(&self) -> Result<CompiledSelectors, ConfigError> {
        let parse = |field: &'static str, raw: &str| {
            Selector::parse(raw).map_err(|source| ConfigError::Selector { field, source })
        };
        Ok(CompiledSelectors {
            ids: ElementIds {
                form: self.form_id.clone(),
                container: self.container_id.clone(),
                add_button: self.add_button_id.clone(),
                toggle_all: self.toggle_all_id.clone(),
                toggle_terms: self.toggle_terms_id.clone(),
                terms_panel: self.terms_panel_id.clone(),
            },
            row: parse("row", &self.row)?,
            procedure_select: parse("procedure_select", &self.procedure_select)?,
            custom_field: parse("custom_field", &self.custom_field)?,
            custom_input: parse("custom_input", &self.custom_input)?,
            no_finance: parse("no_finance", &self.no_finance)?,
            remove_button: parse("remove_button", &self.remove_button)?,
            prefill_key: self.prefill_key.clone(),
        })
    }
}

/// Top-level element ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementIds {
    pub form: String,
    pub container: String,
    pub add_button: String,
    pub toggle_all: String,
    pub toggle_terms: String,
    pub terms_panel: String,
}

/// Validated configuration consumed by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSelectors {
    pub ids: ElementIds,
    pub row: Selector,
    pub procedure_select: Selector,
    pub custom_field: Selector,
    pub custom_input: Selector,
    pub no_finance: Selector,
    pub remove_button: Selector,
    pub prefill_key: String,
}
