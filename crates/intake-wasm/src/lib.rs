//! Intake Forms WASM
//!
//! WebAssembly bindings for the intake form state manager.
//! The page owns the DOM; it forwards submit, focus and blur events here and
//! renders the values and errors it gets back.
//!
//! # Example (JavaScript)
//! ```javascript
//! const form = new FormHandle({
//!     unknown: 'allow',
//!     fields: { firstName: { alphanum: true, minLength: 3, required: true } }
//! });
//!
//! formEl.addEventListener('submit', (e) => {
//!     e.preventDefault();
//!     render(form.submit(Array.from(new FormData(formEl).entries())));
//! });
//!
//! formEl.addEventListener('focusin', ({ target }) => {
//!     if (form.focus(target.name)) {
//!         target.addEventListener('blur', () => render(form.blur(target.name, target.value)), { once: true });
//!     }
//! });
//! ```

use std::collections::BTreeMap;

use intake_forms::{FormConfig, FormData, FormManager, InputTarget, PendingBlurs, Schema, SchemaCompiler, Validator};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Submission entries: `[[name, value], ...]` or `{ name: value }`
#[derive(Deserialize)]
#[serde(untagged)]
enum Entries {
    Pairs(Vec<(String, String)>),
    Object(BTreeMap<String, String>),
}

impl Entries {
    fn into_pairs(self) -> Vec<(String, String)> {
        match self {
            Entries::Pairs(pairs) => pairs,
            Entries::Object(map) => map.into_iter().collect(),
        }
    }
}

fn decode_schema(schema: JsValue) -> Result<Option<Schema>, JsValue> {
    if schema.is_undefined() || schema.is_null() {
        return Ok(None);
    }

    serde_wasm_bindgen::from_value(schema)
        .map(Some)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse schema: {}", e)))
}

/// Maps become plain objects rather than `Map` instances
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

/// Form state manager exposed to JavaScript
#[wasm_bindgen]
pub struct FormHandle {
    manager: FormManager,
    pending: PendingBlurs,
}

#[wasm_bindgen]
impl FormHandle {
    /// Compiles the schema eagerly; throws if it is malformed.
    /// Pass `undefined` to capture values without validation.
    #[wasm_bindgen(constructor)]
    pub fn new(schema: JsValue) -> Result<FormHandle, JsValue> {
        let schema = decode_schema(schema)?;

        let manager = FormManager::new(FormConfig { schema }).map_err(|e| {
            let message = e.to_string();
            web_sys::console::warn_1(&JsValue::from_str(&message));
            JsValue::from_str(&message)
        })?;

        Ok(FormHandle {
            manager,
            pending: PendingBlurs::new(),
        })
    }

    /// Handles a submit and returns the new error map
    pub fn submit(&mut self, entries: JsValue) -> Result<JsValue, JsValue> {
        let entries: Entries = serde_wasm_bindgen::from_value(entries)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse form entries: {}", e)))?;

        let mut event = FormData::from_pairs(entries.into_pairs());
        self.manager.handle_submit(&mut event);

        self.errors()
    }

    /// Returns `true` when the caller must attach a one-time blur listener
    pub fn focus(&mut self, name: &str) -> bool {
        self.manager.handle_focus(&InputTarget::new(name, ""), &mut self.pending)
    }

    /// Field names armed since the last call, for hosts that attach listeners in batches
    #[wasm_bindgen(js_name = takePendingBlurs)]
    pub fn take_pending_blurs(&mut self) -> Vec<String> {
        self.pending.take()
    }

    /// Handles the one-time blur and returns the new error map
    pub fn blur(&mut self, name: &str, value: &str) -> Result<JsValue, JsValue> {
        self.manager.handle_blur(&InputTarget::new(name, value));
        self.errors()
    }

    pub fn values(&self) -> Result<JsValue, JsValue> {
        to_js(self.manager.values())
    }

    pub fn errors(&self) -> Result<JsValue, JsValue> {
        to_js(self.manager.errors())
    }
}

/// Validate a single field value against one schema rule
///
/// Returns the first message, or `undefined` when the value is valid or the
/// field has no rule.
///
/// # Example (JavaScript)
/// ```javascript
/// const error = validateField(schema, 'email', 'user@example.org');
/// ```
#[wasm_bindgen(js_name = validateField)]
pub fn validate_field(schema: JsValue, field_name: &str, value: &str) -> Result<Option<String>, JsValue> {
    let Some(schema) = decode_schema(schema)? else {
        return Ok(None);
    };

    let compiled = schema
        .compile()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(match compiled.validate_field(field_name, value) {
        Some(Err(issue)) => Some(issue.message),
        _ => None,
    })
}

/// Quick email validation
#[wasm_bindgen(js_name = isValidEmail)]
pub fn is_valid_email_js(email: &str) -> bool {
    intake_rules::is_valid_email(email)
}
