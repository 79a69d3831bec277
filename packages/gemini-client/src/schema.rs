//! Schema generation for Gemini function declarations.
//!
//! Uses the `schemars` crate to generate JSON schemas from Rust types, then
//! reduces them to the OpenAPI subset Gemini accepts in
//! `functionDeclarations.parameters`:
//!
//! 1. No `$ref` references — everything must be inlined
//! 2. No `$schema`, `definitions`, `title`, or `additionalProperties` keys
//! 3. `type` / `properties` / `required` / `items` / `enum` / `description`
//!    are passed through as-is

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;

/// Trait for types usable as tool arguments.
///
/// Automatically implemented for any type that implements
/// `JsonSchema + DeserializeOwned`.
pub trait ToolSchema: JsonSchema + DeserializeOwned {
    /// Generate a Gemini-compatible parameter schema for this type.
    fn gemini_schema() -> serde_json::Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        inline_refs(&mut value);
        strip_unsupported_keys(&mut value);

        value
    }

    /// Get the schema name for this type.
    fn type_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

// Blanket implementation for all types that satisfy the bounds
impl<T: JsonSchema + DeserializeOwned> ToolSchema for T {}

/// Inline all `$ref` references by substituting the schema from definitions.
fn inline_refs(value: &mut serde_json::Value) {
    let definitions = if let serde_json::Value::Object(map) = value {
        map.get("definitions").cloned()
    } else {
        None
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut serde_json::Value, definitions: &serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            // Replace {"$ref": "#/definitions/Name"} with the definition body
            if let Some(serde_json::Value::String(ref_path)) = map.get("$ref") {
                if let Some(name) = ref_path.strip_prefix("#/definitions/") {
                    if let Some(definition) = definitions.get(name) {
                        let mut inlined = definition.clone();
                        inline_refs_recursive(&mut inlined, definitions);
                        *value = inlined;
                        return;
                    }
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}

/// Remove schema keys Gemini's function-declaration validator rejects.
fn strip_unsupported_keys(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            map.remove("$schema");
            map.remove("definitions");
            map.remove("title");
            map.remove("additionalProperties");

            for (_, v) in map.iter_mut() {
                strip_unsupported_keys(v);
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                strip_unsupported_keys(item);
            }
        }
        _ => {}
    }
}
