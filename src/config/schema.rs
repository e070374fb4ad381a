//! JSON Schema validation and normalization for templatekit.yaml documents
//!
//! The schema is embedded at compile time and compiled at most once per
//! process. Initialization has a single writer (the first caller of
//! [`SchemaValidator::load`]); afterwards the validator is only ever read,
//! so it is shared freely between threads.

use crate::error::{Result, TemplateError, Violation};
use jsonschema::Draft;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Source of the embedded templatekit.yaml schema
pub const SCHEMA_SOURCE: &str = include_str!("../../schemas/config.schema.json");

static VALIDATOR: OnceLock<SchemaValidator> = OnceLock::new();

/// Compiled templatekit.yaml schema
pub struct SchemaValidator {
    schema: Value,
    compiled: jsonschema::Validator,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema", &self.schema.get("title"))
            .finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Get the process-wide validator, compiling the embedded schema on first use
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded schema cannot be parsed or compiled
    pub fn load() -> Result<&'static Self> {
        if let Some(validator) = VALIDATOR.get() {
            return Ok(validator);
        }

        let validator = Self::from_source(SCHEMA_SOURCE)?;
        // A concurrent first caller may have won the race; either copy is identical.
        Ok(VALIDATOR.get_or_init(|| validator))
    }

    /// Compile a validator from schema source text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or not a valid draft 7 schema
    pub fn from_source(source: &str) -> Result<Self> {
        let schema: Value = serde_json::from_str(source)
            .map_err(|e| TemplateError::schema(format!("Failed to parse JSON schema: {e}")))?;
        Self::from_value(schema)
    }

    /// Compile a validator from an already parsed schema
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a valid draft 7 schema
    pub fn from_value(schema: Value) -> Result<Self> {
        let compiled = jsonschema::options()
            .with_draft(Draft::Draft7)
            .build(&schema)
            .map_err(|e| TemplateError::schema(format!("Failed to compile JSON schema: {e}")))?;

        Ok(Self { schema, compiled })
    }

    /// Check a document against the schema
    ///
    /// Unknown keys are not violations; they are dropped by [`Self::normalize`].
    ///
    /// # Errors
    ///
    /// Returns every violation found, one per offending location
    pub fn validate(&self, data: &Value) -> std::result::Result<(), Vec<Violation>> {
        let violations: Vec<Violation> = self
            .compiled
            .iter_errors(data)
            .map(|e| Violation {
                path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Returns true if the document conforms to the schema
    #[must_use]
    pub fn is_valid(&self, data: &Value) -> bool {
        self.compiled.is_valid(data)
    }

    /// Apply schema defaults and purge keys the schema does not declare
    ///
    /// Only objects whose schema lists `properties` are purged; free-form
    /// objects (such as preset variable maps) pass through unchanged.
    #[must_use]
    pub fn normalize(&self, data: &Value) -> Value {
        self.normalize_node(&self.schema, data)
    }

    fn normalize_node(&self, schema: &Value, data: &Value) -> Value {
        let schema = self.resolve(schema);

        match data {
            Value::Object(map) => {
                let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
                    return data.clone();
                };

                let mut normalized = Map::new();
                for (key, value) in map {
                    if let Some(property_schema) = properties.get(key) {
                        normalized.insert(key.clone(), self.normalize_node(property_schema, value));
                    }
                }

                for (key, property_schema) in properties {
                    if normalized.contains_key(key) {
                        continue;
                    }
                    if let Some(default) = self.resolve(property_schema).get("default") {
                        normalized.insert(key.clone(), default.clone());
                    }
                }

                Value::Object(normalized)
            }
            Value::Array(items) => match schema.get("items") {
                Some(item_schema) => Value::Array(
                    items
                        .iter()
                        .map(|item| self.normalize_node(item_schema, item))
                        .collect(),
                ),
                None => data.clone(),
            },
            _ => data.clone(),
        }
    }

    /// Follow a local `$ref` (`#/definitions/...`) to its target
    fn resolve<'a>(&'a self, node: &'a Value) -> &'a Value {
        node.get("$ref")
            .and_then(Value::as_str)
            .and_then(|reference| reference.strip_prefix('#'))
            .and_then(|pointer| self.schema.pointer(pointer))
            .unwrap_or(node)
    }
}
