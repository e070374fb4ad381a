//! Validated templatekit.yaml configuration and its normalization
//!
//! A [`TemplateConfig`] has always passed schema validation. Normalization
//! fills in whatever the author left out (name, group, dialog fields, select
//! options, text placeholders) from the template's cookiecutter.json and
//! returns a new, re-validated configuration.

use crate::config::dialog::DialogField;
use crate::config::schema::SchemaValidator;
use crate::error::{Result, TemplateError};
use serde_json::{Map, Value};

/// Longest label or option value a form may display
pub const MAX_LABEL_LENGTH: usize = 75;

/// Group assigned to templates that do not declare one
pub const DEFAULT_GROUP: &str = "General";

const ELLIPSIS: char = '…';

/// Something that can supply a template's name and cookiecutter.json variables
pub trait VariableSource {
    /// Template name (the directory name)
    fn name(&self) -> &str;

    /// Variables and defaults from cookiecutter.json, in document order
    ///
    /// # Errors
    ///
    /// Returns an error if the variables document cannot be read or parsed
    fn raw_variables(&self) -> Result<&Map<String, Value>>;
}

/// Read-only, schema-validated template configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateConfig {
    data: Map<String, Value>,
}

impl TemplateConfig {
    /// Validate a raw templatekit.yaml mapping and apply schema defaults
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidation` with every violated field and the offending
    /// document if `data` does not match the schema
    pub fn new(data: Value) -> Result<Self> {
        let validator = SchemaValidator::load()?;

        if let Err(violations) = validator.validate(&data) {
            let document = serde_yaml::to_string(&data).unwrap_or_else(|_| data.to_string());
            return Err(TemplateError::SchemaValidation {
                violations,
                document,
            });
        }

        match validator.normalize(&data) {
            Value::Object(data) => Ok(Self { data }),
            // Unreachable for a document that passed `"type": "object"`
            other => Err(TemplateError::schema(format!(
                "Normalized configuration is not a mapping: {other}"
            ))),
        }
    }

    /// Look up a configuration value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Configuration keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The whole configuration as a JSON value
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.data.clone())
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.get("group").and_then(Value::as_str)
    }

    #[must_use]
    pub fn dialog_title(&self) -> Option<&str> {
        self.get("dialog_title").and_then(Value::as_str)
    }

    /// Typed dialog fields (empty if none are declared)
    ///
    /// # Errors
    ///
    /// Returns an error if a field cannot be read as a [`DialogField`]
    pub fn dialog_fields(&self) -> Result<Vec<DialogField>> {
        match self.get("dialog_fields") {
            Some(fields) => serde_json::from_value(fields.clone()).map_err(|e| {
                TemplateError::schema(format!("Malformed dialog fields: {e}"))
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Derive a complete configuration using the template's variables
    ///
    /// The receiver is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `UnknownVariable` if a field refers to a variable that
    /// cookiecutter.json does not define, `InvalidVariable` if a select
    /// field's variable is not a list, and `SchemaValidation` if the
    /// derived configuration does not match the schema
    pub fn normalize(&self, template: &dyn VariableSource) -> Result<Self> {
        let mut data = self.data.clone();

        if !data.contains_key("name") {
            data.insert("name".to_owned(), Value::String(template.name().to_owned()));
        }

        if !data.contains_key("group") {
            data.insert("group".to_owned(), Value::String(DEFAULT_GROUP.to_owned()));
        }

        if !data.contains_key("dialog_fields") {
            let fields = infer_dialog_fields(template.raw_variables()?);
            data.insert("dialog_fields".to_owned(), Value::Array(fields));
        }

        if let Some(Value::Array(fields)) = data.get_mut("dialog_fields") {
            for field in fields.iter_mut().filter_map(Value::as_object_mut) {
                match field.get("component").and_then(Value::as_str) {
                    Some("select") => normalize_select_field(field, template)?,
                    Some("text") => normalize_text_field(field, template)?,
                    _ => {}
                }
            }
        }

        Self::new(Value::Object(data))
    }
}

/// One field per user-facing variable: strings become text inputs, lists selects
fn infer_dialog_fields(variables: &Map<String, Value>) -> Vec<Value> {
    variables
        .iter()
        // `_`-prefixed keys are cookiecutter directives such as `_extensions`
        .filter(|(key, _)| !key.starts_with('_'))
        .filter_map(|(key, value)| {
            let component = match value {
                Value::String(_) => "text",
                Value::Array(_) => "select",
                _ => return None,
            };

            let mut field = Map::new();
            field.insert("key".to_owned(), Value::String(key.clone()));
            field.insert("label".to_owned(), Value::String(truncate(key)));
            field.insert("component".to_owned(), Value::String(component.to_owned()));
            Some(Value::Object(field))
        })
        .collect()
}

fn normalize_select_field(
    field: &mut Map<String, Value>,
    template: &dyn VariableSource,
) -> Result<()> {
    // Preset fields are fully specified by the author
    if field.contains_key("preset_options") || field.contains_key("preset_groups") {
        return Ok(());
    }

    let key = field_key(field);
    let variable = lookup_variable(template, &key)?;
    if field.contains_key("options") {
        return Ok(());
    }

    let Value::Array(choices) = variable else {
        return Err(TemplateError::InvalidVariable {
            key,
            template: template.name().to_owned(),
            message: "a select field needs a list of choices".to_owned(),
        });
    };

    let options = choices
        .iter()
        .map(|choice| {
            let label = truncate_value(choice);
            let mut option = Map::new();
            option.insert("label".to_owned(), label.clone());
            option.insert("value".to_owned(), label);
            option.insert("template_value".to_owned(), choice.clone());
            Value::Object(option)
        })
        .collect();

    field.insert("options".to_owned(), Value::Array(options));
    Ok(())
}

fn normalize_text_field(field: &mut Map<String, Value>, template: &dyn VariableSource) -> Result<()> {
    let key = field_key(field);
    let variable = lookup_variable(template, &key)?;

    let has_placeholder = match field.get("placeholder") {
        Some(Value::String(placeholder)) => !placeholder.is_empty(),
        Some(_) => true,
        None => false,
    };
    if !has_placeholder {
        field.insert("placeholder".to_owned(), variable.clone());
    }
    Ok(())
}

fn field_key(field: &Map<String, Value>) -> String {
    field
        .get("key")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

fn lookup_variable<'a>(template: &'a dyn VariableSource, key: &str) -> Result<&'a Value> {
    template
        .raw_variables()?
        .get(key)
        .ok_or_else(|| TemplateError::UnknownVariable {
            key: key.to_owned(),
            template: template.name().to_owned(),
        })
}

/// Shorten text to at most 75 characters, marking the cut with an ellipsis
#[must_use]
pub fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_LABEL_LENGTH {
        return text.to_owned();
    }

    let mut truncated: String = text.chars().take(MAX_LABEL_LENGTH - 1).collect();
    truncated.push(ELLIPSIS);
    truncated
}

/// [`truncate`] for JSON values; non-strings are returned unchanged
#[must_use]
pub fn truncate_value(value: &Value) -> Value {
    match value {
        Value::String(text) => Value::String(truncate(text)),
        other => other.clone(),
    }
}
