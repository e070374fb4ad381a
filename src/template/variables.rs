//! cookiecutter.json loading and the variable map handed to the renderer

use crate::config::dialog::{DialogField, PresetOption, SelectSource};
use crate::error::{Result, TemplateError};
use crate::system::System;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

/// Read and parse a cookiecutter.json document
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not JSON, or is not a
/// JSON object
pub fn load_variables(system: &dyn System, path: &Path) -> Result<Map<String, Value>> {
    let content = system.read_to_string(path).map_err(|e| {
        TemplateError::filesystem(format!("Failed to read {}: {e}", path.display()))
    })?;

    match serde_json::from_str(&content) {
        Ok(Value::Object(variables)) => Ok(variables),
        Ok(other) => Err(TemplateError::parse(
            path,
            format!("expected a JSON object of variables, found {}", json_type(&other)),
        )),
        Err(e) => Err(TemplateError::parse(
            path,
            format!("line {}, column {}: {e}", e.line(), e.column()),
        )),
    }
}

/// Default value of every variable, with caller overrides applied
///
/// List variables default to their first choice. Overrides naming a select
/// field are mapped from the form value to the template value, and choosing
/// a preset applies every variable the preset sets.
///
/// # Errors
///
/// Returns `UnknownVariable` if an override (or a chosen preset) names a
/// variable that cookiecutter.json does not define
pub fn merge_overrides(
    template: &str,
    raw: &Map<String, Value>,
    fields: &[DialogField],
    overrides: &HashMap<String, Value>,
) -> Result<Map<String, Value>> {
    let mut variables: Map<String, Value> = raw
        .iter()
        .map(|(key, value)| (key.clone(), default_value(key, value)))
        .collect();

    let mut keys: Vec<&String> = overrides.keys().collect();
    keys.sort();

    for key in keys {
        let value = &overrides[key];
        let field = fields.iter().find(|field| &field.key == key);

        if let (Some(field), Value::String(chosen)) = (field, value)
            && let Some(preset) = find_preset(field, chosen)
        {
            for (preset_key, preset_value) in &preset.presets {
                ensure_known(template, raw, preset_key)?;
                variables.insert(preset_key.clone(), preset_value.clone());
            }
            continue;
        }

        ensure_known(template, raw, key)?;
        let value = match (field, value) {
            (Some(field), Value::String(chosen)) => {
                Value::String(field.template_value_for(chosen).to_owned())
            }
            _ => value.clone(),
        };
        variables.insert(key.clone(), value);
    }

    Ok(variables)
}

fn default_value(key: &str, value: &Value) -> Value {
    match value {
        // Directives such as `_extensions` are passed through whole
        Value::Array(_) if key.starts_with('_') => value.clone(),
        Value::Array(choices) => choices
            .first()
            .cloned()
            .unwrap_or_else(|| Value::String(String::new())),
        other => other.clone(),
    }
}

fn find_preset<'a>(field: &'a DialogField, chosen: &str) -> Option<&'a PresetOption> {
    match field.select_source()? {
        SelectSource::PresetOptions(options) => options.iter().find(|option| option.value == chosen),
        SelectSource::PresetGroups(groups) => groups
            .iter()
            .flat_map(|group| group.options.iter())
            .find(|option| option.value == chosen),
        SelectSource::Options(_) => None,
    }
}

fn ensure_known(template: &str, raw: &Map<String, Value>, key: &str) -> Result<()> {
    if raw.contains_key(key) {
        Ok(())
    } else {
        Err(TemplateError::UnknownVariable {
            key: key.to_owned(),
            template: template.to_owned(),
        })
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
