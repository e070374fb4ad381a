//! Typed view of normalized dialog fields
//!
//! [`TemplateConfig`](super::TemplateConfig) stores its data as JSON so that
//! schema normalization can work generically; these types are what callers
//! building a form actually consume.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Form control kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Free-text input
    Text,
    /// Selection list
    Select,
}

/// One form control collecting a value for one cookiecutter variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogField {
    /// Variable name in cookiecutter.json
    pub key: String,

    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    pub component: ComponentKind,

    /// Text fields only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_options: Option<Vec<PresetOption>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_groups: Option<Vec<PresetGroup>>,
}

/// Explicit select option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Display label, at most 75 characters
    pub label: String,
    /// Value reported back by the form, at most 75 characters
    pub value: String,
    /// Value substituted into the template when this option is chosen
    pub template_value: String,
}

/// Select option that sets several variables at once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetOption {
    pub label: String,
    pub value: String,
    /// cookiecutter.json variables applied when this option is chosen
    pub presets: Map<String, Value>,
}

/// Labeled group of preset options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetGroup {
    pub group_label: String,
    pub options: Vec<PresetOption>,
}

/// Where a select field takes its choices from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectSource<'a> {
    Options(&'a [SelectOption]),
    PresetOptions(&'a [PresetOption]),
    PresetGroups(&'a [PresetGroup]),
}

impl DialogField {
    /// The choices of a select field, if it has any
    #[must_use]
    pub fn select_source(&self) -> Option<SelectSource<'_>> {
        if self.component != ComponentKind::Select {
            return None;
        }

        if let Some(options) = &self.options {
            Some(SelectSource::Options(options))
        } else if let Some(presets) = &self.preset_options {
            Some(SelectSource::PresetOptions(presets))
        } else {
            self.preset_groups
                .as_deref()
                .map(SelectSource::PresetGroups)
        }
    }

    /// Map a value reported by the form to the value substituted into the template
    ///
    /// Option values may be truncated for display; the template always gets
    /// the original. Values that match no explicit option are returned as-is.
    #[must_use]
    pub fn template_value_for<'a>(&'a self, value: &'a str) -> &'a str {
        match self.select_source() {
            Some(SelectSource::Options(options)) => options
                .iter()
                .find(|option| option.value == value)
                .map_or(value, |option| option.template_value.as_str()),
            _ => value,
        }
    }
}
