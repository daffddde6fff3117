use super::ValidationRule;
use super::graph::formula_dependencies;
use crate::ast::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The input type of a field. Fixed once the field is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::Date,
    ];

    /// Whether fields of this type carry a list of selectable options.
    pub fn has_options(self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio | FieldType::Checkbox)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// Marks a field as computed from other fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFieldConfig {
    pub is_derived: bool,
    pub parent_fields: Vec<String>,
    pub formula: String,
}

/// One configurable input unit of a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_value: FieldValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(default)]
    pub validation: Vec<ValidationRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_config: Option<DerivedFieldConfig>,
    #[serde(default)]
    pub order: i64,
}

impl Field {
    pub fn builder(field_type: FieldType, label: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(field_type, label)
    }

    /// Generates a fresh field id. The prefix keeps ids usable as formula
    /// identifiers even when the random part is all digits.
    pub fn generate_id() -> String {
        format!("field_{}", Uuid::new_v4().simple())
    }

    pub fn is_derived(&self) -> bool {
        self.derived_config.as_ref().is_some_and(|c| c.is_derived)
    }

    /// The active derived configuration, if the field is derived.
    pub fn derivation(&self) -> Option<&DerivedFieldConfig> {
        self.derived_config.as_ref().filter(|c| c.is_derived)
    }

    /// Ids of the fields this field's value is computed from.
    ///
    /// An age formula only reads its first parent.
    pub fn dependencies(&self) -> &[String] {
        match self.derivation() {
            Some(config) => formula_dependencies(config),
            None => &[],
        }
    }
}

/// Builds a `Field` the way the field configurator does: fresh id, empty
/// text default, options kept only for option-bearing types.
pub struct FieldBuilder {
    field: Field,
}

impl FieldBuilder {
    pub fn new(field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            field: Field {
                id: Field::generate_id(),
                field_type,
                label: label.into(),
                required: false,
                default_value: FieldValue::Text(String::new()),
                placeholder: None,
                options: None,
                validation: Vec::new(),
                derived_config: None,
                order: 0,
            },
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.field.id = id.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.field.required = required;
        self
    }

    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.field.default_value = value.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.field.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_option(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.field
            .options
            .get_or_insert_with(Vec::new)
            .push(SelectOption {
                label: label.into(),
                value: value.into(),
            });
        self
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.field.validation.push(rule);
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = ValidationRule>) -> Self {
        self.field.validation.extend(rules);
        self
    }

    /// Turns the field into a derived field computed by `formula` over `parents`.
    pub fn derived<I, S>(mut self, parents: I, formula: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field.derived_config = Some(DerivedFieldConfig {
            is_derived: true,
            parent_fields: parents.into_iter().map(Into::into).collect(),
            formula: formula.into(),
        });
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.field.order = order;
        self
    }

    pub fn build(mut self) -> Field {
        if self.field.field_type.has_options() {
            if let Some(options) = self.field.options.as_mut() {
                options.retain(|o| !o.label.is_empty() && !o.value.is_empty());
            }
        } else {
            self.field.options = None;
        }
        self.field
    }
}
