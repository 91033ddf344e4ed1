//! Declarative object schemas.
//!
//! A schema is declared once as a `static` and used three ways: to validate a request
//! before any model call, to tell the model which JSON shape to produce
//! ([`ObjectSchema::response_schema`], [`ObjectSchema::describe_fields`]), and to validate
//! whatever the model actually returned.

pub mod rule;
pub mod video;

use ehs_llm::DataUri;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::error::{FieldIssue, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectSchema {
    pub fields: &'static [Field],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Shown to the model, both in the response schema and in the prompt.
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String(StringRules),
    Boolean,
    /// Closed vocabulary; any other literal is rejected.
    Enum(&'static [&'static str]),
    Array(&'static FieldKind),
    Object(&'static ObjectSchema),
}

/// Item kind for a plain list of strings.
pub const STRING_ITEMS: &FieldKind = &FieldKind::String(StringRules::ANY);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringRules {
    pub min_len: usize,
    pub too_short: Option<&'static str>,
    pub format: Option<StringFormat>,
}

impl StringRules {
    pub const ANY: StringRules = StringRules {
        min_len: 0,
        too_short: None,
        format: None,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// `data:<mimetype>;base64,<encoded_data>`
    DataUri { message: &'static str },
    /// A string that itself holds a serialized JSON object.
    JsonObject,
}

impl Field {
    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String(StringRules::ANY),
            required: true,
            description,
        }
    }

    pub const fn boolean(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Boolean,
            required: true,
            description,
        }
    }

    pub const fn one_of(
        name: &'static str,
        values: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::Enum(values),
            required: true,
            description,
        }
    }

    pub const fn list(
        name: &'static str,
        items: &'static FieldKind,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::Array(items),
            required: true,
            description,
        }
    }

    pub const fn optional(self) -> Self {
        Self {
            required: false,
            ..self
        }
    }

    /// Minimum length in characters, with the message shown when it is not met.
    pub const fn min_len(self, min_len: usize, message: &'static str) -> Self {
        let kind = match self.kind {
            FieldKind::String(rules) => FieldKind::String(StringRules {
                min_len,
                too_short: Some(message),
                ..rules
            }),
            other => other,
        };
        Self { kind, ..self }
    }

    pub const fn format(self, format: StringFormat) -> Self {
        let kind = match self.kind {
            FieldKind::String(rules) => FieldKind::String(StringRules {
                format: Some(format),
                ..rules
            }),
            other => other,
        };
        Self { kind, ..self }
    }
}

impl ObjectSchema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Validate a mapping and return only the declared fields, normalized.
    ///
    /// Undeclared keys are dropped and `null` counts as absent.
    pub fn validate(&self, input: &Map<String, Value>) -> Result<Map<String, Value>, ValidationError> {
        let mut issues = Vec::new();
        let normalized = self.check_object(input, "", &mut issues);
        if issues.is_empty() {
            Ok(normalized)
        } else {
            Err(ValidationError::new(issues))
        }
    }

    pub fn validate_value(&self, value: &Value) -> Result<Map<String, Value>, ValidationError> {
        match value {
            Value::Object(map) => self.validate(map),
            _ => Err(ValidationError::single("(root)", "expected a JSON object")),
        }
    }

    /// Validate and deserialize into the typed value.
    pub fn parse<T: DeserializeOwned>(&self, input: &Map<String, Value>) -> Result<T, ValidationError> {
        let normalized = self.validate(input)?;
        serde_json::from_value(Value::Object(normalized))
            .map_err(|e| ValidationError::single("(root)", e.to_string()))
    }

    /// Gemini `responseSchema` for this shape.
    pub fn response_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        let mut ordering = Vec::new();

        for field in self.fields {
            let mut property = kind_schema(&field.kind);
            if let Value::Object(map) = &mut property {
                map.insert("description".to_string(), json!(field.description));
            }
            properties.insert(field.name.to_string(), property);
            ordering.push(json!(field.name));
            if field.required {
                required.push(json!(field.name));
            }
        }

        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": required,
            "propertyOrdering": ordering,
        })
    }

    /// Human-readable field list for embedding in a prompt.
    pub fn describe_fields(&self) -> String {
        let mut lines = Vec::new();
        self.describe_into(&mut lines, 0);
        lines.join("\n")
    }

    fn describe_into(&self, lines: &mut Vec<String>, depth: usize) {
        let indent = "  ".repeat(depth);
        for field in self.fields {
            let presence = if field.required { "required" } else { "optional" };
            lines.push(format!(
                "{indent}- {} ({}, {presence}): {}",
                field.name,
                kind_label(&field.kind),
                field.description
            ));
            if let Some(nested) = nested_object(&field.kind) {
                nested.describe_into(lines, depth + 1);
            }
        }
    }

    fn check_object(
        &self,
        input: &Map<String, Value>,
        prefix: &str,
        issues: &mut Vec<FieldIssue>,
    ) -> Map<String, Value> {
        let mut normalized = Map::new();

        for field in self.fields {
            let path = format!("{prefix}{}", field.name);
            match input.get(field.name) {
                Some(value) if !is_absent(&field.kind, value) => {
                    if let Some(value) = check_value(&field.kind, value, &path, issues) {
                        normalized.insert(field.name.to_string(), value);
                    }
                }
                _ => {
                    if field.required {
                        issues.push(FieldIssue::new(&path, format!("{path} is required")));
                    }
                }
            }
        }

        normalized
    }
}

fn is_absent(kind: &FieldKind, value: &Value) -> bool {
    match (kind, value) {
        (_, Value::Null) => true,
        // An unchecked checkbox posts an empty string or nothing at all.
        (FieldKind::Boolean, Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

fn check_value(
    kind: &FieldKind,
    value: &Value,
    path: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<Value> {
    match kind {
        FieldKind::String(rules) => {
            let Value::String(s) = value else {
                issues.push(FieldIssue::new(path, format!("{path} must be a string")));
                return None;
            };
            if s.chars().count() < rules.min_len {
                let message = rules.too_short.map(str::to_string).unwrap_or_else(|| {
                    format!("{path} must contain at least {} character(s)", rules.min_len)
                });
                issues.push(FieldIssue::new(path, message));
                return None;
            }
            match rules.format {
                Some(StringFormat::DataUri { message }) if DataUri::parse(s).is_err() => {
                    issues.push(FieldIssue::new(path, message));
                    None
                }
                Some(StringFormat::JsonObject)
                    if !matches!(serde_json::from_str::<Value>(s), Ok(Value::Object(_))) =>
                {
                    issues.push(FieldIssue::new(
                        path,
                        format!("{path} must be a string holding a JSON object"),
                    ));
                    None
                }
                _ => Some(value.clone()),
            }
        }
        FieldKind::Boolean => match value {
            Value::Bool(b) => Some(Value::Bool(*b)),
            Value::String(s) => match parse_form_bool(s) {
                Some(b) => Some(Value::Bool(b)),
                None => {
                    issues.push(FieldIssue::new(path, format!("{path} must be a boolean")));
                    None
                }
            },
            _ => {
                issues.push(FieldIssue::new(path, format!("{path} must be a boolean")));
                None
            }
        },
        FieldKind::Enum(values) => match value {
            Value::String(s) if values.contains(&s.as_str()) => Some(value.clone()),
            _ => {
                issues.push(FieldIssue::new(
                    path,
                    format!("{path} must be one of: {}", values.join(", ")),
                ));
                None
            }
        },
        FieldKind::Array(items) => {
            let Value::Array(elements) = value else {
                issues.push(FieldIssue::new(path, format!("{path} must be an array")));
                return None;
            };
            let before = issues.len();
            let checked: Vec<Value> = elements
                .iter()
                .enumerate()
                .filter_map(|(i, element)| check_value(items, element, &format!("{path}[{i}]"), issues))
                .collect();
            (issues.len() == before).then(|| Value::Array(checked))
        }
        FieldKind::Object(schema) => {
            let Value::Object(map) = value else {
                issues.push(FieldIssue::new(path, format!("{path} must be an object")));
                return None;
            };
            let before = issues.len();
            let checked = schema.check_object(map, &format!("{path}."), issues);
            (issues.len() == before).then(|| Value::Object(checked))
        }
    }
}

/// Form checkboxes and env-style flags.
pub fn parse_form_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn kind_schema(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::String(_) => json!({"type": "STRING"}),
        FieldKind::Boolean => json!({"type": "BOOLEAN"}),
        FieldKind::Enum(values) => json!({"type": "STRING", "enum": values}),
        FieldKind::Array(items) => json!({"type": "ARRAY", "items": kind_schema(items)}),
        FieldKind::Object(schema) => schema.response_schema(),
    }
}

fn kind_label(kind: &FieldKind) -> String {
    match kind {
        FieldKind::String(_) => "string".to_string(),
        FieldKind::Boolean => "boolean".to_string(),
        FieldKind::Enum(values) => format!("one of: {}", values.join(" | ")),
        FieldKind::Array(items) => format!("list of {}", kind_label(items)),
        FieldKind::Object(_) => "object".to_string(),
    }
}

fn nested_object(kind: &FieldKind) -> Option<&'static ObjectSchema> {
    match kind {
        FieldKind::Object(schema) => Some(*schema),
        FieldKind::Array(items) => nested_object(items),
        _ => None,
    }
}
