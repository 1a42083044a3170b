//! Schema validation and default filling
//!
//! `validate` walks the whole value and returns every violation it finds, in
//! schema declaration order. `apply_defaults` fills declared defaults for
//! absent properties.

use std::fmt;

use crate::domain::entities::{NumericRange, Schema, SchemaKind};
use crate::domain::value_objects::{ConfigPath, ConfigValue, ValueKind};

use super::suggest::suggest;

#[derive(Debug, Clone, PartialEq)]
pub enum ViolationReason {
    MissingRequired,
    WrongType {
        expected: SchemaKind,
        found: ValueKind,
    },
    NotInEnum {
        value: String,
        allowed: Vec<String>,
    },
    OutOfRange {
        value: f64,
        range: NumericRange,
    },
    LengthOutOfBounds {
        length: usize,
        min: Option<usize>,
        max: Option<usize>,
    },
    UnknownProperty {
        suggestion: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaViolation {
    pub path: ConfigPath,
    pub reason: ViolationReason,
}

impl SchemaViolation {
    fn new(path: ConfigPath, reason: ViolationReason) -> Self {
        Self { path, reason }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            ViolationReason::MissingRequired => {
                write!(f, "{}: required field is missing", self.path)
            }
            ViolationReason::WrongType { expected, found } => {
                write!(f, "{}: expected {}, found {}", self.path, expected, found)
            }
            ViolationReason::NotInEnum { value, allowed } => write!(
                f,
                "{}: '{}' is not one of [{}]",
                self.path,
                value,
                allowed.join(", ")
            ),
            ViolationReason::OutOfRange { value, range } => {
                write!(f, "{}: {} is outside {}", self.path, value, range)
            }
            ViolationReason::LengthOutOfBounds { length, min, max } => {
                write!(f, "{}: length {} is outside ", self.path, length)?;
                match (min, max) {
                    (Some(min), Some(max)) => write!(f, "{}..={}", min, max),
                    (Some(min), None) => write!(f, ">= {}", min),
                    (None, Some(max)) => write!(f, "<= {}", max),
                    (None, None) => write!(f, "bounds"),
                }
            }
            ViolationReason::UnknownProperty { suggestion } => {
                write!(f, "{}: unknown field", self.path)?;
                if let Some(s) = suggestion {
                    write!(f, " (did you mean '{}'?)", s)?;
                }
                Ok(())
            }
        }
    }
}

/// Validate `value` against `schema`, collecting every violation.
pub fn validate(schema: &Schema, value: &ConfigValue) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();
    validate_node(schema, value, &ConfigPath::root(), &mut violations);
    violations
}

fn validate_node(
    schema: &Schema,
    value: &ConfigValue,
    path: &ConfigPath,
    out: &mut Vec<SchemaViolation>,
) {
    let wrong_type = |out: &mut Vec<SchemaViolation>| {
        out.push(SchemaViolation::new(
            path.clone(),
            ViolationReason::WrongType {
                expected: schema.kind,
                found: value.kind(),
            },
        ))
    };

    match schema.kind {
        SchemaKind::Object => {
            let Some(map) = value.as_object() else {
                return wrong_type(out);
            };
            for (name, prop) in &schema.properties {
                match value.get(name) {
                    Some(child) => validate_node(prop, child, &path.child(name), out),
                    None if schema.is_required(name) => out.push(SchemaViolation::new(
                        path.child(name),
                        ViolationReason::MissingRequired,
                    )),
                    None => {}
                }
            }
            if !schema.additional_properties {
                for (key, child) in map {
                    if child.is_null() || schema.get_property(key).is_some() {
                        continue;
                    }
                    out.push(SchemaViolation::new(
                        path.child(key),
                        ViolationReason::UnknownProperty {
                            suggestion: suggest(key, schema.property_names()),
                        },
                    ));
                }
            }
        }
        SchemaKind::String => {
            let Some(s) = value.as_str() else {
                return wrong_type(out);
            };
            check_length(schema, s.chars().count(), path, out);
        }
        SchemaKind::Number => {
            let Some(n) = value.as_f64() else {
                return wrong_type(out);
            };
            check_range(schema, n, path, out);
        }
        SchemaKind::Integer => {
            let ConfigValue::Integer(n) = value else {
                return wrong_type(out);
            };
            check_range(schema, *n as f64, path, out);
        }
        SchemaKind::Boolean => {
            if value.as_bool().is_none() {
                wrong_type(out);
            }
        }
        SchemaKind::Array => {
            let Some(items) = value.as_array() else {
                return wrong_type(out);
            };
            check_length(schema, items.len(), path, out);
            if let Some(item_schema) = &schema.items {
                for (idx, item) in items.iter().enumerate() {
                    validate_node(item_schema, item, &path.index(idx), out);
                }
            }
        }
        SchemaKind::Enum => {
            let Some(s) = value.as_str() else {
                return wrong_type(out);
            };
            if !schema.enum_values.iter().any(|allowed| allowed == s) {
                out.push(SchemaViolation::new(
                    path.clone(),
                    ViolationReason::NotInEnum {
                        value: s.to_string(),
                        allowed: schema.enum_values.clone(),
                    },
                ));
            }
        }
    }
}

fn check_length(schema: &Schema, length: usize, path: &ConfigPath, out: &mut Vec<SchemaViolation>) {
    let too_short = schema.min_length.is_some_and(|min| length < min);
    let too_long = schema.max_length.is_some_and(|max| length > max);
    if too_short || too_long {
        out.push(SchemaViolation::new(
            path.clone(),
            ViolationReason::LengthOutOfBounds {
                length,
                min: schema.min_length,
                max: schema.max_length,
            },
        ));
    }
}

fn check_range(schema: &Schema, value: f64, path: &ConfigPath, out: &mut Vec<SchemaViolation>) {
    if let Some(range) = schema.range {
        if !range.contains(value) {
            out.push(SchemaViolation::new(
                path.clone(),
                ViolationReason::OutOfRange { value, range },
            ));
        }
    }
}

/// Fill schema defaults for absent properties. Returns the paths filled.
///
/// Nested objects are created only when one of their properties has a default.
pub fn apply_defaults(schema: &Schema, value: &mut ConfigValue) -> Vec<ConfigPath> {
    let mut filled = Vec::new();
    if value.is_null() {
        *value = ConfigValue::object();
    }
    fill_object(schema, value, &ConfigPath::root(), &mut filled);
    filled
}

fn fill_object(
    schema: &Schema,
    value: &mut ConfigValue,
    path: &ConfigPath,
    filled: &mut Vec<ConfigPath>,
) {
    if schema.kind != SchemaKind::Object {
        return;
    }
    let Some(map) = value.as_object_mut() else {
        return;
    };

    for (name, prop) in &schema.properties {
        let child_path = path.child(name);
        let absent = map.get(name).map_or(true, ConfigValue::is_null);

        if absent {
            if let Some(default) = &prop.default {
                map.insert(name.clone(), default.clone());
                filled.extend(default.leaf_paths().into_iter().map(|leaf| {
                    leaf.segments()
                        .iter()
                        .fold(child_path.clone(), |acc, s| acc.child(s))
                }));
                continue;
            }
            if prop.kind == SchemaKind::Object {
                let mut nested = ConfigValue::object();
                let before = filled.len();
                fill_object(prop, &mut nested, &child_path, filled);
                if filled.len() > before {
                    map.insert(name.clone(), nested);
                }
            }
            continue;
        }

        if let Some(child) = map.get_mut(name) {
            fill_object(prop, child, &child_path, filled);
        }
    }
}
