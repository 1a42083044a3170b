//! Schema entity
//!
//! Structural description of a component type's configuration: kinds, enums,
//! numeric ranges, string lengths, required fields and defaults. Authored once
//! per component type and never mutated afterwards.

use std::fmt;

use crate::domain::value_objects::ConfigValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Object,
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Enum,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Object => "object",
            SchemaKind::String => "string",
            SchemaKind::Number => "number",
            SchemaKind::Integer => "integer",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Array => "array",
            SchemaKind::Enum => "enum",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric bounds. Inclusive on both ends unless marked exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub exclusive_min: bool,
    pub exclusive_max: bool,
}

impl NumericRange {
    pub fn inclusive(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            exclusive_min: false,
            exclusive_max: false,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        let above_min = match self.min {
            Some(min) if self.exclusive_min => value > min,
            Some(min) => value >= min,
            None => true,
        };
        let below_max = match self.max {
            Some(max) if self.exclusive_max => value < max,
            Some(max) => value <= max,
            None => true,
        };
        above_min && below_max
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.exclusive_min { '(' } else { '[' };
        let close = if self.exclusive_max { ')' } else { ']' };
        let min = self.min.map(|m| m.to_string()).unwrap_or_else(|| "-inf".into());
        let max = self.max.map(|m| m.to_string()).unwrap_or_else(|| "inf".into());
        write!(f, "{}{}, {}{}", open, min, max, close)
    }
}

/// Recursive structural description of a configuration value.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub kind: SchemaKind,
    pub description: Option<String>,
    /// Object properties in declaration order.
    pub properties: Vec<(String, Schema)>,
    pub required: Vec<String>,
    /// When false, keys not listed in `properties` are violations.
    pub additional_properties: bool,
    pub items: Option<Box<Schema>>,
    pub enum_values: Vec<String>,
    pub range: Option<NumericRange>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub default: Option<ConfigValue>,
}

impl Schema {
    fn of_kind(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
            properties: Vec::new(),
            required: Vec::new(),
            additional_properties: true,
            items: None,
            enum_values: Vec::new(),
            range: None,
            min_length: None,
            max_length: None,
            default: None,
        }
    }

    pub fn object() -> Self {
        Self::of_kind(SchemaKind::Object)
    }

    pub fn string() -> Self {
        Self::of_kind(SchemaKind::String)
    }

    pub fn number() -> Self {
        Self::of_kind(SchemaKind::Number)
    }

    pub fn integer() -> Self {
        Self::of_kind(SchemaKind::Integer)
    }

    pub fn boolean() -> Self {
        Self::of_kind(SchemaKind::Boolean)
    }

    pub fn array(items: Schema) -> Self {
        let mut schema = Self::of_kind(SchemaKind::Array);
        schema.items = Some(Box::new(items));
        schema
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self::of_kind(SchemaKind::Enum);
        schema.enum_values = values.into_iter().map(Into::into).collect();
        schema
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an optional property.
    pub fn property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties.push((name.into(), schema));
        self
    }

    /// Add a required property.
    pub fn required_property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.push((name, schema));
        self
    }

    /// Reject keys that are not declared as properties.
    pub fn deny_unknown(mut self) -> Self {
        self.additional_properties = false;
        self
    }

    pub fn with_default(mut self, value: impl Into<ConfigValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Inclusive numeric range.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some(NumericRange::inclusive(min, max));
        self
    }

    pub fn with_range(mut self, range: NumericRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn get_property(&self, name: &str) -> Option<&Schema> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Property names, in declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(n, _)| n.as_str())
    }

    /// Authoring mistakes in this schema (recursively):
    /// - a property that is both required and defaulted
    /// - a required name that is not a declared property
    /// - an enum default outside the enum
    pub fn authoring_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        collect_authoring_issues(self, "(root)", &mut issues);
        issues
    }
}

fn collect_authoring_issues(schema: &Schema, at: &str, issues: &mut Vec<String>) {
    for name in &schema.required {
        match schema.get_property(name) {
            None => issues.push(format!("{}: required field '{}' is not declared", at, name)),
            Some(prop) if prop.default.is_some() => issues.push(format!(
                "{}: field '{}' is both required and defaulted",
                at, name
            )),
            Some(_) => {}
        }
    }

    if schema.kind == SchemaKind::Enum {
        if let Some(ConfigValue::String(default)) = &schema.default {
            if !schema.enum_values.contains(default) {
                issues.push(format!(
                    "{}: default '{}' is not one of the enum values",
                    at, default
                ));
            }
        }
    }

    for (name, prop) in &schema.properties {
        let child = if at == "(root)" {
            name.clone()
        } else {
            format!("{}.{}", at, name)
        };
        collect_authoring_issues(prop, &child, issues);
    }

    if let Some(items) = &schema.items {
        collect_authoring_issues(items, &format!("{}[]", at), issues);
    }
}
