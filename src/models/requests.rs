//! Request body validation
//!
//! Checks an incoming JSON body against a declared set of required and
//! optional properties before it is deserialized.

use std::fmt;

use regex::Regex;
use serde_json::{Map, Value};

/// JSON type a property must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Float,
    Object,
    Array,
    Boolean,
    Any,
}

impl ParamType {
    fn matches(self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Float => value.is_number(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Object => value.is_object(),
            ParamType::Array => value.is_array(),
            ParamType::Any => true,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Float => "float",
            ParamType::Object => "object",
            ParamType::Array => "array",
            ParamType::Boolean => "boolean",
            ParamType::Any => "any",
        };
        f.write_str(name)
    }
}

/// One declared body property.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamType,
    pub pattern: Option<Regex>,
}

impl Param {
    pub fn new(name: &'static str, kind: ParamType) -> Self {
        Self {
            name,
            kind,
            pattern: None,
        }
    }

    /// A string property whose value must contain a match of `pattern`.
    pub fn string_matching(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            kind: ParamType::String,
            pattern: Some(Regex::new(pattern)?),
        })
    }
}

/// Required and optional properties accepted by an endpoint.
#[derive(Debug, Clone, Default)]
pub struct BodySchema {
    pub required: Vec<Param>,
    pub optional: Vec<Param>,
}

impl BodySchema {
    pub fn new(required: Vec<Param>, optional: Vec<Param>) -> Self {
        Self { required, optional }
    }

    /// Validates `body` against the schema.
    ///
    /// Returns a message naming the first offending property. Checks run in
    /// order: unknown properties, required properties, optional property
    /// types, then patterns.
    pub fn validate(&self, body: &Value) -> Result<(), String> {
        let Some(object) = body.as_object() else {
            return Err("Request body must be a JSON object".to_string());
        };

        if let Some(key) = object.keys().find(|key| !self.declares(key)) {
            return Err(format!("Invalid property: {key}"));
        }

        for param in &self.required {
            let value = object
                .get(param.name)
                .ok_or_else(|| format!("Missing property: {}", param.name))?;
            check_type(param, value)?;
        }

        for param in &self.optional {
            if let Some(value) = object.get(param.name) {
                check_type(param, value)?;
            }
        }

        self.check_patterns(object)
    }

    fn declares(&self, key: &str) -> bool {
        self.params().any(|param| param.name == key)
    }

    fn params(&self) -> impl Iterator<Item = &Param> {
        self.required.iter().chain(self.optional.iter())
    }

    fn check_patterns(&self, object: &Map<String, Value>) -> Result<(), String> {
        for param in self.params() {
            let (Some(pattern), Some(value)) = (&param.pattern, object.get(param.name)) else {
                continue;
            };
            let matched = value.as_str().is_some_and(|text| pattern.is_match(text));
            if !matched {
                return Err(format!(
                    "The property {} does not respect the pattern {}",
                    param.name,
                    pattern.as_str()
                ));
            }
        }
        Ok(())
    }
}

fn check_type(param: &Param, value: &Value) -> Result<(), String> {
    if param.kind.matches(value) {
        Ok(())
    } else {
        Err(format!(
            "The property {} should be of type {}",
            param.name, param.kind
        ))
    }
}

/// Schema for car create and update bodies: a brand and a country whose
/// name contains an uppercase letter.
pub fn car_schema() -> Result<BodySchema, regex::Error> {
    Ok(BodySchema::new(
        vec![
            Param::new("brand", ParamType::String),
            Param::string_matching("country", "[A-Z]")?,
        ],
        vec![],
    ))
}
