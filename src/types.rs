//! Shared types used across the tool registry and its adapters.

use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// The closed set of primitive parameter types a tool may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Double,
    Boolean,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Double => write!(f, "double"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

/// One argument slot of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
}

impl ParameterDescriptor {
    pub fn new(name: &str, description: &str, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type,
        }
    }

    pub fn string(name: &str, description: &str) -> Self {
        Self::new(name, description, ParamType::String)
    }

    pub fn integer(name: &str, description: &str) -> Self {
        Self::new(name, description, ParamType::Integer)
    }

    pub fn double(name: &str, description: &str) -> Self {
        Self::new(name, description, ParamType::Double)
    }

    pub fn boolean(name: &str, description: &str) -> Self {
        Self::new(name, description, ParamType::Boolean)
    }
}

/// Static metadata for one tool: its dispatch name, a description for the
/// model, and the parameter schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub required_parameters: Vec<ParameterDescriptor>,
    #[serde(default)]
    pub optional_parameters: Vec<ParameterDescriptor>,
}

impl ToolDescriptor {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required_parameters: Vec::new(),
            optional_parameters: Vec::new(),
        }
    }

    pub fn required(mut self, param: ParameterDescriptor) -> Self {
        self.required_parameters.push(param);
        self
    }

    pub fn optional(mut self, param: ParameterDescriptor) -> Self {
        self.optional_parameters.push(param);
        self
    }

    /// Look up a declared parameter, returning it with its required flag.
    pub fn parameter(&self, name: &str) -> Option<(&ParameterDescriptor, bool)> {
        self.required_parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| (p, true))
            .or_else(|| {
                self.optional_parameters
                    .iter()
                    .find(|p| p.name == name)
                    .map(|p| (p, false))
            })
    }

    /// All declared parameters, required first, in declaration order.
    pub fn parameters(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.required_parameters
            .iter()
            .chain(self.optional_parameters.iter())
    }
}

// ---------------------------------------------------------------------------
// Decoded arguments
// ---------------------------------------------------------------------------

/// A raw argument value after coercion to its declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
}

impl ArgValue {
    pub fn param_type(&self) -> ParamType {
        match self {
            Self::String(_) => ParamType::String,
            Self::Integer(_) => ParamType::Integer,
            Self::Double(_) => ParamType::Double,
            Self::Boolean(_) => ParamType::Boolean,
        }
    }
}

/// The validated argument bundle handed to a tool's `decode`.
///
/// Every value has already been coerced to the type its descriptor declares,
/// so a typed accessor only returns `None` when the argument was absent.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    tool: String,
    values: HashMap<String, ArgValue>,
}

impl Arguments {
    pub fn new(tool: &str) -> Self {
        Self {
            tool: tool.into(),
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, name: &str, value: ArgValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: ArgValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ArgValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn double(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(ArgValue::Double(n)) => Some(*n),
            Some(ArgValue::Integer(n)) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ArgValue::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn require_string(&self, name: &str) -> Result<&str, ToolError> {
        self.string(name).ok_or_else(|| self.missing(name))
    }

    pub fn require_double(&self, name: &str) -> Result<f64, ToolError> {
        self.double(name).ok_or_else(|| self.missing(name))
    }

    fn missing(&self, name: &str) -> ToolError {
        ToolError::MissingRequiredParameter {
            tool: self.tool.clone(),
            param: name.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Typed result of one tool execution.
///
/// Each tool keeps its own static result shape; this sum type is the uniform
/// envelope the registry hands back to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolOutput {
    Echo(crate::tools::utility::EchoOutput),
    Time(crate::tools::utility::TimeOutput),
    Calculation(crate::tools::math::Calculation),
    Base64(crate::tools::encoding::Base64Output),
    Uuids(crate::tools::encoding::UuidBatch),
    TextStats(crate::tools::text::TextStats),
    Patterns(crate::tools::text::PatternMatches),
    CharacterTypes(crate::tools::text::CharacterBreakdown),
    UrlAnalysis(crate::tools::text::UrlAnalysis),
    Weather(crate::tools::weather::WeatherReport),
    News(crate::tools::news::NewsDigest),
}

/// Successful invocation: the tool name, the typed result and its rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub raw: ToolOutput,
    pub display: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn descriptor_parameter_lookup_reports_required_flag() {
        let desc = ToolDescriptor::new("calc", "test")
            .required(ParameterDescriptor::double("a", "first"))
            .optional(ParameterDescriptor::string("operation", "op"));

        assert_eq!(desc.parameter("a").map(|(_, req)| req), Some(true));
        assert_eq!(desc.parameter("operation").map(|(_, req)| req), Some(false));
        assert!(desc.parameter("b").is_none());

        let names: Vec<_> = desc.parameters().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "operation"]);
    }

    #[test]
    fn double_accessor_widens_integers() {
        let args = Arguments::new("calc").with("a", ArgValue::Integer(42));
        assert_eq!(args.double("a"), Some(42.0));
        assert_eq!(args.integer("a"), Some(42));
        assert_eq!(args.string("a"), None);
    }

    #[test]
    fn require_reports_missing_parameter() {
        let args = Arguments::new("echo");
        let err = args.require_string("message").unwrap_err();
        assert_eq!(
            err,
            ToolError::MissingRequiredParameter {
                tool: "echo".into(),
                param: "message".into(),
            }
        );
    }

    #[test]
    fn param_type_displays_lowercase() {
        assert_eq!(ParamType::Double.to_string(), "double");
        assert_eq!(
            serde_json::to_value(ParamType::Boolean).unwrap(),
            serde_json::json!("boolean")
        );
    }
}
