//! Input schemas and argument validation for tools.
//!
//! Arguments arrive as a raw JSON object from the orchestrator and are
//! checked against the declared schema before any external call is made.

use crate::error::{Result, VerktoyError};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Declared type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    StringList,
}

impl ParamType {
    fn json_schema(&self) -> Value {
        match self {
            ParamType::String => json!({"type": "string"}),
            ParamType::Integer => json!({"type": "integer"}),
            ParamType::Number => json!({"type": "number"}),
            ParamType::Boolean => json!({"type": "boolean"}),
            ParamType::StringList => json!({"type": "array", "items": {"type": "string"}}),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::StringList => "list of strings",
        }
    }
}

/// A single declared parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamType,
    pub description: String,
    pub required: bool,
}

/// Ordered parameter declarations for one tool.
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    params: Vec<ParamSpec>,
}

impl InputSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a required parameter.
    pub fn required(mut self, name: &str, kind: ParamType, description: &str) -> Self {
        self.params.push(ParamSpec {
            name: name.to_string(),
            kind,
            description: description.to_string(),
            required: true,
        });
        self
    }

    /// Add an optional parameter.
    pub fn optional(mut self, name: &str, kind: ParamType, description: &str) -> Self {
        self.params.push(ParamSpec {
            name: name.to_string(),
            kind,
            description: description.to_string(),
            required: false,
        });
        self
    }

    /// Declared parameters, in declaration order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Render as a JSON Schema object for function-calling definitions.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.params {
            let mut prop = param
                .kind
                .json_schema()
                .as_object()
                .cloned()
                .unwrap_or_default();
            prop.insert("description".to_string(), json!(param.description));
            properties.insert(param.name.clone(), Value::Object(prop));

            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }

    /// Validate a raw JSON argument object against this schema.
    ///
    /// Fails fast: missing required arguments, mistyped arguments, and
    /// unknown argument names are all rejected here, before the tool touches
    /// its external resource. A bare string supplied for a list parameter is
    /// promoted to a one-element list.
    pub fn validate(&self, raw: &Value) -> Result<ToolArgs> {
        let object = raw.as_object().ok_or_else(|| {
            VerktoyError::InvalidArgument("arguments must be a JSON object".to_string())
        })?;

        for key in object.keys() {
            if !self.params.iter().any(|p| p.name == *key) {
                return Err(VerktoyError::InvalidArgument(format!(
                    "unexpected argument '{}'",
                    key
                )));
            }
        }

        let mut values = BTreeMap::new();
        for param in &self.params {
            match object.get(&param.name) {
                None | Some(Value::Null) => {
                    if param.required {
                        return Err(VerktoyError::InvalidArgument(format!(
                            "missing required argument '{}'",
                            param.name
                        )));
                    }
                }
                Some(value) => {
                    values.insert(param.name.clone(), coerce(param, value)?);
                }
            }
        }

        Ok(ToolArgs { values })
    }
}

fn coerce(param: &ParamSpec, value: &Value) -> Result<ArgValue> {
    match (param.kind, value) {
        (ParamType::String, Value::String(s)) => Ok(ArgValue::Str(s.clone())),
        (ParamType::Integer, Value::Number(n)) if n.is_i64() => {
            Ok(ArgValue::Int(n.as_i64().unwrap_or_default()))
        }
        (ParamType::Number, Value::Number(n)) => {
            Ok(ArgValue::Num(n.as_f64().unwrap_or_default()))
        }
        (ParamType::Boolean, Value::Bool(b)) => Ok(ArgValue::Bool(*b)),
        // A single scalar is promoted to a one-element list.
        (ParamType::StringList, Value::String(s)) => Ok(ArgValue::List(vec![s.clone()])),
        (ParamType::StringList, Value::Array(items)) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => list.push(s.clone()),
                    _ => {
                        return Err(VerktoyError::InvalidArgument(format!(
                            "argument '{}' must be a {}",
                            param.name,
                            param.kind.label()
                        )))
                    }
                }
            }
            Ok(ArgValue::List(list))
        }
        _ => Err(VerktoyError::InvalidArgument(format!(
            "argument '{}' must be a {}",
            param.name,
            param.kind.label()
        ))),
    }
}

/// A validated argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Num(f64),
    Bool(bool),
    List(Vec<String>),
}

/// Validated, typed argument values for one invocation.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    values: BTreeMap<String, ArgValue>,
}

impl ToolArgs {
    /// Get a string argument. Errors if absent, so only call this for
    /// required parameters.
    pub fn str(&self, name: &str) -> Result<&str> {
        match self.values.get(name) {
            Some(ArgValue::Str(s)) => Ok(s),
            _ => Err(VerktoyError::InvalidArgument(format!(
                "missing required argument '{}'",
                name
            ))),
        }
    }

    /// Get an optional string-list argument.
    pub fn str_list(&self, name: &str) -> Option<&[String]> {
        match self.values.get(name) {
            Some(ArgValue::List(list)) => Some(list.as_slice()),
            _ => None,
        }
    }

    /// Get an optional integer argument.
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ArgValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Get an optional number argument.
    pub fn num(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(ArgValue::Num(n)) => Some(*n),
            _ => None,
        }
    }

    /// Get an optional boolean argument.
    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ArgValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> InputSchema {
        InputSchema::new()
            .required("query", ParamType::String, "The search query")
            .optional("sources", ParamType::StringList, "Source filter")
            .optional("limit", ParamType::Integer, "Result count")
    }

    #[test]
    fn test_validate_accepts_valid_args() {
        let args = schema()
            .validate(&json!({"query": "ownership", "limit": 3}))
            .unwrap();
        assert_eq!(args.str("query").unwrap(), "ownership");
        assert_eq!(args.int("limit"), Some(3));
        assert!(args.str_list("sources").is_none());
    }

    #[test]
    fn test_validate_rejects_missing_required() {
        let err = schema().validate(&json!({"limit": 3})).unwrap_err();
        assert!(err.to_string().contains("missing required argument 'query'"));
    }

    #[test]
    fn test_validate_rejects_wrong_type() {
        let err = schema().validate(&json!({"query": 42})).unwrap_err();
        assert!(err.to_string().contains("'query' must be a string"));
    }

    #[test]
    fn test_validate_rejects_unknown_argument() {
        let err = schema()
            .validate(&json!({"query": "x", "filter": "y"}))
            .unwrap_err();
        assert!(err.to_string().contains("unexpected argument 'filter'"));
    }

    #[test]
    fn test_validate_rejects_non_object() {
        let err = schema().validate(&json!("just a string")).unwrap_err();
        assert!(err.to_string().contains("JSON object"));
    }

    #[test]
    fn test_scalar_promoted_to_list() {
        let args = schema()
            .validate(&json!({"query": "x", "sources": "guide"}))
            .unwrap();
        assert_eq!(args.str_list("sources").unwrap(), ["guide".to_string()]);

        let args = schema()
            .validate(&json!({"query": "x", "sources": ["guide"]}))
            .unwrap();
        assert_eq!(args.str_list("sources").unwrap(), ["guide".to_string()]);
    }

    #[test]
    fn test_list_with_non_string_items_rejected() {
        let err = schema()
            .validate(&json!({"query": "x", "sources": [1, 2]}))
            .unwrap_err();
        assert!(err.to_string().contains("'sources' must be a list of strings"));
    }

    #[test]
    fn test_null_optional_is_absent() {
        let args = schema()
            .validate(&json!({"query": "x", "sources": null}))
            .unwrap();
        assert!(args.str_list("sources").is_none());
    }

    #[test]
    fn test_json_schema_rendering() {
        let rendered = schema().to_json_schema();
        assert_eq!(rendered["type"], "object");
        assert_eq!(rendered["properties"]["query"]["type"], "string");
        assert_eq!(rendered["properties"]["sources"]["type"], "array");
        assert_eq!(rendered["properties"]["sources"]["items"]["type"], "string");
        assert_eq!(rendered["required"], json!(["query"]));
    }
}
