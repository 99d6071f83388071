//! Declarative required-field validation for JSON request bodies.
//!
//! Each handler supplies a [`Schema`] listing its required fields and their
//! allowed types. Fields are checked in declaration order and validation
//! stops at the first failure. Field names may contain `.` to descend into
//! nested objects.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Fixed error code attached to every validation failure.
pub const VALIDATION_ERROR_CODE: u16 = 444;

const GENERIC_USER_MESSAGE: &str =
    "Unable to process the request. Please check the submitted values and try again.";

/// Allowed type tag for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl FieldType {
    /// Parse a single type tag. Unknown tags yield `None`.
    fn parse(tag: &str) -> Option<Self> {
        match tag.trim() {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            _ => None,
        }
    }

    /// Effective type of a decoded JSON value. `null` has no effective type
    /// and is treated the same as an absent field.
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) => Some(Self::String),
            Value::Number(_) => Some(Self::Number),
            Value::Bool(_) => Some(Self::Boolean),
            Value::Array(_) => Some(Self::Array),
            Value::Object(_) => Some(Self::Object),
            Value::Null => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        };
        f.write_str(tag)
    }
}

/// Set of allowed types for one field, parsed from a `|`-separated
/// specifier such as `"string|array"`.
#[derive(Debug, Clone)]
pub struct TypeSpec {
    allowed: Vec<FieldType>,
}

impl TypeSpec {
    /// Parse a `|`-separated specifier. Unrecognized tags are dropped; they
    /// could never match a decoded value anyway.
    pub fn parse(spec: &str) -> Self {
        Self {
            allowed: spec.split('|').filter_map(FieldType::parse).collect(),
        }
    }

    fn allows(&self, effective: FieldType) -> bool {
        self.allowed.contains(&effective)
    }

    fn describe(&self) -> String {
        self.allowed
            .iter()
            .map(FieldType::to_string)
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

/// Ordered required-field schema for one handler.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, TypeSpec)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required field. `name` may contain `.` for nested lookup;
    /// `spec` is a `|`-separated type list such as `"string|array"`.
    pub fn required(mut self, name: impl Into<String>, spec: &str) -> Self {
        self.fields.push((name.into(), TypeSpec::parse(spec)));
        self
    }

    fn describe_fields(&self) -> String {
        self.fields
            .iter()
            .map(|(name, spec)| format!("'{}' ({})", name, spec.describe()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Structured validation failure, serialized into the error envelope's
/// `messages` array.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationError {
    /// Developer-facing description naming the failing field and its
    /// required type, or listing all required fields when the body itself
    /// is unusable.
    pub developer_message: String,

    /// Generic user-facing message.
    pub user_message: String,

    /// Always [`VALIDATION_ERROR_CODE`].
    pub error_code: u16,
}

impl ValidationError {
    fn new(developer_message: String) -> Self {
        Self {
            developer_message,
            user_message: GENERIC_USER_MESSAGE.to_string(),
            error_code: VALIDATION_ERROR_CODE,
        }
    }
}

/// Outcome of validating a request body against a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Validate `body` against `schema`.
///
/// A missing or non-object body fails immediately with a message listing
/// every required field. Otherwise fields are checked in declaration order
/// and the first absent or mistyped field produces the failure. Pure
/// function of its inputs.
pub fn validate(body: Option<&Value>, schema: &Schema) -> ValidationResult {
    let body = match body {
        Some(value @ Value::Object(_)) => value,
        _ => {
            return ValidationResult::Invalid(ValidationError::new(format!(
                "A JSON body is required with the following fields: {}",
                schema.describe_fields()
            )));
        }
    };

    for (name, spec) in &schema.fields {
        let effective = resolve_path(body, name).and_then(FieldType::of);
        match effective {
            Some(found) if spec.allows(found) => {}
            Some(found) => {
                return ValidationResult::Invalid(ValidationError::new(format!(
                    "Field '{}' must be of type {}; found {}",
                    name,
                    spec.describe(),
                    found
                )));
            }
            None => {
                return ValidationResult::Invalid(ValidationError::new(format!(
                    "Field '{}' is required and must be of type {}",
                    name,
                    spec.describe()
                )));
            }
        }
    }

    ValidationResult::Valid
}

/// Resolve a dotted field path one object level per segment. Resolution
/// stops (yielding `None`) as soon as an intermediate segment is missing or
/// is not an object.
fn resolve_path<'a>(body: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = body;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}
