//! Parameter - one discovered argument of a Python function
//!
//! A [`Parameter`] is what the bridge learns about a single positional argument
//! when it inspects a function: the argument's name, the [`ValueKind`] the host
//! input for it should have, and the value that input starts out with.
//!
//! # Lifecycle
//!
//! The signature inspector creates the whole list once per successful resolution.
//! The list is owned by the bridge instance and *replaces* the previous one; it is
//! never merged with it. The property synchronizer then mirrors the list onto the
//! host as one synthesized input per parameter.
//!
//! # Example
//!
//! ```rust
//! use py_bridge::parameter::Parameter;
//! use py_bridge::value::{TypedValue, ValueKind};
//!
//! let gain = Parameter::new("gain_float", TypedValue::Float(0.0));
//! assert_eq!(gain.kind(), ValueKind::Float);
//!
//! let label = Parameter::neutral("label", ValueKind::Text);
//! assert_eq!(label.default_value(), &TypedValue::Text(String::new()));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::{TypedValue, ValueKind};

// =============================================================================
// Parameter
// =============================================================================

/// A discovered function argument with its inferred type and default.
///
/// The kind is always the tag of the default value, so the two can never
/// disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    default: TypedValue,
}

impl Parameter {
    /// Create a parameter whose kind is taken from `default`.
    pub fn new(name: impl Into<String>, default: TypedValue) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }

    /// Create a parameter of `kind` starting at that kind's zero/empty value.
    pub fn neutral(name: impl Into<String>, kind: ValueKind) -> Self {
        Self::new(name, kind.neutral())
    }

    /// Argument name as declared by the function.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inferred type of the argument.
    pub fn kind(&self) -> ValueKind {
        self.default.kind()
    }

    /// Initial value for the argument's host input.
    pub fn default_value(&self) -> &TypedValue {
        &self.default
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} = {:?}", self.name, self.kind(), self.default.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_kind_follows_default() {
        let param = Parameter::new("arg3", TypedValue::Integer(12));
        assert_eq!(param.name(), "arg3");
        assert_eq!(param.kind(), ValueKind::Integer);
        assert_eq!(param.default_value(), &TypedValue::Integer(12));
    }

    #[test]
    fn test_parameter_neutral() {
        let param = Parameter::neutral("flag_bool", ValueKind::Boolean);
        assert_eq!(param.default_value(), &TypedValue::Boolean(false));
    }

    #[test]
    fn test_parameter_display() {
        let param = Parameter::new("arg2", TypedValue::from("default"));
        assert_eq!(param.to_string(), r#"arg2: text = "default""#);
    }

    #[test]
    fn test_parameter_serializes_with_tagged_default() {
        let param = Parameter::new("b_int", TypedValue::Integer(0));
        let json = serde_json::to_value(&param).unwrap();
        assert_eq!(json["name"], "b_int");
        assert_eq!(json["default"]["kind"], "integer");
    }
}
