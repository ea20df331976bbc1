//! Typed values shared by the host and the bridge.
//!
//! Every value that crosses the bridge is a [`TypedValue`]: the host reads and writes
//! its property slots with them, and the interpreter side converts to and from them.
//! The set of tags is closed on purpose. A value the host cannot represent natively
//! is carried as text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag of a [`TypedValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// 64-bit signed integer.
    Integer,
    /// Double-precision float.
    Float,
    /// On/off.
    Boolean,
    /// Owned text, possibly empty.
    Text,
}

impl ValueKind {
    /// The zero/empty value of this kind.
    pub fn neutral(self) -> TypedValue {
        match self {
            ValueKind::Integer => TypedValue::Integer(0),
            ValueKind::Float => TypedValue::Float(0.0),
            ValueKind::Boolean => TypedValue::Boolean(false),
            ValueKind::Text => TypedValue::Text(String::new()),
        }
    }

    /// Lowercase name used in logs and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::Text => "text",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A host-typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum TypedValue {
    /// 64-bit signed integer.
    Integer(i64),
    /// Double-precision float.
    Float(f64),
    /// On/off.
    Boolean(bool),
    /// Owned text, possibly empty.
    Text(String),
}

impl TypedValue {
    /// Empty text.
    pub fn empty_text() -> Self {
        TypedValue::Text(String::new())
    }

    /// The tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            TypedValue::Integer(_) => ValueKind::Integer,
            TypedValue::Float(_) => ValueKind::Float,
            TypedValue::Boolean(_) => ValueKind::Boolean,
            TypedValue::Text(_) => ValueKind::Text,
        }
    }

    /// Interpret the value as a host on/off flag. Numbers are "on" when non-zero,
    /// text when non-empty.
    pub fn is_on(&self) -> bool {
        match self {
            TypedValue::Integer(i) => *i != 0,
            TypedValue::Float(f) => *f != 0.0,
            TypedValue::Boolean(b) => *b,
            TypedValue::Text(s) => !s.is_empty(),
        }
    }

    /// Parse user-supplied text as a value of `kind`.
    ///
    /// Booleans accept `1/0`, `true/false`, `on/off`, `yes/no` (case-insensitive).
    /// Returns `None` when the text is not a valid literal of that kind.
    pub fn parse(kind: ValueKind, text: &str) -> Option<Self> {
        let trimmed = text.trim();
        match kind {
            ValueKind::Integer => trimmed.parse().ok().map(TypedValue::Integer),
            ValueKind::Float => trimmed.parse().ok().map(TypedValue::Float),
            ValueKind::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => Some(TypedValue::Boolean(true)),
                "0" | "false" | "off" | "no" => Some(TypedValue::Boolean(false)),
                _ => None,
            },
            ValueKind::Text => Some(TypedValue::Text(text.to_string())),
        }
    }

    /// Convert to `kind` the way a typed host slot does when a value of another
    /// type is assigned to it. Unparseable text becomes the neutral value.
    pub fn coerce(self, kind: ValueKind) -> Self {
        if self.kind() == kind {
            return self;
        }
        match (self, kind) {
            (TypedValue::Integer(i), ValueKind::Float) => TypedValue::Float(i as f64),
            (TypedValue::Float(f), ValueKind::Integer) => TypedValue::Integer(f as i64),
            (TypedValue::Boolean(b), ValueKind::Integer) => TypedValue::Integer(i64::from(b)),
            (TypedValue::Boolean(b), ValueKind::Float) => {
                TypedValue::Float(if b { 1.0 } else { 0.0 })
            }
            (TypedValue::Text(s), kind) => {
                TypedValue::parse(kind, &s).unwrap_or_else(|| kind.neutral())
            }
            (value, ValueKind::Boolean) => TypedValue::Boolean(value.is_on()),
            (value, ValueKind::Text) => TypedValue::Text(value.to_string()),
            (_, kind) => kind.neutral(),
        }
    }

    /// Convert a value from a foreign runtime.
    ///
    /// Exactly four runtime types map onto the matching tag; everything else,
    /// including subclasses and values outside the payload range, falls back to
    /// text using the foreign value's own textual form.
    pub fn from_foreign<V: ForeignValue + ?Sized>(value: &V) -> Self {
        let typed = match value.exact_kind() {
            Some(ValueKind::Integer) => value.to_i64().map(TypedValue::Integer),
            Some(ValueKind::Float) => value.to_f64().map(TypedValue::Float),
            Some(ValueKind::Boolean) => value.to_bool().map(TypedValue::Boolean),
            Some(ValueKind::Text) | None => None,
        };
        typed.unwrap_or_else(|| TypedValue::Text(value.textual_form()))
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Integer(i) => write!(f, "{}", i),
            TypedValue::Float(x) => write!(f, "{}", x),
            TypedValue::Boolean(b) => f.write_str(if *b { "1" } else { "0" }),
            TypedValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        TypedValue::Integer(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        TypedValue::Float(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::Boolean(value)
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::Text(value.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        TypedValue::Text(value)
    }
}

// =============================================================================
// ForeignValue - capability view of an interpreter object
// =============================================================================

/// What the bridge needs to know about a value owned by a foreign runtime.
///
/// Implemented for interpreter objects in [`crate::scripting::convert`]; tests use
/// plain Rust stand-ins.
pub trait ForeignValue {
    /// The tag whose runtime type this value has *exactly*, or `None`.
    fn exact_kind(&self) -> Option<ValueKind>;

    /// Integer payload, if representable as `i64`.
    fn to_i64(&self) -> Option<i64>;

    /// Float payload.
    fn to_f64(&self) -> Option<f64>;

    /// Boolean payload.
    fn to_bool(&self) -> Option<bool>;

    /// The runtime's own textual form of the value.
    fn textual_form(&self) -> String;
}
