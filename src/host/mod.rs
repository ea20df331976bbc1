//! Host property system interface.
//!
//! The node-graph host owns the actor's input and output properties. The bridge
//! only talks to them through [`PropertyHost`], so the same bridge code drives the
//! real host and the in-memory [`MemoryHost`] used by tests and the CLI.
//!
//! # Layout
//!
//! Properties are addressed by one-based index, as the host does it.
//!
//! ```text
//! inputs:  1 trigger | 2 path | 3 module | 4 function | 5 get_args | 6.. arguments
//! outputs: 1 function_found | 2 function_ran | 3 error | 4 output
//! ```
//!
//! Everything from [`FIRST_ARG_INPUT`] on is a synthesized argument input.

pub mod memory;
pub mod property_id;

pub use memory::MemoryHost;
pub use property_id::PropertyId;

use crate::error::BridgeResult;
use crate::value::{TypedValue, ValueKind};

/// One-based index of the first synthesized argument input.
pub const FIRST_ARG_INPUT: usize = 6;

/// Bounds used for numeric argument inputs (full signed 32-bit range, symmetric).
pub const NUMERIC_LIMIT: i64 = 2_147_483_647;

/// Fixed inputs, by one-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedInput {
    /// Run the function.
    Trigger = 1,
    /// Directory appended to the module search path.
    Path = 2,
    /// Module to import.
    Module = 3,
    /// Function to resolve in the module.
    Function = 4,
    /// Show or hide the argument inputs.
    GetArgs = 5,
}

impl FixedInput {
    /// Map a one-based input index to a fixed input.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            1 => Some(FixedInput::Trigger),
            2 => Some(FixedInput::Path),
            3 => Some(FixedInput::Module),
            4 => Some(FixedInput::Function),
            5 => Some(FixedInput::GetArgs),
            _ => None,
        }
    }

    /// One-based index of this input.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Outputs, by one-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Whether the last resolution found a callable.
    FunctionFound = 1,
    /// Pulsed after each successful call.
    FunctionRan = 2,
    /// Message of the last failed call, empty after a success.
    Error = 3,
    /// Textual form of the last successful return value.
    Result = 4,
}

impl Output {
    /// One-based index of this output.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// How the host displays and edits a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayFormat {
    /// Free-form text.
    Text,
    /// Numeric field.
    Number,
    /// Toggle.
    OnOff,
    /// Momentary pulse.
    Trigger,
}

/// Everything the host needs to create a property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    /// Four-character property code.
    pub id: PropertyId,
    /// Display name.
    pub name: String,
    /// Display format.
    pub format: DisplayFormat,
    /// Lower bound (empty text for unrestricted text).
    pub min: TypedValue,
    /// Upper bound (empty text for unrestricted text).
    pub max: TypedValue,
    /// Initial value; its tag is the property's type.
    pub initial: TypedValue,
    /// When set, the slot adopts the type of whatever gets connected to it.
    pub conforming: bool,
}

impl PropertyDef {
    /// Declared type of the property.
    pub fn kind(&self) -> ValueKind {
        self.initial.kind()
    }

    fn fixed(code: &[u8; 4], name: &str, format: DisplayFormat, initial: TypedValue) -> Self {
        let (min, max) = match initial.kind() {
            ValueKind::Boolean => (TypedValue::Boolean(false), TypedValue::Boolean(true)),
            _ => (TypedValue::empty_text(), TypedValue::empty_text()),
        };
        Self {
            id: PropertyId::new(*code),
            name: name.to_string(),
            format,
            min,
            max,
            initial,
            conforming: false,
        }
    }
}

/// Fixed input properties, in index order.
pub fn fixed_inputs() -> Vec<PropertyDef> {
    vec![
        PropertyDef::fixed(b"trig", "trigger", DisplayFormat::Trigger, false.into()),
        PropertyDef::fixed(b"path", "path", DisplayFormat::Text, TypedValue::empty_text()),
        PropertyDef::fixed(b"file", "module", DisplayFormat::Text, TypedValue::empty_text()),
        PropertyDef::fixed(b"func", "function", DisplayFormat::Text, TypedValue::empty_text()),
        PropertyDef::fixed(b"parm", "get_args", DisplayFormat::OnOff, false.into()),
    ]
}

/// Output properties, in index order.
pub fn outputs() -> Vec<PropertyDef> {
    vec![
        PropertyDef::fixed(b"fnd ", "function_found", DisplayFormat::OnOff, false.into()),
        PropertyDef::fixed(b"ran ", "function_ran", DisplayFormat::Trigger, false.into()),
        PropertyDef::fixed(b"err ", "error", DisplayFormat::Text, TypedValue::empty_text()),
        PropertyDef::fixed(b"out ", "output", DisplayFormat::Text, TypedValue::empty_text()),
    ]
}

// =============================================================================
// PropertyHost
// =============================================================================

/// The operations the bridge needs from the host's property system.
///
/// Indices are one-based. Implementations are driven from the host's control
/// thread only, one property change at a time.
pub trait PropertyHost {
    /// Number of input properties, fixed and synthesized.
    fn input_count(&self) -> usize;

    /// Current value of the input at `index`, if it exists.
    fn input_value(&self, index: usize) -> Option<TypedValue>;

    /// Append an input property after the existing ones.
    fn add_input(&mut self, def: PropertyDef) -> BridgeResult<()>;

    /// Remove the input at `index`; later inputs shift down by one.
    fn remove_input(&mut self, index: usize) -> BridgeResult<()>;

    /// Publish a value on an output.
    fn set_output(&mut self, output: Output, value: TypedValue);

    /// Fire a trigger output.
    fn pulse_output(&mut self, output: Output);

    /// Number of synthesized argument inputs.
    fn synthesized_count(&self) -> usize {
        self.input_count().saturating_sub(FIRST_ARG_INPUT - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_layout_matches_indices() {
        let inputs = fixed_inputs();
        assert_eq!(inputs.len(), FIRST_ARG_INPUT - 1);
        assert_eq!(inputs[FixedInput::Module.index() - 1].name, "module");
        assert_eq!(inputs[FixedInput::GetArgs.index() - 1].id.to_string(), "parm");

        let outs = outputs();
        assert_eq!(outs[Output::Result.index() - 1].name, "output");
        assert_eq!(outs[Output::FunctionRan.index() - 1].format, DisplayFormat::Trigger);
    }

    #[test]
    fn test_fixed_input_round_trip() {
        for index in 1..FIRST_ARG_INPUT {
            let input = FixedInput::from_index(index).unwrap();
            assert_eq!(input.index(), index);
        }
        assert_eq!(FixedInput::from_index(FIRST_ARG_INPUT), None);
        assert_eq!(FixedInput::from_index(0), None);
    }
}
