//! In-memory property host.
//!
//! `MemoryHost` keeps the actor's properties in plain vectors. It behaves like the
//! real host where the bridge can observe the difference: typed slots coerce what
//! is assigned to them, conforming slots take any type, trigger outputs count
//! their pulses, and removing an input shifts the later ones down.

use tracing::debug;

use super::{fixed_inputs, outputs, Output, PropertyDef, PropertyHost, FIRST_ARG_INPUT};
use crate::error::{BridgeError, BridgeResult};
use crate::value::TypedValue;

/// An input property and its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSlot {
    /// How the property was defined.
    pub def: PropertyDef,
    /// Current value.
    pub value: TypedValue,
}

/// A [`PropertyHost`] backed by vectors.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    inputs: Vec<InputSlot>,
    outputs: Vec<TypedValue>,
    pulses: Vec<usize>,
    input_limit: Option<usize>,
}

impl MemoryHost {
    /// A host holding the fixed inputs and the outputs at their initial values.
    pub fn new() -> Self {
        let inputs = fixed_inputs()
            .into_iter()
            .map(|def| InputSlot {
                value: def.initial.clone(),
                def,
            })
            .collect();
        let outputs: Vec<TypedValue> = outputs().into_iter().map(|def| def.initial).collect();
        let pulses = vec![0; outputs.len()];
        Self {
            inputs,
            outputs,
            pulses,
            input_limit: None,
        }
    }

    /// Refuse to grow past `limit` inputs, like a host running out of slots.
    pub fn with_input_limit(mut self, limit: usize) -> Self {
        self.input_limit = Some(limit);
        self
    }

    /// Assign a value to an input as the user or an upstream connection would.
    ///
    /// Returns the value actually stored, which is what the host hands to the
    /// actor's property-change callback.
    pub fn set_input(&mut self, index: usize, value: TypedValue) -> BridgeResult<TypedValue> {
        let slot = index
            .checked_sub(1)
            .and_then(|i| self.inputs.get_mut(i))
            .ok_or(BridgeError::NoSuchInput(index))?;
        slot.value = if slot.def.conforming {
            value
        } else {
            value.coerce(slot.def.kind())
        };
        Ok(slot.value.clone())
    }

    /// The input at a one-based index.
    pub fn input(&self, index: usize) -> Option<&InputSlot> {
        index.checked_sub(1).and_then(|i| self.inputs.get(i))
    }

    /// The synthesized argument inputs, in order.
    pub fn synthesized(&self) -> &[InputSlot] {
        self.inputs.get(FIRST_ARG_INPUT - 1..).unwrap_or(&[])
    }

    /// One-based index of the synthesized input called `name`.
    pub fn find_argument(&self, name: &str) -> Option<usize> {
        self.synthesized()
            .iter()
            .position(|slot| slot.def.name == name)
            .map(|pos| pos + FIRST_ARG_INPUT)
    }

    /// Current value of an output.
    pub fn output(&self, output: Output) -> &TypedValue {
        &self.outputs[output.index() - 1]
    }

    /// How often an output has been pulsed.
    pub fn pulses(&self, output: Output) -> usize {
        self.pulses[output.index() - 1]
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyHost for MemoryHost {
    fn input_count(&self) -> usize {
        self.inputs.len()
    }

    fn input_value(&self, index: usize) -> Option<TypedValue> {
        self.input(index).map(|slot| slot.value.clone())
    }

    fn add_input(&mut self, def: PropertyDef) -> BridgeResult<()> {
        if let Some(limit) = self.input_limit {
            if self.inputs.len() >= limit {
                return Err(BridgeError::Host(format!(
                    "cannot add input '{}': limit of {} inputs reached",
                    def.name, limit
                )));
            }
        }
        debug!(id = %def.id, name = %def.name, kind = %def.kind(), "adding input");
        self.inputs.push(InputSlot {
            value: def.initial.clone(),
            def,
        });
        Ok(())
    }

    fn remove_input(&mut self, index: usize) -> BridgeResult<()> {
        if index == 0 || index > self.inputs.len() {
            return Err(BridgeError::NoSuchInput(index));
        }
        let slot = self.inputs.remove(index - 1);
        debug!(id = %slot.def.id, name = %slot.def.name, "removed input");
        Ok(())
    }

    fn set_output(&mut self, output: Output, value: TypedValue) {
        self.outputs[output.index() - 1] = value;
    }

    fn pulse_output(&mut self, output: Output) {
        self.outputs[output.index() - 1] = TypedValue::Boolean(true);
        self.pulses[output.index() - 1] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DisplayFormat, FixedInput, PropertyId};
    use crate::value::ValueKind;

    fn argument(name: &str, initial: TypedValue, index: usize) -> PropertyDef {
        PropertyDef {
            id: PropertyId::synthesized(index).unwrap(),
            name: name.to_string(),
            format: DisplayFormat::Number,
            min: TypedValue::Integer(0),
            max: TypedValue::Integer(10),
            initial,
            conforming: true,
        }
    }

    #[test]
    fn test_new_host_has_fixed_inputs_only() {
        let host = MemoryHost::new();
        assert_eq!(host.input_count(), FIRST_ARG_INPUT - 1);
        assert_eq!(host.synthesized_count(), 0);
        assert_eq!(host.output(Output::FunctionFound), &TypedValue::Boolean(false));
        assert_eq!(host.output(Output::Error), &TypedValue::empty_text());
    }

    #[test]
    fn test_typed_slot_coerces() {
        let mut host = MemoryHost::new();
        let stored = host
            .set_input(FixedInput::Module.index(), TypedValue::Integer(5))
            .unwrap();
        assert_eq!(stored, TypedValue::Text("5".into()));
        let stored = host
            .set_input(FixedInput::GetArgs.index(), TypedValue::Integer(1))
            .unwrap();
        assert_eq!(stored, TypedValue::Boolean(true));
    }

    #[test]
    fn test_conforming_slot_keeps_type() {
        let mut host = MemoryHost::new();
        host.add_input(argument("a_int", TypedValue::Integer(0), 6))
            .unwrap();
        let stored = host.set_input(6, TypedValue::from("text")).unwrap();
        assert_eq!(stored.kind(), ValueKind::Text);
        assert_eq!(host.find_argument("a_int"), Some(6));
    }

    #[test]
    fn test_remove_shifts_later_inputs() {
        let mut host = MemoryHost::new();
        host.add_input(argument("a", TypedValue::Integer(1), 6)).unwrap();
        host.add_input(argument("b", TypedValue::Integer(2), 7)).unwrap();
        host.remove_input(6).unwrap();
        assert_eq!(host.synthesized().len(), 1);
        assert_eq!(host.synthesized()[0].def.name, "b");
        assert!(matches!(
            host.remove_input(42),
            Err(BridgeError::NoSuchInput(42))
        ));
    }

    #[test]
    fn test_input_limit() {
        let mut host = MemoryHost::new().with_input_limit(FIRST_ARG_INPUT);
        host.add_input(argument("a", TypedValue::Integer(1), 6)).unwrap();
        let err = host
            .add_input(argument("b", TypedValue::Integer(2), 7))
            .unwrap_err();
        assert!(matches!(err, BridgeError::Host(_)));
    }

    #[test]
    fn test_pulse_counts() {
        let mut host = MemoryHost::new();
        host.pulse_output(Output::FunctionRan);
        host.pulse_output(Output::FunctionRan);
        assert_eq!(host.pulses(Output::FunctionRan), 2);
        assert_eq!(host.pulses(Output::FunctionFound), 0);
    }

    #[test]
    fn test_set_input_unknown_index() {
        let mut host = MemoryHost::new();
        assert!(matches!(
            host.set_input(0, TypedValue::Integer(1)),
            Err(BridgeError::NoSuchInput(0))
        ));
    }
}
