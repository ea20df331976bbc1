//! Keeps the host's argument inputs in step with a parameter list.
//!
//! Synchronization is always a full rebuild: every synthesized input is removed,
//! last first, and one input per [`Parameter`] is appended in order. Afterwards the
//! host holds exactly `parameters.len()` argument inputs starting at
//! [`FIRST_ARG_INPUT`].
//!
//! Synthesized inputs conform to whatever gets connected to them, so a value of a
//! different type than the inferred one can still reach the function.

use tracing::debug;

use crate::error::BridgeResult;
use crate::host::{DisplayFormat, PropertyDef, PropertyHost, PropertyId, FIRST_ARG_INPUT, NUMERIC_LIMIT};
use crate::parameter::Parameter;
use crate::value::{TypedValue, ValueKind};

/// Property definition for `parameter` placed at the one-based input `index`.
pub fn property_for(parameter: &Parameter, index: usize) -> BridgeResult<PropertyDef> {
    let (format, min, max) = match parameter.kind() {
        ValueKind::Text => (
            DisplayFormat::Text,
            TypedValue::empty_text(),
            TypedValue::empty_text(),
        ),
        ValueKind::Integer => (
            DisplayFormat::Number,
            TypedValue::Integer(-NUMERIC_LIMIT),
            TypedValue::Integer(NUMERIC_LIMIT),
        ),
        ValueKind::Float => (
            DisplayFormat::Number,
            TypedValue::Float(-(NUMERIC_LIMIT as f64)),
            TypedValue::Float(NUMERIC_LIMIT as f64),
        ),
        ValueKind::Boolean => (
            DisplayFormat::OnOff,
            TypedValue::Boolean(false),
            TypedValue::Boolean(true),
        ),
    };
    Ok(PropertyDef {
        id: PropertyId::synthesized(index)?,
        name: parameter.name().to_string(),
        format,
        min,
        max,
        initial: parameter.default_value().clone(),
        conforming: true,
    })
}

/// Remove every synthesized input, last first.
pub fn clear<H: PropertyHost + ?Sized>(host: &mut H) -> BridgeResult<()> {
    let count = host.input_count();
    for index in (FIRST_ARG_INPUT..=count).rev() {
        host.remove_input(index)?;
    }
    if count >= FIRST_ARG_INPUT {
        debug!(removed = count + 1 - FIRST_ARG_INPUT, "cleared argument inputs");
    }
    Ok(())
}

/// Replace the synthesized inputs with one input per parameter.
pub fn synchronize<H: PropertyHost + ?Sized>(
    host: &mut H,
    parameters: &[Parameter],
) -> BridgeResult<()> {
    clear(host)?;
    for parameter in parameters {
        let def = property_for(parameter, host.input_count() + 1)?;
        host.add_input(def)?;
    }
    debug!(count = parameters.len(), "synchronized argument inputs");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::host::MemoryHost;

    fn params() -> Vec<Parameter> {
        vec![
            Parameter::new("label", TypedValue::from("hi")),
            Parameter::new("count_int", TypedValue::Integer(3)),
            Parameter::new("gain_flt", TypedValue::Float(0.5)),
            Parameter::new("enabled", TypedValue::Boolean(true)),
        ]
    }

    #[test]
    fn test_property_definitions() {
        let defs: Vec<PropertyDef> = params()
            .iter()
            .enumerate()
            .map(|(i, p)| property_for(p, FIRST_ARG_INPUT + i).unwrap())
            .collect();

        assert_eq!(defs[0].id.to_string(), "in06");
        assert_eq!(defs[0].format, DisplayFormat::Text);
        assert_eq!(defs[0].min, TypedValue::empty_text());

        assert_eq!(defs[1].format, DisplayFormat::Number);
        assert_eq!(defs[1].min, TypedValue::Integer(-2_147_483_647));
        assert_eq!(defs[1].max, TypedValue::Integer(2_147_483_647));
        assert_eq!(defs[1].initial, TypedValue::Integer(3));

        assert_eq!(defs[2].max, TypedValue::Float(2_147_483_647.0));
        assert_eq!(defs[3].format, DisplayFormat::OnOff);
        assert_eq!(defs[3].id.to_string(), "in09");
        assert!(defs.iter().all(|def| def.conforming));
    }

    #[test]
    fn test_synchronize_count_and_order() {
        let mut host = MemoryHost::new();
        synchronize(&mut host, &params()).unwrap();
        assert_eq!(host.synthesized_count(), 4);
        let names: Vec<&str> = host.synthesized().iter().map(|s| s.def.name.as_str()).collect();
        assert_eq!(names, vec!["label", "count_int", "gain_flt", "enabled"]);
        assert_eq!(host.input_value(FIRST_ARG_INPUT + 1), Some(TypedValue::Integer(3)));
    }

    #[test]
    fn test_resynchronize_replaces_inputs() {
        let mut host = MemoryHost::new();
        synchronize(&mut host, &params()).unwrap();
        host.set_input(FIRST_ARG_INPUT + 1, TypedValue::Integer(99)).unwrap();

        let shorter = vec![Parameter::neutral("x_int", ValueKind::Integer)];
        synchronize(&mut host, &shorter).unwrap();
        assert_eq!(host.synthesized_count(), 1);
        assert_eq!(host.synthesized()[0].def.name, "x_int");
        assert_eq!(host.input_value(FIRST_ARG_INPUT), Some(TypedValue::Integer(0)));
    }

    #[test]
    fn test_clear_keeps_fixed_inputs() {
        let mut host = MemoryHost::new();
        synchronize(&mut host, &params()).unwrap();
        clear(&mut host).unwrap();
        assert_eq!(host.synthesized_count(), 0);
        assert_eq!(host.input_count(), FIRST_ARG_INPUT - 1);

        // Clearing an already clear host is a no-op.
        clear(&mut host).unwrap();
        assert_eq!(host.input_count(), FIRST_ARG_INPUT - 1);
    }

    #[test]
    fn test_empty_parameter_list() {
        let mut host = MemoryHost::new();
        synchronize(&mut host, &params()).unwrap();
        synchronize(&mut host, &[]).unwrap();
        assert_eq!(host.synthesized_count(), 0);
    }

    #[test]
    fn test_host_refusal_stops_synchronization() {
        let mut host = MemoryHost::new().with_input_limit(FIRST_ARG_INPUT + 1);
        let err = synchronize(&mut host, &params()).unwrap_err();
        assert!(matches!(err, BridgeError::Host(_)));
        assert_eq!(host.synthesized_count(), 2);
    }
}
