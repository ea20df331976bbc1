//! Argument marshalling and function invocation.

use pyo3::prelude::*;
use pyo3::types::PyTuple;
use serde::Serialize;
use tracing::{debug, info};

use super::convert::{error_message, text_of, to_python};
use super::resolver::resolve;
use super::session::Session;
use crate::bridge::BridgeState;
use crate::host::{PropertyHost, FIRST_ARG_INPUT};
use crate::value::TypedValue;

/// Result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "text", rename_all = "snake_case")]
pub enum CallOutcome {
    /// The function returned; `str()` of its result.
    Returned(String),
    /// The call failed; the exception message.
    Raised(String),
    /// The module or function disappeared since it was resolved.
    NotFound,
}

/// Current values of the first `count` argument inputs.
///
/// Positions without a synthesized input (arguments hidden, or fewer inputs than
/// parameters) come back as `None` and are passed as the interpreter's `None`.
pub fn collect_arguments<H: PropertyHost + ?Sized>(
    host: &H,
    count: usize,
) -> Vec<Option<TypedValue>> {
    let available = host.synthesized_count();
    (0..count)
        .map(|i| {
            if i < available {
                host.input_value(FIRST_ARG_INPUT + i)
            } else {
                None
            }
        })
        .collect()
}

/// Resolve the state's function again and call it with the argument inputs.
pub fn invoke<H: PropertyHost + ?Sized>(
    session: &Session<'_>,
    state: &BridgeState,
    host: &H,
) -> CallOutcome {
    let Some(callable) = resolve(session, state.module(), state.function()) else {
        return CallOutcome::NotFound;
    };
    let arguments = collect_arguments(host, state.parameters().len());
    debug!(
        module = callable.module(),
        function = callable.name(),
        arguments = arguments.len(),
        "invoking function"
    );

    let py = session.py();
    let outcome = PyTuple::new(
        py,
        arguments.iter().map(|value| to_python(py, value.as_ref())),
    )
    .and_then(|args| callable.object().call1(args))
    .and_then(|result| text_of(&result));

    match outcome {
        Ok(text) => {
            info!(function = callable.name(), "function returned");
            CallOutcome::Returned(text)
        }
        Err(err) => {
            let message = error_message(py, &err);
            info!(function = callable.name(), error = %message, "function raised");
            CallOutcome::Raised(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryHost, PropertyDef};
    use crate::parameter::Parameter;
    use crate::synchronizer::property_for;

    fn host_with(values: &[TypedValue]) -> MemoryHost {
        let mut host = MemoryHost::new();
        for (i, value) in values.iter().enumerate() {
            let param = Parameter::new(format!("p{i}"), value.clone());
            let def: PropertyDef = property_for(&param, FIRST_ARG_INPUT + i).unwrap();
            host.add_input(def).unwrap();
        }
        host
    }

    #[test]
    fn test_collect_reads_current_values() {
        let mut host = host_with(&[TypedValue::Integer(1), TypedValue::from("x")]);
        host.set_input(FIRST_ARG_INPUT, TypedValue::Integer(9)).unwrap();
        assert_eq!(
            collect_arguments(&host, 2),
            vec![Some(TypedValue::Integer(9)), Some(TypedValue::from("x"))]
        );
    }

    #[test]
    fn test_collect_pads_missing_inputs_with_none() {
        let host = host_with(&[TypedValue::Boolean(true)]);
        assert_eq!(
            collect_arguments(&host, 3),
            vec![Some(TypedValue::Boolean(true)), None, None]
        );
        assert_eq!(collect_arguments(&MemoryHost::new(), 2), vec![None, None]);
    }

    #[test]
    fn test_collect_ignores_extra_inputs() {
        let host = host_with(&[TypedValue::Integer(1), TypedValue::Integer(2)]);
        assert_eq!(collect_arguments(&host, 1), vec![Some(TypedValue::Integer(1))]);
        assert!(collect_arguments(&host, 0).is_empty());
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(CallOutcome::Returned("3".into())).unwrap();
        assert_eq!(json, serde_json::json!({"outcome": "returned", "text": "3"}));
        let json = serde_json::to_value(CallOutcome::NotFound).unwrap();
        assert_eq!(json, serde_json::json!({"outcome": "not_found"}));
    }
}
