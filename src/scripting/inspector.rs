//! Signature inspection and parameter type inference.
//!
//! Each positional parameter of a resolved function becomes a [`Parameter`]:
//!
//! 1. Declared defaults are aligned to the *end* of the parameter list. With N
//!    parameters and K defaults, defaults belong to parameters N−K … N−1.
//! 2. A parameter with a default takes its type from the default's exact runtime
//!    type: `int`, `float` and `bool` map onto the matching kind, anything else
//!    becomes text holding `str(default)`.
//! 3. A parameter without a default is typed by its name. The name is split on
//!    `_`; if a segment follows the stem, the last one decides: `int` → integer,
//!    `float` or `flt` → float, `bool` → boolean, anything else → text. The
//!    value starts at the kind's zero/empty value.
//!
//! Only positional parameters take part. `*args`, `**kwargs` and keyword-only
//! parameters are never exposed as inputs, and neither is the `self` of a bound
//! method or a class.
//!
//! ```text
//! def f(a, b_int, c_flt=3.0)  ->  [a: text "", b_int: integer 0, c_flt: float 3.0]
//! ```

use pyo3::prelude::*;
use tracing::debug;

use super::resolver::Callable;
use crate::parameter::Parameter;
use crate::value::{ForeignValue, TypedValue, ValueKind};

/// Declared positional parameters of a callable and their defaults.
#[derive(Debug)]
pub struct Signature<'py> {
    /// Parameter names in declaration order.
    pub names: Vec<String>,
    /// Default values, aligned to the end of `names`.
    pub defaults: Vec<Bound<'py, PyAny>>,
}

impl Signature<'_> {
    /// Infer the parameter list.
    pub fn parameters(&self) -> Vec<Parameter> {
        inspect(&self.names, &self.defaults)
    }
}

/// Read the declared signature of `callable`.
///
/// Returns `None` when the interpreter cannot introspect it (e.g. some builtins);
/// callers treat that like a function that was not found.
pub fn read_signature<'py>(callable: &Callable<'py>) -> Option<Signature<'py>> {
    match positional_signature(callable) {
        Ok(signature) => Some(signature),
        Err(err) => {
            debug!(
                module = callable.module(),
                function = callable.name(),
                error = %err,
                "signature introspection failed"
            );
            None
        }
    }
}

fn positional_signature<'py>(callable: &Callable<'py>) -> PyResult<Signature<'py>> {
    let object = callable.object();
    let inspect = object.py().import("inspect")?;
    // `signature` drops the bound first argument of methods and classes.
    let signature = inspect.call_method1("signature", (object.clone(),))?;
    let kinds = inspect.getattr("Parameter")?;
    let positional = [
        kinds.getattr("POSITIONAL_ONLY")?,
        kinds.getattr("POSITIONAL_OR_KEYWORD")?,
    ];
    let empty = kinds.getattr("empty")?;

    let mut names = Vec::new();
    let mut defaults = Vec::new();
    for param in signature.getattr("parameters")?.call_method0("values")?.try_iter()? {
        let param = param?;
        let kind = param.getattr("kind")?;
        if !(kind.eq(&positional[0])? || kind.eq(&positional[1])?) {
            continue;
        }
        names.push(param.getattr("name")?.extract::<String>()?);
        let default = param.getattr("default")?;
        if default.is(&empty) {
            // Defaults only count as a trailing run.
            defaults.clear();
        } else {
            defaults.push(default);
        }
    }
    Ok(Signature { names, defaults })
}

/// Build the parameter list from names and end-aligned defaults.
pub fn inspect<V: ForeignValue>(names: &[String], defaults: &[V]) -> Vec<Parameter> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let default = (i + defaults.len())
                .checked_sub(names.len())
                .and_then(|d| defaults.get(d));
            match default {
                Some(default) => Parameter::new(name.clone(), TypedValue::from_foreign(default)),
                None => Parameter::neutral(name.clone(), kind_from_name(name)),
            }
        })
        .collect()
}

/// Infer a kind from a parameter name's type suffix.
pub fn kind_from_name(name: &str) -> ValueKind {
    let mut segments = name.split('_').filter(|segment| !segment.is_empty());
    // The first segment is the name itself, never a type suffix.
    segments.next();
    match segments.last() {
        Some("int") => ValueKind::Integer,
        Some("float") | Some("flt") => ValueKind::Float,
        Some("bool") => ValueKind::Boolean,
        _ => ValueKind::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::testing::FakeForeign;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_order_preservation() {
        let params = inspect(&names(&["a", "b_int", "c_flt"]), &[FakeForeign::Float(3.0)]);
        assert_eq!(
            params,
            vec![
                Parameter::new("a", TypedValue::Text(String::new())),
                Parameter::new("b_int", TypedValue::Integer(0)),
                Parameter::new("c_flt", TypedValue::Float(3.0)),
            ]
        );
    }

    #[test]
    fn test_string_default_wins_over_suffix() {
        let params = inspect(&names(&["c_flt"]), &[FakeForeign::Str("3")]);
        assert_eq!(params[0].default_value(), &TypedValue::Text("3".into()));
    }

    #[test]
    fn test_default_suffix_alignment() {
        let params = inspect(
            &names(&["w_bool", "x_int", "y", "z"]),
            &[FakeForeign::Int(5), FakeForeign::Bool(true)],
        );
        assert_eq!(params[0].default_value(), &TypedValue::Boolean(false));
        assert_eq!(params[1].default_value(), &TypedValue::Integer(0));
        assert_eq!(params[2].default_value(), &TypedValue::Integer(5));
        assert_eq!(params[3].default_value(), &TypedValue::Boolean(true));
    }

    #[test]
    fn test_all_defaulted() {
        let params = inspect(
            &names(&["string", "times"]),
            &[FakeForeign::Str(""), FakeForeign::Int(1)],
        );
        assert_eq!(params[0].default_value(), &TypedValue::Text(String::new()));
        assert_eq!(params[1].default_value(), &TypedValue::Integer(1));
    }

    #[test]
    fn test_default_runtime_types() {
        let params = inspect(
            &names(&["arg2", "arg3", "arg4", "arg5", "arg6", "arg7"]),
            &[
                FakeForeign::Str("default"),
                FakeForeign::Int(12),
                FakeForeign::Float(23.5),
                FakeForeign::Bool(true),
                FakeForeign::None,
                FakeForeign::Tuple("(0, 1)"),
            ],
        );
        let kinds: Vec<ValueKind> = params.iter().map(Parameter::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ValueKind::Text,
                ValueKind::Integer,
                ValueKind::Float,
                ValueKind::Boolean,
                ValueKind::Text,
                ValueKind::Text,
            ]
        );
        assert_eq!(params[4].default_value(), &TypedValue::Text("None".into()));
    }

    #[test]
    fn test_naming_fallback() {
        assert_eq!(kind_from_name("gain_float"), ValueKind::Float);
        assert_eq!(kind_from_name("gain_flt"), ValueKind::Float);
        assert_eq!(kind_from_name("arg1_int"), ValueKind::Integer);
        assert_eq!(kind_from_name("enabled_bool"), ValueKind::Boolean);
        assert_eq!(kind_from_name("label"), ValueKind::Text);
        assert_eq!(kind_from_name("count_int_label"), ValueKind::Text);
        assert_eq!(kind_from_name("count__int"), ValueKind::Integer);
        assert_eq!(kind_from_name("count_int_"), ValueKind::Integer);
    }

    #[test]
    fn test_suffix_needs_a_stem() {
        assert_eq!(kind_from_name("int"), ValueKind::Text);
        assert_eq!(kind_from_name("_int"), ValueKind::Text);
        assert_eq!(kind_from_name("___"), ValueKind::Text);
        assert_eq!(kind_from_name(""), ValueKind::Text);
    }

    #[test]
    fn test_no_parameters() {
        let params = inspect::<FakeForeign>(&[], &[]);
        assert!(params.is_empty());
    }
}
