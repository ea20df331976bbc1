//! Conversions between interpreter objects and [`TypedValue`]s.

use pyo3::prelude::*;
use pyo3::types::{PyBool, PyFloat, PyInt, PyString};
use pyo3::IntoPyObject;

use crate::value::{ForeignValue, TypedValue, ValueKind};

/// Message published when an exception carries no usable text.
pub const UNSPECIFIED_ERROR: &str = "unspecified error";

impl ForeignValue for Bound<'_, PyAny> {
    fn exact_kind(&self) -> Option<ValueKind> {
        // bool is a subclass of int, so exact checks keep the two apart.
        if self.is_exact_instance_of::<PyBool>() {
            Some(ValueKind::Boolean)
        } else if self.is_exact_instance_of::<PyInt>() {
            Some(ValueKind::Integer)
        } else if self.is_exact_instance_of::<PyFloat>() {
            Some(ValueKind::Float)
        } else {
            None
        }
    }

    fn to_i64(&self) -> Option<i64> {
        self.extract().ok()
    }

    fn to_f64(&self) -> Option<f64> {
        self.extract().ok()
    }

    fn to_bool(&self) -> Option<bool> {
        self.extract().ok()
    }

    fn textual_form(&self) -> String {
        text_of(self).unwrap_or_default()
    }
}

/// `str(obj)` as an owned Rust string.
pub fn text_of(obj: &Bound<'_, PyAny>) -> PyResult<String> {
    Ok(obj.str()?.to_string_lossy().into_owned())
}

/// Convert a host value into an interpreter object; `None` becomes `None`.
pub fn to_python<'py>(py: Python<'py>, value: Option<&TypedValue>) -> Bound<'py, PyAny> {
    match value {
        None => py.None().into_bound(py),
        Some(TypedValue::Integer(i)) => match (*i).into_pyobject(py) {
            Ok(obj) => obj.into_any(),
            Err(never) => match never {},
        },
        Some(TypedValue::Float(f)) => PyFloat::new(py, *f).into_any(),
        Some(TypedValue::Boolean(b)) => PyBool::new(py, *b).to_owned().into_any(),
        Some(TypedValue::Text(s)) => PyString::new(py, s).into_any(),
    }
}

/// The message of a raised exception, or [`UNSPECIFIED_ERROR`].
pub fn error_message(py: Python<'_>, err: &PyErr) -> String {
    err.value(py)
        .str()
        .ok()
        .map(|text| text.to_string_lossy().into_owned())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| UNSPECIFIED_ERROR.to_string())
}
