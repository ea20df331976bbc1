//! Function resolution.
//!
//! Resolution is a query: a module that fails to import, a missing name or a
//! name bound to something that cannot be called all come back as `None`. The
//! user is usually still typing, so none of this is worth an error.

use pyo3::prelude::*;
use tracing::debug;

use super::session::Session;

/// A callable found in a module, valid for the session that resolved it.
pub struct Callable<'py> {
    module: String,
    name: String,
    object: Bound<'py, PyAny>,
}

impl<'py> Callable<'py> {
    /// Module the callable was found in.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Name of the callable within its module.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The interpreter object.
    pub fn object(&self) -> &Bound<'py, PyAny> {
        &self.object
    }
}

impl std::fmt::Debug for Callable<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callable")
            .field("module", &self.module)
            .field("name", &self.name)
            .finish()
    }
}

/// Import `module` and look `function` up in its namespace.
pub fn resolve<'py>(session: &Session<'py>, module: &str, function: &str) -> Option<Callable<'py>> {
    if module.is_empty() || function.is_empty() {
        return None;
    }

    let imported = match session.py().import(module) {
        Ok(imported) => imported,
        Err(err) => {
            debug!(module, error = %err, "module import failed");
            return None;
        }
    };

    let object = match imported.dict().get_item(function) {
        Ok(Some(object)) => object,
        Ok(None) => {
            debug!(module, function, "function not found in module");
            return None;
        }
        Err(err) => {
            debug!(module, function, error = %err, "module namespace lookup failed");
            return None;
        }
    };

    if !object.is_callable() {
        debug!(module, function, "name is not callable");
        return None;
    }

    debug!(module, function, "resolved function");
    Some(Callable {
        module: module.to_string(),
        name: function.to_string(),
        object,
    })
}
