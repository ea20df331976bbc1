//! Scoped interpreter sessions.
//!
//! Every resolution and every call runs inside its own [`Session`]. A session
//! extends the module search path, and when it ends it puts the interpreter back
//! the way it found it:
//!
//! - `sys.path` is restored to the list that was in place on entry;
//! - every module imported during the session is evicted from `sys.modules`, so
//!   module-level state never leaks into the next session and edits to a module
//!   file are picked up by the next import;
//! - the import system's finder caches are invalidated on entry.
//!
//! The embedded interpreter cannot be finalized and re-initialized safely, so this
//! eviction is what gives each session a fresh view of user modules.
//!
//! Cleanup runs from `Drop`, so it happens on normal return, on early return and
//! while unwinding from a panic.
//!
//! # Reentrancy
//!
//! Sessions are not reentrant. Opening one while the current thread already holds
//! one fails with [`BridgeError::NestedSession`]. Sessions on different threads are
//! serialized by a process-wide lock that is always taken *before* the interpreter
//! lock.
//!
//! # Example
//!
//! ```rust,ignore
//! use py_bridge::scripting::session::{with_session, SessionOptions};
//!
//! let options = SessionOptions::default().with_search_path("/opt/patches");
//! let version = with_session(&options, |session| {
//!     session.py().version().to_string()
//! })?;
//! ```

use std::cell::Cell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use tracing::{debug, warn};

use crate::error::{BridgeError, BridgeResult};

/// Modules the bridge itself needs in every session; imported before the
/// baseline snapshot so they are not churned.
const BRIDGE_MODULES: &[&str] = &["importlib", "inspect"];

static INTERPRETER_LOCK: Mutex<()> = Mutex::new(());

thread_local! {
    static SESSION_OPEN: Cell<bool> = const { Cell::new(false) };
}

// =============================================================================
// SessionOptions
// =============================================================================

/// How a session prepares the interpreter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionOptions {
    /// Directories appended to the module search path, in order. Empty entries
    /// are skipped.
    pub search_paths: Vec<PathBuf>,
    /// Top-level packages that stay loaded across sessions (extension modules
    /// that cannot be imported twice in one process).
    pub keep_modules: Vec<String>,
}

impl SessionOptions {
    /// Append one more search directory.
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    fn keeps(&self, module: &str) -> bool {
        self.keep_modules.iter().any(|keep| {
            module == keep
                || module
                    .strip_prefix(keep.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }
}

// =============================================================================
// Session
// =============================================================================

/// Marks this thread as holding a session and keeps other threads out.
struct SessionGuard {
    _lock: MutexGuard<'static, ()>,
}

impl SessionGuard {
    fn acquire() -> BridgeResult<Self> {
        if SESSION_OPEN.with(Cell::get) {
            return Err(BridgeError::NestedSession);
        }
        let lock = INTERPRETER_LOCK
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        SESSION_OPEN.with(|open| open.set(true));
        Ok(Self { _lock: lock })
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        SESSION_OPEN.with(|open| open.set(false));
    }
}

/// One scoped use of the interpreter.
///
/// Interpreter handles obtained through a session borrow its `'py` lifetime and
/// cannot leave the [`with_session`] closure.
pub struct Session<'py> {
    py: Python<'py>,
    sys: Bound<'py, PyModule>,
    saved_path: Bound<'py, PyList>,
    baseline: HashSet<String>,
    options: SessionOptions,
}

impl<'py> Session<'py> {
    fn open(py: Python<'py>, options: &SessionOptions) -> PyResult<Self> {
        for name in BRIDGE_MODULES {
            py.import(*name)?;
        }
        let sys = py.import("sys")?;
        let path = sys.getattr("path")?.downcast_into::<PyList>()?;
        let saved_path = path.call_method0("copy")?.downcast_into::<PyList>()?;
        let baseline = loaded_modules(&sys)?;

        let session = Self {
            py,
            sys,
            saved_path,
            baseline,
            options: options.clone(),
        };

        py.import("importlib")?.call_method0("invalidate_caches")?;
        for dir in &options.search_paths {
            if dir.as_os_str().is_empty() {
                continue;
            }
            path.append(dir.to_string_lossy().as_ref())?;
            debug!(path = %dir.display(), "extended module search path");
        }
        Ok(session)
    }

    /// The interpreter token for this session.
    pub fn py(&self) -> Python<'py> {
        self.py
    }

    /// Directories this session appended to the search path.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.options.search_paths
    }

    fn restore(&self) -> PyResult<usize> {
        if let Err(err) = self.sys.setattr("path", &self.saved_path) {
            warn!(error = %err, "failed to restore module search path");
        }
        let modules = self.sys.getattr("modules")?.downcast_into::<PyDict>()?;
        let stale = loaded_modules(&self.sys)?
            .into_iter()
            .filter(|name| !self.baseline.contains(name) && !self.options.keeps(name));
        Ok(evict(&modules, stale))
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        match self.restore() {
            Ok(evicted) => debug!(evicted, "interpreter session closed"),
            Err(err) => warn!(error = %err, "failed to restore interpreter state"),
        }
    }
}

/// Remove `names` from `modules`, carrying on past failures. Returns how many
/// were removed.
fn evict(modules: &Bound<'_, PyDict>, names: impl IntoIterator<Item = String>) -> usize {
    let mut evicted = 0;
    for name in names {
        match modules.del_item(name.as_str()) {
            Ok(()) => evicted += 1,
            Err(err) => warn!(module = %name, error = %err, "failed to evict module"),
        }
    }
    evicted
}

fn loaded_modules(sys: &Bound<'_, PyModule>) -> PyResult<HashSet<String>> {
    let modules = sys.getattr("modules")?.downcast_into::<PyDict>()?;
    Ok(modules
        .keys()
        .iter()
        .filter_map(|key| key.extract::<String>().ok())
        .collect())
}

/// Run `f` inside a fresh interpreter session.
///
/// Fails only if the session itself cannot be set up; whatever `f` does with
/// the interpreter is its own business and is reported through `R`.
pub fn with_session<F, R>(options: &SessionOptions, f: F) -> BridgeResult<R>
where
    F: for<'py> FnOnce(&Session<'py>) -> R,
{
    let _guard = SessionGuard::acquire()?;
    Python::with_gil(|py| {
        let session = Session::open(py, options)?;
        Ok(f(&session))
    })
}

// =============================================================================
// Tests
// =============================================================================
