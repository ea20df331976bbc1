//! Common test utilities for py_bridge integration tests
//!
//! This module provides reusable test helpers for:
//! - Writing throwaway Python modules into a temporary search directory
//! - Driving a `MemoryHost` through the property changes the host would send

#![allow(dead_code)] // Utilities may not all be used by every test file

use std::fs;
use std::path::PathBuf;

use py_bridge::host::FixedInput;
use py_bridge::{MemoryHost, PythonBridge, TypedValue};
use tempfile::TempDir;

/// A temporary directory on the module search path.
pub struct ModuleDir {
    dir: TempDir,
}

impl ModuleDir {
    /// An empty module directory.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp module dir"),
        }
    }

    /// A directory holding a single module.
    pub fn with_module(name: &str, source: &str) -> Self {
        let dir = Self::new();
        dir.write(name, source);
        dir
    }

    /// Write (or overwrite) `<name>.py`.
    pub fn write(&self, name: &str, source: &str) {
        fs::write(self.dir.path().join(format!("{name}.py")), source).expect("write module");
    }

    /// The directory as the host's `path` input would hold it.
    pub fn path(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }
}

/// Directory holding the checked-in fixture modules.
pub fn fixtures_dir() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .to_string_lossy()
        .into_owned()
}

/// A bridge and an in-memory host, wired the way the host wires them.
pub struct Rig {
    pub bridge: PythonBridge,
    pub host: MemoryHost,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            bridge: PythonBridge::default(),
            host: MemoryHost::new(),
        }
    }

    /// Assign an input and notify the bridge with the stored value.
    pub fn set(&mut self, index: usize, value: impl Into<TypedValue>) {
        let stored = self.host.set_input(index, value.into()).expect("set input");
        self.bridge.handle_input_change(&mut self.host, index, &stored);
    }

    /// Point the bridge at `module.function` under `path`.
    pub fn select(&mut self, path: &str, module: &str, function: &str) {
        self.set(FixedInput::Path.index(), path);
        self.set(FixedInput::Module.index(), module);
        self.set(FixedInput::Function.index(), function);
    }

    pub fn show_args(&mut self, visible: bool) {
        self.set(FixedInput::GetArgs.index(), visible);
    }

    /// Set the argument input called `name`.
    pub fn set_arg(&mut self, name: &str, value: impl Into<TypedValue>) {
        let index = self
            .host
            .find_argument(name)
            .unwrap_or_else(|| panic!("no argument input named {name}"));
        self.set(index, value);
    }

    pub fn trigger(&mut self) {
        self.set(FixedInput::Trigger.index(), true);
    }

    pub fn argument_names(&self) -> Vec<String> {
        self.host
            .synthesized()
            .iter()
            .map(|slot| slot.def.name.clone())
            .collect()
    }
}
