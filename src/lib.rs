//! Core library for the py_bridge node.
//!
//! This library lets a node-graph host call a Python function as if it were a
//! native node: it discovers the function's parameters, exposes one typed host
//! input per parameter, marshals the inputs into a call and publishes the result
//! or the raised error on the node's outputs.
//!
//! The entry point is [`PythonBridge`], driven through the [`PropertyHost`]
//! abstraction of the host's property system.

pub mod bridge;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod parameter;
pub mod scripting;
pub mod synchronizer;
pub mod value;

pub use bridge::{BridgeState, PythonBridge};
pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult};
pub use host::{MemoryHost, PropertyHost};
pub use parameter::Parameter;
pub use scripting::CallOutcome;
pub use value::{TypedValue, ValueKind};
