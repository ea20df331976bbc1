//! Per-instance bridge state and property-change dispatch.
//!
//! One [`PythonBridge`] exists per actor instance on the host's graph. The host
//! calls [`PythonBridge::handle_input_change`] whenever one of the actor's inputs
//! receives a value; everything the bridge does is a reaction to one of those
//! calls, processed to completion before it returns.
//!
//! | input        | reaction                                                   |
//! |--------------|------------------------------------------------------------|
//! | `trigger`    | call the function if one was found                         |
//! | `path`       | store, re-resolve, publish `function_found`                |
//! | `module`     | store, re-resolve, publish `function_found`                |
//! | `function`   | store, re-resolve, publish `function_found`                |
//! | `get_args`   | show (synchronize) or hide (clear) the argument inputs     |
//! | arguments    | nothing; their values are read when the function is called |
//!
//! Failures of the user's code never escape as errors. They show up on the
//! `function_found` and `error` outputs. Host property errors are logged.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::InterpreterConfig;
use crate::host::{FixedInput, Output, PropertyHost, FIRST_ARG_INPUT};
use crate::parameter::Parameter;
use crate::scripting::{self, inspector, resolver, with_session, CallOutcome, SessionOptions};
use crate::synchronizer;
use crate::value::TypedValue;

// =============================================================================
// BridgeState
// =============================================================================

/// What one bridge instance knows about its function.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BridgeState {
    path: Option<String>,
    module: String,
    function: String,
    found: bool,
    parameters: Vec<Parameter>,
    args_visible: bool,
}

impl BridgeState {
    /// Extra module search directory, if set.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Module name; empty when unset.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Function name; empty when unset.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Whether the last resolution found a callable.
    pub fn found(&self) -> bool {
        self.found
    }

    /// Parameters from the last successful resolution.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Whether the argument inputs are shown.
    pub fn args_visible(&self) -> bool {
        self.args_visible
    }
}

// =============================================================================
// PythonBridge
// =============================================================================

/// Bridge between one host actor and one Python function.
#[derive(Debug, Clone, Default)]
pub struct PythonBridge {
    state: BridgeState,
    interpreter: InterpreterConfig,
}

impl PythonBridge {
    /// A bridge with nothing resolved yet.
    pub fn new(interpreter: InterpreterConfig) -> Self {
        Self {
            state: BridgeState::default(),
            interpreter,
        }
    }

    /// Current state.
    pub fn state(&self) -> &BridgeState {
        &self.state
    }

    /// React to a new value on the input at one-based `index`.
    pub fn handle_input_change<H: PropertyHost + ?Sized>(
        &mut self,
        host: &mut H,
        index: usize,
        value: &TypedValue,
    ) {
        match FixedInput::from_index(index) {
            Some(FixedInput::Trigger) => {
                if value.is_on() {
                    self.trigger(host);
                }
            }
            Some(FixedInput::Path) => {
                let path = value.to_string();
                self.state.path = (!path.is_empty()).then_some(path);
                self.refresh(host);
            }
            Some(FixedInput::Module) => {
                self.state.module = value.to_string();
                self.refresh(host);
            }
            Some(FixedInput::Function) => {
                self.state.function = value.to_string();
                self.refresh(host);
            }
            Some(FixedInput::GetArgs) => self.set_args_visible(host, value.is_on()),
            None if index >= FIRST_ARG_INPUT => {}
            None => debug!(index, "ignoring change on unknown input"),
        }
    }

    /// Resolve the function again and publish `function_found`.
    ///
    /// On success the parameter list is replaced and, when arguments are shown,
    /// the argument inputs are rebuilt. On failure both are left as they were.
    pub fn refresh<H: PropertyHost + ?Sized>(&mut self, host: &mut H) -> bool {
        match self.discover() {
            Some(parameters) => {
                info!(
                    module = %self.state.module,
                    function = %self.state.function,
                    parameters = parameters.len(),
                    "function found"
                );
                self.state.found = true;
                self.state.parameters = parameters;
                if self.state.args_visible {
                    self.sync_arguments(host);
                }
            }
            None => {
                debug!(
                    module = %self.state.module,
                    function = %self.state.function,
                    "function not found"
                );
                self.state.found = false;
            }
        }
        host.set_output(Output::FunctionFound, self.state.found.into());
        self.state.found
    }

    /// Resolve the configured function and infer its parameters.
    ///
    /// `None` when the module or function is unset, cannot be resolved, or has
    /// a signature that cannot be read.
    pub fn discover(&self) -> Option<Vec<Parameter>> {
        if self.state.module.is_empty() || self.state.function.is_empty() {
            return None;
        }
        let result = with_session(&self.session_options(), |session| {
            resolver::resolve(session, &self.state.module, &self.state.function)
                .and_then(|callable| inspector::read_signature(&callable))
                .map(|signature| signature.parameters())
        });
        match result {
            Ok(parameters) => parameters,
            Err(err) => {
                warn!(error = %err, "could not open interpreter session");
                None
            }
        }
    }

    /// Show or hide the argument inputs.
    pub fn set_args_visible<H: PropertyHost + ?Sized>(&mut self, host: &mut H, visible: bool) {
        self.state.args_visible = visible;
        if visible {
            self.sync_arguments(host);
        } else if let Err(err) = synchronizer::clear(host) {
            warn!(error = %err, "failed to remove argument inputs");
        }
    }

    /// Call the function and publish the outcome.
    ///
    /// Does nothing when no function has been found. Returns the outcome that
    /// was published.
    pub fn trigger<H: PropertyHost + ?Sized>(&mut self, host: &mut H) -> Option<CallOutcome> {
        if !self.state.found {
            debug!("trigger ignored, no function found");
            return None;
        }
        let outcome = self.invoke(&*host);
        self.publish(host, &outcome);
        Some(outcome)
    }

    /// Call the function with the current argument values without publishing.
    pub fn invoke<H: PropertyHost + ?Sized>(&self, host: &H) -> CallOutcome {
        let state = &self.state;
        with_session(&self.session_options(), |session| {
            scripting::invoke(session, state, host)
        })
        .unwrap_or_else(|err| CallOutcome::Raised(err.to_string()))
    }

    /// Write an outcome to the outputs.
    ///
    /// A failed call only replaces `error`; the previous `output` stays.
    pub fn publish<H: PropertyHost + ?Sized>(&mut self, host: &mut H, outcome: &CallOutcome) {
        match outcome {
            CallOutcome::Returned(text) => {
                host.set_output(Output::Result, TypedValue::from(text.as_str()));
                host.set_output(Output::Error, TypedValue::empty_text());
                host.pulse_output(Output::FunctionRan);
            }
            CallOutcome::Raised(message) => {
                host.set_output(Output::Error, TypedValue::from(message.as_str()));
            }
            CallOutcome::NotFound => {
                info!(
                    module = %self.state.module,
                    function = %self.state.function,
                    "function disappeared since it was resolved"
                );
                self.state.found = false;
                host.set_output(Output::FunctionFound, false.into());
            }
        }
    }

    fn sync_arguments<H: PropertyHost + ?Sized>(&self, host: &mut H) {
        if let Err(err) = synchronizer::synchronize(host, &self.state.parameters) {
            warn!(error = %err, "failed to synchronize argument inputs");
        }
    }

    fn session_options(&self) -> SessionOptions {
        self.interpreter.session_options(self.state.path())
    }
}
