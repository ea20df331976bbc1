//! Embedded Python interpreter access.
//!
//! This module holds everything that touches the interpreter. The rest of the
//! crate only sees [`TypedValue`](crate::value::TypedValue)s, [`Parameter`]s and
//! [`CallOutcome`]s.
//!
//! # Architecture
//!
//! ```text
//! with_session (session.rs)         scoped use of the interpreter
//!     ├── resolve (resolver.rs)     module + name -> Callable
//!     ├── read_signature / inspect  Callable -> Vec<Parameter>
//!     │   (inspector.rs)
//!     └── invoke (marshal.rs)       host inputs -> call -> CallOutcome
//!
//! convert.rs                        TypedValue <-> interpreter objects
//! ```
//!
//! Resolution and invocation each run in their own session. No interpreter
//! handle survives from one session to the next, so every call re-resolves its
//! function.
//!
//! # Example: Discover a signature
//!
//! ```rust,ignore
//! use py_bridge::scripting::{inspector, resolver, with_session, SessionOptions};
//!
//! let options = SessionOptions::default().with_search_path("/opt/patches");
//! let params = with_session(&options, |session| {
//!     resolver::resolve(session, "mixer", "blend")
//!         .and_then(|callable| inspector::read_signature(&callable))
//!         .map(|signature| signature.parameters())
//! })?;
//! ```
//!
//! [`Parameter`]: crate::parameter::Parameter

pub mod convert;
pub mod inspector;
pub mod marshal;
pub mod resolver;
pub mod session;

pub use inspector::{inspect, kind_from_name, read_signature, Signature};
pub use marshal::{invoke, CallOutcome};
pub use resolver::{resolve, Callable};
pub use session::{with_session, Session, SessionOptions};
