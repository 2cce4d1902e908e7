//! Errors that carry key/value context for structured logging.
//!
//! An [`Error`] holds a message, an ordered list of key/value pairs, an
//! optional cause and an optional call site. It renders as plain text for
//! humans and as a flat key/value sequence for structured loggers:
//!
//! ```
//! use errctx::Cause;
//!
//! let err = errctx::new("file locked").with("file", "testrun").with("line", 101);
//! assert_eq!(err.to_string(), "file locked file=testrun line=101");
//!
//! let wrapped = errctx::wrap(Cause::from(err), "cannot open journal");
//! assert_eq!(
//!     wrapped.map(|err| err.to_string()).as_deref(),
//!     Some("cannot open journal: file locked file=testrun line=101"),
//! );
//! ```
//!
//! # Contexts
//!
//! A [`Context`] collects pairs that every error made through it will carry.
//! Contexts are immutable: [`Context::with`] returns a new context and the
//! original is unchanged, so one context can be shared across threads and
//! extended independently on each path.
//!
//! # Variants
//!
//! [`Context::wrap`] picks the error shape:
//!
//! ```text
//! no cause                      -> None
//! empty message (attach):
//!   empty context               -> cause unchanged
//!   cause is an errctx::Error   -> pairs merged into the cause
//!   otherwise                   -> Attached(context, cause)
//! non-empty message             -> Caused(context, cause, message)
//! ```
//!
//! # Structured logging
//!
//! [`Error::keyvals`] returns pairs whose first key is always `msg`. Log
//! adapters that should not depend on this crate's types go through the
//! [`bridge`] module.

mod caller;
mod cause;
mod context;
mod error;
mod keyvals;
mod render;
mod store;
mod value;

pub mod bridge;

use std::sync::Arc;

pub use cause::cause;
pub use context::Context;
pub use error::{into_cause, Cause, Error, ErrorExt, ResultExt, Variant};
pub use keyvals::{Keyvals, CALLER_KEY, CAUSE_KEY, MSG_KEY, NO_MESSAGE};
pub use store::{Key, KeyValue, KeyValues};
pub use value::{TextMarshal, Value};

/// Create an error with `message` and no context.
pub fn new(message: impl Into<Arc<str>>) -> Error {
    Context::new().new_error(message)
}

/// Wrap `cause` with `message`. `None` when there is no cause.
pub fn wrap(cause: impl Into<Option<Cause>>, message: impl Into<Arc<str>>) -> Option<Cause> {
    Context::new().wrap(cause, message)
}

/// Attach nothing to `cause`: returns it unchanged. `None` when there is no
/// cause. Useful mostly as the identity of [`Context::attach`].
pub fn attach(cause: impl Into<Option<Cause>>) -> Option<Cause> {
    Context::new().attach(cause)
}

/// Start a context with one key/value pair.
pub fn with(key: impl Into<Key>, value: impl Into<Value>) -> Context {
    Context::new().with(key, value)
}
