//! Flattening errors into key/value sequences for structured loggers.
//!
//! Layout of [`Error::keyvals`]:
//!
//! ```text
//! msg    the error's own message, else the cause's text, else "(no message)"
//! ...    the context pairs, in insertion order
//! caller the call site, if one was captured
//! cause  the cause's text (wrapped errors with a message only)
//! ```
//!
//! Downstream loggers may rely on the first key being `msg`.

use crate::error::Repr;
use crate::{Error, KeyValue};

/// Flat sequence of key/value pairs.
pub type Keyvals = Vec<KeyValue>;

pub const MSG_KEY: &str = "msg";
pub const CAUSE_KEY: &str = "cause";
pub const CALLER_KEY: &str = "caller";

/// Placeholder `msg` for an error with neither message nor cause.
pub const NO_MESSAGE: &str = "(no message)";

pub(crate) fn extract(err: &Error) -> Keyvals {
    let ctx = err.context();
    let mut keyvals = Vec::with_capacity(ctx.pairs().len() + 3);

    let msg = match &err.repr {
        Repr::Plain { message } | Repr::Caused { message, .. } if !message.is_empty() => {
            message.to_string()
        }
        Repr::Caused { cause, .. } | Repr::Attached { cause } => cause.to_string(),
        Repr::Plain { .. } => NO_MESSAGE.to_string(),
    };
    keyvals.push(KeyValue::new(MSG_KEY, msg));

    keyvals.extend(ctx.pairs().iter().cloned());

    if let Some(caller) = ctx.caller_location() {
        keyvals.push(KeyValue::new(CALLER_KEY, caller));
    }

    if let Repr::Caused { message, cause } = &err.repr {
        if !message.is_empty() {
            keyvals.push(KeyValue::new(CAUSE_KEY, cause.to_string()));
        }
    }

    keyvals
}
