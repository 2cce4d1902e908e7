//! Error contexts.
//!
//! A [`Context`] carries the key/value pairs (and optionally a call site) that
//! get attached to every error created or wrapped through it. Deriving a
//! context never mutates the original, so a context can be shared freely and
//! extended independently by many call paths.
//!
//! A common pattern is to build a context once at the top of a function that
//! can fail in several places:
//!
//! ```
//! use errctx::{Cause, ResultExt};
//!
//! # fn fetch_revision(_doc_id: &str) -> Result<u64, std::io::Error> {
//! #     Err(std::io::Error::other("connection reset"))
//! # }
//! fn sync_document(user_id: &str, doc_id: &str) -> Result<u64, Cause> {
//!     let errors = errctx::with("user_id", user_id).with("doc_id", doc_id);
//!
//!     let rev = fetch_revision(doc_id).wrap_err(&errors, "cannot fetch revision")?;
//!     if rev == 0 {
//!         return Err(errors.new_error("stale revision").into());
//!     }
//!     Ok(rev)
//! }
//!
//! let err = sync_document("u-1", "d-9").unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "cannot fetch revision user_id=u-1 doc_id=d-9: connection reset"
//! );
//! ```

use std::panic::Location;
use std::sync::Arc;

use crate::caller;
use crate::{Cause, Error, Key, KeyValue, KeyValues, Keyvals, Value};

/// Immutable carrier of key/value pairs and call-site metadata.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Context {
    pairs: KeyValues,
    caller: Option<Arc<str>>,
}

impl Context {
    /// Create the empty root context.
    pub fn new() -> Self {
        Context::default()
    }

    /// Derive a context with one more pair.
    #[must_use]
    pub fn with(&self, key: impl Into<Key>, value: impl Into<Value>) -> Context {
        self.with_pairs([KeyValue::new(key, value)])
    }

    /// Derive a context with several more pairs, in order.
    #[must_use]
    pub fn with_pairs<I>(&self, pairs: I) -> Context
    where
        I: IntoIterator,
        I::Item: Into<KeyValue>,
    {
        Context {
            pairs: self.pairs.derive(pairs.into_iter().map(Into::into)),
            caller: self.caller.clone(),
        }
    }

    /// Derive a context that records a call site.
    ///
    /// `skip` counts stack frames above the caller of this method: `0` records
    /// the line that called `caller`, `1` the line that called that function,
    /// and so on. If the frame cannot be resolved the call site is left as it
    /// was.
    #[must_use]
    #[track_caller]
    pub fn caller(&self, skip: usize) -> Context {
        let location = caller::capture(skip, Location::caller());
        Context {
            pairs: self.pairs.clone(),
            caller: location.map(Arc::from).or_else(|| self.caller.clone()),
        }
    }

    /// Create a new error with `message` and this context's pairs.
    pub fn new_error(&self, message: impl Into<Arc<str>>) -> Error {
        Error::plain(self.clone(), message.into())
    }

    /// Wrap `cause` with a message and this context's pairs.
    ///
    /// Returns `None` when there is no cause: wrapping the absence of an error
    /// yields no error. An empty `message` is the same as [`Context::attach`].
    pub fn wrap(&self, cause: impl Into<Option<Cause>>, message: impl Into<Arc<str>>) -> Option<Cause> {
        cause.into().map(|cause| self.wrap_cause(cause, message.into()))
    }

    /// Attach this context's pairs to `cause` without adding a message.
    ///
    /// - no cause: `None`
    /// - empty context: `cause` is returned unchanged
    /// - `cause` is an [`Error`]: the pairs are merged into its context and the
    ///   cause's own variant is returned, so attaching never nests
    /// - otherwise: an attached error forwarding to `cause`
    pub fn attach(&self, cause: impl Into<Option<Cause>>) -> Option<Cause> {
        cause.into().map(|cause| self.attach_cause(cause))
    }

    /// The pairs of this context.
    pub fn pairs(&self) -> &KeyValues {
        &self.pairs
    }

    /// The pairs of this context as an owned sequence.
    pub fn keyvals(&self) -> Keyvals {
        self.pairs.iter().cloned().collect()
    }

    /// The recorded call site, as `file:line`.
    pub fn caller_location(&self) -> Option<&str> {
        self.caller.as_deref()
    }

    /// True when the context has no pairs and no call site.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty() && self.caller.is_none()
    }

    /// Layer `outer` on top of this context: pairs are appended and the call
    /// site is kept unless this context has none.
    pub(crate) fn merge(&self, outer: &Context) -> Context {
        Context {
            pairs: self.pairs.concat(&outer.pairs),
            caller: self.caller.clone().or_else(|| outer.caller.clone()),
        }
    }

    pub(crate) fn wrap_cause(&self, cause: Cause, message: Arc<str>) -> Cause {
        if message.is_empty() {
            return self.attach_cause(cause);
        }
        Arc::new(Error::caused(self.clone(), message, cause))
    }

    pub(crate) fn attach_cause(&self, cause: Cause) -> Cause {
        if self.is_empty() {
            return cause;
        }
        if let Some(err) = cause.downcast_ref::<Error>() {
            return Arc::new(err.with_context(self));
        }
        Arc::new(Error::attached(self.clone(), cause))
    }
}

#[cfg(test)]
mod tests;
